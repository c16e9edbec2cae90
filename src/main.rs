//! Binary entrypoint for the `trailpack` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    // Org and inference credentials may live in a local .env file.
    let _ = dotenvy::dotenv();
    match trailpack::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
