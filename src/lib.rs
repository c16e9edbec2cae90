//! Core library for the `trailpack` CLI: resolves ambiguous setup audit
//! trail entries into canonical metadata identifiers and serializes the
//! selection as a deduplicated package manifest.

pub mod adapters;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod context;
pub mod manifest;
pub mod merge;
pub mod model;
pub mod pipeline;
pub mod ports;
pub mod selection;

use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution
/// fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = cli::Cli::try_parse_from(args).map_err(|err| err.to_string())?;
    commands::dispatch(&cli.command)
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn run_errors_on_unknown_subcommand() {
        let result = run(["trailpack", "unknown"]);
        assert!(result.is_err());
    }

    #[test]
    fn run_errors_on_missing_cassette() {
        // With TRAILPACK_CASSETTE pointing nowhere, dispatch fails before
        // any network access.
        std::env::set_var("TRAILPACK_CASSETTE", "/nonexistent/session.cassette.yaml");
        let result = run(["trailpack", "entries"]);
        std::env::remove_var("TRAILPACK_CASSETTE");
        assert!(result.is_err());
    }
}
