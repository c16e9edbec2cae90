//! Command dispatch and handlers.

pub mod entries;
pub mod resolve;

use std::env;
use std::path::PathBuf;

use crate::cli::Command;
use crate::context::ServiceContext;

/// Dispatch a parsed command to its handler.
///
/// When `TRAILPACK_CASSETTE` is set to a cassette file path, all port
/// interactions are served from that cassette instead of the live org and
/// inference endpoints.
///
/// # Errors
///
/// Returns an error string if context construction or the selected command
/// handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    let ctx = match env::var("TRAILPACK_CASSETTE") {
        Ok(path) => ServiceContext::replaying(&PathBuf::from(path))?,
        Err(_) => ServiceContext::live(),
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to start async runtime: {e}"))?;

    match command {
        Command::Entries { filter } => runtime.block_on(entries::run(&ctx, *filter)),
        Command::Resolve { ids, filter, out } => {
            runtime.block_on(resolve::run(&ctx, ids, *filter, out.as_deref()))
        }
    }
}
