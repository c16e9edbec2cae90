//! Replaying adapters that serve recorded interactions from cassettes.

pub mod audit;
pub mod catalog;
pub mod clock;
pub mod inference;

use std::error::Error;
use std::sync::Mutex;

use serde::de::DeserializeOwned;

use crate::cassette::replayer::CassetteReplayer;

pub use audit::ReplayingAuditLogSource;
pub use catalog::ReplayingCatalogResolver;
pub use clock::ReplayingClock;
pub use inference::ReplayingInferenceClient;

/// Takes the next recorded output for a port/method pair.
pub(crate) fn next_output(
    replayer: &Mutex<CassetteReplayer>,
    port: &str,
    method: &str,
) -> serde_json::Value {
    let mut guard = replayer.lock().expect("replayer lock poisoned");
    guard.next_interaction(port, method).output
}

/// Decodes a recorded `Result` using the `{"Ok": ...}` / `{"Err": "..."}`
/// convention.
pub(crate) fn replay_result<T: DeserializeOwned>(
    output: serde_json::Value,
    port: &str,
    method: &str,
) -> Result<T, Box<dyn Error + Send + Sync>> {
    let object = output.as_object().unwrap_or_else(|| {
        panic!("{port}::{method}: recorded output is not an Ok/Err object")
    });
    if let Some(ok) = object.get("Ok") {
        serde_json::from_value(ok.clone()).map_err(|e| {
            Box::<dyn Error + Send + Sync>::from(format!(
                "{port}::{method}: failed to deserialize recorded Ok value: {e}"
            ))
        })
    } else if let Some(err) = object.get("Err") {
        Err(err.as_str().unwrap_or("recorded error").to_string().into())
    } else {
        panic!("{port}::{method}: recorded output has neither Ok nor Err")
    }
}
