//! Replaying adapter for the `CatalogResolver` port.

use std::sync::Mutex;

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::model::Record;
use crate::ports::catalog::{CatalogFuture, CatalogResolver};

/// Serves recorded catalog lookups from a cassette.
pub struct ReplayingCatalogResolver {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingCatalogResolver {
    /// Creates a replaying catalog resolver backed by the given replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl CatalogResolver for ReplayingCatalogResolver {
    fn resolve_batch(&self, _records: &[Record]) -> CatalogFuture<'_> {
        let output = next_output(&self.replayer, "catalog", "resolve_batch");
        Box::pin(async move { replay_result(output, "catalog", "resolve_batch") })
    }
}
