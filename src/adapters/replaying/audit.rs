//! Replaying adapter for the `AuditLogSource` port.

use std::sync::Mutex;

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::audit::{AuditFuture, AuditLogSource};

/// Serves recorded audit trail fetches from a cassette.
pub struct ReplayingAuditLogSource {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingAuditLogSource {
    /// Creates a replaying audit source backed by the given replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl AuditLogSource for ReplayingAuditLogSource {
    fn fetch_entries(&self) -> AuditFuture<'_> {
        let output = next_output(&self.replayer, "audit", "fetch_entries");
        Box::pin(async move { replay_result(output, "audit", "fetch_entries") })
    }
}
