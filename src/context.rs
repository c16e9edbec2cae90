//! Service context bundling all port trait objects.

use std::path::Path;

use crate::adapters::live::{
    LiveAuditLogSource, LiveCatalogResolver, LiveClock, LiveInferenceClient,
};
use crate::adapters::replaying::{
    ReplayingAuditLogSource, ReplayingCatalogResolver, ReplayingClock, ReplayingInferenceClient,
};
use crate::cassette::format::Cassette;
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::audit::AuditLogSource;
use crate::ports::catalog::CatalogResolver;
use crate::ports::clock::Clock;
use crate::ports::inference::InferenceClient;

/// Bundles all port trait objects into a single context.
///
/// Each field provides access to one external boundary. Constructors wire
/// up live or replaying adapter sets.
pub struct ServiceContext {
    /// Clock for obtaining the current time.
    pub clock: Box<dyn Clock>,
    /// Audit trail ingestion source.
    pub audit: Box<dyn AuditLogSource>,
    /// Deterministic metadata catalog resolver.
    pub catalog: Box<dyn CatalogResolver>,
    /// Generative inference client.
    pub inference: Box<dyn InferenceClient>,
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext").finish_non_exhaustive()
    }
}

impl ServiceContext {
    /// Creates a live context with real adapters on every port.
    #[must_use]
    pub fn live() -> Self {
        Self {
            clock: Box::new(LiveClock),
            audit: Box::new(LiveAuditLogSource::new()),
            catalog: Box::new(LiveCatalogResolver::new()),
            inference: Box::new(LiveInferenceClient::new()),
        }
    }

    /// Creates a replaying context from a monolithic cassette file.
    ///
    /// Each port gets an independent replayer over the same cassette so
    /// per-port cursors do not interfere.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read cassette file {}: {e}", path.display()))?;
        let cassette: Cassette = serde_yaml::from_str(&content)
            .map_err(|e| format!("failed to parse cassette file {}: {e}", path.display()))?;

        Ok(Self {
            clock: Box::new(ReplayingClock::new(CassetteReplayer::new(&cassette))),
            audit: Box::new(ReplayingAuditLogSource::new(CassetteReplayer::new(&cassette))),
            catalog: Box::new(ReplayingCatalogResolver::new(CassetteReplayer::new(&cassette))),
            inference: Box::new(ReplayingInferenceClient::new(CassetteReplayer::new(&cassette))),
        })
    }
}
