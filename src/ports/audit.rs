//! Audit trail ingestion port.

use std::error::Error;
use std::future::Future;
use std::pin::Pin;

use crate::model::RawEntry;

/// Boxed future type alias used by [`AuditLogSource`] to keep the trait
/// dyn-compatible.
pub type AuditFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Vec<RawEntry>, Box<dyn Error + Send + Sync>>> + Send + 'a>>;

/// Supplies the raw audit trail entries for a session.
///
/// Fetched once per session load; a failure here surfaces as a load error
/// and the resolution pipeline is never invoked.
pub trait AuditLogSource: Send + Sync {
    /// Fetches the ordered list of raw audit trail entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the source is unreachable or its response cannot
    /// be parsed.
    fn fetch_entries(&self) -> AuditFuture<'_>;
}
