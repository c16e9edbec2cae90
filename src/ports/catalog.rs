//! Deterministic catalog resolver port.

use std::error::Error;
use std::future::Future;
use std::pin::Pin;

use crate::model::Record;

/// Boxed future type alias used by [`CatalogResolver`] to keep the trait
/// dyn-compatible.
pub type CatalogFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Vec<Record>, Box<dyn Error + Send + Sync>>> + Send + 'a>>;

/// Exact-match lookup against the metadata catalog.
///
/// For each input record the resolver searches the catalog inside a
/// ±2-minute window around the entry's timestamp — the creation timestamp
/// for created entries, the last-modified timestamp for updated ones — and
/// returns records with `api_name` populated where a match existed.
/// Unmatched records may be omitted from the response entirely; callers
/// must not expect one output per input id.
pub trait CatalogResolver: Send + Sync {
    /// Resolves a batch of records in one call.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog is unreachable or its response
    /// cannot be parsed.
    fn resolve_batch(&self, records: &[Record]) -> CatalogFuture<'_>;
}
