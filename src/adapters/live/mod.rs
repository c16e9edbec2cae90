//! Live adapters for real external interactions.

pub mod audit;
pub mod catalog;
pub mod clock;
pub mod inference;

pub use audit::LiveAuditLogSource;
pub use catalog::LiveCatalogResolver;
pub use clock::LiveClock;
pub use inference::LiveInferenceClient;

use std::env;
use std::error::Error;

/// Reads the org connection settings shared by the audit and catalog
/// adapters.
///
/// `SF_INSTANCE_URL` and `SF_ACCESS_TOKEN` are required; `SF_API_VERSION`
/// falls back to the manifest API version.
pub(crate) fn org_connection() -> Result<(String, String, String), Box<dyn Error + Send + Sync>> {
    let instance = env::var("SF_INSTANCE_URL")
        .map_err(|_| "SF_INSTANCE_URL environment variable not set")?;
    let token = env::var("SF_ACCESS_TOKEN")
        .map_err(|_| "SF_ACCESS_TOKEN environment variable not set")?;
    let version =
        env::var("SF_API_VERSION").unwrap_or_else(|_| crate::manifest::API_VERSION.to_string());
    Ok((instance.trim_end_matches('/').to_string(), token, version))
}
