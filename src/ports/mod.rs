//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the resolution core and an
//! external collaborator (time, audit trail ingestion, catalog lookup,
//! generative inference). Implementations live in `src/adapters/`.

pub mod audit;
pub mod catalog;
pub mod clock;
pub mod inference;

pub use audit::{AuditFuture, AuditLogSource};
pub use catalog::{CatalogFuture, CatalogResolver};
pub use clock::Clock;
pub use inference::{InferenceClient, InferenceFuture};
