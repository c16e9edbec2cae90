//! Cassette data structures for replaying port interactions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single recorded interaction with an external port.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interaction {
    /// Sequence number within the cassette.
    pub seq: u64,
    /// Port name (`"audit"`, `"catalog"`, `"inference"`, `"clock"`).
    pub port: String,
    /// Method name invoked on the port.
    pub method: String,
    /// Input data sent to the port.
    pub input: serde_json::Value,
    /// Output data returned from the port. Fallible calls use the
    /// `{"Ok": ...}` / `{"Err": "message"}` convention.
    pub output: serde_json::Value,
}

/// A cassette containing an ordered sequence of recorded interactions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cassette {
    /// Human-readable name for this cassette.
    pub name: String,
    /// When this cassette was captured or authored.
    pub recorded_at: DateTime<Utc>,
    /// Ordered list of interactions.
    pub interactions: Vec<Interaction>,
}
