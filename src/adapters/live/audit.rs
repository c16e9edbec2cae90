//! Live adapter for the `AuditLogSource` port, querying the org's setup
//! audit trail over the REST query endpoint.

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use uuid::Uuid;

use super::org_connection;
use crate::model::RawEntry;
use crate::ports::audit::{AuditFuture, AuditLogSource};

const AUDIT_QUERY: &str = "SELECT Id, Action, Section, Display, CreatedDate, CreatedBy.Name \
                           FROM SetupAuditTrail ORDER BY CreatedDate DESC LIMIT 200";

/// Live audit source backed by the org's `SetupAuditTrail` table.
pub struct LiveAuditLogSource {
    client: Client,
}

impl LiveAuditLogSource {
    /// Creates a new live audit source.
    #[must_use]
    pub fn new() -> Self {
        Self { client: Client::new() }
    }
}

impl Default for LiveAuditLogSource {
    fn default() -> Self {
        Self::new()
    }
}

/// Top-level response from the query endpoint.
#[derive(Deserialize)]
struct QueryResponse {
    records: Vec<AuditRow>,
}

/// One `SetupAuditTrail` row on the wire.
#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AuditRow {
    id: Option<String>,
    action: String,
    section: Option<String>,
    display: Option<String>,
    created_date: String,
    created_by: Option<NamedActor>,
}

/// Relationship sub-object carrying the actor's display name.
#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct NamedActor {
    name: String,
}

impl AuditLogSource for LiveAuditLogSource {
    fn fetch_entries(&self) -> AuditFuture<'_> {
        Box::pin(async move {
            let (instance, token, version) = org_connection()?;
            let url = format!("{instance}/services/data/v{version}/query/");

            let response = self
                .client
                .get(&url)
                .query(&[("q", AUDIT_QUERY)])
                .bearer_auth(&token)
                .send()
                .await
                .map_err(|e| -> Box<dyn std::error::Error + Send + Sync> {
                    format!("audit trail query failed: {e}").into()
                })?;

            let status = response.status();
            let body = response.text().await.map_err(
                |e| -> Box<dyn std::error::Error + Send + Sync> {
                    format!("failed to read audit trail response: {e}").into()
                },
            )?;
            if !status.is_success() {
                return Err(
                    format!("audit trail query error ({}): {body}", status.as_u16()).into()
                );
            }

            let parsed: QueryResponse = serde_json::from_str(&body).map_err(
                |e| -> Box<dyn std::error::Error + Send + Sync> {
                    format!("failed to parse audit trail response: {e}").into()
                },
            )?;

            parsed.records.into_iter().map(raw_entry_from_row).collect()
        })
    }
}

fn raw_entry_from_row(
    row: AuditRow,
) -> Result<RawEntry, Box<dyn std::error::Error + Send + Sync>> {
    Ok(RawEntry {
        // Rows occasionally come back without an Id; a generated one keeps
        // the session's uniqueness invariant intact.
        id: Some(row.id.unwrap_or_else(|| Uuid::new_v4().to_string())),
        created_date: parse_timestamp(&row.created_date)?,
        created_by: row.created_by.map_or_else(|| "Unknown".to_string(), |a| a.name),
        section: row.section,
        action: row.action,
        display: row.display.unwrap_or_default(),
    })
}

/// Parses the query endpoint's timestamp format (`+0000` offsets, no colon)
/// with an RFC 3339 fallback.
fn parse_timestamp(
    value: &str,
) -> Result<DateTime<Utc>, Box<dyn std::error::Error + Send + Sync>> {
    DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.3f%z")
        .or_else(|_| DateTime::parse_from_rfc3339(value))
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("failed to parse audit timestamp {value:?}: {e}").into())
}
