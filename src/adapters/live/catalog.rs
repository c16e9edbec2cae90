//! Live adapter for the `CatalogResolver` port, matching audit entries
//! against the org's metadata catalog over the tooling query endpoint.

use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::Deserialize;

use super::org_connection;
use crate::model::{ActionType, Record};
use crate::ports::catalog::{CatalogFuture, CatalogResolver};

/// Half-width of the timestamp window an exact match must fall into.
const MATCH_WINDOW_MINUTES: i64 = 2;

/// Live deterministic resolver backed by the org's tooling query endpoint.
pub struct LiveCatalogResolver {
    client: Client,
}

impl LiveCatalogResolver {
    /// Creates a new live catalog resolver.
    #[must_use]
    pub fn new() -> Self {
        Self { client: Client::new() }
    }
}

impl Default for LiveCatalogResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Top-level response from the tooling query endpoint.
#[derive(Deserialize)]
struct ToolingQueryResponse {
    records: Vec<serde_json::Value>,
}

impl CatalogResolver for LiveCatalogResolver {
    fn resolve_batch(&self, records: &[Record]) -> CatalogFuture<'_> {
        let batch: Vec<Record> = records.to_vec();
        Box::pin(async move {
            let (instance, token, version) = org_connection()?;
            let url = format!("{instance}/services/data/v{version}/tooling/query/");

            let mut resolved = Vec::new();
            for record in &batch {
                let Some((sobject, name_field)) =
                    record.metadata_type.as_deref().and_then(sobject_descriptor)
                else {
                    // No catalog table to query; the record is omitted from
                    // the response, per the port contract.
                    continue;
                };

                let soql = window_query(record, sobject, name_field);
                let response = self
                    .client
                    .get(&url)
                    .query(&[("q", soql.as_str())])
                    .bearer_auth(&token)
                    .send()
                    .await
                    .map_err(|e| -> Box<dyn std::error::Error + Send + Sync> {
                        format!("catalog query failed: {e}").into()
                    })?;

                let status = response.status();
                let body = response.text().await.map_err(
                    |e| -> Box<dyn std::error::Error + Send + Sync> {
                        format!("failed to read catalog response: {e}").into()
                    },
                )?;
                if !status.is_success() {
                    return Err(
                        format!("catalog query error ({}): {body}", status.as_u16()).into()
                    );
                }

                let parsed: ToolingQueryResponse = serde_json::from_str(&body).map_err(
                    |e| -> Box<dyn std::error::Error + Send + Sync> {
                        format!("failed to parse catalog response: {e}").into()
                    },
                )?;

                if let Some(name) = pick_match(record, &parsed.records, name_field) {
                    resolved.push(record.with_api_name(Some(name)));
                }
            }
            Ok(resolved)
        })
    }
}

/// Catalog table and name field for a metadata type, where one exists.
fn sobject_descriptor(metadata_type: &str) -> Option<(&'static str, &'static str)> {
    let pair = match metadata_type {
        "ApexClass" => ("ApexClass", "Name"),
        "ApexTrigger" => ("ApexTrigger", "Name"),
        "ValidationRule" => ("ValidationRule", "ValidationName"),
        "CustomObject" => ("CustomObject", "DeveloperName"),
        "CustomField" => ("CustomField", "DeveloperName"),
        "CustomTab" => ("CustomTab", "DeveloperName"),
        "Flow" => ("FlowDefinition", "DeveloperName"),
        "Layout" => ("Layout", "Name"),
        "WorkflowRule" => ("WorkflowRule", "Name"),
        "PermissionSet" => ("PermissionSet", "Name"),
        "CustomPermission" => ("CustomPermission", "DeveloperName"),
        "LightningComponentBundle" => ("LightningComponentBundle", "DeveloperName"),
        _ => return None,
    };
    Some(pair)
}

/// SOQL query for catalog rows whose relevant timestamp falls inside the
/// ±2-minute window around the entry's change time. Created entries are
/// matched on the creation timestamp, updated ones on last-modified.
fn window_query(record: &Record, sobject: &str, name_field: &str) -> String {
    let timestamp_field = match record.action_type {
        ActionType::Created => "CreatedDate",
        ActionType::Updated => "LastModifiedDate",
    };
    let window = Duration::minutes(MATCH_WINDOW_MINUTES);
    format!(
        "SELECT {name_field} FROM {sobject} WHERE {timestamp_field} >= {} AND {timestamp_field} <= {}",
        soql_datetime(record.created_date - window),
        soql_datetime(record.created_date + window),
    )
}

fn soql_datetime(value: DateTime<Utc>) -> String {
    value.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Chooses the catalog row the entry refers to: the candidate whose name
/// appears in the entry's display text, provided exactly one does.
fn pick_match(
    record: &Record,
    candidates: &[serde_json::Value],
    name_field: &str,
) -> Option<String> {
    let mut matches = candidates
        .iter()
        .filter_map(|row| row.get(name_field).and_then(serde_json::Value::as_str))
        .filter(|name| record.display.contains(name));
    let first = matches.next()?;
    if matches.next().is_some() {
        // Ambiguous window; treat as unmatched rather than guessing.
        return None;
    }
    Some(first.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawEntry;
    use chrono::TimeZone;
    use serde_json::json;

    fn record(action: &str, section: &str, display: &str) -> Record {
        let raw = RawEntry {
            id: None,
            created_date: Utc.with_ymd_and_hms(2024, 6, 15, 10, 30, 0).unwrap(),
            created_by: "Dana Admin".into(),
            section: Some(section.into()),
            action: action.into(),
            display: display.into(),
        };
        Record::from_raw("r1".into(), &raw)
    }

    #[test]
    fn created_entries_query_creation_timestamp() {
        let record = record("createdApexClass", "Apex Classes", "Created class InvoiceJob");
        let soql = window_query(&record, "ApexClass", "Name");
        assert!(soql.contains("FROM ApexClass"));
        assert!(soql.contains("CreatedDate >= 2024-06-15T10:28:00Z"));
        assert!(soql.contains("CreatedDate <= 2024-06-15T10:32:00Z"));
    }

    #[test]
    fn updated_entries_query_last_modified_timestamp() {
        let record = record("changedApexClass", "Apex Classes", "Changed class InvoiceJob");
        let soql = window_query(&record, "ApexClass", "Name");
        assert!(soql.contains("LastModifiedDate >="));
        assert!(!soql.contains("CreatedDate"));
    }

    #[test]
    fn pick_match_requires_name_in_display() {
        let record = record("createdApexClass", "Apex Classes", "Created class InvoiceJob");
        let candidates = vec![json!({"Name": "InvoiceJob"}), json!({"Name": "Unrelated"})];
        assert_eq!(pick_match(&record, &candidates, "Name"), Some("InvoiceJob".into()));
    }

    #[test]
    fn pick_match_rejects_ambiguity() {
        let record = record("createdApexClass", "Apex Classes", "Created class InvoiceJobRunner");
        // Both names appear in the display text.
        let candidates = vec![json!({"Name": "InvoiceJob"}), json!({"Name": "InvoiceJobRunner"})];
        assert_eq!(pick_match(&record, &candidates, "Name"), None);
    }

    #[test]
    fn unknown_type_has_no_descriptor() {
        assert!(sobject_descriptor("SomethingElse").is_none());
    }
}
