//! Record model — the canonical shape of one audit trail entry under
//! resolution, plus the ordered master set that holds them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether the underlying change created a component or modified one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionType {
    /// The entry describes a newly created component.
    Created,
    /// The entry describes a modification to an existing component.
    Updated,
}

/// One raw audit trail entry as delivered by the ingestion source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEntry {
    /// Source row id, when the source provides one.
    pub id: Option<String>,
    /// Timestamp of the underlying change.
    pub created_date: DateTime<Utc>,
    /// Display name of the actor who made the change.
    pub created_by: String,
    /// Setup area the change belongs to (e.g. "Apex Classes").
    pub section: Option<String>,
    /// Action code from the source log (e.g. "createdApexClass").
    pub action: String,
    /// Human-readable description of the change.
    pub display: String,
}

/// One audit trail entry under resolution.
///
/// `section`, `action` and `display` are immutable once ingested; only the
/// resolution fields (`api_name`, `is_resolved`) change afterwards, and only
/// through the merge engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Stable unique identifier, assigned at ingestion, never reassigned.
    pub id: String,
    /// Timestamp of the underlying change.
    pub created_date: DateTime<Utc>,
    /// Actor display name (presentation only).
    pub created_by: String,
    /// Setup area from the source log.
    pub section: Option<String>,
    /// Action code from the source log.
    pub action: String,
    /// Human-readable description of the change.
    pub display: String,
    /// Canonical metadata type, when the section maps onto a known one.
    pub metadata_type: Option<String>,
    /// Canonical component identifier; absent until resolved.
    pub api_name: Option<String>,
    /// True exactly when `api_name` is present.
    pub is_resolved: bool,
    /// Whether the change was a creation or a modification.
    pub action_type: ActionType,
}

impl Record {
    /// Builds a record from a raw ingested entry.
    ///
    /// `id` must be unique across the session; callers pass the source row
    /// id or a generated one when the source omits it. `is_resolved` starts
    /// false and `api_name` absent — resolution happens later, through the
    /// merge engine.
    #[must_use]
    pub fn from_raw(id: String, raw: &RawEntry) -> Self {
        let metadata_type = raw.section.as_deref().and_then(metadata_type_for_section);
        let action_type = derive_action_type(&raw.action);
        Self {
            id,
            created_date: raw.created_date,
            created_by: raw.created_by.clone(),
            section: raw.section.clone(),
            action: raw.action.clone(),
            display: raw.display.clone(),
            metadata_type,
            api_name: None,
            is_resolved: false,
            action_type,
        }
    }

    /// The composite correlation key used by the generative phase, which is
    /// not id-aware: `"Section: {section} | Display: {display}"`.
    #[must_use]
    pub fn composite_key(&self) -> String {
        format!(
            "Section: {} | Display: {}",
            self.section.as_deref().unwrap_or(""),
            self.display
        )
    }

    /// Presentation hint for resolution state. Pure and idempotent.
    #[must_use]
    pub fn resolution_indicator(&self) -> &'static str {
        if self.api_name.is_some() {
            "success"
        } else {
            "warning"
        }
    }

    /// Presentation hint for the created/updated distinction. Pure and
    /// idempotent.
    #[must_use]
    pub fn action_indicator(&self) -> &'static str {
        match self.action_type {
            ActionType::Created => "new",
            ActionType::Updated => "edit",
        }
    }

    /// Returns a copy with `api_name` set and `is_resolved` recomputed, so
    /// the two fields can never disagree.
    #[must_use]
    pub fn with_api_name(&self, api_name: Option<String>) -> Self {
        let is_resolved = api_name.is_some();
        Self { api_name, is_resolved, ..self.clone() }
    }
}

/// Derives the action type from the source action code.
///
/// Audit trail action codes use a leading verb (`createdApexClass`,
/// `changedValidationActive`); anything that does not announce a creation
/// is treated as an update.
fn derive_action_type(action: &str) -> ActionType {
    if action.to_ascii_lowercase().starts_with("create") {
        ActionType::Created
    } else {
        ActionType::Updated
    }
}

/// Maps a setup section onto its canonical metadata type, when known.
///
/// The `Unknown` sentinel some sources emit is normalized to `None` here so
/// downstream code has a single "no type" representation.
fn metadata_type_for_section(section: &str) -> Option<String> {
    let name = match section.trim() {
        "Apex Class" | "Apex Classes" => "ApexClass",
        "Apex Trigger" | "Apex Triggers" => "ApexTrigger",
        "Custom Objects" | "Custom Object" => "CustomObject",
        "Custom Fields" | "Custom Field" => "CustomField",
        "Validation Rules" | "Validation Rule" => "ValidationRule",
        "Workflow Rule" | "Workflow Rules" => "WorkflowRule",
        "Custom Tabs" | "Custom Tab" => "CustomTab",
        "Page Layouts" | "Page Layout" => "Layout",
        "Flows" | "Flow" => "Flow",
        "Custom Permissions" => "CustomPermission",
        "Permission Sets" | "Permission Set" => "PermissionSet",
        "Lightning Components" | "Lightning Component Bundle" => "LightningComponentBundle",
        "" | "Unknown" => return None,
        _ => return None,
    };
    Some(name.to_string())
}

/// The ordered collection of all records known to the session, keyed by id.
///
/// Insertion order is preserved; at most one record exists per id. Records
/// are never deleted within a session — they are only updated in place by
/// committing merge engine results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MasterSet {
    records: Vec<Record>,
}

impl MasterSet {
    /// Builds a master set from ingested records.
    ///
    /// # Errors
    ///
    /// Returns an error if two records share an id.
    pub fn from_records(records: Vec<Record>) -> Result<Self, String> {
        let mut seen = std::collections::HashSet::new();
        for record in &records {
            if !seen.insert(record.id.as_str()) {
                return Err(format!("duplicate record id at ingestion: {}", record.id));
            }
        }
        Ok(Self { records })
    }

    /// All records in insertion order.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Looks up a record by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the set holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Ingests raw entries in order, assigning positional fallback ids to
    /// entries the source delivered without one.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting ids are not unique.
    pub fn ingest(entries: &[RawEntry]) -> Result<Self, String> {
        let records = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let id = entry.id.clone().unwrap_or_else(|| format!("entry-{index}"));
                Record::from_raw(id, entry)
            })
            .collect();
        Self::from_records(records)
    }

    pub(crate) fn from_records_unchecked(records: Vec<Record>) -> Self {
        Self { records }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_raw(action: &str, section: &str, display: &str) -> RawEntry {
        RawEntry {
            id: None,
            created_date: Utc.with_ymd_and_hms(2024, 6, 15, 10, 30, 0).unwrap(),
            created_by: "Dana Admin".into(),
            section: if section.is_empty() { None } else { Some(section.into()) },
            action: action.into(),
            display: display.into(),
        }
    }

    #[test]
    fn factory_starts_unresolved() {
        let raw = sample_raw("createdApexClass", "Apex Classes", "Created class InvoiceJob");
        let record = Record::from_raw("r1".into(), &raw);
        assert_eq!(record.id, "r1");
        assert!(record.api_name.is_none());
        assert!(!record.is_resolved);
        assert_eq!(record.metadata_type.as_deref(), Some("ApexClass"));
        assert_eq!(record.action_type, ActionType::Created);
    }

    #[test]
    fn changed_action_maps_to_updated() {
        let raw = sample_raw("changedValidationActive", "Validation Rules", "Changed rule");
        let record = Record::from_raw("r1".into(), &raw);
        assert_eq!(record.action_type, ActionType::Updated);
    }

    #[test]
    fn unknown_section_yields_no_type() {
        let raw = sample_raw("changedSomething", "Session Settings", "Changed setting");
        let record = Record::from_raw("r1".into(), &raw);
        assert!(record.metadata_type.is_none());

        let sentinel = sample_raw("changedSomething", "Unknown", "Changed setting");
        let record = Record::from_raw("r2".into(), &sentinel);
        assert!(record.metadata_type.is_none());
    }

    #[test]
    fn indicators_are_idempotent() {
        let raw = sample_raw("createdApexClass", "Apex Classes", "Created class A");
        let record = Record::from_raw("r1".into(), &raw);
        assert_eq!(record.resolution_indicator(), "warning");
        assert_eq!(record.resolution_indicator(), "warning");
        assert_eq!(record.action_indicator(), "new");
        assert_eq!(record.action_indicator(), "new");

        let resolved = record.with_api_name(Some("InvoiceJob".into()));
        assert_eq!(resolved.resolution_indicator(), "success");
        assert_eq!(resolved.resolution_indicator(), "success");
    }

    #[test]
    fn with_api_name_keeps_fields_consistent() {
        let raw = sample_raw("createdApexClass", "Apex Classes", "Created class A");
        let record = Record::from_raw("r1".into(), &raw);

        let resolved = record.with_api_name(Some("A".into()));
        assert!(resolved.is_resolved);
        assert_eq!(resolved.api_name.as_deref(), Some("A"));

        let cleared = resolved.with_api_name(None);
        assert!(!cleared.is_resolved);
        assert!(cleared.api_name.is_none());
    }

    #[test]
    fn composite_key_format() {
        let raw = sample_raw("createdApexClass", "Apex Classes", "Created class A");
        let record = Record::from_raw("r1".into(), &raw);
        assert_eq!(record.composite_key(), "Section: Apex Classes | Display: Created class A");
    }

    #[test]
    fn composite_key_empty_section() {
        let raw = sample_raw("changedSomething", "", "Changed a thing");
        let record = Record::from_raw("r1".into(), &raw);
        assert_eq!(record.composite_key(), "Section:  | Display: Changed a thing");
    }

    #[test]
    fn master_set_rejects_duplicate_ids() {
        let raw = sample_raw("createdApexClass", "Apex Classes", "Created class A");
        let a = Record::from_raw("r1".into(), &raw);
        let b = Record::from_raw("r1".into(), &raw);
        let err = MasterSet::from_records(vec![a, b]).unwrap_err();
        assert!(err.contains("duplicate record id"));
    }

    #[test]
    fn ingest_assigns_fallback_ids_in_order() {
        let mut with_id = sample_raw("createdApexClass", "Apex Classes", "Created class A");
        with_id.id = Some("row-7".into());
        let without_id = sample_raw("createdApexClass", "Apex Classes", "Created class B");

        let master = MasterSet::ingest(&[with_id, without_id]).unwrap();
        let ids: Vec<&str> = master.records().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["row-7", "entry-1"]);
    }

    #[test]
    fn master_set_preserves_order() {
        let raw = sample_raw("createdApexClass", "Apex Classes", "Created class A");
        let records: Vec<Record> =
            ["r1", "r2", "r3"].iter().map(|id| Record::from_raw((*id).into(), &raw)).collect();
        let master = MasterSet::from_records(records).unwrap();
        let ids: Vec<&str> = master.records().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["r1", "r2", "r3"]);
        assert_eq!(master.len(), 3);
        assert!(master.get("r2").is_some());
        assert!(master.get("r9").is_none());
    }
}
