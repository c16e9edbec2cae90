//! Manifest builder — deduplicated, deterministically ordered package
//! manifest from a selection snapshot.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

use crate::model::{MasterSet, Record};
use crate::selection::SelectionTracker;

/// Metadata API version written into the trailing version marker.
pub const API_VERSION: &str = "58.0";

/// Fallback type for records whose metadata type is unknown.
pub const FALLBACK_TYPE: &str = "CustomMetadata";

/// Placeholder member for records that never acquired an `api_name`.
pub const UNKNOWN_MEMBER: &str = "Unknown_Member";

const PACKAGE_NAMESPACE: &str = "http://soap.sforce.com/2006/04/metadata";

/// A derived manifest document: metadata types mapped to member sets.
///
/// Purely derived from a `(master, selection)` snapshot at build time;
/// superseded by each new generation, never stored back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    types: BTreeMap<String, BTreeSet<String>>,
    unresolved: Vec<String>,
}

impl Manifest {
    /// Groups the selected records into the manifest structure.
    ///
    /// Selected ids no longer present in the master set are ignored. Each
    /// record contributes its `metadata_type` (or [`FALLBACK_TYPE`]) and
    /// its `api_name` (or [`UNKNOWN_MEMBER`]); duplicates collapse by
    /// construction. Records without an `api_name` are additionally listed
    /// in [`Manifest::unresolved`] so callers can surface the non-fatal
    /// completeness warning.
    #[must_use]
    pub fn build(master: &MasterSet, selection: &SelectionTracker) -> Self {
        let mut types: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        let mut unresolved = Vec::new();

        for record in selection.snapshot(master) {
            let type_name = manifest_type(&record);
            let member = match record.api_name.as_deref() {
                Some(name) => name.to_string(),
                None => {
                    unresolved.push(record.id.clone());
                    UNKNOWN_MEMBER.to_string()
                }
            };
            types.entry(type_name).or_default().insert(member);
        }

        Self { types, unresolved }
    }

    /// True when every selected record carried an `api_name`.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }

    /// Ids of selected records that fell back to [`UNKNOWN_MEMBER`], in
    /// master order.
    #[must_use]
    pub fn unresolved(&self) -> &[String] {
        &self.unresolved
    }

    /// True when no selected record produced a member.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Serializes the manifest document.
    ///
    /// Byte-deterministic for identical input: types in lexicographic
    /// order, members lexicographic within each type, fixed indentation,
    /// trailing version marker.
    #[must_use]
    pub fn to_xml(&self) -> String {
        let mut xml = String::new();
        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        let _ = writeln!(xml, "<Package xmlns=\"{PACKAGE_NAMESPACE}\">");
        for (type_name, members) in &self.types {
            xml.push_str("    <types>\n");
            for member in members {
                let _ = writeln!(xml, "        <members>{}</members>", escape_xml(member));
            }
            let _ = writeln!(xml, "        <name>{}</name>", escape_xml(type_name));
            xml.push_str("    </types>\n");
        }
        let _ = writeln!(xml, "    <version>{API_VERSION}</version>");
        xml.push_str("</Package>\n");
        xml
    }
}

fn manifest_type(record: &Record) -> String {
    match record.metadata_type.as_deref() {
        Some(t) if !t.is_empty() && t != "Unknown" => t.to_string(),
        _ => FALLBACK_TYPE.to_string(),
    }
}

fn escape_xml(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MasterSet, RawEntry, Record};
    use crate::selection::{filter_view, Filter, SelectionTracker};
    use chrono::{TimeZone, Utc};
    use std::collections::HashSet;

    fn record(id: &str, section: &str, display: &str, api_name: Option<&str>) -> Record {
        let raw = RawEntry {
            id: None,
            created_date: Utc.with_ymd_and_hms(2024, 6, 15, 10, 30, 0).unwrap(),
            created_by: "Dana Admin".into(),
            section: if section.is_empty() { None } else { Some(section.into()) },
            action: "createdApexClass".into(),
            display: display.into(),
        };
        Record::from_raw(id.into(), &raw).with_api_name(api_name.map(String::from))
    }

    fn select_all(master: &MasterSet) -> SelectionTracker {
        let mut tracker = SelectionTracker::new();
        let ids: HashSet<String> =
            filter_view(master, Filter::All).iter().map(|r| r.id.clone()).collect();
        tracker.on_selection_event(&ids.clone(), &ids);
        tracker
    }

    #[test]
    fn types_and_members_sorted_lexicographically() {
        let master = MasterSet::from_records(vec![
            record("r1", "Validation Rules", "Created rule", Some("Account.Check")),
            record("r2", "Apex Classes", "Created class B", Some("Beta")),
            record("r3", "Apex Classes", "Created class A", Some("Alpha")),
        ])
        .unwrap();
        let manifest = Manifest::build(&master, &select_all(&master));
        let xml = manifest.to_xml();

        let apex = xml.find("<name>ApexClass</name>").unwrap();
        let validation = xml.find("<name>ValidationRule</name>").unwrap();
        assert!(apex < validation);

        let alpha = xml.find("<members>Alpha</members>").unwrap();
        let beta = xml.find("<members>Beta</members>").unwrap();
        assert!(alpha < beta);
    }

    #[test]
    fn duplicate_members_collapse() {
        let master = MasterSet::from_records(vec![
            record("a", "Custom Fields", "Created field Foo", Some("Foo__c")),
            record("b", "Custom Fields", "Created field Foo again", Some("Foo__c")),
        ])
        .unwrap();
        let manifest = Manifest::build(&master, &select_all(&master));
        let xml = manifest.to_xml();
        assert_eq!(xml.matches("<members>Foo__c</members>").count(), 1);
    }

    #[test]
    fn fallback_type_and_placeholder_member() {
        let master = MasterSet::from_records(vec![record("r1", "", "Changed a thing", None)])
            .unwrap();
        let manifest = Manifest::build(&master, &select_all(&master));
        assert!(!manifest.is_complete());
        assert_eq!(manifest.unresolved(), ["r1"]);

        let xml = manifest.to_xml();
        assert!(xml.contains("<name>CustomMetadata</name>"));
        assert!(xml.contains("<members>Unknown_Member</members>"));
    }

    #[test]
    fn build_is_deterministic() {
        let master = MasterSet::from_records(vec![
            record("r1", "Apex Classes", "Created class A", Some("Alpha")),
            record("r2", "Custom Objects", "Created object", None),
        ])
        .unwrap();
        let selection = select_all(&master);
        let first = Manifest::build(&master, &selection);
        let second = Manifest::build(&master, &selection);
        assert_eq!(first, second);
        assert_eq!(first.to_xml(), second.to_xml());
    }

    #[test]
    fn stale_selection_ids_are_ignored() {
        let master = MasterSet::from_records(vec![record(
            "r1",
            "Apex Classes",
            "Created class A",
            Some("Alpha"),
        )])
        .unwrap();
        let mut tracker = SelectionTracker::new();
        let visible: HashSet<String> = ["r1".to_string(), "gone".to_string()].into();
        tracker.on_selection_event(&visible.clone(), &visible);

        let manifest = Manifest::build(&master, &tracker);
        assert!(manifest.is_complete());
        assert_eq!(manifest.to_xml().matches("<members>").count(), 1);
    }

    #[test]
    fn empty_selection_yields_empty_package() {
        let master = MasterSet::from_records(vec![record(
            "r1",
            "Apex Classes",
            "Created class A",
            Some("Alpha"),
        )])
        .unwrap();
        let manifest = Manifest::build(&master, &SelectionTracker::new());
        assert!(manifest.is_empty());
        let xml = manifest.to_xml();
        assert!(!xml.contains("<types>"));
        assert!(xml.contains("<version>58.0</version>"));
    }

    #[test]
    fn members_are_xml_escaped() {
        let master = MasterSet::from_records(vec![record(
            "r1",
            "Apex Classes",
            "Created class",
            Some("A&B<C>"),
        )])
        .unwrap();
        let manifest = Manifest::build(&master, &select_all(&master));
        assert!(manifest.to_xml().contains("<members>A&amp;B&lt;C&gt;</members>"));
    }

    #[test]
    fn exact_document_shape() {
        let master = MasterSet::from_records(vec![record(
            "r1",
            "Apex Classes",
            "Created class A",
            Some("Alpha"),
        )])
        .unwrap();
        let manifest = Manifest::build(&master, &select_all(&master));
        let expected = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
                        <Package xmlns=\"http://soap.sforce.com/2006/04/metadata\">\n    \
                        <types>\n        \
                        <members>Alpha</members>\n        \
                        <name>ApexClass</name>\n    \
                        </types>\n    \
                        <version>58.0</version>\n\
                        </Package>\n";
        assert_eq!(manifest.to_xml(), expected);
    }
}
