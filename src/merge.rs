//! Merge engine — pure reconciliation of partial updates into the master set.
//!
//! Every mutation of record state in the application flows through
//! [`merge`]: resolver results, and any future single-field edit, are shaped
//! as an update plus a policy. The function never mutates its inputs, so the
//! pipeline can safely snapshot state between phases; the owner of the
//! master set commits the returned value.

use std::collections::HashMap;

use crate::model::{MasterSet, Record};

/// A partial update set together with its precedence policy.
#[derive(Debug)]
pub enum MergeUpdate<'a> {
    /// Replace the entire record for every update whose id exists in the
    /// master set, even when an `api_name` is already present. Lets a fresh
    /// exact match supersede a stale guess.
    Overwrite(&'a [Record]),
    /// For master records without an `api_name`, adopt the update's
    /// `api_name` when an update with the same id carries one. All other
    /// fields are untouched.
    FillById(&'a [Record]),
    /// For master records without an `api_name`, adopt the mapped name when
    /// the record's composite key appears in the map. Already-resolved
    /// records are never altered, even on a key collision.
    FillByKey(&'a HashMap<String, String>),
}

/// Produces a new master set with the update applied under its policy.
///
/// Master records with no corresponding update pass through unchanged, and
/// insertion order is preserved. `is_resolved` is recomputed on every
/// touched record, so it can never disagree with `api_name`.
#[must_use]
pub fn merge(master: &MasterSet, update: &MergeUpdate<'_>) -> MasterSet {
    let merged = match update {
        MergeUpdate::Overwrite(updates) => {
            let by_id = index_by_id(updates);
            master
                .records()
                .iter()
                .map(|record| match by_id.get(record.id.as_str()) {
                    // Full replacement, normalized through with_api_name so
                    // invariant A holds even if the update disagreed.
                    Some(update) => update.with_api_name(update.api_name.clone()),
                    None => record.clone(),
                })
                .collect()
        }
        MergeUpdate::FillById(updates) => {
            let by_id = index_by_id(updates);
            master
                .records()
                .iter()
                .map(|record| {
                    if record.api_name.is_some() {
                        return record.clone();
                    }
                    match by_id.get(record.id.as_str()).and_then(|u| u.api_name.clone()) {
                        Some(name) => record.with_api_name(Some(name)),
                        None => record.clone(),
                    }
                })
                .collect()
        }
        MergeUpdate::FillByKey(names) => master
            .records()
            .iter()
            .map(|record| {
                if record.api_name.is_some() {
                    return record.clone();
                }
                match names.get(&record.composite_key()) {
                    Some(name) => record.with_api_name(Some(name.clone())),
                    None => record.clone(),
                }
            })
            .collect(),
    };
    MasterSet::from_records_unchecked(merged)
}

fn index_by_id<'a>(updates: &'a [Record]) -> HashMap<&'a str, &'a Record> {
    updates.iter().map(|r| (r.id.as_str(), r)).collect()
}
