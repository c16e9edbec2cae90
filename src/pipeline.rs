//! Resolution pipeline — two-phase orchestration over the master set.
//!
//! Phase 1 submits the selected records to the deterministic catalog
//! resolver and commits its results with overwrite precedence. Phase 2 runs
//! only for records still unresolved *after* that merge, correlating
//! generative results back by composite key and committing them fill-only.
//! The phases are strictly sequential: the generative request set depends on
//! the merged outcome of the deterministic phase.

use chrono::{DateTime, Utc};

use crate::context::ServiceContext;
use crate::merge::{merge, MergeUpdate};
use crate::model::{MasterSet, Record};
use crate::selection::SelectionTracker;

/// Summary of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveReport {
    /// When the run started, per the context clock.
    pub started_at: DateTime<Utc>,
    /// How many selected records were submitted to the deterministic phase.
    pub submitted: usize,
    /// How many of the selected records were resolved after the
    /// deterministic merge.
    pub resolved_deterministic: usize,
    /// How many composite keys were submitted to the generative phase
    /// (zero when everything resolved deterministically).
    pub inferred_submitted: usize,
    /// Ids of selected records still unresolved after both phases, in
    /// master order.
    pub unresolved: Vec<String>,
}

impl ResolveReport {
    /// True when every selected record ended up with an `api_name`.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Runs the two-phase resolution over the current selection.
///
/// `master` is the single-writer state container: each phase's merge result
/// is committed to it before the next phase begins, so on a later failure
/// the partially-merged state is kept, never rolled back. An empty
/// selection is a no-op. Re-invocation re-queries current record state and
/// is safe, if potentially redundant.
///
/// # Errors
///
/// Returns an error when either resolver call fails, identifying the phase
/// that failed. No automatic retry happens; re-running the pipeline is the
/// only retry path.
pub async fn resolve_selection(
    ctx: &ServiceContext,
    master: &mut MasterSet,
    selection: &SelectionTracker,
) -> Result<ResolveReport, String> {
    let started_at = ctx.clock.now();
    let snapshot = selection.snapshot(master);
    if snapshot.is_empty() {
        return Ok(ResolveReport {
            started_at,
            submitted: 0,
            resolved_deterministic: 0,
            inferred_submitted: 0,
            unresolved: Vec::new(),
        });
    }
    let submitted = snapshot.len();

    // Phase 1: exact catalog lookup, merged with overwrite precedence.
    let matches = ctx
        .catalog
        .resolve_batch(&snapshot)
        .await
        .map_err(|e| format!("deterministic resolution failed: {e}"))?;
    *master = merge(master, &MergeUpdate::Overwrite(&matches));

    // Recompute the selection against the *updated* master before deciding
    // what phase 2 still has to cover.
    let current = selection.snapshot(master);
    let unresolved: Vec<Record> =
        current.iter().filter(|r| r.api_name.is_none()).cloned().collect();
    let resolved_deterministic = current.len() - unresolved.len();

    if unresolved.is_empty() {
        return Ok(ResolveReport {
            started_at,
            submitted,
            resolved_deterministic,
            inferred_submitted: 0,
            unresolved: Vec::new(),
        });
    }

    // Phase 2: generative inference, correlated by composite key and merged
    // fill-only so phase 1 results keep precedence.
    let keys = inference_keys(&unresolved);
    let inferred_submitted = keys.len();
    let inferred = ctx
        .inference
        .infer(&keys)
        .await
        .map_err(|e| format!("generative resolution failed: {e}"))?;
    *master = merge(master, &MergeUpdate::FillByKey(&inferred));

    let unresolved = selection
        .snapshot(master)
        .iter()
        .filter(|r| r.api_name.is_none())
        .map(|r| r.id.clone())
        .collect();

    Ok(ResolveReport {
        started_at,
        submitted,
        resolved_deterministic,
        inferred_submitted,
        unresolved,
    })
}

/// The explicit record-to-description mapping step for the generative
/// collaborator, which does not round-trip ids.
///
/// Order follows the input records; duplicate keys collapse to one request,
/// since identical display text implies identical resolution.
fn inference_keys(records: &[Record]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    records
        .iter()
        .map(Record::composite_key)
        .filter(|key| seen.insert(key.clone()))
        .collect()
}
