//! `trailpack resolve` command.

use std::collections::HashSet;
use std::path::Path;

use crate::cli::FilterArg;
use crate::context::ServiceContext;
use crate::manifest::Manifest;
use crate::model::MasterSet;
use crate::pipeline::resolve_selection;
use crate::selection::{filter_view, SelectionTracker};

/// Ingests the audit trail, resolves the selection, and emits the manifest.
///
/// Selection covers everything visible under `filter`, narrowed to `ids`
/// when given. The manifest goes to stdout or `out`; the resolve summary
/// and any completeness warning go to stderr.
///
/// # Errors
///
/// Returns an error string when ingestion, either resolver phase, or
/// writing the output file fails.
pub async fn run(
    ctx: &ServiceContext,
    ids: &[String],
    filter: Option<FilterArg>,
    out: Option<&Path>,
) -> Result<(), String> {
    let raw = ctx
        .audit
        .fetch_entries()
        .await
        .map_err(|e| format!("failed to load audit trail: {e}"))?;
    let mut master = MasterSet::ingest(&raw)?;

    let mut selection = SelectionTracker::new();
    selection.on_filter_change(FilterArg::to_filter(filter));
    let visible: HashSet<String> = filter_view(&master, selection.active_filter())
        .iter()
        .map(|r| r.id.clone())
        .collect();
    let visible_selected: HashSet<String> = if ids.is_empty() {
        visible.clone()
    } else {
        ids.iter().filter(|id| visible.contains(*id)).cloned().collect()
    };
    selection.on_selection_event(&visible_selected, &visible);

    if selection.is_empty() {
        return Err("nothing selected: no visible entries match the given ids".to_string());
    }

    let report = resolve_selection(ctx, &mut master, &selection).await?;
    eprintln!(
        "Resolved {} of {} selected entries ({} via catalog, {} descriptions inferred)",
        report.submitted - report.unresolved.len(),
        report.submitted,
        report.resolved_deterministic,
        report.inferred_submitted,
    );

    let manifest = Manifest::build(&master, &selection);
    if !manifest.is_complete() {
        eprintln!(
            "Warning: {} entries have no API name and fall back to {}: {}",
            manifest.unresolved().len(),
            crate::manifest::UNKNOWN_MEMBER,
            manifest.unresolved().join(", "),
        );
    }

    let xml = manifest.to_xml();
    match out {
        Some(path) => std::fs::write(path, &xml)
            .map_err(|e| format!("failed to write manifest to {}: {e}", path.display()))?,
        None => print!("{xml}"),
    }
    Ok(())
}
