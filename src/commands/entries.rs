//! `trailpack entries` command.

use crate::cli::FilterArg;
use crate::context::ServiceContext;
use crate::model::MasterSet;
use crate::selection::filter_view;

/// Fetches the audit trail and lists its entries under the given filter.
///
/// # Errors
///
/// Returns an error string when ingestion fails.
pub async fn run(ctx: &ServiceContext, filter: Option<FilterArg>) -> Result<(), String> {
    let raw = ctx
        .audit
        .fetch_entries()
        .await
        .map_err(|e| format!("failed to load audit trail: {e}"))?;
    let master = MasterSet::ingest(&raw)?;

    let view = filter_view(&master, FilterArg::to_filter(filter));
    if view.is_empty() {
        println!("No audit trail entries found");
        return Ok(());
    }

    for record in view {
        println!(
            "{}  [{}/{}]  {}  {}  {}",
            record.id,
            record.action_indicator(),
            record.resolution_indicator(),
            record.created_date.format("%Y-%m-%d %H:%M"),
            record.section.as_deref().unwrap_or("-"),
            record.display,
        );
    }
    Ok(())
}
