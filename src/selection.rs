//! Selection tracking that survives filter changes.
//!
//! Row-selection widgets only report the selection among currently visible
//! rows. The tracker reconciles those capability-limited reports against the
//! full selection: members hidden by the active filter are carried across
//! every selection event instead of being dropped.

use std::collections::HashSet;

use crate::model::{ActionType, MasterSet, Record};

/// Which records a view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    /// Every record.
    #[default]
    All,
    /// Only records whose change created a component.
    Created,
    /// Only records whose change modified a component.
    Updated,
}

impl Filter {
    /// Whether a record is visible under this filter.
    #[must_use]
    pub fn matches(self, record: &Record) -> bool {
        match self {
            Self::All => true,
            Self::Created => record.action_type == ActionType::Created,
            Self::Updated => record.action_type == ActionType::Updated,
        }
    }
}

/// Non-owning projection of the master set under a filter.
///
/// Recomputed whenever the master set or the filter changes; never mutates
/// the master set.
#[must_use]
pub fn filter_view(master: &MasterSet, filter: Filter) -> Vec<&Record> {
    master.records().iter().filter(|r| filter.matches(r)).collect()
}

/// The set of record ids the user intends to resolve and export.
///
/// Membership changes only through explicit selection events; switching
/// filters never adds or removes members. Ids that no longer exist in the
/// master set are dropped lazily at snapshot time, not proactively.
#[derive(Debug, Clone, Default)]
pub struct SelectionTracker {
    selected: HashSet<String>,
    filter: Filter,
}

impl SelectionTracker {
    /// Creates an empty tracker showing all records.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconciles a selection report from the visible view.
    ///
    /// `visible_selected` is the full set of ids the widget reports as
    /// selected among `visible_ids`, the ids present in the current view.
    /// Previously selected ids that are *not* in the view are hidden by the
    /// filter, not deselected, so the new selection is their union with the
    /// visible report. Must run on every selection-change event.
    pub fn on_selection_event(
        &mut self,
        visible_selected: &HashSet<String>,
        visible_ids: &HashSet<String>,
    ) {
        let hidden: HashSet<String> =
            self.selected.difference(visible_ids).cloned().collect();
        self.selected = hidden.union(visible_selected).cloned().collect();
    }

    /// Switches the active filter. The selection is untouched; only the set
    /// of visible rows that future selection events are reconciled against
    /// changes.
    pub fn on_filter_change(&mut self, filter: Filter) {
        self.filter = filter;
    }

    /// The active filter.
    #[must_use]
    pub fn active_filter(&self) -> Filter {
        self.filter
    }

    /// Currently selected ids, in no particular order.
    #[must_use]
    pub fn selected_ids(&self) -> &HashSet<String> {
        &self.selected
    }

    /// True when nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Resolves the selection against the master set, in master order.
    ///
    /// Selected ids with no corresponding record are silently skipped —
    /// this is where stale selections get dropped.
    #[must_use]
    pub fn snapshot(&self, master: &MasterSet) -> Vec<Record> {
        master
            .records()
            .iter()
            .filter(|r| self.selected.contains(&r.id))
            .cloned()
            .collect()
    }
}
