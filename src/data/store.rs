use std::collections::HashSet;

use super::notice::{BidNotice, ResultSet};

/// Tri-state summary of the selection, drives the header checkbox
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionSummary {
    None,
    Partial,
    All,
}

/// Owns the current result set and the ids the user has selected.
///
/// The selection is always a subset of the ids in `rows`.
#[derive(Debug, Default)]
pub struct ResultStore {
    rows: ResultSet,
    ids: HashSet<String>,
    selected: HashSet<String>,
    generation: u64,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the result set wholesale. The selection is always cleared.
    ///
    /// Rows repeating an id already seen in the same set are dropped.
    pub fn replace(&mut self, rows: ResultSet) {
        let mut ids = HashSet::with_capacity(rows.len());
        let mut kept = Vec::with_capacity(rows.len());

        for row in rows {
            if ids.insert(row.id.clone()) {
                kept.push(row);
            } else {
                tracing::warn!(id = %row.id, "dropping duplicate bid notice id");
            }
        }

        self.rows = kept;
        self.ids = ids;
        self.selected.clear();
        self.generation += 1;
    }

    /// Add or remove `id` from the selection. Unknown ids are ignored.
    pub fn toggle(&mut self, id: &str, selected: bool) {
        if !self.ids.contains(id) {
            tracing::debug!(id, "ignoring toggle for id outside the result set");
            return;
        }

        if selected {
            self.selected.insert(id.to_string());
        } else {
            self.selected.remove(id);
        }
    }

    pub fn select_all(&mut self) {
        self.selected = self.ids.clone();
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Remove rows (and their selection) by id. Returns the new row count.
    pub fn remove<'a, I>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = &'a String>,
    {
        let doomed: HashSet<&str> = ids
            .into_iter()
            .map(String::as_str)
            .filter(|id| self.ids.contains(*id))
            .collect();

        if doomed.is_empty() {
            return self.rows.len();
        }

        self.rows.retain(|row| !doomed.contains(row.id.as_str()));
        self.ids.retain(|id| !doomed.contains(id.as_str()));
        self.selected.retain(|id| !doomed.contains(id.as_str()));

        self.rows.len()
    }

    pub fn summary(&self) -> SelectionSummary {
        if self.selected.is_empty() {
            SelectionSummary::None
        } else if self.selected.len() == self.rows.len() {
            SelectionSummary::All
        } else {
            SelectionSummary::Partial
        }
    }

    /// Selected ids in row order
    pub fn selected_ids(&self) -> Vec<String> {
        self.rows
            .iter()
            .filter(|row| self.selected.contains(&row.id))
            .map(|row| row.id.clone())
            .collect()
    }

    /// Ids to export: the selection if any, otherwise every row. Row order.
    pub fn export_targets(&self) -> Vec<String> {
        if self.selected.is_empty() {
            self.rows.iter().map(|row| row.id.clone()).collect()
        } else {
            self.selected_ids()
        }
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    pub fn rows(&self) -> &[BidNotice] {
        &self.rows
    }

    pub fn get(&self, index: usize) -> Option<&BidNotice> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Bumped on every `replace`, lets late completions detect a newer result set
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
