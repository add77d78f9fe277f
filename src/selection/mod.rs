//! Deal selection as a small state machine.
//!
//! [`SelectionState`] holds everything the user has done so far (filter term
//! and checked rows). [`SelectionState::view`] projects that state onto the
//! scanned deals; any front end can render the resulting [`SelectionView`].
//! Rows are identified by their index in scan order.

pub mod prompt;
pub mod thumbnails;

#[cfg(test)]
mod tests;

use crate::filter::matches_keyword;
use crate::results::Deal;
use std::collections::BTreeSet;

/// A user action on the selection surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionAction {
    /// Replace the filter term
    Filter(String),
    /// Toggle the row at a scan index
    Toggle(usize),
    /// Check every row that is currently visible
    CheckVisible,
    /// Uncheck every row
    Clear,
    /// Finish with the checked rows
    Confirm,
    /// Discard the session
    Cancel,
}

/// How a selection session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// Scan indices of the chosen deals, ascending
    Confirmed(Vec<usize>),
    Cancelled,
}

/// Filter term and checked rows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    filter: String,
    checked: BTreeSet<usize>,
}

/// One row of the projected view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionRow {
    pub index: usize,
    pub page: String,
    pub title: String,
    pub checked: bool,
    pub visible: bool,
    pub has_thumbnail: bool,
}

/// The selection surface derived from state and deals
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionView {
    pub filter: String,
    pub rows: Vec<SelectionRow>,
}

impl SelectionView {
    /// Rows matching the current filter
    pub fn visible_rows(&self) -> impl Iterator<Item = &SelectionRow> {
        self.rows.iter().filter(|row| row.visible)
    }

    pub fn checked_count(&self) -> usize {
        self.rows.iter().filter(|row| row.checked).count()
    }
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn is_checked(&self, index: usize) -> bool {
        self.checked.contains(&index)
    }

    /// Replace the filter term. Checked rows stay checked while hidden.
    pub fn set_filter(&mut self, term: impl Into<String>) {
        self.filter = term.into();
    }

    /// Toggle a row. Rows hidden by the filter and indices past the end are ignored.
    pub fn toggle<P>(&mut self, index: usize, deals: &[Deal<P>]) {
        match deals.get(index) {
            Some(deal) if matches_keyword(&deal.text, &self.filter) => {}
            _ => return,
        }
        if !self.checked.remove(&index) {
            self.checked.insert(index);
        }
    }

    /// Check every row whose title matches the filter
    pub fn check_visible<P>(&mut self, deals: &[Deal<P>]) {
        for (index, deal) in deals.iter().enumerate() {
            if matches_keyword(&deal.text, &self.filter) {
                self.checked.insert(index);
            }
        }
    }

    pub fn clear(&mut self) {
        self.checked.clear();
    }

    /// Apply an action, returning the outcome if the session ended
    pub fn apply<P>(
        &mut self,
        action: SelectionAction,
        deals: &[Deal<P>],
    ) -> Option<SelectionOutcome> {
        match action {
            SelectionAction::Filter(term) => self.set_filter(term),
            SelectionAction::Toggle(index) => self.toggle(index, deals),
            SelectionAction::CheckVisible => self.check_visible(deals),
            SelectionAction::Clear => self.clear(),
            SelectionAction::Confirm => {
                return Some(SelectionOutcome::Confirmed(self.checked.iter().copied().collect()));
            }
            SelectionAction::Cancel => return Some(SelectionOutcome::Cancelled),
        }
        None
    }

    /// Project the state onto the deals
    pub fn view<P>(&self, deals: &[Deal<P>]) -> SelectionView {
        let rows = deals
            .iter()
            .enumerate()
            .map(|(index, deal)| SelectionRow {
                index,
                page: deal.page.clone(),
                title: deal.text.clone(),
                checked: self.checked.contains(&index),
                visible: matches_keyword(&deal.text, &self.filter),
                has_thumbnail: deal.thumbnail.is_some(),
            })
            .collect();

        SelectionView {
            filter: self.filter.clone(),
            rows,
        }
    }

    /// The checked deals, in scan order
    pub fn confirm<P: Clone>(&self, deals: &[Deal<P>]) -> Vec<Deal<P>> {
        take_selected(deals, &self.checked.iter().copied().collect::<Vec<_>>())
    }
}

/// Collect deals at the given scan indices, in scan order
pub fn take_selected<P: Clone>(deals: &[Deal<P>], indices: &[usize]) -> Vec<Deal<P>> {
    let wanted: BTreeSet<usize> = indices.iter().copied().collect();
    deals
        .iter()
        .enumerate()
        .filter(|(index, _)| wanted.contains(index))
        .map(|(_, deal)| deal.clone())
        .collect()
}
