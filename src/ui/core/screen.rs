//! Per-screen cursor, filter, multi-select and loading/error state.
//!
//! All indices refer to the *filtered* view of a screen's items. Callers pass
//! the length of that view; the state never looks at the items themselves.

use std::collections::{BTreeSet, HashMap};
use std::hash::Hash;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScreenState {
    pub cursor: usize,
    pub filter: String,
    /// Keystrokes currently edit the filter
    pub filtering: bool,
    pub selected: BTreeSet<usize>,
    pub loading: bool,
    pub error: Option<String>,
}

impl ScreenState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn move_up(&mut self, len: usize) {
        if len == 0 {
            self.cursor = 0;
            return;
        }
        self.cursor = self.cursor.min(len - 1).saturating_sub(1);
    }

    pub fn move_down(&mut self, len: usize) {
        if len == 0 {
            self.cursor = 0;
            return;
        }
        self.cursor = (self.cursor + 1).min(len - 1);
    }

    /// Pull the cursor back inside `[0, len)` and drop out-of-range selections.
    pub fn clamp(&mut self, len: usize) {
        self.cursor = if len == 0 { 0 } else { self.cursor.min(len - 1) };
        self.selected.retain(|&index| index < len);
    }

    /// Replace the filter text. Any change resets the cursor and clears the
    /// selection, since old indices point into a different view.
    pub fn set_filter(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text != self.filter {
            self.filter = text;
            self.cursor = 0;
            self.selected.clear();
        }
    }

    pub fn push_filter(&mut self, c: char) {
        let mut text = self.filter.clone();
        text.push(c);
        self.set_filter(text);
    }

    pub fn pop_filter(&mut self) {
        let mut text = self.filter.clone();
        text.pop();
        self.set_filter(text);
    }

    pub fn clear_filter(&mut self) {
        self.filtering = false;
        self.set_filter(String::new());
    }

    pub fn has_filter(&self) -> bool {
        !self.filter.is_empty()
    }

    /// Flip the cursor row's membership in the selection
    pub fn toggle_select(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        let index = self.cursor.min(len - 1);
        if !self.selected.remove(&index) {
            self.selected.insert(index);
        }
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    /// Rows a bulk action applies to: the selection if any, else the cursor row.
    pub fn targets(&self, len: usize) -> Vec<usize> {
        if !self.selected.is_empty() {
            return self.selected.iter().copied().filter(|&index| index < len).collect();
        }
        if len == 0 {
            Vec::new()
        } else {
            vec![self.cursor.min(len - 1)]
        }
    }

    /// Carry cursor and selection across a data reload.
    ///
    /// `before` and `after` are the keys of the filtered view before and after
    /// the reload. Selected keys that survive stay selected at their new
    /// index; the cursor follows its key or is clamped when the key is gone.
    pub fn rekey<K: Eq + Hash>(&mut self, before: &[K], after: &[K]) {
        let positions: HashMap<&K, usize> = after.iter().enumerate().map(|(i, key)| (key, i)).collect();

        self.selected = self
            .selected
            .iter()
            .filter_map(|&index| before.get(index))
            .filter_map(|key| positions.get(key).copied())
            .collect();

        match before.get(self.cursor).and_then(|key| positions.get(key)) {
            Some(&index) => self.cursor = index,
            None => self.clamp(after.len()),
        }
    }
}

/// Case-insensitive substring match; an empty filter matches everything.
pub fn matches_filter(filter: &str, candidates: &[&str]) -> bool {
    if filter.is_empty() {
        return true;
    }
    let needle = filter.to_lowercase();
    candidates
        .iter()
        .any(|candidate| candidate.to_lowercase().contains(&needle))
}
