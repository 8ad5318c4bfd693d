/// Selection Manager
///
/// Holds the identities of selected rows. Selection is keyed by identity, not
/// by position, and is never pruned when the visible set changes: a row that
/// is filtered out stays selected and shows up selected again once the filter
/// is relaxed.
///
/// Every mutating operation reports whether the set actually changed so the
/// owner can decide whether to notify observers.

use serde::Serialize;
use std::collections::HashSet;
use std::hash::Hash;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Selection<Id: Eq + Hash> {
    selected: HashSet<Id>,
}

impl<Id: Eq + Hash> Default for Selection<Id> {
    fn default() -> Self {
        Selection {
            selected: HashSet::new(),
        }
    }
}

impl<Id: Eq + Hash + Clone> Selection<Id> {
    pub fn new() -> Self {
        Selection::default()
    }

    pub fn select(&mut self, id: Id) -> bool {
        self.selected.insert(id)
    }

    pub fn deselect(&mut self, id: &Id) -> bool {
        self.selected.remove(id)
    }

    /// Flips membership of `id`. Returns the new state.
    pub fn toggle(&mut self, id: Id) -> bool {
        if self.selected.remove(&id) {
            false
        } else {
            self.selected.insert(id);
            true
        }
    }

    /// Adds every visible identity. Hidden selections are left alone.
    pub fn select_all<'a, I>(&mut self, visible: I) -> bool
    where
        I: IntoIterator<Item = &'a Id>,
        Id: 'a,
    {
        let mut changed = false;
        for id in visible {
            changed |= self.selected.insert(id.clone());
        }
        changed
    }

    /// Removes every visible identity. Hidden selections are left alone.
    pub fn deselect_all<'a, I>(&mut self, visible: I) -> bool
    where
        I: IntoIterator<Item = &'a Id>,
        Id: 'a,
    {
        let mut changed = false;
        for id in visible {
            changed |= self.selected.remove(id);
        }
        changed
    }

    pub fn clear(&mut self) -> bool {
        let changed = !self.selected.is_empty();
        self.selected.clear();
        changed
    }

    pub fn contains(&self, id: &Id) -> bool {
        self.selected.contains(id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Id> {
        self.selected.iter()
    }

    pub fn ids(&self) -> &HashSet<Id> {
        &self.selected
    }

    /// True iff every visible identity is selected. An empty visible set
    /// reports `false` so an empty grid never shows a checked "select all".
    pub fn is_all_selected<'a, I>(&self, visible: I) -> bool
    where
        I: IntoIterator<Item = &'a Id>,
        Id: 'a,
    {
        let (seen, selected) = self.count_visible(visible);
        seen > 0 && seen == selected
    }

    /// True iff some, but not all, visible identities are selected.
    pub fn is_indeterminate<'a, I>(&self, visible: I) -> bool
    where
        I: IntoIterator<Item = &'a Id>,
        Id: 'a,
    {
        let (seen, selected) = self.count_visible(visible);
        selected > 0 && selected < seen
    }

    /// `(visible, visible and selected)` counts.
    pub fn count_visible<'a, I>(&self, visible: I) -> (usize, usize)
    where
        I: IntoIterator<Item = &'a Id>,
        Id: 'a,
    {
        visible.into_iter().fold((0, 0), |(seen, selected), id| {
            (seen + 1, selected + usize::from(self.selected.contains(id)))
        })
    }
}

impl<Id: Eq + Hash> FromIterator<Id> for Selection<Id> {
    fn from_iter<I: IntoIterator<Item = Id>>(iter: I) -> Self {
        Selection {
            selected: iter.into_iter().collect(),
        }
    }
}
