//! [`Selection`]-related definitions.

use std::{collections::HashSet, hash::Hash};

/// Set of list entries selected for a bulk operation, plus the entry queued
/// for editing.
///
/// `I` is the ID type of the listed entries.
#[derive(Debug)]
pub struct Selection<I> {
    /// IDs of the selected entries.
    selected: HashSet<I>,

    /// ID of the entry queued for editing, if any.
    editing: Option<I>,
}

impl<I> Default for Selection<I> {
    fn default() -> Self {
        Self {
            selected: HashSet::new(),
            editing: None,
        }
    }
}

impl<I: Copy + Eq + Hash> Selection<I> {
    /// Creates a new empty [`Selection`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects the entry with the provided ID.
    pub fn select(&mut self, id: I) {
        let _ = self.selected.insert(id);
    }

    /// Deselects the entry with the provided ID.
    pub fn deselect(&mut self, id: I) {
        let _ = self.selected.remove(&id);
    }

    /// Toggles the selection of the entry with the provided ID.
    pub fn toggle(&mut self, id: I) {
        if !self.selected.remove(&id) {
            let _ = self.selected.insert(id);
        }
    }

    /// Clears this [`Selection`] completely.
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Toggles the selection of all the `visible` entries at once.
    ///
    /// Selects every visible entry, or clears the whole [`Selection`] when
    /// all of them are selected already.
    pub fn toggle_all(&mut self, visible: impl IntoIterator<Item = I> + Clone) {
        if self.is_all_selected(visible.clone()) {
            self.clear();
        } else {
            self.selected.extend(visible);
        }
    }

    /// Indicates whether every `visible` entry is selected.
    ///
    /// `false` when nothing is visible: an empty page has nothing to have
    /// selected.
    pub fn is_all_selected(
        &self,
        visible: impl IntoIterator<Item = I>,
    ) -> bool {
        let mut any = false;
        for id in visible {
            if !self.selected.contains(&id) {
                return false;
            }
            any = true;
        }
        any
    }

    /// Indicates whether the provided entry is selected.
    #[must_use]
    pub fn contains(&self, id: I) -> bool {
        self.selected.contains(&id)
    }

    /// Returns the IDs of all the selected entries.
    pub fn iter(&self) -> impl Iterator<Item = I> + '_ {
        self.selected.iter().copied()
    }

    /// Returns the number of selected entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Indicates whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Indicates whether selection controls should be disabled.
    #[must_use]
    pub const fn is_disabled(loading: bool, visible_empty: bool) -> bool {
        loading || visible_empty
    }

    /// Drops the selected IDs that are no longer `visible`.
    ///
    /// Called by the consumer after a page change, so a bulk operation never
    /// targets entries that left the screen.
    pub fn retain(&mut self, visible: impl IntoIterator<Item = I>) {
        let visible: HashSet<_> = visible.into_iter().collect();
        self.selected.retain(|id| visible.contains(id));
        if let Some(editing) = self.editing {
            if !visible.contains(&editing) {
                self.editing = None;
            }
        }
    }

    /// Queues the entry with the provided ID for editing.
    pub fn begin_edit(&mut self, id: I) {
        self.editing = Some(id);
    }

    /// Returns the ID of the entry queued for editing, if any.
    #[must_use]
    pub const fn editing(&self) -> Option<I> {
        self.editing
    }

    /// Takes the entry queued for editing out of this [`Selection`].
    pub fn finish_edit(&mut self) -> Option<I> {
        self.editing.take()
    }
}

#[cfg(test)]
mod spec {
    use super::Selection;

    #[test]
    fn toggles_single_entries() {
        let mut selection = Selection::new();

        selection.toggle(1);
        selection.toggle(2);
        assert!(selection.contains(1));
        assert_eq!(selection.len(), 2);

        selection.toggle(1);
        assert!(!selection.contains(1));
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn all_selected_requires_nonempty_visible_set() {
        let mut selection = Selection::new();

        assert!(
            !selection.is_all_selected([]),
            "an empty page has nothing selected",
        );

        selection.select(1);
        selection.select(2);
        assert!(selection.is_all_selected([1, 2]));
        assert!(!selection.is_all_selected([1, 2, 3]));
    }

    #[test]
    fn toggle_all_selects_then_clears() {
        let mut selection = Selection::new();
        selection.select(1);

        selection.toggle_all([1, 2, 3]);
        assert!(selection.is_all_selected([1, 2, 3]));

        selection.toggle_all([1, 2, 3]);
        assert!(selection.is_empty());
    }

    #[test]
    fn retains_only_visible_entries() {
        let mut selection = Selection::new();
        selection.select(1);
        selection.select(2);
        selection.begin_edit(2);

        selection.retain([2, 3]);

        assert!(!selection.contains(1));
        assert!(selection.contains(2));
        assert_eq!(selection.editing(), Some(2));

        selection.retain([3]);
        assert_eq!(selection.editing(), None);
    }

    #[test]
    fn disabled_while_loading_or_empty() {
        assert!(Selection::<u8>::is_disabled(true, false));
        assert!(Selection::<u8>::is_disabled(false, true));
        assert!(!Selection::<u8>::is_disabled(false, false));
    }

    #[test]
    fn edit_queue_holds_one_entry() {
        let mut selection = Selection::new();

        selection.begin_edit(7);
        assert_eq!(selection.editing(), Some(7));

        assert_eq!(selection.finish_edit(), Some(7));
        assert_eq!(selection.editing(), None);
    }
}
