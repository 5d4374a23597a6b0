//! Multi-select toggle set over category ids.

use std::collections::HashSet;

use crate::model::CategoryId;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Categories the user picked on the points screen. Empty means "no filter".
pub struct FilterState {
    selected: HashSet<CategoryId>,
}

impl FilterState {
    /// Empty filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `id` if absent, remove it if present. Returns the new membership.
    pub fn toggle(&mut self, id: CategoryId) -> bool {
        if self.selected.remove(&id) {
            false
        } else {
            self.selected.insert(id);
            true
        }
    }

    /// Whether `id` is part of the filter.
    #[must_use]
    pub fn is_selected(&self, id: CategoryId) -> bool {
        self.selected.contains(&id)
    }

    /// Whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Selected ids in ascending order.
    #[must_use]
    pub fn selected(&self) -> Vec<CategoryId> {
        let mut ids: Vec<CategoryId> = self.selected.iter().copied().collect();
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_is_self_inverse() {
        let mut filter = FilterState::new();
        filter.toggle(CategoryId(4));
        let before = filter.clone();

        filter.toggle(CategoryId(2));
        filter.toggle(CategoryId(2));
        assert_eq!(filter, before);

        filter.toggle(CategoryId(4));
        filter.toggle(CategoryId(4));
        assert_eq!(filter, before);
    }

    #[test]
    fn toggling_one_and_three_selects_exactly_those() {
        let mut filter = FilterState::new();
        assert!(filter.toggle(CategoryId(1)));
        assert!(filter.toggle(CategoryId(3)));

        assert!(filter.is_selected(CategoryId(1)));
        assert!(!filter.is_selected(CategoryId(2)));
        assert!(filter.is_selected(CategoryId(3)));
        assert_eq!(filter.selected(), vec![CategoryId(1), CategoryId(3)]);
    }

    #[test]
    fn toggling_off_the_last_id_empties_the_filter() {
        let mut filter = FilterState::new();
        filter.toggle(CategoryId(9));
        assert!(!filter.toggle(CategoryId(9)));
        assert!(filter.is_empty());
    }
}
