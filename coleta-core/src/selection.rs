//! Cascading region → municipality selection.

use crate::model::{Municipality, Region};
use crate::navigation::Destination;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Phase of the selection.
pub enum SelectionPhase {
    /// Nothing chosen yet.
    NoRegion,
    /// Region chosen, municipality missing.
    RegionOnly,
    /// Both chosen; confirming is allowed.
    RegionAndMunicipality,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Region and municipality currently chosen on the home screen.
///
/// The municipality is cleared whenever the region changes.
pub struct SelectionState {
    region: Option<Region>,
    municipality: Option<Municipality>,
}

impl SelectionState {
    /// Empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> SelectionPhase {
        match (&self.region, &self.municipality) {
            (None, _) => SelectionPhase::NoRegion,
            (Some(_), None) => SelectionPhase::RegionOnly,
            (Some(_), Some(_)) => SelectionPhase::RegionAndMunicipality,
        }
    }

    /// Chosen region.
    #[must_use]
    pub fn region(&self) -> Option<&Region> {
        self.region.as_ref()
    }

    /// Chosen municipality.
    #[must_use]
    pub fn municipality(&self) -> Option<&Municipality> {
        self.municipality.as_ref()
    }

    /// Choose a region and drop the municipality.
    ///
    /// Returns `true` when the region changed and municipalities must be reloaded.
    /// Choosing the region that is already selected changes nothing.
    pub fn select_region(&mut self, region: Region) -> bool {
        if self.region.as_ref() == Some(&region) {
            return false;
        }
        self.region = Some(region);
        self.municipality = None;
        true
    }

    /// Unset the region and municipality. Returns `true` if a region was set.
    pub fn clear_region(&mut self) -> bool {
        self.municipality = None;
        self.region.take().is_some()
    }

    /// Choose a municipality. Ignored while no region is selected.
    pub fn select_municipality(&mut self, municipality: Municipality) -> bool {
        if self.region.is_none() {
            return false;
        }
        self.municipality = Some(municipality);
        true
    }

    /// Whether [`Self::confirm`] would navigate.
    #[must_use]
    pub fn can_confirm(&self) -> bool {
        self.phase() == SelectionPhase::RegionAndMunicipality
    }

    /// Hand the completed selection to navigation. `None` unless both parts are set.
    #[must_use]
    pub fn confirm(&self) -> Option<Destination> {
        match (&self.region, &self.municipality) {
            (Some(region), Some(municipality)) => Some(Destination {
                region: region.clone(),
                municipality: municipality.clone(),
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(code: &str) -> Region {
        Region {
            code: code.to_owned(),
        }
    }

    #[test]
    fn confirm_is_a_no_op_without_region() {
        let state = SelectionState::new();
        assert_eq!(state.phase(), SelectionPhase::NoRegion);
        assert!(!state.can_confirm());
        assert_eq!(state.confirm(), None);
    }

    #[test]
    fn confirm_is_a_no_op_with_region_only() {
        let mut state = SelectionState::new();
        assert!(state.select_region(region("SP")));
        assert_eq!(state.phase(), SelectionPhase::RegionOnly);
        assert_eq!(state.confirm(), None);
    }

    #[test]
    fn confirm_hands_over_complete_selection() {
        let mut state = SelectionState::new();
        state.select_region(region("SP"));
        assert!(state.select_municipality(Municipality::new("Bebedouro")));
        assert_eq!(state.phase(), SelectionPhase::RegionAndMunicipality);
        assert_eq!(
            state.confirm(),
            Some(Destination {
                region: region("SP"),
                municipality: Municipality::new("Bebedouro"),
            })
        );
    }

    #[test]
    fn municipality_requires_region() {
        let mut state = SelectionState::new();
        assert!(!state.select_municipality(Municipality::new("Bebedouro")));
        assert_eq!(state.municipality(), None);
        assert_eq!(state.phase(), SelectionPhase::NoRegion);
    }

    #[test]
    fn changing_region_resets_municipality() {
        let mut state = SelectionState::new();
        state.select_region(region("SP"));
        state.select_municipality(Municipality::new("Bebedouro"));

        assert!(state.select_region(region("RJ")));
        assert_eq!(state.municipality(), None);
        assert_eq!(state.phase(), SelectionPhase::RegionOnly);
    }

    #[test]
    fn reselecting_same_region_keeps_municipality() {
        let mut state = SelectionState::new();
        state.select_region(region("SP"));
        state.select_municipality(Municipality::new("Bebedouro"));

        assert!(!state.select_region(region("SP")));
        assert_eq!(state.municipality(), Some(&Municipality::new("Bebedouro")));
    }

    #[test]
    fn clearing_region_returns_to_start() {
        let mut state = SelectionState::new();
        state.select_region(region("SP"));
        state.select_municipality(Municipality::new("Bebedouro"));

        assert!(state.clear_region());
        assert_eq!(state.phase(), SelectionPhase::NoRegion);
        assert!(!state.clear_region());
    }
}
