//! Home screen: region catalog, municipality catalog, and the selection gate.

use log::{info, warn};

use crate::cell::{AsyncCell, Failure};
use crate::model::{Municipality, Region};
use crate::navigation::Destination;
use crate::runtime::Request;
use crate::selection::{SelectionPhase, SelectionState};
use crate::staleness::{KeyedSlot, Ticket};

/// State owned by one activation of the home screen.
#[derive(Debug, Clone, Default)]
pub struct HomeScreen {
    regions: AsyncCell<Vec<Region>>,
    municipalities: KeyedSlot<Region, Vec<Municipality>>,
    selection: SelectionState,
}

/// Everything the home screen renders, derived from [`HomeScreen`].
#[derive(Debug, Clone, PartialEq)]
pub struct HomeView {
    /// Region options in provider order.
    pub regions: Vec<Region>,
    /// Region list still loading.
    pub regions_loading: bool,
    /// Region list failed; offer a retry.
    pub regions_failure: Option<Failure>,
    /// Municipality options of the selected region.
    pub municipalities: Vec<Municipality>,
    /// Municipality list still loading.
    pub municipalities_loading: bool,
    /// Municipality list failed.
    pub municipalities_failure: Option<Failure>,
    /// Whether the municipality control accepts input.
    pub municipality_enabled: bool,
    /// Whether the confirm control accepts input.
    pub confirm_enabled: bool,
    /// Selected region.
    pub selected_region: Option<Region>,
    /// Selected municipality.
    pub selected_municipality: Option<Municipality>,
}

impl HomeScreen {
    /// Mount the screen; the region list is requested right away.
    #[must_use]
    pub fn mount() -> (Self, Vec<Request>) {
        (Self::default(), vec![Request::Regions])
    }

    /// Current selection.
    #[must_use]
    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Choose a region. Issues a municipality request when the region changed.
    pub fn select_region(&mut self, region: Region) -> Option<Request> {
        if !self.selection.select_region(region.clone()) {
            return None;
        }
        Some(Request::Municipalities(self.municipalities.issue(region)))
    }

    /// Unset the region. The municipality list is emptied without a request.
    pub fn clear_region(&mut self) {
        self.selection.clear_region();
        self.municipalities.clear();
    }

    /// Choose a municipality from the loaded list of the selected region.
    ///
    /// Returns `false` while no region is chosen or when `municipality` is not
    /// one of the current options.
    pub fn select_municipality(&mut self, municipality: Municipality) -> bool {
        if self.selection.phase() == SelectionPhase::NoRegion
            || !self.municipalities.items().contains(&municipality)
        {
            return false;
        }
        self.selection.select_municipality(municipality)
    }

    /// Hand the selection to navigation; `None` until both parts are chosen.
    #[must_use]
    pub fn confirm(&self) -> Option<Destination> {
        self.selection.confirm()
    }

    /// Request the region list again after a failure.
    pub fn retry_regions(&mut self) -> Option<Request> {
        if self.regions.failure().is_none() {
            return None;
        }
        self.regions = AsyncCell::Pending;
        Some(Request::Regions)
    }

    /// Request the municipality list of the selected region again after a failure.
    pub fn retry_municipalities(&mut self) -> Option<Request> {
        let failed = self
            .municipalities
            .cell()
            .and_then(AsyncCell::failure)
            .is_some();
        let region = self.municipalities.key().filter(|_| failed)?.clone();
        Some(Request::Municipalities(self.municipalities.issue(region)))
    }

    /// Apply the region list response.
    pub fn apply_regions(&mut self, result: Result<Vec<Region>, Failure>) {
        if let Err(failure) = &result {
            warn!("region list failed: {failure}");
        }
        self.regions = AsyncCell::settle(result);
    }

    /// Apply a municipality response. Returns `false` if it was superseded.
    pub fn apply_municipalities(
        &mut self,
        ticket: &Ticket<Region>,
        result: Result<Vec<Municipality>, Failure>,
    ) -> bool {
        if let Err(failure) = &result {
            warn!("municipalities of {} failed: {failure}", ticket.key());
        }
        let applied = self.municipalities.resolve(ticket, result);
        if !applied {
            info!("ignored municipalities of superseded region {}", ticket.key());
        }
        applied
    }

    /// Derive the rendered state.
    #[must_use]
    pub fn view(&self) -> HomeView {
        HomeView {
            regions: self.regions.items().to_vec(),
            regions_loading: self.regions.is_pending(),
            regions_failure: self.regions.failure().cloned(),
            municipalities: self.municipalities.items().to_vec(),
            municipalities_loading: self.municipalities.is_pending(),
            municipalities_failure: self
                .municipalities
                .cell()
                .and_then(AsyncCell::failure)
                .cloned(),
            municipality_enabled: self.selection.region().is_some(),
            confirm_enabled: self.selection.can_confirm(),
            selected_region: self.selection.region().cloned(),
            selected_municipality: self.selection.municipality().cloned(),
        }
    }
}
