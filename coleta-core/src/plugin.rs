//! Bundles of ports contributed by the provider crates.

use std::sync::Arc;

use crate::ports::{CategoryPort, LocationPort, MunicipalityPort, PointPort, RegionPort};

/// Ports implementing the region/municipality lookup.
pub struct LocalityPlugin {
    /// Implementation for listing regions.
    pub region_port: Arc<dyn RegionPort>,
    /// Implementation for listing municipalities of a region.
    pub municipality_port: Arc<dyn MunicipalityPort>,
}

/// Ports implementing the application backend.
pub struct BackendPlugin {
    /// Implementation for the category catalog.
    pub category_port: Arc<dyn CategoryPort>,
    /// Implementation for point search and detail.
    pub point_port: Arc<dyn PointPort>,
}

/// Every collaborator the service talks to.
pub struct Collaborators {
    pub(crate) regions: Arc<dyn RegionPort>,
    pub(crate) municipalities: Arc<dyn MunicipalityPort>,
    pub(crate) categories: Arc<dyn CategoryPort>,
    pub(crate) points: Arc<dyn PointPort>,
    pub(crate) location: Arc<dyn LocationPort>,
}

impl Collaborators {
    /// Combine the provider plugins with a device location source.
    #[must_use]
    pub fn new(
        locality: LocalityPlugin,
        backend: BackendPlugin,
        location: Arc<dyn LocationPort>,
    ) -> Self {
        Self {
            regions: locality.region_port,
            municipalities: locality.municipality_port,
            categories: backend.category_port,
            points: backend.point_port,
            location,
        }
    }
}
