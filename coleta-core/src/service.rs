//! High-level service facade combining all collaborators.

use std::sync::Arc;

use log::debug;

use crate::location::{self, LocationFix};
use crate::model::{Category, Municipality, Point, PointDetail, PointId, Region};
use crate::plugin::Collaborators;
use crate::ports::{PointQuery, PortError};

/// Public entry point for the catalogs, point queries, and device location.
pub struct ColetaService {
    collaborators: Arc<Collaborators>,
}

impl ColetaService {
    /// Create a new service bound to the provided collaborators.
    #[must_use]
    pub fn new(collaborators: Arc<Collaborators>) -> Self {
        Self { collaborators }
    }

    /// Load the region list in provider order.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if the locality provider call fails.
    pub async fn regions(&self) -> Result<Vec<Region>, PortError> {
        debug!("loading regions");
        self.collaborators.regions.regions().await
    }

    /// Load the municipalities of a region in provider order.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if the locality provider call fails.
    pub async fn municipalities(&self, region: &Region) -> Result<Vec<Municipality>, PortError> {
        debug!("loading municipalities of {region}");
        self.collaborators.municipalities.municipalities(region).await
    }

    /// Load the category catalog.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if the backend call fails.
    pub async fn categories(&self) -> Result<Vec<Category>, PortError> {
        debug!("loading categories");
        self.collaborators.categories.categories().await
    }

    /// Search collection points. An empty category list means every category.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if the backend call fails.
    pub async fn search_points(&self, query: &PointQuery) -> Result<Vec<Point>, PortError> {
        debug!(
            "searching points in {}/{} items={:?}",
            query.municipality,
            query.region,
            query.items_param()
        );
        self.collaborators.points.search(query).await
    }

    /// Load the full record of one point.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if the point does not exist or the backend call fails.
    pub async fn point_detail(&self, id: PointId) -> Result<PointDetail, PortError> {
        debug!("loading point {id}");
        self.collaborators.points.detail(id).await
    }

    /// Ask for location permission, then read one position.
    pub async fn acquire_location(&self) -> LocationFix {
        location::acquire(self.collaborators.location.as_ref()).await
    }
}
