//! Traits describing provider capabilities and shared helper types.

use async_trait::async_trait;
use reqwest::Error as ReqwestError;
use serde::{Deserialize, Serialize};
use serde_json::Error as JsonError;

use crate::model::{Category, CategoryId, Coordinate, Municipality, Point, PointDetail, PointId, Region};

#[derive(thiserror::Error, Debug)]
/// Errors that can occur while talking to provider backends or the device.
pub enum PortError {
    /// Transport failed, timed out, or the server answered with an error status.
    #[error("Network error: {0}")]
    Network(#[from] ReqwestError),
    /// Response body did not have the expected shape.
    #[error("Decode error: {0}")]
    Decode(#[from] JsonError),
    /// The user refused access to the device location.
    #[error("Location permission denied")]
    PermissionDenied,
    /// Permission was granted but no position could be determined.
    #[error("No location fix available")]
    NoFixAvailable,
    /// Requested collection point does not exist.
    #[error("Point not found")]
    PointNotFound,
    /// Internal provider error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Query parameters for a collection point search.
pub struct PointQuery {
    /// Region carried over from the selection screen.
    pub region: Region,
    /// Municipality carried over from the selection screen.
    pub municipality: Municipality,
    /// Selected categories in ascending order; empty means unfiltered.
    pub categories: Vec<CategoryId>,
}

impl PointQuery {
    /// Construct a new query. Category ids are sorted and deduplicated.
    #[must_use]
    pub fn new<I>(region: Region, municipality: Municipality, categories: I) -> Self
    where
        I: IntoIterator<Item = CategoryId>,
    {
        let mut categories: Vec<CategoryId> = categories.into_iter().collect();
        categories.sort_unstable();
        categories.dedup();
        Self {
            region,
            municipality,
            categories,
        }
    }

    /// Whether the query admits every category.
    #[must_use]
    pub fn is_unfiltered(&self) -> bool {
        self.categories.is_empty()
    }

    /// Comma-separated `items` parameter, or `None` when the query is unfiltered.
    #[must_use]
    pub fn items_param(&self) -> Option<String> {
        if self.is_unfiltered() {
            return None;
        }
        let ids: Vec<String> = self.categories.iter().map(ToString::to_string).collect();
        Some(ids.join(","))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Answer of the platform permission dialog.
pub enum PermissionStatus {
    /// Location access allowed.
    Granted,
    /// Location access refused.
    Denied,
}

#[async_trait]
/// Source of the region list.
pub trait RegionPort: Send + Sync {
    /// Load all regions in provider order.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the provider request fails or cannot be decoded.
    async fn regions(&self) -> Result<Vec<Region>, PortError>;
}

#[async_trait]
/// Source of the municipalities of a region.
pub trait MunicipalityPort: Send + Sync {
    /// Load the municipalities of `region` in provider order.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the provider request fails or cannot be decoded.
    async fn municipalities(&self, region: &Region) -> Result<Vec<Municipality>, PortError>;
}

#[async_trait]
/// Source of the material category catalog.
pub trait CategoryPort: Send + Sync {
    /// Load every category.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the backend request fails or cannot be decoded.
    async fn categories(&self) -> Result<Vec<Category>, PortError>;
}

#[async_trait]
/// Backend holding the collection points.
pub trait PointPort: Send + Sync {
    /// Search points matching the query.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the backend request fails or cannot be decoded.
    async fn search(&self, query: &PointQuery) -> Result<Vec<Point>, PortError>;

    /// Fetch the full record of one point.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::PointNotFound`] for unknown ids, or another [`PortError`]
    /// when the request fails.
    async fn detail(&self, id: PointId) -> Result<PointDetail, PortError>;
}

#[async_trait]
/// Device location service.
pub trait LocationPort: Send + Sync {
    /// Ask the user for permission to read the location.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the platform cannot show the request.
    async fn request_permission(&self) -> Result<PermissionStatus, PortError>;

    /// Read the current position once.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::NoFixAvailable`] when no position can be determined.
    async fn current_position(&self) -> Result<Coordinate, PortError>;
}
