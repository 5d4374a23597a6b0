//! One-shot device location acquisition.

use async_trait::async_trait;
use log::{debug, warn};

use crate::model::Coordinate;
use crate::ports::{LocationPort, PermissionStatus, PortError};

#[derive(Debug, Clone, Copy, PartialEq)]
/// Outcome of a location request as seen by the discovery screen.
pub enum LocationFix {
    /// Not resolved yet. Initial state of every screen activation.
    Pending,
    /// A concrete coordinate; the only state in which a map may be shown.
    Resolved(Coordinate),
    /// No coordinate will arrive for this activation.
    Denied(LocationDenial),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Why a location request ended without a coordinate.
pub enum LocationDenial {
    /// The user refused the permission request.
    PermissionDenied,
    /// Permission was granted but the position fix failed.
    NoFixAvailable,
}

impl LocationFix {
    /// Coordinate of a resolved fix.
    #[must_use]
    pub fn coordinate(&self) -> Option<Coordinate> {
        match self {
            Self::Resolved(coordinate) => Some(*coordinate),
            Self::Pending | Self::Denied(_) => None,
        }
    }

    /// Whether the request is still outstanding.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// Run the permission + fix sequence once against `port`.
///
/// A failing permission dialog counts as a denial. There is no retry.
pub async fn acquire(port: &dyn LocationPort) -> LocationFix {
    let status = match port.request_permission().await {
        Ok(status) => status,
        Err(err) => {
            warn!("location permission request failed: {err}");
            PermissionStatus::Denied
        }
    };

    if status == PermissionStatus::Denied {
        debug!("location permission denied");
        return LocationFix::Denied(LocationDenial::PermissionDenied);
    }

    match port.current_position().await {
        Ok(coordinate) => {
            debug!(
                "location fix resolved at {},{}",
                coordinate.latitude, coordinate.longitude
            );
            LocationFix::Resolved(coordinate)
        }
        Err(err) => {
            warn!("location fix failed: {err}");
            LocationFix::Denied(LocationDenial::NoFixAvailable)
        }
    }
}

/// Location source for hosts without positioning hardware, driven by configuration.
pub struct ConfiguredLocation {
    permission: PermissionStatus,
    coordinate: Option<Coordinate>,
}

impl ConfiguredLocation {
    /// Create a source that answers the permission dialog with `permission`
    /// and reports `coordinate` as the device position.
    #[must_use]
    pub fn new(permission: PermissionStatus, coordinate: Option<Coordinate>) -> Self {
        Self {
            permission,
            coordinate,
        }
    }
}

#[async_trait]
impl LocationPort for ConfiguredLocation {
    async fn request_permission(&self) -> Result<PermissionStatus, PortError> {
        Ok(self.permission)
    }

    async fn current_position(&self) -> Result<Coordinate, PortError> {
        if self.permission == PermissionStatus::Denied {
            return Err(PortError::PermissionDenied);
        }
        self.coordinate.ok_or(PortError::NoFixAvailable)
    }
}
