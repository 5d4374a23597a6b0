//! Values handed across screens and identities of screen activations.

use std::fmt;

use crate::model::{Municipality, PointId, Region};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Completed selection passed from the home screen to the points screen.
pub struct Destination {
    /// Selected region.
    pub region: Region,
    /// Selected municipality within `region`.
    pub municipality: Municipality,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Screen to activate, with the values it receives.
pub enum Route {
    /// Region/municipality selection.
    Home,
    /// Map of collection points for a destination.
    Points(Destination),
    /// Detail of one collection point.
    Detail(PointId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Identity of one activation of a screen. Never reused within a session.
pub struct MountId(pub(crate) u64);

impl fmt::Display for MountId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "#{}", self.0)
    }
}
