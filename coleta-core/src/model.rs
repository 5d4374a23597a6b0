//! Domain data structures for regions, municipalities, categories, and collection points.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Top-level administrative division (a Brazilian state, "UF").
pub struct Region {
    /// Opaque, non-empty code used both as label and as municipality query key.
    pub code: String,
}

impl Region {
    /// Build a region from its code, rejecting blank codes.
    #[must_use]
    pub fn new<S: Into<String>>(code: S) -> Option<Self> {
        let code = code.into();
        if code.trim().is_empty() {
            None
        } else {
            Some(Self { code })
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.code)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Second-level administrative division, scoped to exactly one [`Region`].
pub struct Municipality {
    /// Display name, also sent to the backend as the `city` filter.
    pub name: String,
}

impl Municipality {
    /// Construct a municipality from its name.
    #[must_use]
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self { name: name.into() }
    }
}

impl fmt::Display for Municipality {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
/// Identifier of a material category.
pub struct CategoryId(pub u32);

impl fmt::Display for CategoryId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Material/waste type a collection point may accept.
pub struct Category {
    /// Unique identifier.
    pub id: CategoryId,
    /// Human-friendly label.
    pub title: String,
    /// URI of the category icon.
    pub icon_ref: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
/// WGS84 coordinate.
pub struct Coordinate {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl Coordinate {
    /// Construct a coordinate.
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Identifier of a collection point.
pub struct PointId(pub u64);

impl fmt::Display for PointId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Collection point returned by a point search.
pub struct Point {
    /// Unique identifier, handed to the detail screen.
    pub id: PointId,
    /// Display name.
    pub name: String,
    /// URI of the point's picture.
    pub image_ref: String,
    /// Where the point is.
    pub coordinate: Coordinate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Full record of a single collection point.
pub struct PointDetail {
    /// Summary shared with the search results.
    pub point: Point,
    /// Contact e-mail.
    pub email: String,
    /// Contact phone number for `WhatsApp`.
    pub whatsapp: String,
    /// Municipality name as stored by the backend.
    pub city: String,
    /// Region code as stored by the backend.
    pub uf: String,
    /// Titles of the categories this point accepts.
    pub items: Vec<String>,
}
