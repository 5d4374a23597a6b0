//! Points screen: location, category catalog, filter, and the filtered point list
//! merged into one view model.
//!
//! Each source is held in its own cell and [`PointsScreen::view`] is a pure
//! function of those cells. The map is only produced once the location fix has
//! resolved to a coordinate; the category strip does not depend on the location.

use log::{info, warn};

use crate::cell::{AsyncCell, Failure};
use crate::filter::FilterState;
use crate::location::{LocationDenial, LocationFix};
use crate::model::{Category, CategoryId, Coordinate, Point, PointId};
use crate::navigation::Destination;
use crate::ports::PointQuery;
use crate::runtime::Request;
use crate::staleness::{KeyedSlot, Ticket};

/// Latitude/longitude extent shown around the map center, in degrees.
pub const MAP_SPAN_DEGREES: f64 = 0.014;

/// State owned by one activation of the points screen.
#[derive(Debug, Clone)]
pub struct PointsScreen {
    destination: Destination,
    location: LocationFix,
    categories: AsyncCell<Vec<Category>>,
    filter: FilterState,
    points: KeyedSlot<PointQuery, Vec<Point>>,
}

#[derive(Debug, Clone, PartialEq)]
/// What occupies the map area.
pub enum MapArea {
    /// Fix still pending; the area stays blank.
    Blank,
    /// No fix for this activation; the map is not mounted.
    Absent,
    /// Map centered on the fix.
    Shown(MapView),
}

#[derive(Debug, Clone, PartialEq)]
/// Map framing and markers.
pub struct MapView {
    /// Device position the map is centered on.
    pub center: Coordinate,
    /// Visible latitude extent in degrees.
    pub latitude_delta: f64,
    /// Visible longitude extent in degrees.
    pub longitude_delta: f64,
    /// One marker per point of the latest query.
    pub markers: Vec<Marker>,
}

#[derive(Debug, Clone, PartialEq)]
/// Map marker for a collection point.
pub struct Marker {
    /// Point to open when the marker is picked.
    pub point_id: PointId,
    /// Caption.
    pub title: String,
    /// Picture shown in the marker.
    pub image_ref: String,
    /// Marker position.
    pub coordinate: Coordinate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Category chip in the filter strip.
pub struct CategoryChip {
    /// Category to toggle.
    pub id: CategoryId,
    /// Label.
    pub title: String,
    /// Icon URI.
    pub icon_ref: String,
    /// Highlighted when part of the filter.
    pub selected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Where a notice is shown.
pub enum NoticeLevel {
    /// Blocking dialog the user has to dismiss.
    Modal,
    /// Non-blocking inline message.
    Inline,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Message surfaced to the user.
pub struct Notice {
    /// Presentation.
    pub level: NoticeLevel,
    /// Short heading.
    pub title: String,
    /// Body text.
    pub message: String,
}

/// Everything the points screen renders, derived from [`PointsScreen`].
#[derive(Debug, Clone, PartialEq)]
pub struct PointsView {
    /// Selection this screen was opened with.
    pub destination: Destination,
    /// Map area content.
    pub map: MapArea,
    /// Points of the latest query, for list rendering.
    pub points: Vec<Point>,
    /// Latest query still outstanding.
    pub points_loading: bool,
    /// Filter strip; empty when the catalog is pending or failed.
    pub chips: Vec<CategoryChip>,
    /// Category catalog still outstanding.
    pub categories_loading: bool,
    /// Whether the filter strip accepts input.
    pub filter_enabled: bool,
    /// Messages to show, modal ones first.
    pub notices: Vec<Notice>,
}

impl PointsScreen {
    /// Mount the screen for `destination`.
    ///
    /// Location, categories, and an unfiltered point search are requested at once.
    #[must_use]
    pub fn mount(destination: Destination) -> (Self, Vec<Request>) {
        let mut screen = Self {
            destination,
            location: LocationFix::Pending,
            categories: AsyncCell::Pending,
            filter: FilterState::new(),
            points: KeyedSlot::new(),
        };
        let search = screen.issue_search();
        (
            screen,
            vec![Request::Location, Request::Categories, search],
        )
    }

    /// Selection this screen was opened with.
    #[must_use]
    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    /// Current category filter.
    #[must_use]
    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// Current location state.
    #[must_use]
    pub fn location(&self) -> LocationFix {
        self.location
    }

    /// Flip a category in the filter and search again.
    pub fn toggle_category(&mut self, id: CategoryId) -> Request {
        self.filter.toggle(id);
        self.issue_search()
    }

    /// Request the category catalog again after a failure.
    pub fn retry_categories(&mut self) -> Option<Request> {
        if self.categories.failure().is_none() {
            return None;
        }
        self.categories = AsyncCell::Pending;
        Some(Request::Categories)
    }

    /// Query the latest point search was issued with.
    #[must_use]
    pub fn active_query(&self) -> Option<&PointQuery> {
        self.points.key()
    }

    fn issue_search(&mut self) -> Request {
        let query = PointQuery::new(
            self.destination.region.clone(),
            self.destination.municipality.clone(),
            self.filter.selected(),
        );
        Request::Points(self.points.issue(query))
    }

    /// Apply the location outcome. Only the first resolution counts.
    pub fn apply_location(&mut self, fix: LocationFix) {
        if !self.location.is_pending() {
            warn!("location already settled, ignoring {fix:?}");
            return;
        }
        self.location = fix;
    }

    /// Apply the category catalog response.
    pub fn apply_categories(&mut self, result: Result<Vec<Category>, Failure>) {
        if let Err(failure) = &result {
            warn!("category catalog failed: {failure}");
        }
        self.categories = AsyncCell::settle(result);
    }

    /// Apply a point search response. Returns `false` if it was superseded.
    pub fn apply_points(
        &mut self,
        ticket: &Ticket<PointQuery>,
        result: Result<Vec<Point>, Failure>,
    ) -> bool {
        if let Err(failure) = &result {
            warn!("point search failed: {failure}");
        }
        let applied = self.points.resolve(ticket, result);
        if !applied {
            info!(
                "ignored superseded point search items={:?}",
                ticket.key().items_param()
            );
        }
        applied
    }

    /// Derive the rendered state.
    #[must_use]
    pub fn view(&self) -> PointsView {
        let points = self.points.items().to_vec();

        let map = match self.location {
            LocationFix::Pending => MapArea::Blank,
            LocationFix::Denied(_) => MapArea::Absent,
            LocationFix::Resolved(center) => MapArea::Shown(MapView {
                center,
                latitude_delta: MAP_SPAN_DEGREES,
                longitude_delta: MAP_SPAN_DEGREES,
                markers: points.iter().map(marker_for).collect(),
            }),
        };

        let chips: Vec<CategoryChip> = self
            .categories
            .items()
            .iter()
            .map(|category| CategoryChip {
                id: category.id,
                title: category.title.clone(),
                icon_ref: category.icon_ref.clone(),
                selected: self.filter.is_selected(category.id),
            })
            .collect();

        PointsView {
            destination: self.destination.clone(),
            map,
            points,
            points_loading: self.points.is_pending(),
            filter_enabled: !chips.is_empty(),
            chips,
            categories_loading: self.categories.is_pending(),
            notices: self.notices(),
        }
    }

    fn notices(&self) -> Vec<Notice> {
        let mut notices = Vec::new();

        match self.location {
            LocationFix::Denied(LocationDenial::PermissionDenied) => notices.push(Notice {
                level: NoticeLevel::Modal,
                title: "Oops...".to_owned(),
                message: "We need your permission to get your location.".to_owned(),
            }),
            LocationFix::Denied(LocationDenial::NoFixAvailable) => notices.push(Notice {
                level: NoticeLevel::Inline,
                title: "Location unavailable".to_owned(),
                message: "Your position could not be determined.".to_owned(),
            }),
            LocationFix::Pending | LocationFix::Resolved(_) => {}
        }

        if let Some(failure) = self.categories.failure() {
            notices.push(Notice {
                level: NoticeLevel::Inline,
                title: "Categories unavailable".to_owned(),
                message: failure.message.clone(),
            });
        }

        if let Some(failure) = self.points.cell().and_then(AsyncCell::failure) {
            notices.push(Notice {
                level: NoticeLevel::Inline,
                title: "Points unavailable".to_owned(),
                message: failure.message.clone(),
            });
        }

        notices
    }
}

fn marker_for(point: &Point) -> Marker {
    Marker {
        point_id: point.id,
        title: point.name.clone(),
        image_ref: point.image_ref.clone(),
        coordinate: point.coordinate,
    }
}
