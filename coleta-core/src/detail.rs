//! Detail screen for a single collection point.

use log::warn;

use crate::cell::{AsyncCell, Failure};
use crate::model::{PointDetail, PointId};
use crate::runtime::Request;

/// State owned by one activation of the detail screen.
#[derive(Debug, Clone)]
pub struct DetailScreen {
    point_id: PointId,
    detail: AsyncCell<PointDetail>,
}

impl DetailScreen {
    /// Mount the screen for `point_id` and request its record.
    #[must_use]
    pub fn mount(point_id: PointId) -> (Self, Vec<Request>) {
        (
            Self {
                point_id,
                detail: AsyncCell::Pending,
            },
            vec![Request::PointDetail(point_id)],
        )
    }

    /// Point this screen shows.
    #[must_use]
    pub fn point_id(&self) -> PointId {
        self.point_id
    }

    /// Loaded record.
    #[must_use]
    pub fn detail(&self) -> &AsyncCell<PointDetail> {
        &self.detail
    }

    /// Apply the detail response. Responses for another point are ignored.
    pub fn apply_detail(&mut self, point_id: PointId, result: Result<PointDetail, Failure>) {
        if point_id != self.point_id {
            return;
        }
        if let Err(failure) = &result {
            warn!("detail of point {point_id} failed: {failure}");
        }
        self.detail = AsyncCell::settle(result);
    }
}
