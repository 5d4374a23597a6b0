//! Requests issued by screens and the dispatcher that runs them off the UI loop.

use std::sync::Arc;

use log::debug;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::cell::Failure;
use crate::location::LocationFix;
use crate::model::{Category, Municipality, Point, PointDetail, PointId, Region};
use crate::navigation::MountId;
use crate::ports::PointQuery;
use crate::service::ColetaService;
use crate::staleness::Ticket;

#[derive(Debug, Clone, PartialEq)]
/// Asynchronous work a screen wants done.
pub enum Request {
    /// Load the region list.
    Regions,
    /// Load the municipalities of the ticket's region.
    Municipalities(Ticket<Region>),
    /// Request permission and one location fix.
    Location,
    /// Load the category catalog.
    Categories,
    /// Search points with the ticket's query.
    Points(Ticket<PointQuery>),
    /// Load one point's full record.
    PointDetail(PointId),
}

#[derive(Debug, Clone, PartialEq)]
/// Result of a [`Request`], carrying the same ticket back.
pub enum Response {
    /// Answer to [`Request::Regions`].
    Regions(Result<Vec<Region>, Failure>),
    /// Answer to [`Request::Municipalities`].
    Municipalities(Ticket<Region>, Result<Vec<Municipality>, Failure>),
    /// Answer to [`Request::Location`].
    Location(LocationFix),
    /// Answer to [`Request::Categories`].
    Categories(Result<Vec<Category>, Failure>),
    /// Answer to [`Request::Points`].
    Points(Ticket<PointQuery>, Result<Vec<Point>, Failure>),
    /// Answer to [`Request::PointDetail`].
    PointDetail(PointId, Result<PointDetail, Failure>),
}

#[derive(Debug, Clone, PartialEq)]
/// Request tagged with the screen activation that issued it.
pub struct Command {
    /// Issuing screen.
    pub mount: MountId,
    /// Work to do.
    pub request: Request,
}

#[derive(Debug, Clone, PartialEq)]
/// Response tagged with the screen activation that issued the request.
pub struct Outcome {
    /// Issuing screen.
    pub mount: MountId,
    /// What came back.
    pub response: Response,
}

impl Request {
    /// Run the request against the service. Errors are folded into the response.
    pub async fn execute(self, service: &ColetaService) -> Response {
        match self {
            Self::Regions => Response::Regions(service.regions().await.map_err(Failure::from)),
            Self::Municipalities(ticket) => {
                let result = service
                    .municipalities(ticket.key())
                    .await
                    .map_err(Failure::from);
                Response::Municipalities(ticket, result)
            }
            Self::Location => Response::Location(service.acquire_location().await),
            Self::Categories => {
                Response::Categories(service.categories().await.map_err(Failure::from))
            }
            Self::Points(ticket) => {
                let result = service
                    .search_points(ticket.key())
                    .await
                    .map_err(Failure::from);
                Response::Points(ticket, result)
            }
            Self::PointDetail(id) => {
                Response::PointDetail(id, service.point_detail(id).await.map_err(Failure::from))
            }
        }
    }
}

/// Spawns one task per command and reports outcomes on a channel.
pub struct Dispatcher {
    service: Arc<ColetaService>,
    outcomes: UnboundedSender<Outcome>,
}

impl Dispatcher {
    /// Create a dispatcher and the receiving end of its outcome channel.
    #[must_use]
    pub fn channel(service: Arc<ColetaService>) -> (Self, UnboundedReceiver<Outcome>) {
        let (outcomes, receiver) = mpsc::unbounded_channel();
        (Self { service, outcomes }, receiver)
    }

    /// Start `command` in the background.
    ///
    /// Must be called from within a tokio runtime.
    pub fn dispatch(&self, command: Command) {
        let service = Arc::clone(&self.service);
        let outcomes = self.outcomes.clone();
        tokio::spawn(async move {
            let Command { mount, request } = command;
            let response = request.execute(&service).await;
            if outcomes.send(Outcome { mount, response }).is_err() {
                debug!("outcome for {mount} dropped, receiver closed");
            }
        });
    }

    /// Start every command in order.
    pub fn dispatch_all<I: IntoIterator<Item = Command>>(&self, commands: I) {
        for command in commands {
            self.dispatch(command);
        }
    }
}
