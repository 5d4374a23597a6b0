//! Screen stack, user intents, and the mounted check for async outcomes.

use log::{debug, info, warn};

use crate::detail::DetailScreen;
use crate::home::HomeScreen;
use crate::model::{CategoryId, Municipality, PointId, Region};
use crate::navigation::{MountId, Route};
use crate::points::PointsScreen;
use crate::runtime::{Command, Outcome, Request, Response};

/// One of the mounted screens.
#[derive(Debug, Clone)]
pub enum Screen {
    /// Region/municipality selection.
    Home(HomeScreen),
    /// Point discovery.
    Points(PointsScreen),
    /// Point detail.
    Detail(DetailScreen),
}

#[derive(Debug, Clone)]
struct Mounted {
    mount: MountId,
    screen: Screen,
}

/// Navigation stack of one application run.
///
/// The home screen is the root and stays mounted under the screens pushed on top
/// of it. A screen popped off the stack is discarded together with its state, and
/// outcomes addressed to it are dropped.
#[derive(Debug, Clone)]
pub struct Session {
    root: Mounted,
    stack: Vec<Mounted>,
    next_mount: u64,
}

impl Session {
    /// Mount the home screen and return its initial commands.
    #[must_use]
    pub fn start() -> (Self, Vec<Command>) {
        let (home, requests) = HomeScreen::mount();
        let mount = MountId(0);
        let session = Self {
            root: Mounted {
                mount,
                screen: Screen::Home(home),
            },
            stack: Vec::new(),
            next_mount: 1,
        };
        (session, tag(mount, requests))
    }

    /// Screen on top of the stack.
    #[must_use]
    pub fn current(&self) -> &Screen {
        &self.stack.last().unwrap_or(&self.root).screen
    }

    /// Activation id of the screen on top of the stack.
    #[must_use]
    pub fn current_mount(&self) -> MountId {
        self.stack.last().unwrap_or(&self.root).mount
    }

    /// Number of mounted screens, root included.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len() + 1
    }

    /// Whether the activation `mount` is still on the stack.
    #[must_use]
    pub fn is_mounted(&self, mount: MountId) -> bool {
        self.root.mount == mount || self.stack.iter().any(|mounted| mounted.mount == mount)
    }

    /// Activate `route`. [`Route::Home`] unwinds to the root screen.
    pub fn navigate(&mut self, route: Route) -> Vec<Command> {
        let (screen, requests) = match route {
            Route::Home => {
                self.stack.clear();
                return Vec::new();
            }
            Route::Points(destination) => {
                let (screen, requests) = PointsScreen::mount(destination);
                (Screen::Points(screen), requests)
            }
            Route::Detail(point_id) => {
                let (screen, requests) = DetailScreen::mount(point_id);
                (Screen::Detail(screen), requests)
            }
        };
        let mount = MountId(self.next_mount);
        self.next_mount += 1;
        debug!("mounting screen {mount}");
        self.stack.push(Mounted { mount, screen });
        tag(mount, requests)
    }

    /// Unmount the top screen. The root screen cannot be popped.
    pub fn back(&mut self) -> bool {
        match self.stack.pop() {
            Some(mounted) => {
                debug!("unmounted screen {}", mounted.mount);
                true
            }
            None => false,
        }
    }

    /// Choose a region on the home screen.
    pub fn select_region(&mut self, region: Region) -> Vec<Command> {
        let mount = self.current_mount();
        match self.current_mut() {
            Screen::Home(home) => tag(mount, home.select_region(region)),
            Screen::Points(_) | Screen::Detail(_) => Vec::new(),
        }
    }

    /// Unset the region on the home screen.
    pub fn clear_region(&mut self) {
        if let Screen::Home(home) = self.current_mut() {
            home.clear_region();
        }
    }

    /// Choose a municipality on the home screen.
    pub fn select_municipality(&mut self, municipality: Municipality) -> bool {
        match self.current_mut() {
            Screen::Home(home) => home.select_municipality(municipality),
            Screen::Points(_) | Screen::Detail(_) => false,
        }
    }

    /// Confirm the home selection and open the points screen.
    ///
    /// Does nothing unless region and municipality are both chosen.
    pub fn confirm(&mut self) -> Vec<Command> {
        let destination = match self.current() {
            Screen::Home(home) => home.confirm(),
            Screen::Points(_) | Screen::Detail(_) => None,
        };
        match destination {
            Some(destination) => {
                info!(
                    "opening points for {}/{}",
                    destination.municipality, destination.region
                );
                self.navigate(Route::Points(destination))
            }
            None => Vec::new(),
        }
    }

    /// Toggle a category on the points screen and search again.
    pub fn toggle_category(&mut self, id: CategoryId) -> Vec<Command> {
        let mount = self.current_mount();
        match self.current_mut() {
            Screen::Points(points) => tag(mount, Some(points.toggle_category(id))),
            Screen::Home(_) | Screen::Detail(_) => Vec::new(),
        }
    }

    /// Open the detail screen of a point from the points screen.
    pub fn open_point(&mut self, point_id: PointId) -> Vec<Command> {
        match self.current() {
            Screen::Points(_) => self.navigate(Route::Detail(point_id)),
            Screen::Home(_) | Screen::Detail(_) => Vec::new(),
        }
    }

    /// Re-request the failed catalogs of the current screen.
    pub fn retry(&mut self) -> Vec<Command> {
        let mount = self.current_mount();
        let requests: Vec<Request> = match self.current_mut() {
            Screen::Home(home) => {
                let mut requests: Vec<Request> = home.retry_regions().into_iter().collect();
                requests.extend(home.retry_municipalities());
                requests
            }
            Screen::Points(points) => points.retry_categories().into_iter().collect(),
            Screen::Detail(_) => Vec::new(),
        };
        tag(mount, requests)
    }

    /// Apply an async outcome to the screen that requested it.
    ///
    /// Returns `false` when the screen is gone, the response was superseded, or
    /// it does not belong to that kind of screen.
    pub fn apply(&mut self, outcome: Outcome) -> bool {
        let Outcome { mount, response } = outcome;
        let Some(screen) = self.screen_mut(mount) else {
            debug!("dropping outcome for unmounted screen {mount}");
            return false;
        };

        match (screen, response) {
            (Screen::Home(home), Response::Regions(result)) => {
                home.apply_regions(result);
                true
            }
            (Screen::Home(home), Response::Municipalities(ticket, result)) => {
                home.apply_municipalities(&ticket, result)
            }
            (Screen::Points(points), Response::Location(fix)) => {
                points.apply_location(fix);
                true
            }
            (Screen::Points(points), Response::Categories(result)) => {
                points.apply_categories(result);
                true
            }
            (Screen::Points(points), Response::Points(ticket, result)) => {
                points.apply_points(&ticket, result)
            }
            (Screen::Detail(detail), Response::PointDetail(point_id, result)) => {
                detail.apply_detail(point_id, result);
                true
            }
            (_, response) => {
                warn!("outcome {response:?} does not match screen {mount}");
                false
            }
        }
    }

    fn current_mut(&mut self) -> &mut Screen {
        &mut self.stack.last_mut().unwrap_or(&mut self.root).screen
    }

    fn screen_mut(&mut self, mount: MountId) -> Option<&mut Screen> {
        if self.root.mount == mount {
            return Some(&mut self.root.screen);
        }
        self.stack
            .iter_mut()
            .find(|mounted| mounted.mount == mount)
            .map(|mounted| &mut mounted.screen)
    }
}

fn tag<I: IntoIterator<Item = Request>>(mount: MountId, requests: I) -> Vec<Command> {
    requests
        .into_iter()
        .map(|request| Command { mount, request })
        .collect()
}
