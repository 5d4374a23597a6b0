use coleta_core::{
    Command, MountId, NoticeLevel, Outcome, Screen, Session, points::PointsView,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HomeFocus {
    Regions,
    Municipalities,
    Confirm,
}

pub(crate) struct App {
    pub session: Session,

    pub home_focus: HomeFocus,
    pub region_index: usize,
    pub municipality_index: usize,

    pub chip_index: usize,
    pub point_index: usize,
    /// Points activation whose modal notice was dismissed.
    pub dismissed_modal: Option<MountId>,

    pub error_message: Option<String>,
}

impl App {
    pub(crate) fn new(session: Session) -> Self {
        Self {
            session,
            home_focus: HomeFocus::Regions,
            region_index: 0,
            municipality_index: 0,
            chip_index: 0,
            point_index: 0,
            dismissed_modal: None,
            error_message: None,
        }
    }

    pub(crate) fn apply(&mut self, outcome: Outcome) {
        if self.session.apply(outcome) {
            self.clamp_cursors();
        }
    }

    pub(crate) fn clamp_cursors(&mut self) {
        match self.session.current() {
            Screen::Home(home) => {
                let view = home.view();
                self.region_index = clamp(self.region_index, view.regions.len());
                self.municipality_index =
                    clamp(self.municipality_index, view.municipalities.len());
            }
            Screen::Points(points) => {
                let view = points.view();
                self.chip_index = clamp(self.chip_index, view.chips.len());
                self.point_index = clamp(self.point_index, view.points.len());
            }
            Screen::Detail(_) => {}
        }
    }

    pub(crate) fn points_view(&self) -> Option<PointsView> {
        match self.session.current() {
            Screen::Points(points) => Some(points.view()),
            Screen::Home(_) | Screen::Detail(_) => None,
        }
    }

    /// Whether the points screen currently blocks input behind a modal notice.
    pub(crate) fn modal_open(&self) -> bool {
        let mount = self.session.current_mount();
        self.dismissed_modal != Some(mount)
            && self.points_view().is_some_and(|view| {
                view.notices
                    .iter()
                    .any(|notice| notice.level == NoticeLevel::Modal)
            })
    }

    pub(crate) fn dismiss_modal(&mut self) {
        self.dismissed_modal = Some(self.session.current_mount());
    }

    pub(crate) fn select_current_region(&mut self) -> Vec<Command> {
        let Screen::Home(home) = self.session.current() else {
            return Vec::new();
        };
        let Some(region) = home.view().regions.get(self.region_index).cloned() else {
            return Vec::new();
        };
        let commands = self.session.select_region(region);
        if !commands.is_empty() {
            self.municipality_index = 0;
            self.home_focus = HomeFocus::Municipalities;
        }
        commands
    }

    pub(crate) fn select_current_municipality(&mut self) {
        let Screen::Home(home) = self.session.current() else {
            return;
        };
        let view = home.view();
        if !view.municipality_enabled {
            return;
        }
        let Some(municipality) = view.municipalities.get(self.municipality_index).cloned() else {
            return;
        };
        if self.session.select_municipality(municipality) {
            self.home_focus = HomeFocus::Confirm;
        }
    }

    pub(crate) fn clear_region(&mut self) {
        self.session.clear_region();
        self.municipality_index = 0;
        self.home_focus = HomeFocus::Regions;
    }

    pub(crate) fn confirm(&mut self) -> Vec<Command> {
        let commands = self.session.confirm();
        if !commands.is_empty() {
            self.chip_index = 0;
            self.point_index = 0;
        }
        commands
    }

    pub(crate) fn toggle_current_chip(&mut self) -> Vec<Command> {
        let Some(chip) = self
            .points_view()
            .and_then(|view| view.chips.get(self.chip_index).cloned())
        else {
            return Vec::new();
        };
        let commands = self.session.toggle_category(chip.id);
        self.point_index = 0;
        commands
    }

    pub(crate) fn open_current_point(&mut self) -> Vec<Command> {
        let Some(point) = self
            .points_view()
            .and_then(|view| view.points.get(self.point_index).cloned())
        else {
            return Vec::new();
        };
        self.session.open_point(point.id)
    }

    pub(crate) fn back(&mut self) {
        if self.session.back() {
            self.clamp_cursors();
        }
    }

    /// Next focus on the home screen; the municipality list is skipped while disabled.
    pub(crate) fn cycle_home_focus(&mut self) {
        let municipality_enabled = match self.session.current() {
            Screen::Home(home) => home.view().municipality_enabled,
            Screen::Points(_) | Screen::Detail(_) => false,
        };
        self.home_focus = match self.home_focus {
            HomeFocus::Regions if municipality_enabled => HomeFocus::Municipalities,
            HomeFocus::Regions | HomeFocus::Municipalities => HomeFocus::Confirm,
            HomeFocus::Confirm => HomeFocus::Regions,
        };
    }
}

fn clamp(index: usize, len: usize) -> usize {
    if len == 0 { 0 } else { index.min(len - 1) }
}
