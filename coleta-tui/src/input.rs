use coleta_core::{Command, Screen};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, HomeFocus};

#[derive(Debug, Clone)]
pub(crate) enum Action {
    None,
    Quit,
    /// Requests to hand to the dispatcher.
    Dispatch(Vec<Command>),
}

impl From<Vec<Command>> for Action {
    fn from(commands: Vec<Command>) -> Self {
        if commands.is_empty() {
            Self::None
        } else {
            Self::Dispatch(commands)
        }
    }
}

pub(crate) fn handle_key_event(key: KeyEvent, app: &mut App) -> Action {
    // Global quit shortcuts
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }
    if key.code == KeyCode::Char('q') && key.modifiers.is_empty() {
        return Action::Quit;
    }

    app.error_message = None;

    match app.session.current() {
        Screen::Home(_) => handle_home(key, app),
        Screen::Points(_) if app.modal_open() => {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                app.dismiss_modal();
            }
            Action::None
        }
        Screen::Points(_) => handle_points(key, app),
        Screen::Detail(_) => handle_detail(key, app),
    }
}

fn handle_home(key: KeyEvent, app: &mut App) -> Action {
    use KeyCode::{Backspace, Char, Down, Enter, Tab, Up};

    let (regions, municipalities, confirm_enabled) = match app.session.current() {
        Screen::Home(home) => {
            let view = home.view();
            (
                view.regions.len(),
                view.municipalities.len(),
                view.confirm_enabled,
            )
        }
        Screen::Points(_) | Screen::Detail(_) => return Action::None,
    };

    match key.code {
        Tab => app.cycle_home_focus(),
        Up | Char('k') => match app.home_focus {
            HomeFocus::Regions => app.region_index = app.region_index.saturating_sub(1),
            HomeFocus::Municipalities => {
                app.municipality_index = app.municipality_index.saturating_sub(1);
            }
            HomeFocus::Confirm => {}
        },
        Down | Char('j') => match app.home_focus {
            HomeFocus::Regions if app.region_index + 1 < regions => app.region_index += 1,
            HomeFocus::Municipalities if app.municipality_index + 1 < municipalities => {
                app.municipality_index += 1;
            }
            _ => {}
        },
        Enter | Char(' ') => match app.home_focus {
            HomeFocus::Regions => return app.select_current_region().into(),
            HomeFocus::Municipalities => app.select_current_municipality(),
            HomeFocus::Confirm if confirm_enabled => return app.confirm().into(),
            HomeFocus::Confirm => {
                app.error_message = Some("Pick a state and a city first".into());
            }
        },
        Backspace => app.clear_region(),
        Char('r') => return app.session.retry().into(),
        _ => {}
    }
    Action::None
}

fn handle_points(key: KeyEvent, app: &mut App) -> Action {
    use KeyCode::{Backspace, Char, Down, Enter, Esc, Left, Right, Up};

    let Some(view) = app.points_view() else {
        return Action::None;
    };

    match key.code {
        Left | Char('h') => app.chip_index = app.chip_index.saturating_sub(1),
        Right | Char('l') => {
            if app.chip_index + 1 < view.chips.len() {
                app.chip_index += 1;
            }
        }
        Char(' ') if view.filter_enabled => return app.toggle_current_chip().into(),
        Up | Char('k') => app.point_index = app.point_index.saturating_sub(1),
        Down | Char('j') => {
            if app.point_index + 1 < view.points.len() {
                app.point_index += 1;
            }
        }
        Enter => return app.open_current_point().into(),
        Char('r') => return app.session.retry().into(),
        Esc | Backspace | Char('b') => app.back(),
        _ => {}
    }
    Action::None
}

fn handle_detail(key: KeyEvent, app: &mut App) -> Action {
    if matches!(
        key.code,
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Left | KeyCode::Char('b')
    ) {
        app.back();
    }
    Action::None
}
