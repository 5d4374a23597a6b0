use coleta_core::{
    AsyncCell, DetailScreen, HomeScreen, MapArea, MapView, NoticeLevel, PointId, PointsView,
    Screen,
};
use ratatui::{
    prelude::*,
    widgets::{
        Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap,
        canvas::{Canvas, Circle},
    },
};

use crate::app::{App, HomeFocus};

pub(crate) fn draw(frame: &mut Frame<'_>, app: &App) {
    let area = frame.area();

    // Outer layout: title, main content, status line
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [header_area, content_area, status_area] = chunks else {
        return;
    };

    let header = Paragraph::new("coleta – find recycling collection points")
        .block(Block::default().borders(Borders::ALL).title("Coleta"));
    frame.render_widget(header, *header_area);

    let points_view = app.points_view();
    match app.session.current() {
        Screen::Home(home) => draw_home(frame, app, home, *content_area),
        Screen::Points(_) => {
            if let Some(view) = &points_view {
                draw_points(frame, app, view, *content_area);
            }
        }
        Screen::Detail(detail) => draw_detail(frame, detail, *content_area),
    }

    // Status bar
    let nav_hint = match app.session.current() {
        Screen::Home(_) => {
            "Tab focus · ↑/↓ move · Enter select · Backspace clear state · r retry · q quit"
        }
        Screen::Points(_) => {
            "←/→ category · Space toggle · ↑/↓ point · Enter details · r retry · Esc back · q quit"
        }
        Screen::Detail(_) => "Esc/b back · q quit",
    };

    let inline = points_view.as_ref().and_then(|view| {
        view.notices
            .iter()
            .find(|notice| notice.level == NoticeLevel::Inline)
            .map(|notice| format!("{}: {}", notice.title, notice.message))
    });
    let message = app.error_message.clone().or(inline);

    let (status_text, status_style) = match message {
        Some(msg) => (format!("{msg} · {nav_hint}"), Style::default().fg(Color::Red)),
        None => (nav_hint.to_owned(), Style::default()),
    };

    let status = Paragraph::new(status_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(status_style)
        .wrap(Wrap { trim: true });
    frame.render_widget(status, *status_area);

    if app.modal_open()
        && let Some(view) = &points_view
    {
        draw_modal(frame, view, area);
    }
}

fn draw_home(frame: &mut Frame<'_>, app: &App, home: &HomeScreen, area: Rect) {
    let view = home.view();

    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(area);
    let [lists_area, confirm_area] = layout_chunks.as_ref() else {
        return;
    };

    let column_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(*lists_area);
    let [regions_area, municipalities_area] = column_chunks.as_ref() else {
        return;
    };

    // States
    let regions_title = if view.regions_loading {
        "State (loading…)".to_owned()
    } else if let Some(failure) = &view.regions_failure {
        format!("State (failed: {failure}, r to retry)")
    } else {
        "State".to_owned()
    };
    let region_items = view
        .regions
        .iter()
        .map(|region| {
            let mark = if view.selected_region.as_ref() == Some(region) {
                "● "
            } else {
                "  "
            };
            ListItem::new(format!("{mark}{region}"))
        })
        .collect::<Vec<ListItem<'_>>>();
    draw_picker(
        frame,
        region_items,
        regions_title,
        app.home_focus == HomeFocus::Regions,
        true,
        app.region_index,
        *regions_area,
    );

    // Municipalities, dimmed until a state is chosen
    let municipalities_title = if !view.municipality_enabled {
        "City (pick a state first)".to_owned()
    } else if view.municipalities_loading {
        "City (loading…)".to_owned()
    } else if let Some(failure) = &view.municipalities_failure {
        format!("City (failed: {failure}, r to retry)")
    } else {
        "City".to_owned()
    };
    let municipality_items = view
        .municipalities
        .iter()
        .map(|municipality| {
            let mark = if view.selected_municipality.as_ref() == Some(municipality) {
                "● "
            } else {
                "  "
            };
            ListItem::new(format!("{mark}{municipality}"))
        })
        .collect::<Vec<ListItem<'_>>>();
    draw_picker(
        frame,
        municipality_items,
        municipalities_title,
        app.home_focus == HomeFocus::Municipalities,
        view.municipality_enabled,
        app.municipality_index,
        *municipalities_area,
    );

    let mut confirm_style = if view.confirm_enabled {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    if app.home_focus == HomeFocus::Confirm {
        confirm_style = confirm_style.add_modifier(Modifier::REVERSED);
    }
    let confirm = Paragraph::new("Enter")
        .alignment(Alignment::Center)
        .style(confirm_style)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(confirm, *confirm_area);
}

fn draw_picker(
    frame: &mut Frame<'_>,
    items: Vec<ListItem<'_>>,
    title: String,
    focused: bool,
    enabled: bool,
    index: usize,
    area: Rect,
) {
    let has_items = !items.is_empty();
    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let mut list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(title),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    if !enabled {
        list = list.style(Style::default().fg(Color::DarkGray));
    }

    let mut state = ListState::default();
    if has_items && focused {
        state.select(Some(index));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_points(frame: &mut Frame<'_>, app: &App, view: &PointsView, area: Rect) {
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(area);
    let [body_area, chips_area] = layout_chunks.as_ref() else {
        return;
    };

    let column_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(*body_area);
    let [map_area, list_area] = column_chunks.as_ref() else {
        return;
    };

    let selected_point = view.points.get(app.point_index).map(|point| point.id);
    let map_block = Block::default()
        .borders(Borders::ALL)
        .title(map_title(view));
    match &view.map {
        MapArea::Blank => frame.render_widget(map_block, *map_area),
        MapArea::Absent => frame.render_widget(
            Paragraph::new("No location available")
                .style(Style::default().fg(Color::DarkGray))
                .block(map_block),
            *map_area,
        ),
        MapArea::Shown(map) => draw_map(frame, map, selected_point, map_block, *map_area),
    }

    // Points of the latest query
    let list_title = if view.points_loading {
        "Collection points (loading…)".to_owned()
    } else {
        format!("Collection points ({})", view.points.len())
    };
    let items = view
        .points
        .iter()
        .map(|point| ListItem::new(point.name.clone()))
        .collect::<Vec<ListItem<'_>>>();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(list_title))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    let mut state = ListState::default();
    if !view.points.is_empty() {
        state.select(Some(app.point_index));
    }
    frame.render_stateful_widget(list, *list_area, &mut state);

    // Category strip
    let chips_title = if view.categories_loading {
        "Items (loading…)"
    } else {
        "Items"
    };
    let spans = view
        .chips
        .iter()
        .enumerate()
        .flat_map(|(idx, chip)| {
            let mut style = if chip.selected {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            if idx == app.chip_index {
                style = style.add_modifier(Modifier::REVERSED);
            }
            [Span::styled(format!(" {} ", chip.title), style), Span::raw(" ")]
        })
        .collect::<Vec<Span<'_>>>();
    let chips = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title(chips_title));
    frame.render_widget(chips, *chips_area);
}

/// The map body stays empty while the fix is pending; only the title says so.
fn map_title(view: &PointsView) -> String {
    let locating = if view.map == MapArea::Blank {
        " (locating…)"
    } else {
        ""
    };
    format!(
        "{} / {}{locating}",
        view.destination.municipality, view.destination.region
    )
}

fn draw_map(
    frame: &mut Frame<'_>,
    map: &MapView,
    selected: Option<PointId>,
    block: Block<'_>,
    area: Rect,
) {
    let half_lat = map.latitude_delta / 2.0;
    let half_lon = map.longitude_delta / 2.0;
    let center = map.center;

    let canvas = Canvas::default()
        .block(block)
        .marker(symbols::Marker::Braille)
        .x_bounds([center.longitude - half_lon, center.longitude + half_lon])
        .y_bounds([center.latitude - half_lat, center.latitude + half_lat])
        .paint(|ctx| {
            ctx.draw(&Circle {
                x: center.longitude,
                y: center.latitude,
                radius: half_lon / 20.0,
                color: Color::Blue,
            });
            for marker in &map.markers {
                let style = if Some(marker.point_id) == selected {
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Green)
                };
                ctx.print(
                    marker.coordinate.longitude,
                    marker.coordinate.latitude,
                    Span::styled(format!("◆ {}", marker.title), style),
                );
            }
        });
    frame.render_widget(canvas, area);
}

fn draw_detail(frame: &mut Frame<'_>, detail: &DetailScreen, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Collection point");

    let lines = match detail.detail() {
        AsyncCell::Pending => vec![Line::from("Loading…")],
        AsyncCell::Failed(failure) => vec![Line::styled(
            format!("Could not load point {}: {failure}", detail.point_id()),
            Style::default().fg(Color::Red),
        )],
        AsyncCell::Ready(detail) => {
            let mut lines = vec![
                Line::styled(
                    detail.point.name.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Line::from(format!("{}, {}", detail.city, detail.uf)),
                Line::from(""),
                Line::from(format!("E-mail:   {}", detail.email)),
                Line::from(format!("WhatsApp: {}", detail.whatsapp)),
                Line::from(""),
                Line::styled("Accepts", Style::default().fg(Color::Green)),
            ];
            lines.extend(
                detail
                    .items
                    .iter()
                    .map(|item| Line::from(format!("  • {item}"))),
            );
            lines
        }
    };

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn draw_modal(frame: &mut Frame<'_>, view: &PointsView, area: Rect) {
    let Some(notice) = view
        .notices
        .iter()
        .find(|notice| notice.level == NoticeLevel::Modal)
    else {
        return;
    };

    let popup = centered(area, 50, 7);
    let body = vec![
        Line::from(notice.message.clone()),
        Line::from(""),
        Line::styled("Enter/Esc to dismiss", Style::default().fg(Color::DarkGray)),
    ];
    let paragraph = Paragraph::new(body)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title(notice.title.clone()),
        );
    frame.render_widget(Clear, popup);
    frame.render_widget(paragraph, popup);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
