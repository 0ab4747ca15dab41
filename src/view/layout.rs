//! Screen layout: view rows on top, then the title bar and status line.
//!
//! Pure rendering of a [`ViewEngine`] into a ratatui frame. The view area
//! height always equals [`ViewEngine::view_height`] for the same terminal.

use crate::state::{ViewEngine, CHROME_ROWS};
use crate::view_state::styles::LineStyles;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Render the active view, its title bar and the status line.
pub fn render_layout(frame: &mut Frame, engine: &ViewEngine, styles: &LineStyles) {
    let area = frame.area();
    if area.width == 0 || area.height == 0 {
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(area.height.saturating_sub(CHROME_ROWS)), // View rows
            Constraint::Length(1),                                       // Title bar
            Constraint::Length(1),                                       // Status line
        ])
        .split(area);

    render_view_rows(frame, chunks[0], engine, styles);
    render_title_bar(frame, chunks[1], engine, styles);
    render_status_line(frame, chunks[2], engine, styles);
}

fn render_view_rows(frame: &mut Frame, area: Rect, engine: &ViewEngine, styles: &LineStyles) {
    if area.height == 0 {
        return;
    }
    let Some(view) = engine.active() else {
        return;
    };
    let rows = view.draw_rows(engine.refs(), styles, engine.tab_size());
    frame.render_widget(Paragraph::new(rows), area);
}

fn render_title_bar(frame: &mut Frame, area: Rect, engine: &ViewEngine, styles: &LineStyles) {
    if area.height == 0 {
        return;
    }
    let Some(view) = engine.active() else {
        return;
    };

    let line = match view.title_parts() {
        (head, Some(marker)) => Line::from(vec![
            Span::styled(head, styles.title()),
            Span::styled(marker, styles.title_failed()),
        ]),
        (head, None) => Line::from(Span::styled(head, styles.title())),
    };
    frame.render_widget(Paragraph::new(line).style(styles.title()), area);
}

fn render_status_line(frame: &mut Frame, area: Rect, engine: &ViewEngine, styles: &LineStyles) {
    if area.height == 0 {
        return;
    }
    let report = engine.report().unwrap_or_default();
    frame.render_widget(
        Paragraph::new(Line::from(report.to_string())).style(styles.status()),
        area,
    );
}
