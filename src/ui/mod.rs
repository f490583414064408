pub mod add_form;
mod alert;
pub mod card;
pub mod filters;
mod grid;
mod help;

use crate::app::{App, View};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Top-level render dispatch.
pub fn render(app: &App, frame: &mut Frame) {
    grid::render(app, frame);

    match app.view {
        View::Grid => {}
        View::Filters => filters::render(app, frame),
        View::AddMovie => app.add_form.render(frame),
    }

    if let Some(ref message) = app.alert {
        alert::render(message, frame);
    }

    // Render help overlay on top if active
    if app.show_help {
        help::render(frame);
    }
}

/// Truncate a string to `max_width` display columns, adding "…" if truncated.
pub fn truncate_str(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max_width {
            break;
        }
        result.push(c);
        used += w;
    }
    result.push('…');
    result
}

/// Create a centered rectangle using percentage of parent area.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
