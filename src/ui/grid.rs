use super::card;
use crate::app::{App, CARD_HEIGHT, CARD_WIDTH, InputMode, ViewQuery};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

pub fn render(app: &App, frame: &mut Frame) {
    let area = frame.area();

    // Layout: header(3) + search(3) + suggestion(1) + grid(min) + status(1)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(CARD_HEIGHT),
            Constraint::Length(1),
        ])
        .split(area);

    // ── Header ──
    let scope = match &app.query {
        ViewQuery::All => String::new(),
        ViewQuery::Text(q) => format!("  search: \"{}\"", q),
        ViewQuery::Attributes(f) => format!("  filter: {}", f.describe()),
    };
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " 🎬 Movie Stocks",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("   [{} of {} movies]", app.visible.len(), app.catalog.len()),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(scope, Style::default().fg(Color::Yellow)),
    ]))
    .alignment(Alignment::Left)
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(header, chunks[0]);

    // ── Search bar ──
    let search_style = match app.input_mode {
        InputMode::Editing => Style::default().fg(Color::Yellow),
        InputMode::Normal => Style::default().fg(Color::DarkGray),
    };
    let search_label = if app.input_mode == InputMode::Editing {
        " Search (Tab to accept suggestion, Enter to finish): "
    } else {
        " Search (/): "
    };
    let search_bar = Paragraph::new(format!("{}{}", search_label, app.search))
        .style(search_style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(search_style)
                .title(" Search Movies "),
        );
    frame.render_widget(search_bar, chunks[1]);

    // Set cursor position when editing
    if app.input_mode == InputMode::Editing {
        let cursor_x = chunks[1].x
            + 1
            + search_label.chars().count() as u16
            + app.search.chars().count() as u16;
        frame.set_cursor_position((cursor_x.min(chunks[1].right().saturating_sub(2)), chunks[1].y + 1));
    }

    // ── Suggestion ──
    if let Some(ref suggestion) = app.prediction {
        let line = Line::from(vec![
            Span::raw(" Did you mean: "),
            Span::styled(
                suggestion.clone(),
                Style::default()
                    .fg(Color::Rgb(230, 126, 34))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("?"),
        ]);
        frame.render_widget(Paragraph::new(line), chunks[2]);
    }

    // ── Cards ──
    render_cards(app, frame, chunks[3]);

    // ── Status bar ──
    let key = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let status_line = Line::from(vec![
        Span::styled(" ←↑↓→", key),
        Span::raw(" Move  "),
        Span::styled("/", key),
        Span::raw(" Search  "),
        Span::styled("f", key),
        Span::raw(" Filter  "),
        Span::styled("a", key),
        Span::raw(" Add  "),
        Span::styled("r", key),
        Span::raw(" Reload  "),
        Span::styled("?", key),
        Span::raw(" Help  "),
        Span::styled("q", key),
        Span::raw(" Quit  "),
        Span::styled(&app.status_msg, Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(status_line), chunks[4]);
}

fn render_cards(app: &App, frame: &mut Frame, area: Rect) {
    if app.visible.is_empty() {
        let empty = Paragraph::new("No movies match.")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(empty, area);
        return;
    }

    let columns = app.grid_columns.max(1);
    let first = app.row_offset * columns;
    let last = (first + columns * app.grid_rows).min(app.visible.len());

    for pos in first..last {
        let Some(movie) = app.visible.get(pos).and_then(|&idx| app.catalog.get(idx)) else {
            continue;
        };
        let row = (pos - first) / columns;
        let col = pos % columns;
        let cell = Rect::new(
            area.x + col as u16 * CARD_WIDTH,
            area.y + row as u16 * CARD_HEIGHT,
            CARD_WIDTH,
            CARD_HEIGHT,
        )
        .intersection(area);
        if cell.is_empty() {
            continue;
        }

        let poster = card::resolve_poster(&app.api_base, movie.poster.as_deref());
        card::render(
            frame,
            cell,
            movie,
            app.frames.style(pos),
            pos == app.selected,
            &app.share_label(movie.id),
            &poster,
        );
    }
}
