use super::truncate_str;
use crate::frames::FrameStyle;
use crate::models::{MovieRecord, PLACEHOLDER_POSTER};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use reqwest::Url;

/// Resolve a poster reference to an absolute URL.
///
/// Relative paths are served by the backend; anything missing or unusable
/// becomes the placeholder.
pub fn resolve_poster(base: &Url, poster: Option<&str>) -> String {
    let Some(poster) = poster.map(str::trim).filter(|p| !p.is_empty()) else {
        return PLACEHOLDER_POSTER.to_string();
    };
    match base.join(poster) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => url.to_string(),
        _ => PLACEHOLDER_POSTER.to_string(),
    }
}

/// Body lines of a card, each cut to `width` columns.
pub fn card_lines(movie: &MovieRecord, share_label: &str, poster: &str, width: usize) -> Vec<Line<'static>> {
    let label = Style::default().fg(Color::DarkGray);
    let field = |name: &str, value: Option<&str>| {
        let value = value.unwrap_or("N/A");
        Line::from(vec![
            Span::styled(format!("{}: ", name), label),
            Span::raw(truncate_str(value, width.saturating_sub(name.len() + 2))),
        ])
    };

    let mut lines = vec![
        Line::from(Span::styled(
            format!("Price: ₹{}", movie.stock_price),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            truncate_str(poster, width),
            Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),
        )),
    ];

    if movie.is_enriched() {
        lines.push(field("Year", movie.year.as_deref()));
        lines.push(field("Genre", movie.genre.as_deref()));
        lines.push(field("Language", movie.language_field()));
        lines.push(field("Director", movie.director.as_deref()));
        lines.push(field("Cast", movie.cast.as_deref()));
        lines.push(field("Plot", movie.plot.as_deref()));
        lines.push(field("Runtime", movie.runtime.as_deref()));
        lines.push(field("IMDb", movie.imdb_rating.as_deref()));
    } else {
        lines.push(Line::from(Span::styled(
            "Fetching details…",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("b", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::raw(" Buy  "),
        Span::styled("t", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::raw(" Trailer  "),
        Span::styled("d", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
        Span::raw(" Delete"),
    ]));
    lines.push(Line::from(Span::styled(
        share_label.to_string(),
        Style::default().fg(Color::Green),
    )));
    lines
}

/// Draw one card with its current frame style.
pub fn render(
    frame: &mut Frame,
    area: Rect,
    movie: &MovieRecord,
    style: FrameStyle,
    selected: bool,
    share_label: &str,
    poster: &str,
) {
    let title_style = if selected {
        Style::default()
            .fg(Color::Black)
            .bg(style.color())
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    };
    let inner_width = area.width.saturating_sub(2) as usize;
    let title = truncate_str(&movie.title, inner_width.saturating_sub(4));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(style.border_type())
        .border_style(Style::default().fg(style.color()))
        .title(Line::from(Span::styled(format!(" {} ", title), title_style)));

    let body = Paragraph::new(card_lines(movie, share_label, poster, inner_width)).block(block);
    frame.render_widget(body, area);
}

/// Flatten rendered lines to plain text.
pub fn plain_text(lines: &[Line]) -> String {
    lines
        .iter()
        .map(|line| {
            line.spans
                .iter()
                .map(|span| span.content.as_ref())
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// A card as printed by the `list` command.
pub fn card_text(movie: &MovieRecord, share_label: &str, poster: &str) -> String {
    let body = plain_text(&card_lines(movie, share_label, poster, usize::MAX));
    format!("── {} (#{}) ──\n{}", movie.title, movie.id, body)
}
