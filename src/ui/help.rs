use super::centered_rect;
use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

fn section(title: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        title,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ))
}

fn binding(keys: &'static str, action: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("    {:<12}", keys), Style::default().fg(Color::Yellow)),
        Span::raw(action),
    ])
}

pub fn render(frame: &mut Frame) {
    let area = centered_rect(70, 80, frame.area());

    // Clear the area behind the popup
    frame.render_widget(Clear, area);

    let help_text = vec![
        Line::from(""),
        section("  Global"),
        binding("?", "Toggle this help"),
        binding("q / Ctrl+C", "Quit application"),
        binding("Esc", "Clear search and filters"),
        binding("r", "Reload movies from the backend"),
        Line::from(""),
        section("  Grid"),
        binding("←↑↓→ / hjkl", "Move between cards"),
        binding("/", "Search titles (type to filter)"),
        binding("Tab", "Accept the \"Did you mean\" suggestion"),
        binding("f", "Filter by year, genre and language"),
        binding("a", "Add a movie"),
        Line::from(""),
        section("  Selected card"),
        binding("b", "Buy one share"),
        binding("t", "Search for the trailer in the browser"),
        binding("d / Delete", "Remove the movie from the grid"),
        Line::from(""),
        section("  Filter bar"),
        binding("↑↓", "Choose field"),
        binding("←→", "Choose value"),
        binding("c", "Clear all fields"),
        binding("Enter / Esc", "Apply / cancel"),
        Line::from(""),
        section("  Add form"),
        binding("Tab", "Switch between title and price"),
        binding("Enter / Esc", "Add / cancel"),
        Line::from(""),
    ];

    let help = Paragraph::new(help_text)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help: Keybindings ")
                .title_bottom(Line::from(" Press ? or Esc to close ").style(Style::default().fg(Color::DarkGray))),
        )
        .style(Style::default().fg(Color::White));

    frame.render_widget(help, area);
}
