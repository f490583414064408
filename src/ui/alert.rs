use super::centered_rect;
use ratatui::{
    Frame,
    layout::Alignment,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

/// Modal message box. Any key dismisses it.
pub fn render(message: &str, frame: &mut Frame) {
    let area = centered_rect(50, 30, frame.area());

    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Alert ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title_bottom(Line::from(" Press any key to close ").style(Style::default().fg(Color::DarkGray)));

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(message.to_string(), Style::default().fg(Color::White))),
    ];

    let paragraph = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}
