use super::centered_rect;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

/// Result of a key press in the add-movie form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddFormAction {
    /// User asked to add the movie
    Submit,
    /// User closed the form
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddField {
    #[default]
    Title,
    Price,
}

/// Two-field popup for adding a movie
#[derive(Debug, Clone, Default)]
pub struct AddMovieForm {
    pub title: String,
    /// Digits only; validated on submit
    pub price: String,
    pub focus: AddField,
}

impl AddMovieForm {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Handle keyboard input
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<AddFormAction> {
        match key.code {
            KeyCode::Enter => Some(AddFormAction::Submit),
            KeyCode::Esc => Some(AddFormAction::Cancel),
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.focus = match self.focus {
                    AddField::Title => AddField::Price,
                    AddField::Price => AddField::Title,
                };
                None
            }
            KeyCode::Char(c) => {
                match self.focus {
                    AddField::Title => self.title.push(c),
                    AddField::Price if c.is_ascii_digit() => self.price.push(c),
                    AddField::Price => {}
                }
                None
            }
            KeyCode::Backspace => {
                match self.focus {
                    AddField::Title => self.title.pop(),
                    AddField::Price => self.price.pop(),
                };
                None
            }
            _ => None,
        }
    }

    /// Render the form as a centered popup
    pub fn render(&self, frame: &mut Frame) {
        let area = centered_rect(50, 40, frame.area());

        frame.render_widget(Clear, area);

        let block = Block::default()
            .title(" Add Movie ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(1),
            ])
            .split(inner);

        let fields = [
            (AddField::Title, " Movie Title ", self.title.as_str()),
            (AddField::Price, " Stock Price (₹) ", self.price.as_str()),
        ];
        for (i, (field, label, value)) in fields.into_iter().enumerate() {
            let style = if self.focus == field {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let input = Paragraph::new(value).style(style).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(style)
                    .title(label),
            );
            frame.render_widget(input, chunks[i]);

            if self.focus == field {
                let x = chunks[i].x + 1 + value.chars().count() as u16;
                frame.set_cursor_position((x.min(chunks[i].right().saturating_sub(2)), chunks[i].y + 1));
            }
        }

        let help = Paragraph::new("Tab: Switch field | Enter: Add | Esc: Cancel")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(help, chunks[2]);
    }
}
