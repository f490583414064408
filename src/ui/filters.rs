use super::centered_rect;
use crate::app::App;
use crate::filter::{AttributeFilter, FilterOptions};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

/// Result of a key press in the filter bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterBarAction {
    Apply(AttributeFilter),
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterField {
    #[default]
    Year,
    Genre,
    Language,
}

impl FilterField {
    const ALL: [FilterField; 3] = [FilterField::Year, FilterField::Genre, FilterField::Language];

    fn next(self) -> Self {
        match self {
            FilterField::Year => FilterField::Genre,
            FilterField::Genre => FilterField::Language,
            FilterField::Language => FilterField::Year,
        }
    }

    fn prev(self) -> Self {
        match self {
            FilterField::Year => FilterField::Language,
            FilterField::Genre => FilterField::Year,
            FilterField::Language => FilterField::Genre,
        }
    }

    fn label(self) -> &'static str {
        match self {
            FilterField::Year => "Year",
            FilterField::Genre => "Genre",
            FilterField::Language => "Language",
        }
    }

    fn any_label(self) -> &'static str {
        match self {
            FilterField::Year => "All Years",
            FilterField::Genre => "All Genres",
            FilterField::Language => "All Languages",
        }
    }
}

/// Year / genre / language selectors. Nothing changes until applied.
#[derive(Debug, Clone, Default)]
pub struct FilterBar {
    pub focus: FilterField,
    pub selection: AttributeFilter,
}

impl FilterBar {
    pub fn handle_key(&mut self, key: KeyEvent, options: &FilterOptions) -> Option<FilterBarAction> {
        match key.code {
            KeyCode::Enter => return Some(FilterBarAction::Apply(self.selection.clone())),
            KeyCode::Esc => return Some(FilterBarAction::Cancel),
            KeyCode::Up | KeyCode::Char('k') | KeyCode::BackTab => self.focus = self.focus.prev(),
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::Right | KeyCode::Char('l') => self.cycle(options, true),
            KeyCode::Left | KeyCode::Char('h') => self.cycle(options, false),
            KeyCode::Char('c') => self.selection = AttributeFilter::default(),
            _ => {}
        }
        None
    }

    fn cycle(&mut self, options: &FilterOptions, forward: bool) {
        let (slot, values) = match self.focus {
            FilterField::Year => (&mut self.selection.year, &options.years),
            FilterField::Genre => (&mut self.selection.genre, &options.genres),
            FilterField::Language => (&mut self.selection.language, &options.languages),
        };
        *slot = cycle_value(slot.as_deref(), values, forward);
    }

    fn value(&self, field: FilterField) -> Option<&str> {
        match field {
            FilterField::Year => self.selection.year.as_deref(),
            FilterField::Genre => self.selection.genre.as_deref(),
            FilterField::Language => self.selection.language.as_deref(),
        }
    }
}

/// Step through `None, values[0], .., values[n-1], None`.
///
/// A current value that is no longer offered counts as `None`.
fn cycle_value(current: Option<&str>, values: &[String], forward: bool) -> Option<String> {
    if values.is_empty() {
        return None;
    }
    let pos = current.and_then(|c| values.iter().position(|v| v == c));
    let next = match (pos, forward) {
        (None, true) => Some(0),
        (None, false) => Some(values.len() - 1),
        (Some(i), true) if i + 1 < values.len() => Some(i + 1),
        (Some(0), false) => None,
        (Some(i), false) => Some(i - 1),
        (Some(_), true) => None,
    };
    next.map(|i| values[i].clone())
}

pub fn render(app: &App, frame: &mut Frame) {
    let area = centered_rect(50, 40, frame.area());

    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Filter Movies ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(inner);

    let bar = &app.filter_bar;
    let rows: Vec<Line> = FilterField::ALL
        .iter()
        .map(|&field| {
            let focused = bar.focus == field;
            let marker = if focused { "▸ " } else { "  " };
            let value = bar.value(field).unwrap_or(field.any_label());
            let value_style = if focused {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            Line::from(vec![
                Span::styled(marker, Style::default().fg(Color::Cyan)),
                Span::styled(
                    format!("{:<10}", field.label()),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(format!("‹ {} ›", value), value_style),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(rows), chunks[1]);

    let options = &app.filter_options;
    let counts = format!(
        "{} years · {} genres · {} languages available",
        options.years.len(),
        options.genres.len(),
        options.languages.len()
    );
    frame.render_widget(
        Paragraph::new(counts)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        chunks[2],
    );

    let help = Paragraph::new("↑↓ Field | ←→ Option | c Clear | Enter: Apply | Esc: Cancel")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(help, chunks[3]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn options() -> FilterOptions {
        FilterOptions {
            years: vec!["2013".into(), "2023".into()],
            genres: vec!["Action".into(), "Drama".into(), "Thriller".into()],
            languages: vec!["Hindi".into(), "Tamil".into()],
        }
    }

    #[test]
    fn test_cycle_value_wraps_through_none() {
        let values = vec!["a".to_string(), "b".to_string()];
        assert_eq!(cycle_value(None, &values, true).as_deref(), Some("a"));
        assert_eq!(cycle_value(Some("a"), &values, true).as_deref(), Some("b"));
        assert_eq!(cycle_value(Some("b"), &values, true), None);
        assert_eq!(cycle_value(None, &values, false).as_deref(), Some("b"));
        assert_eq!(cycle_value(Some("a"), &values, false), None);
        assert_eq!(cycle_value(Some("gone"), &values, true).as_deref(), Some("a"));
        assert_eq!(cycle_value(Some("a"), &[], true), None);
    }

    #[test]
    fn test_select_fields_and_apply() {
        let mut bar = FilterBar::default();
        let opts = options();

        bar.handle_key(key(KeyCode::Right), &opts);
        bar.handle_key(key(KeyCode::Right), &opts);
        bar.handle_key(key(KeyCode::Down), &opts);
        bar.handle_key(key(KeyCode::Left), &opts);
        assert_eq!(bar.focus, FilterField::Genre);

        let action = bar.handle_key(key(KeyCode::Enter), &opts);
        assert_eq!(
            action,
            Some(FilterBarAction::Apply(AttributeFilter {
                year: Some("2023".into()),
                genre: Some("Thriller".into()),
                language: None,
            }))
        );
    }

    #[test]
    fn test_clear_and_cancel() {
        let mut bar = FilterBar {
            focus: FilterField::Language,
            selection: AttributeFilter {
                language: Some("Tamil".into()),
                ..Default::default()
            },
        };
        let opts = options();
        assert!(bar.handle_key(key(KeyCode::Char('c')), &opts).is_none());
        assert!(bar.selection.is_empty());
        assert_eq!(bar.handle_key(key(KeyCode::Esc), &opts), Some(FilterBarAction::Cancel));
    }

    #[test]
    fn test_focus_wraps() {
        let mut bar = FilterBar::default();
        let opts = FilterOptions::default();
        bar.handle_key(key(KeyCode::Up), &opts);
        assert_eq!(bar.focus, FilterField::Language);
        bar.handle_key(key(KeyCode::Char('j')), &opts);
        assert_eq!(bar.focus, FilterField::Year);
    }
}
