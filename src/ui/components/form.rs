use crossterm::event::KeyCode;
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

/// One labelled line of a form
pub struct FormField {
    pub label: &'static str,
    pub value: String,
}

impl FormField {
    pub fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
        }
    }
}

/// Apply a key press to a free-text field
pub fn edit_text(buffer: &mut String, key: KeyCode) {
    match key {
        KeyCode::Char(c) => buffer.push(c),
        KeyCode::Backspace => {
            buffer.pop();
        }
        _ => {}
    }
}

/// Like [`edit_text`] but only accepts characters valid in a number
pub fn edit_number(buffer: &mut String, key: KeyCode) {
    match key {
        KeyCode::Char(c) if c.is_ascii_digit() => buffer.push(c),
        KeyCode::Char('.') if !buffer.contains('.') => buffer.push('.'),
        KeyCode::Backspace => {
            buffer.pop();
        }
        _ => {}
    }
}

/// Render a form: title bar, one line per field, help text at the bottom.
///
/// `value` of the current field is expected to already carry any editing
/// decoration (cursor, date-part brackets).
pub fn render_form<B: Backend>(
    frame: &mut Frame<B>,
    title: &str,
    fields: &[FormField],
    current: usize,
    editing: bool,
    help: &str,
    error: Option<&str>,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(3),
        ].as_ref())
        .split(frame.size());

    let title = Paragraph::new(title.to_string())
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, chunks[0]);

    render_fields(frame, fields, current, editing, chunks[1]);

    let (footer, style) = match error {
        Some(message) => (message.to_string(), Style::default().fg(Color::Red)),
        None => (help.to_string(), Style::default().fg(Color::Gray)),
    };
    let footer = Paragraph::new(footer)
        .style(style)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, chunks[2]);
}

fn render_fields<B: Backend>(
    frame: &mut Frame<B>,
    fields: &[FormField],
    current: usize,
    editing: bool,
    area: Rect,
) {
    let items: Vec<ListItem> = fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let label = format!("{}: ", field.label);
            let content = if i == current && editing {
                Spans::from(vec![
                    Span::styled(label, Style::default().fg(Color::Yellow)),
                    Span::styled(
                        field.value.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                ])
            } else if i == current {
                Spans::from(vec![
                    Span::styled(label, Style::default().fg(Color::Yellow)),
                    Span::raw(field.value.clone()),
                ])
            } else {
                Spans::from(vec![Span::raw(label), Span::raw(field.value.clone())])
            };
            ListItem::new(content)
        })
        .collect();

    let form = List::new(items).block(Block::default().borders(Borders::ALL).title("Details"));
    frame.render_widget(form, area);
}
