use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Spans,
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use crate::ui::Tab;

/// Split the screen into tab bar, body and help line
pub fn screen_chunks(size: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ].as_ref())
        .split(size)
}

pub fn render_tabs<B: Backend>(frame: &mut Frame<B>, area: Rect, active: Tab) {
    let titles = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| Spans::from(format!("{} {}", i + 1, tab.title())))
        .collect();

    let tabs = Tabs::new(titles)
        .block(Block::default().title("Freelancer CRM").borders(Borders::ALL))
        .select(active.index())
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_widget(tabs, area);
}

pub fn render_help<B: Backend>(frame: &mut Frame<B>, area: Rect, text: &str) {
    let help = Paragraph::new(text.to_string())
        .block(Block::default().borders(Borders::TOP))
        .style(Style::default().fg(Color::Gray));

    frame.render_widget(help, area);
}

// Helper function to create a centered rect
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Highlight used by every list and table
pub fn highlight_style() -> Style {
    Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

/// Badge colour for a status label
pub fn status_color(label: &str) -> Color {
    match label {
        "Completed" | "Paid" | "Active" => Color::Green,
        "In Progress" | "Pending" => Color::Yellow,
        "Overdue" => Color::Red,
        _ => Color::Gray,
    }
}
