use anyhow::Result;
use chrono::{Datelike, Months, NaiveDate};
use crossterm::event::{self, Event as TermEvent, KeyCode};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use freelancer_crm::models::Event;

use crate::ui::components::layout::{centered_rect, highlight_style, render_help, render_tabs, screen_chunks};
use crate::ui::{step_selection, Tab};

pub struct CalendarState {
    events: Vec<Event>,
    list_state: ListState,
    today: NaiveDate,
    /// First day of the month shown in the grid
    month: NaiveDate,
    show_delete_confirmation: bool,
}

impl CalendarState {
    pub fn new(mut events: Vec<Event>, today: NaiveDate) -> Self {
        // Stable: events on the same day keep stored order
        events.sort_by_key(|event| event.date);

        let mut list_state = ListState::default();
        if !events.is_empty() {
            list_state.select(Some(0));
        }

        Self {
            events,
            list_state,
            today,
            month: today.with_day(1).unwrap_or(today),
            show_delete_confirmation: false,
        }
    }

    pub fn next(&mut self) {
        let i = step_selection(self.list_state.selected(), self.events.len(), true);
        self.list_state.select(i);
    }

    pub fn previous(&mut self) {
        let i = step_selection(self.list_state.selected(), self.events.len(), false);
        self.list_state.select(i);
    }

    pub fn next_month(&mut self) {
        if let Some(month) = self.month.checked_add_months(Months::new(1)) {
            self.month = month;
        }
    }

    pub fn previous_month(&mut self) {
        if let Some(month) = self.month.checked_sub_months(Months::new(1)) {
            self.month = month;
        }
    }

    pub fn toggle_delete_confirmation(&mut self) {
        self.show_delete_confirmation = !self.show_delete_confirmation;
    }

    pub fn selected_event(&self) -> Option<&Event> {
        self.list_state.selected().and_then(|i| self.events.get(i))
    }

    fn has_event_on(&self, date: NaiveDate) -> bool {
        self.events.iter().any(|event| event.date == date)
    }
}

pub enum CalendarAction {
    Quit,
    SwitchTab(Tab),
    NewEvent,
    DeleteEvent(i64),
}

pub fn render_calendar<B: Backend>(frame: &mut Frame<B>, state: &mut CalendarState) {
    let size = frame.size();
    let chunks = screen_chunks(size);
    render_tabs(frame, chunks[0], Tab::Calendar);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(30), Constraint::Min(20)].as_ref())
        .split(chunks[1]);

    render_month(frame, state, body[0]);

    let items: Vec<ListItem> = state
        .events
        .iter()
        .map(|event| {
            ListItem::new(vec![
                Spans::from(Span::styled(
                    event.title.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Spans::from(Span::styled(
                    format!("  {} | {}", event.display_date, event.time),
                    Style::default().fg(Color::Gray),
                )),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().title("Events").borders(Borders::ALL))
        .highlight_style(highlight_style());
    frame.render_stateful_widget(list, body[1], &mut state.list_state);

    let help = if state.selected_event().is_some() {
        "<N> Add Event | <D> Delete Event | <Left/Right> Month | <1-5> Switch screen | <Q> Quit"
    } else {
        "<N> Add Event | <Left/Right> Month | <1-5> Switch screen | <Q> Quit"
    };
    render_help(frame, chunks[2], help);

    if state.show_delete_confirmation {
        render_delete_confirmation(frame, size);
    }
}

/// Month grid, Monday first; days with events are highlighted
fn render_month<B: Backend>(frame: &mut Frame<B>, state: &CalendarState, area: Rect) {
    let mut lines = vec![Spans::from(Span::styled(
        "Mo Tu We Th Fr Sa Su",
        Style::default().fg(Color::Yellow),
    ))];

    let offset = state.month.weekday().num_days_from_monday() as usize;
    let mut week: Vec<Span> = vec![Span::raw("   ".repeat(offset))];
    let mut column = offset;

    for day in state.month.iter_days().take_while(|d| d.month() == state.month.month()) {
        let style = if day == state.today {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else if state.has_event_on(day) {
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        week.push(Span::styled(format!("{:>2}", day.day()), style));
        week.push(Span::raw(" "));
        column += 1;

        if column == 7 {
            lines.push(Spans::from(std::mem::take(&mut week)));
            column = 0;
        }
    }
    if !week.is_empty() {
        lines.push(Spans::from(week));
    }

    let title = state.month.format("%B %Y").to_string();
    let grid = Paragraph::new(lines).block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(grid, area);
}

fn render_delete_confirmation<B: Backend>(frame: &mut Frame<B>, size: Rect) {
    let popup_area = centered_rect(50, 20, size);

    let popup = Paragraph::new(vec![
        Spans::from(""),
        Spans::from("Are you sure you want to delete this event?"),
        Spans::from(""),
        Spans::from("<Y> Yes  <N> No"),
    ])
    .block(Block::default().title("Confirm Delete").borders(Borders::ALL))
    .style(Style::default().fg(Color::White).bg(Color::Black));

    frame.render_widget(popup, popup_area);
}

pub fn handle_input(state: &mut CalendarState) -> Result<Option<CalendarAction>> {
    if let TermEvent::Key(key) = event::read()? {
        if state.show_delete_confirmation {
            match key.code {
                KeyCode::Char('y') => {
                    state.toggle_delete_confirmation();
                    if let Some(event) = state.selected_event() {
                        return Ok(Some(CalendarAction::DeleteEvent(event.id)));
                    }
                }
                KeyCode::Char('n') | KeyCode::Esc => state.toggle_delete_confirmation(),
                _ => {}
            }
            return Ok(None);
        }

        if let Some(tab) = Tab::from_key(key.code) {
            return Ok(Some(CalendarAction::SwitchTab(tab)));
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(Some(CalendarAction::Quit)),
            KeyCode::Char('n') => return Ok(Some(CalendarAction::NewEvent)),
            KeyCode::Char('d') => {
                if state.selected_event().is_some() {
                    state.toggle_delete_confirmation();
                }
            }
            KeyCode::Down => state.next(),
            KeyCode::Up => state.previous(),
            KeyCode::Right => state.next_month(),
            KeyCode::Left => state.previous_month(),
            _ => {}
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use freelancer_crm::models::EventTime;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn events_are_listed_by_date() {
        let events = vec![
            Event::new(1, "Later", date(2025, 5, 25), EventTime::AllDay),
            Event::new(2, "Sooner", date(2025, 5, 12), EventTime::AllDay),
        ];
        let state = CalendarState::new(events, date(2025, 5, 1));
        assert_eq!(state.selected_event().unwrap().title, "Sooner");
        assert!(state.has_event_on(date(2025, 5, 25)));
    }

    #[test]
    fn month_navigation() {
        let mut state = CalendarState::new(Vec::new(), date(2025, 1, 31));
        assert_eq!(state.month, date(2025, 1, 1));
        state.previous_month();
        assert_eq!(state.month, date(2024, 12, 1));
        state.next_month();
        state.next_month();
        assert_eq!(state.month, date(2025, 2, 1));
    }
}
