use anyhow::Result;
use chrono::{NaiveDate, NaiveTime};
use crossterm::event::{self, Event as TermEvent, KeyCode};
use tui::{backend::Backend, Frame};

use freelancer_crm::models::{timestamp_id, Event, EventTime};

use crate::ui::components::date_input::DateInputState;
use crate::ui::components::form::{edit_text, render_form, FormField};

pub enum EventWizardAction {
    Cancel,
    Save(Event),
}

#[derive(Clone, PartialEq, Copy)]
pub enum EventField {
    Title,
    Date,
    AllDay,
    StartTime,
    EndTime,
}

impl EventField {
    const ORDER: [EventField; 5] = [
        EventField::Title,
        EventField::Date,
        EventField::AllDay,
        EventField::StartTime,
        EventField::EndTime,
    ];
}

pub struct EventWizardState {
    pub title: String,
    pub date: DateInputState,
    pub all_day: bool,
    pub start_time: String,
    pub end_time: String,
    pub current_field: EventField,
    pub editing: bool,
    pub error: Option<String>,
}

impl EventWizardState {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            title: String::new(),
            date: DateInputState::new(date),
            all_day: false,
            start_time: "09:00".to_string(),
            end_time: "10:00".to_string(),
            current_field: EventField::Title,
            editing: false,
            error: None,
        }
    }

    pub fn next_field(&mut self) {
        let i = self.current_field as usize;
        self.current_field = EventField::ORDER[(i + 1) % EventField::ORDER.len()];
    }

    pub fn previous_field(&mut self) {
        let i = self.current_field as usize;
        let len = EventField::ORDER.len();
        self.current_field = EventField::ORDER[(i + len - 1) % len];
    }

    pub fn toggle_editing(&mut self) {
        match self.current_field {
            EventField::AllDay => self.all_day = !self.all_day,
            EventField::Date => {
                self.editing = !self.editing;
                self.date.toggle_editing();
            }
            EventField::StartTime | EventField::EndTime if self.all_day => {}
            _ => self.editing = !self.editing,
        }
    }

    pub fn edit_current_field(&mut self, key: KeyCode) {
        if !self.editing {
            return;
        }

        match self.current_field {
            EventField::Title => edit_text(&mut self.title, key),
            EventField::Date => self.date.handle_input(key),
            EventField::StartTime => edit_time(&mut self.start_time, key),
            EventField::EndTime => edit_time(&mut self.end_time, key),
            EventField::AllDay => {}
        }
    }

    fn time(&self) -> Result<EventTime, String> {
        if self.all_day {
            return Ok(EventTime::AllDay);
        }

        let parse = |label: &str, value: &str| {
            NaiveTime::parse_from_str(value, "%H:%M").map_err(|_| format!("{label} must be HH:MM"))
        };
        Ok(EventTime::Range {
            start: parse("Start time", &self.start_time)?,
            end: parse("End time", &self.end_time)?,
        })
    }

    pub fn build(&mut self) -> Option<Event> {
        if self.title.trim().is_empty() {
            self.error = Some("Required: Title".to_string());
            return None;
        }

        match self.time() {
            Ok(time) => Some(Event::new(timestamp_id(), self.title.trim(), self.date.date, time)),
            Err(message) => {
                self.error = Some(message);
                None
            }
        }
    }

    fn fields(&self) -> Vec<FormField> {
        let cursor = |field: EventField| {
            if self.editing && self.current_field == field { "|" } else { "" }
        };
        let time_value = |value: &str, field: EventField| {
            if self.all_day {
                "-".to_string()
            } else {
                format!("{}{}", value, cursor(field))
            }
        };
        vec![
            FormField::new("Title", format!("{}{}", self.title, cursor(EventField::Title))),
            FormField::new("Date", self.date.get_display_string()),
            FormField::new("All day", if self.all_day { "Yes" } else { "No" }),
            FormField::new("Start time", time_value(&self.start_time, EventField::StartTime)),
            FormField::new("End time", time_value(&self.end_time, EventField::EndTime)),
        ]
    }
}

/// Digits and a colon, at most "HH:MM"
fn edit_time(buffer: &mut String, key: KeyCode) {
    match key {
        KeyCode::Char(c) if (c.is_ascii_digit() || c == ':') && buffer.len() < 5 => buffer.push(c),
        KeyCode::Backspace => {
            buffer.pop();
        }
        _ => {}
    }
}

pub fn render_event_wizard<B: Backend>(frame: &mut Frame<B>, state: &EventWizardState) {
    let help = if state.editing {
        match state.current_field {
            EventField::Date => "Enter - Save field | Left/Right - Switch date part | Esc - Cancel editing",
            _ => "Enter - Save field | Esc - Cancel editing",
        }
    } else {
        "Enter - Edit field / toggle | Up/Down - Navigate fields | S - Save event | Esc - Cancel"
    };

    render_form(
        frame,
        "Add Event",
        &state.fields(),
        state.current_field as usize,
        state.editing,
        help,
        state.error.as_deref(),
    );
}

pub fn handle_input(state: &mut EventWizardState) -> Result<Option<EventWizardAction>> {
    if let TermEvent::Key(key) = event::read()? {
        match key.code {
            KeyCode::Esc => {
                if state.editing {
                    state.toggle_editing();
                } else {
                    return Ok(Some(EventWizardAction::Cancel));
                }
            }
            KeyCode::Enter => state.toggle_editing(),
            KeyCode::Up if !state.editing => state.previous_field(),
            KeyCode::Down if !state.editing => state.next_field(),
            KeyCode::Char('s') if !state.editing => {
                if let Some(event) = state.build() {
                    return Ok(Some(EventWizardAction::Save(event)));
                }
            }
            _ if state.editing => state.edit_current_field(key.code),
            _ => {}
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 20).unwrap()
    }

    #[test]
    fn timed_event_uses_range() {
        let mut state = EventWizardState::new(day());
        state.title = "Client Meeting".into();

        let event = state.build().unwrap();
        assert_eq!(event.time.to_string(), "09:00 - 10:00");
        assert_eq!(event.display_date, "May 20, 2025");
    }

    #[test]
    fn all_day_ignores_times() {
        let mut state = EventWizardState::new(day());
        state.title = "Holiday".into();
        state.start_time = "garbage".into();
        state.current_field = EventField::AllDay;
        state.toggle_editing();

        assert_eq!(state.build().unwrap().time, EventTime::AllDay);
    }

    #[test]
    fn bad_time_is_reported() {
        let mut state = EventWizardState::new(day());
        state.title = "Sync".into();
        state.end_time = "25:00".into();

        assert!(state.build().is_none());
        assert_eq!(state.error.as_deref(), Some("End time must be HH:MM"));
    }

    #[test]
    fn time_input_is_bounded() {
        let mut buffer = String::new();
        for c in "12:345".chars() {
            edit_time(&mut buffer, KeyCode::Char(c));
        }
        assert_eq!(buffer, "12:34");
    }
}
