use chrono::{Datelike, NaiveDate};
use crossterm::event::KeyCode;

#[derive(Clone, Copy, PartialEq)]
pub enum DatePart {
    Year,
    Month,
    Day,
}

impl DatePart {
    fn width(self) -> usize {
        match self {
            DatePart::Year => 4,
            DatePart::Month | DatePart::Day => 2,
        }
    }
}

/// Date typed one part at a time: four year digits, then month, then day
pub struct DateInputState {
    pub date: NaiveDate,
    pub editing: bool,
    pub date_part: DatePart,
    pub digits: String,
}

impl DateInputState {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            editing: false,
            date_part: DatePart::Year,
            digits: String::new(),
        }
    }

    pub fn toggle_editing(&mut self) {
        self.editing = !self.editing;
        self.date_part = DatePart::Year;
        self.digits.clear();
    }

    pub fn next_date_part(&mut self) {
        self.date_part = match self.date_part {
            DatePart::Year => DatePart::Month,
            DatePart::Month => DatePart::Day,
            DatePart::Day => DatePart::Year,
        };
        self.digits.clear();
    }

    pub fn previous_date_part(&mut self) {
        self.date_part = match self.date_part {
            DatePart::Year => DatePart::Day,
            DatePart::Month => DatePart::Year,
            DatePart::Day => DatePart::Month,
        };
        self.digits.clear();
    }

    pub fn handle_input(&mut self, key: KeyCode) {
        if !self.editing {
            return;
        }

        match key {
            KeyCode::Char(c) if c.is_ascii_digit() => {
                self.digits.push(c);
                if self.digits.len() == self.date_part.width() {
                    self.apply_digits();
                    self.next_date_part();
                }
            }
            KeyCode::Backspace => {
                self.digits.pop();
            }
            KeyCode::Right => self.next_date_part(),
            KeyCode::Left => self.previous_date_part(),
            _ => {}
        }
    }

    /// Apply the typed digits to the current part, ignoring impossible dates
    fn apply_digits(&mut self) {
        let Ok(value) = self.digits.parse::<u32>() else {
            return;
        };

        let (year, month, day) = (self.date.year(), self.date.month(), self.date.day());
        let candidate = match self.date_part {
            DatePart::Year => NaiveDate::from_ymd_opt(value as i32, month, day)
                .or_else(|| NaiveDate::from_ymd_opt(value as i32, month, 28)),
            DatePart::Month => NaiveDate::from_ymd_opt(year, value, day)
                .or_else(|| NaiveDate::from_ymd_opt(year, value, 28)),
            DatePart::Day => NaiveDate::from_ymd_opt(year, month, value),
        };

        if let Some(date) = candidate {
            self.date = date;
        }
    }

    pub fn get_display_string(&self) -> String {
        let (year, month, day) = (
            format!("{:04}", self.date.year()),
            format!("{:02}", self.date.month()),
            format!("{:02}", self.date.day()),
        );
        if !self.editing {
            return format!("{year}-{month}-{day}");
        }

        let pending = if self.digits.is_empty() {
            match self.date_part {
                DatePart::Year => "[YYYY]".to_string(),
                DatePart::Month => "[MM]".to_string(),
                DatePart::Day => "[DD]".to_string(),
            }
        } else {
            format!("[{}]", self.digits)
        };

        match self.date_part {
            DatePart::Year => format!("{pending}-{month}-{day}"),
            DatePart::Month => format!("{year}-{pending}-{day}"),
            DatePart::Day => format!("{year}-{month}-{pending}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(start: NaiveDate, keys: &str) -> NaiveDate {
        let mut state = DateInputState::new(start);
        state.toggle_editing();
        for c in keys.chars() {
            state.handle_input(KeyCode::Char(c));
        }
        state.date
    }

    #[test]
    fn typing_a_full_date() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert_eq!(typed(start, "20260315"), NaiveDate::from_ymd_opt(2026, 3, 15).unwrap());
    }

    #[test]
    fn impossible_days_are_ignored() {
        let start = NaiveDate::from_ymd_opt(2025, 2, 10).unwrap();
        assert_eq!(typed(start, "202502").day(), 10);
        assert_eq!(typed(start, "20250230"), start);
    }

    #[test]
    fn month_change_clamps_day() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        assert_eq!(typed(start, "202502"), NaiveDate::from_ymd_opt(2025, 2, 28).unwrap());
        assert_eq!(typed(start, "202513"), start);
    }
}
