use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid event time {0:?}, expected \"HH:MM - HH:MM\" or \"All day\"")]
pub struct EventTimeError(String);

/// When an event happens during its day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EventTime {
    AllDay,
    Range { start: NaiveTime, end: NaiveTime },
}

impl EventTime {
    const ALL_DAY: &'static str = "All day";
}

impl fmt::Display for EventTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventTime::AllDay => f.write_str(Self::ALL_DAY),
            EventTime::Range { start, end } => {
                write!(f, "{} - {}", start.format("%H:%M"), end.format("%H:%M"))
            }
        }
    }
}

impl FromStr for EventTime {
    type Err = EventTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == Self::ALL_DAY {
            return Ok(EventTime::AllDay);
        }

        let err = || EventTimeError(s.to_string());
        let (start, end) = s.split_once(" - ").ok_or_else(err)?;
        let start = NaiveTime::parse_from_str(start.trim(), "%H:%M").map_err(|_| err())?;
        let end = NaiveTime::parse_from_str(end.trim(), "%H:%M").map_err(|_| err())?;
        Ok(EventTime::Range { start, end })
    }
}

impl TryFrom<String> for EventTime {
    type Error = EventTimeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EventTime> for String {
    fn from(time: EventTime) -> Self {
        time.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub date: NaiveDate,
    /// Long form of `date`, e.g. "May 20, 2025"
    pub display_date: String,
    pub time: EventTime,
}

impl Event {
    pub fn new(id: i64, title: impl Into<String>, date: NaiveDate, time: EventTime) -> Self {
        Self {
            id,
            title: title.into(),
            date,
            display_date: date.format("%B %-d, %Y").to_string(),
            time,
        }
    }
}
