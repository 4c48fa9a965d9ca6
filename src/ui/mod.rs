pub mod calendar;
pub mod client_wizard;
pub mod clients;
pub mod components;
pub mod dashboard;
pub mod event_wizard;
pub mod invoice_wizard;
pub mod invoices;
pub mod project_wizard;
pub mod projects;

use crossterm::event::KeyCode;

/// Top-level screens reachable from the tab bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Dashboard,
    Clients,
    Projects,
    Invoices,
    Calendar,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::Dashboard,
        Tab::Clients,
        Tab::Projects,
        Tab::Invoices,
        Tab::Calendar,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Clients => "Clients",
            Tab::Projects => "Projects",
            Tab::Invoices => "Invoices",
            Tab::Calendar => "Calendar",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Number keys 1-5 jump straight to a tab
    pub fn from_key(key: KeyCode) -> Option<Tab> {
        match key {
            KeyCode::Char(c @ '1'..='5') => Tab::ALL.get(c as usize - '1' as usize).copied(),
            _ => None,
        }
    }
}

/// Move a list selection by one, wrapping at both ends
pub fn step_selection(selected: Option<usize>, len: usize, forward: bool) -> Option<usize> {
    if len == 0 {
        return None;
    }

    let i = match selected {
        Some(i) if forward => {
            if i >= len - 1 { 0 } else { i + 1 }
        }
        Some(i) => {
            if i == 0 { len - 1 } else { i - 1 }
        }
        None => 0,
    };
    Some(i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_keys_pick_tabs() {
        assert_eq!(Tab::from_key(KeyCode::Char('1')), Some(Tab::Dashboard));
        assert_eq!(Tab::from_key(KeyCode::Char('5')), Some(Tab::Calendar));
        assert_eq!(Tab::from_key(KeyCode::Char('6')), None);
        assert_eq!(Tab::from_key(KeyCode::Enter), None);
    }

    #[test]
    fn selection_wraps() {
        assert_eq!(step_selection(Some(2), 3, true), Some(0));
        assert_eq!(step_selection(Some(0), 3, false), Some(2));
        assert_eq!(step_selection(None, 3, false), Some(0));
        assert_eq!(step_selection(Some(1), 0, true), None);
    }
}
