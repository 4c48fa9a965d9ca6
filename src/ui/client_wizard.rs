use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{backend::Backend, Frame};

use freelancer_crm::models::{timestamp_id, Client, ClientStatus};

use crate::ui::components::form::{edit_number, edit_text, render_form, FormField};

pub enum ClientWizardAction {
    Cancel,
    Save(Client),
}

#[derive(Clone, PartialEq, Copy)]
pub enum ClientField {
    Name,
    Contact,
    Email,
    Phone,
    Projects,
    Status,
}

impl ClientField {
    const ORDER: [ClientField; 6] = [
        ClientField::Name,
        ClientField::Contact,
        ClientField::Email,
        ClientField::Phone,
        ClientField::Projects,
        ClientField::Status,
    ];
}

pub struct ClientWizardState {
    pub name: String,
    pub contact: String,
    pub email: String,
    pub phone: String,
    pub projects: String,
    pub status: ClientStatus,
    pub current_field: ClientField,
    pub editing: bool,
    pub error: Option<String>,
}

impl ClientWizardState {
    pub fn new() -> Self {
        Self {
            name: String::new(),
            contact: String::new(),
            email: String::new(),
            phone: String::new(),
            projects: String::new(),
            status: ClientStatus::Active,
            current_field: ClientField::Name,
            editing: false,
            error: None,
        }
    }

    pub fn next_field(&mut self) {
        let i = self.current_field as usize;
        self.current_field = ClientField::ORDER[(i + 1) % ClientField::ORDER.len()];
    }

    pub fn previous_field(&mut self) {
        let i = self.current_field as usize;
        let len = ClientField::ORDER.len();
        self.current_field = ClientField::ORDER[(i + len - 1) % len];
    }

    pub fn toggle_editing(&mut self) {
        if self.current_field == ClientField::Status {
            self.status = match self.status {
                ClientStatus::Active => ClientStatus::Inactive,
                ClientStatus::Inactive => ClientStatus::Active,
            };
            return;
        }
        self.editing = !self.editing;
    }

    pub fn edit_current_field(&mut self, key: KeyCode) {
        if !self.editing {
            return;
        }

        match self.current_field {
            ClientField::Name => edit_text(&mut self.name, key),
            ClientField::Contact => edit_text(&mut self.contact, key),
            ClientField::Email => edit_text(&mut self.email, key),
            ClientField::Phone => edit_text(&mut self.phone, key),
            ClientField::Projects => {
                if !matches!(key, KeyCode::Char('.')) {
                    edit_number(&mut self.projects, key);
                }
            }
            ClientField::Status => {}
        }
    }

    /// Required fields that are still empty
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("Name", &self.name),
            ("Contact", &self.contact),
            ("Email", &self.email),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(label, _)| label)
        .collect()
    }

    /// Build the client, or record which required fields are missing
    pub fn build(&mut self) -> Option<Client> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            self.error = Some(format!("Required: {}", missing.join(", ")));
            return None;
        }

        Some(Client {
            id: timestamp_id(),
            name: self.name.trim().to_string(),
            contact: self.contact.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            projects: self.projects.parse().unwrap_or(0),
            status: self.status,
        })
    }

    fn fields(&self) -> Vec<FormField> {
        let cursor = |field: ClientField| {
            if self.editing && self.current_field == field { "|" } else { "" }
        };
        vec![
            FormField::new("Name", format!("{}{}", self.name, cursor(ClientField::Name))),
            FormField::new("Contact", format!("{}{}", self.contact, cursor(ClientField::Contact))),
            FormField::new("Email", format!("{}{}", self.email, cursor(ClientField::Email))),
            FormField::new("Phone", format!("{}{}", self.phone, cursor(ClientField::Phone))),
            FormField::new("Projects", format!("{}{}", self.projects, cursor(ClientField::Projects))),
            FormField::new("Status", self.status.label()),
        ]
    }
}

pub fn render_client_wizard<B: Backend>(frame: &mut Frame<B>, state: &ClientWizardState) {
    let help = if state.editing {
        "Enter - Save field | Esc - Cancel editing"
    } else {
        "Enter - Edit field / toggle status | Up/Down - Navigate fields | S - Save client | Esc - Cancel"
    };

    render_form(
        frame,
        "Add Client",
        &state.fields(),
        state.current_field as usize,
        state.editing,
        help,
        state.error.as_deref(),
    );
}

pub fn handle_input(state: &mut ClientWizardState) -> Result<Option<ClientWizardAction>> {
    if let Event::Key(key) = event::read()? {
        match key.code {
            KeyCode::Esc => {
                if state.editing {
                    state.toggle_editing();
                } else {
                    return Ok(Some(ClientWizardAction::Cancel));
                }
            }
            KeyCode::Enter => state.toggle_editing(),
            KeyCode::Up if !state.editing => state.previous_field(),
            KeyCode::Down if !state.editing => state.next_field(),
            KeyCode::Char('s') if !state.editing => {
                if let Some(client) = state.build() {
                    return Ok(Some(ClientWizardAction::Save(client)));
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

    #[test]
    fn presence_of_required_fields_is_checked() {
        let mut state = ClientWizardState::new();
        state.name = "ABC Corporation".into();
        assert!(state.build().is_none());
        assert_eq!(state.error.as_deref(), Some("Required: Contact, Email"));

        state.contact = "John Smith".into();
        state.email = "john@abccorp.com".into();
        state.projects = "3".into();
        let client = state.build().unwrap();
        assert_eq!(client.projects, 3);
        assert_eq!(client.status, ClientStatus::Active);
    }

    #[test]
    fn enter_on_status_toggles_it() {
        let mut state = ClientWizardState::new();
        state.current_field = ClientField::Status;
        state.toggle_editing();
        assert_eq!(state.status, ClientStatus::Inactive);
        assert!(!state.editing);
    }
}
