use anyhow::Result;
use chrono::{Days, NaiveDate};
use crossterm::event::{self, Event, KeyCode};
use tui::{backend::Backend, Frame};

use freelancer_crm::models::{format_amount, parse_amount, DueDate, Invoice, InvoiceId, InvoiceStatus};

use crate::ui::components::date_input::DateInputState;
use crate::ui::components::form::{edit_number, edit_text, render_form, FormField};

pub enum InvoiceWizardAction {
    Cancel,
    Save(Invoice),
}

#[derive(Clone, PartialEq, Copy)]
pub enum InvoiceField {
    Client,
    Amount,
    Status,
    Date,
    DueDate,
}

impl InvoiceField {
    const ORDER: [InvoiceField; 5] = [
        InvoiceField::Client,
        InvoiceField::Amount,
        InvoiceField::Status,
        InvoiceField::Date,
        InvoiceField::DueDate,
    ];
}

pub struct InvoiceWizardState {
    /// Next free id, computed when the wizard opens
    pub id: InvoiceId,
    pub client: String,
    pub client_names: Vec<String>,
    pub amount: String,
    pub status: InvoiceStatus,
    pub date: DateInputState,
    pub due_date: DateInputState,
    pub has_due_date: bool,
    pub current_field: InvoiceField,
    pub editing: bool,
    pub error: Option<String>,
}

impl InvoiceWizardState {
    pub fn new(id: InvoiceId, client_names: Vec<String>, today: NaiveDate) -> Self {
        let due = today.checked_add_days(Days::new(30)).unwrap_or(today);
        Self {
            id,
            client: client_names.first().cloned().unwrap_or_default(),
            client_names,
            amount: String::new(),
            status: InvoiceStatus::Draft,
            date: DateInputState::new(today),
            due_date: DateInputState::new(due),
            has_due_date: false,
            current_field: InvoiceField::Client,
            editing: false,
            error: None,
        }
    }

    pub fn next_field(&mut self) {
        let i = self.current_field as usize;
        self.current_field = InvoiceField::ORDER[(i + 1) % InvoiceField::ORDER.len()];
    }

    pub fn previous_field(&mut self) {
        let i = self.current_field as usize;
        let len = InvoiceField::ORDER.len();
        self.current_field = InvoiceField::ORDER[(i + len - 1) % len];
    }

    pub fn toggle_editing(&mut self) {
        match self.current_field {
            InvoiceField::Status => self.status = self.status.next(),
            InvoiceField::Date => {
                self.editing = !self.editing;
                self.date.toggle_editing();
            }
            InvoiceField::DueDate => {
                self.has_due_date = true;
                self.editing = !self.editing;
                self.due_date.toggle_editing();
            }
            InvoiceField::Client | InvoiceField::Amount => self.editing = !self.editing,
        }
    }

    /// Tab on the client field picks the next known client name
    pub fn cycle_client(&mut self) {
        if self.client_names.is_empty() {
            return;
        }
        let next = self
            .client_names
            .iter()
            .position(|name| *name == self.client)
            .map_or(0, |i| (i + 1) % self.client_names.len());
        self.client = self.client_names[next].clone();
    }

    pub fn edit_current_field(&mut self, key: KeyCode) {
        if !self.editing {
            return;
        }

        match self.current_field {
            InvoiceField::Client => edit_text(&mut self.client, key),
            InvoiceField::Amount => edit_number(&mut self.amount, key),
            InvoiceField::Date => self.date.handle_input(key),
            InvoiceField::DueDate => self.due_date.handle_input(key),
            InvoiceField::Status => {}
        }
    }

    pub fn build(&mut self) -> Option<Invoice> {
        let mut missing = Vec::new();
        if self.client.trim().is_empty() {
            missing.push("Client");
        }
        if self.amount.trim().is_empty() {
            missing.push("Amount");
        }
        if !missing.is_empty() {
            self.error = Some(format!("Required: {}", missing.join(", ")));
            return None;
        }

        let due_date = if self.has_due_date {
            DueDate::On(self.due_date.date)
        } else {
            DueDate::Unset
        };

        Some(Invoice {
            id: self.id,
            client: self.client.trim().to_string(),
            amount: format_amount(parse_amount(&self.amount)),
            status: self.status,
            date: self.date.date,
            due_date,
        })
    }

    fn fields(&self) -> Vec<FormField> {
        let cursor = |field: InvoiceField| {
            if self.editing && self.current_field == field { "|" } else { "" }
        };
        let due = if self.has_due_date {
            self.due_date.get_display_string()
        } else {
            format!("{} (none)", DueDate::SENTINEL)
        };
        vec![
            FormField::new("Client", format!("{}{}", self.client, cursor(InvoiceField::Client))),
            FormField::new("Amount", format!("${}{}", self.amount, cursor(InvoiceField::Amount))),
            FormField::new("Status", self.status.label()),
            FormField::new("Date", self.date.get_display_string()),
            FormField::new("Due Date", due),
        ]
    }
}

pub fn render_invoice_wizard<B: Backend>(frame: &mut Frame<B>, state: &InvoiceWizardState) {
    let help = if state.editing {
        match state.current_field {
            InvoiceField::Date | InvoiceField::DueDate => {
                "Enter - Save field | Left/Right - Switch date part | Esc - Cancel editing"
            }
            _ => "Enter - Save field | Esc - Cancel editing",
        }
    } else {
        "Enter - Edit field | Tab - Next client | X - Clear due date | Up/Down - Navigate | S - Save | Esc - Cancel"
    };

    let title = format!("Create Invoice {}", state.id);
    render_form(
        frame,
        &title,
        &state.fields(),
        state.current_field as usize,
        state.editing,
        help,
        state.error.as_deref(),
    );
}

pub fn handle_input(state: &mut InvoiceWizardState) -> Result<Option<InvoiceWizardAction>> {
    if let Event::Key(key) = event::read()? {
        match key.code {
            KeyCode::Esc => {
                if state.editing {
                    state.toggle_editing();
                } else {
                    return Ok(Some(InvoiceWizardAction::Cancel));
                }
            }
            KeyCode::Enter => state.toggle_editing(),
            KeyCode::Up if !state.editing => state.previous_field(),
            KeyCode::Down if !state.editing => state.next_field(),
            KeyCode::Tab if !state.editing && state.current_field == InvoiceField::Client => {
                state.cycle_client();
            }
            KeyCode::Char('x') if !state.editing && state.current_field == InvoiceField::DueDate => {
                state.has_due_date = false;
            }
            KeyCode::Char('s') if !state.editing => {
                if let Some(invoice) = state.build() {
                    return Ok(Some(InvoiceWizardAction::Save(invoice)));
                }
            }
            _ if state.editing => state.edit_current_field(key.code),
            _ => {}
        }
    }

    Ok(None)
}
