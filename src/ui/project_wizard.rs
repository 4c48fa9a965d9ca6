use anyhow::Result;
use chrono::NaiveDate;
use crossterm::event::{self, Event, KeyCode};
use tui::{backend::Backend, Frame};

use freelancer_crm::models::{timestamp_id, Project, ProjectStatus};

use crate::ui::components::date_input::DateInputState;
use crate::ui::components::form::{edit_number, edit_text, render_form, FormField};

pub enum ProjectWizardAction {
    Cancel,
    Save(Project),
}

#[derive(Clone, PartialEq, Copy)]
pub enum ProjectField {
    Name,
    Client,
    Deadline,
    Status,
    Hours,
}

impl ProjectField {
    const ORDER: [ProjectField; 5] = [
        ProjectField::Name,
        ProjectField::Client,
        ProjectField::Deadline,
        ProjectField::Status,
        ProjectField::Hours,
    ];
}

pub struct ProjectWizardState {
    pub name: String,
    /// Known client names; the project stores the chosen name, not an id
    pub client_names: Vec<String>,
    pub client: Option<usize>,
    pub deadline: DateInputState,
    pub status: ProjectStatus,
    pub hours: String,
    pub current_field: ProjectField,
    pub editing: bool,
    pub error: Option<String>,
}

impl ProjectWizardState {
    pub fn new(client_names: Vec<String>, today: NaiveDate) -> Self {
        let client = if client_names.is_empty() { None } else { Some(0) };
        Self {
            name: String::new(),
            client_names,
            client,
            deadline: DateInputState::new(today),
            status: ProjectStatus::NotStarted,
            hours: String::new(),
            current_field: ProjectField::Name,
            editing: false,
            error: None,
        }
    }

    pub fn next_field(&mut self) {
        let i = self.current_field as usize;
        self.current_field = ProjectField::ORDER[(i + 1) % ProjectField::ORDER.len()];
    }

    pub fn previous_field(&mut self) {
        let i = self.current_field as usize;
        let len = ProjectField::ORDER.len();
        self.current_field = ProjectField::ORDER[(i + len - 1) % len];
    }

    /// Enter either cycles a choice field or starts/stops editing a typed one
    pub fn toggle_editing(&mut self) {
        match self.current_field {
            ProjectField::Client => {
                if !self.client_names.is_empty() {
                    let next = self.client.map_or(0, |i| (i + 1) % self.client_names.len());
                    self.client = Some(next);
                }
            }
            ProjectField::Status => self.status = self.status.next(),
            ProjectField::Deadline => {
                self.editing = !self.editing;
                self.deadline.toggle_editing();
            }
            ProjectField::Name | ProjectField::Hours => self.editing = !self.editing,
        }
    }

    pub fn edit_current_field(&mut self, key: KeyCode) {
        if !self.editing {
            return;
        }

        match self.current_field {
            ProjectField::Name => edit_text(&mut self.name, key),
            ProjectField::Deadline => self.deadline.handle_input(key),
            ProjectField::Hours => edit_number(&mut self.hours, key),
            ProjectField::Client | ProjectField::Status => {}
        }
    }

    fn client_name(&self) -> Option<&str> {
        self.client
            .and_then(|i| self.client_names.get(i))
            .map(String::as_str)
    }

    pub fn build(&mut self) -> Option<Project> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("Name");
        }
        if self.client_name().is_none() {
            missing.push("Client (add a client first)");
        }
        if !missing.is_empty() {
            self.error = Some(format!("Required: {}", missing.join(", ")));
            return None;
        }

        let client = self.client_name().unwrap_or_default().to_string();
        let mut project = Project::new(
            timestamp_id(),
            self.name.trim(),
            client,
            self.deadline.date,
            self.status,
        );
        if let Ok(hours) = self.hours.parse::<f64>() {
            project = project.with_hours(hours);
        }
        Some(project)
    }

    fn fields(&self) -> Vec<FormField> {
        let name_cursor = if self.editing && self.current_field == ProjectField::Name { "|" } else { "" };
        let hours_cursor = if self.editing && self.current_field == ProjectField::Hours { "|" } else { "" };
        vec![
            FormField::new("Name", format!("{}{}", self.name, name_cursor)),
            FormField::new("Client", self.client_name().unwrap_or("No clients yet")),
            FormField::new("Deadline", self.deadline.get_display_string()),
            FormField::new(
                "Status",
                format!("{} ({}%)", self.status.label(), self.status.progress()),
            ),
            FormField::new("Hours logged", format!("{}{}", self.hours, hours_cursor)),
        ]
    }
}

pub fn render_project_wizard<B: Backend>(frame: &mut Frame<B>, state: &ProjectWizardState) {
    let help = if state.editing {
        match state.current_field {
            ProjectField::Deadline => "Enter - Save field | Left/Right - Switch date part | Esc - Cancel editing",
            _ => "Enter - Save field | Esc - Cancel editing",
        }
    } else {
        "Enter - Edit field / next choice | Up/Down - Navigate fields | S - Save project | Esc - Cancel"
    };

    render_form(
        frame,
        "Add Project",
        &state.fields(),
        state.current_field as usize,
        state.editing,
        help,
        state.error.as_deref(),
    );
}

pub fn handle_input(state: &mut ProjectWizardState) -> Result<Option<ProjectWizardAction>> {
    if let Event::Key(key) = event::read()? {
        match key.code {
            KeyCode::Esc => {
                if state.editing {
                    state.toggle_editing();
                } else {
                    return Ok(Some(ProjectWizardAction::Cancel));
                }
            }
            KeyCode::Enter => state.toggle_editing(),
            KeyCode::Up if !state.editing => state.previous_field(),
            KeyCode::Down if !state.editing => state.next_field(),
            KeyCode::Char('s') if !state.editing => {
                if let Some(project) = state.build() {
                    return Ok(Some(ProjectWizardAction::Save(project)));
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

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 1).unwrap()
    }

    #[test]
    fn needs_a_client_to_pick() {
        let mut state = ProjectWizardState::new(Vec::new(), today());
        state.name = "Website".into();
        assert!(state.build().is_none());
        assert!(state.error.unwrap().contains("Client"));
    }

    #[test]
    fn builds_with_progress_from_status() {
        let mut state = ProjectWizardState::new(vec!["ABC".into(), "XYZ".into()], today());
        state.name = "Website".into();
        state.current_field = ProjectField::Client;
        state.toggle_editing();
        state.current_field = ProjectField::Status;
        state.toggle_editing();
        state.hours = "12.5".into();

        let project = state.build().unwrap();
        assert_eq!(project.client, "XYZ");
        assert_eq!(project.status, ProjectStatus::InProgress);
        assert_eq!(project.progress, 50);
        assert_eq!(project.hours_logged, Some(12.5));
        assert_eq!(project.deadline, today());
    }
}
