use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::Constraint,
    style::{Color, Style},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use freelancer_crm::models::Project;

use crate::ui::components::layout::{highlight_style, render_help, render_tabs, screen_chunks, status_color};
use crate::ui::{step_selection, Tab};

pub struct ProjectsState {
    projects: Vec<Project>,
    table_state: TableState,
}

impl ProjectsState {
    pub fn new(projects: Vec<Project>) -> Self {
        let mut table_state = TableState::default();
        if !projects.is_empty() {
            table_state.select(Some(0));
        }

        Self {
            projects,
            table_state,
        }
    }

    pub fn next(&mut self) {
        let i = step_selection(self.table_state.selected(), self.projects.len(), true);
        self.table_state.select(i);
    }

    pub fn previous(&mut self) {
        let i = step_selection(self.table_state.selected(), self.projects.len(), false);
        self.table_state.select(i);
    }
}

pub enum ProjectAction {
    Quit,
    SwitchTab(Tab),
    NewProject,
}

/// Ten-cell text bar followed by the percentage
fn progress_bar(progress: u8) -> String {
    let filled = usize::from(progress.min(100)) / 10;
    format!("{}{} {}%", "█".repeat(filled), "░".repeat(10 - filled), progress)
}

pub fn render_projects<B: Backend>(frame: &mut Frame<B>, state: &mut ProjectsState) {
    let chunks = screen_chunks(frame.size());
    render_tabs(frame, chunks[0], Tab::Projects);

    let header_cells = ["Project", "Client", "Deadline", "Status", "Hours", "Progress"]
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow)));
    let header = Row::new(header_cells).height(1).bottom_margin(1);

    let rows = state.projects.iter().map(|project| {
        let status = project.status.label();
        Row::new(vec![
            Cell::from(project.name.as_str()),
            Cell::from(project.client.as_str()),
            Cell::from(project.deadline.format("%b %-d, %Y").to_string()),
            Cell::from(status).style(Style::default().fg(status_color(status))),
            Cell::from(format!("{}", project.hours())),
            Cell::from(progress_bar(project.progress)),
        ])
    });

    let table = Table::new(rows)
        .header(header)
        .block(Block::default().title("Projects").borders(Borders::ALL))
        .highlight_style(highlight_style())
        .widths(&[
            Constraint::Percentage(22),
            Constraint::Percentage(20),
            Constraint::Percentage(15),
            Constraint::Percentage(13),
            Constraint::Percentage(8),
            Constraint::Percentage(22),
        ]);

    frame.render_stateful_widget(table, chunks[1], &mut state.table_state);

    render_help(
        frame,
        chunks[2],
        "<N> Add Project | <Up/Down> Select | <1-5> Switch screen | <Q> Quit",
    );
}

pub fn handle_input(state: &mut ProjectsState) -> Result<Option<ProjectAction>> {
    if let Event::Key(key) = event::read()? {
        if let Some(tab) = Tab::from_key(key.code) {
            return Ok(Some(ProjectAction::SwitchTab(tab)));
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(Some(ProjectAction::Quit)),
            KeyCode::Char('n') => return Ok(Some(ProjectAction::NewProject)),
            KeyCode::Down => state.next(),
            KeyCode::Up => state.previous(),
            _ => {}
        }
    }
    Ok(None)
}
