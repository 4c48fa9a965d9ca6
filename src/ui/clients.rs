use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use freelancer_crm::models::Client;

use crate::ui::components::form::edit_text;
use crate::ui::components::layout::{highlight_style, render_help, render_tabs, screen_chunks, status_color};
use crate::ui::{step_selection, Tab};

// Represents the state of the clients table
pub struct ClientsState {
    clients: Vec<Client>,
    table_state: TableState,
    query: String,
    searching: bool,
}

impl ClientsState {
    pub fn new(clients: Vec<Client>, query: String) -> Self {
        let mut table_state = TableState::default();
        if !clients.is_empty() {
            table_state.select(Some(0));
        }

        Self {
            clients,
            table_state,
            query,
            searching: false,
        }
    }

    pub fn next(&mut self) {
        let i = step_selection(self.table_state.selected(), self.clients.len(), true);
        self.table_state.select(i);
    }

    pub fn previous(&mut self) {
        let i = step_selection(self.table_state.selected(), self.clients.len(), false);
        self.table_state.select(i);
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Swap in a new result set, keeping search mode as it was
    pub fn set_clients(&mut self, clients: Vec<Client>) {
        let searching = self.searching;
        *self = Self::new(clients, std::mem::take(&mut self.query));
        self.searching = searching;
    }
}

pub enum ClientAction {
    Quit,
    SwitchTab(Tab),
    NewClient,
    Search(String),
}

pub fn render_clients<B: Backend>(frame: &mut Frame<B>, state: &mut ClientsState) {
    let chunks = screen_chunks(frame.size());
    render_tabs(frame, chunks[0], Tab::Clients);

    let body = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)].as_ref())
        .split(chunks[1]);

    let search_style = if state.searching {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let cursor = if state.searching { "|" } else { "" };
    let search = Paragraph::new(format!("{}{}", state.query, cursor))
        .style(search_style)
        .block(Block::default().title("Search clients").borders(Borders::ALL));
    frame.render_widget(search, body[0]);

    let header_cells = ["Name", "Contact", "Email", "Phone", "Projects", "Status"]
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow)));
    let header = Row::new(header_cells).height(1).bottom_margin(1);

    let rows = state.clients.iter().map(|client| {
        let status = client.status.label();
        Row::new(vec![
            Cell::from(format!("{} ({})", client.name, client.initials())),
            Cell::from(client.contact.as_str()),
            Cell::from(client.email.as_str()),
            Cell::from(client.phone.as_str()),
            Cell::from(client.projects.to_string()),
            Cell::from(status).style(Style::default().fg(status_color(status))),
        ])
    });

    let table = Table::new(rows)
        .header(header)
        .block(Block::default().title("Clients").borders(Borders::ALL))
        .highlight_style(highlight_style())
        .widths(&[
            Constraint::Percentage(22),
            Constraint::Percentage(18),
            Constraint::Percentage(24),
            Constraint::Percentage(16),
            Constraint::Percentage(8),
            Constraint::Percentage(12),
        ]);

    frame.render_stateful_widget(table, body[1], &mut state.table_state);

    let help = if state.searching {
        "Type to filter | <Enter>/<Esc> Done"
    } else {
        "<N> Add Client | </> Search | <Up/Down> Select | <1-5> Switch screen | <Q> Quit"
    };
    render_help(frame, chunks[2], help);
}

pub fn handle_input(state: &mut ClientsState) -> Result<Option<ClientAction>> {
    if let Event::Key(key) = event::read()? {
        if state.searching {
            match key.code {
                KeyCode::Enter | KeyCode::Esc => state.searching = false,
                code => {
                    edit_text(&mut state.query, code);
                    return Ok(Some(ClientAction::Search(state.query.clone())));
                }
            }
            return Ok(None);
        }

        if let Some(tab) = Tab::from_key(key.code) {
            return Ok(Some(ClientAction::SwitchTab(tab)));
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(Some(ClientAction::Quit)),
            KeyCode::Char('n') => return Ok(Some(ClientAction::NewClient)),
            KeyCode::Char('/') => state.searching = true,
            KeyCode::Down => state.next(),
            KeyCode::Up => state.previous(),
            _ => {}
        }
    }
    Ok(None)
}
