use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use freelancer_crm::models::{DueDate, Invoice};

use crate::ui::components::form::edit_text;
use crate::ui::components::layout::{highlight_style, render_help, render_tabs, screen_chunks, status_color};
use crate::ui::{step_selection, Tab};

// Represents the state of the invoice table screen
pub struct InvoicesState {
    invoices: Vec<Invoice>,
    table_state: TableState,
    query: String,
    searching: bool,
    /// One-off message shown in place of the help line until the next key
    notice: Option<String>,
}

impl InvoicesState {
    pub fn new(invoices: Vec<Invoice>, query: String) -> Self {
        let mut table_state = TableState::default();
        if !invoices.is_empty() {
            table_state.select(Some(0));
        }

        Self {
            invoices,
            table_state,
            query,
            searching: false,
            notice: None,
        }
    }

    pub fn next(&mut self) {
        let i = step_selection(self.table_state.selected(), self.invoices.len(), true);
        self.table_state.select(i);
    }

    pub fn previous(&mut self) {
        let i = step_selection(self.table_state.selected(), self.invoices.len(), false);
        self.table_state.select(i);
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn set_invoices(&mut self, invoices: Vec<Invoice>) {
        let searching = self.searching;
        *self = Self::new(invoices, std::mem::take(&mut self.query));
        self.searching = searching;
    }
}

pub enum InvoiceAction {
    Quit,
    SwitchTab(Tab),
    NewInvoice,
    Search(String),
}

pub fn render_invoices<B: Backend>(frame: &mut Frame<B>, state: &mut InvoicesState) {
    let chunks = screen_chunks(frame.size());
    render_tabs(frame, chunks[0], Tab::Invoices);

    let body = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)].as_ref())
        .split(chunks[1]);

    let cursor = if state.searching { "|" } else { "" };
    let search = Paragraph::new(format!("{}{}", state.query, cursor))
        .style(if state.searching {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        })
        .block(Block::default().title("Search invoices").borders(Borders::ALL));
    frame.render_widget(search, body[0]);

    // Define the header cells
    let header_cells = ["Invoice", "Client", "Amount", "Date", "Due Date", "Status"]
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow)));
    let header = Row::new(header_cells).height(1).bottom_margin(1);

    let rows = state.invoices.iter().map(|invoice| {
        let due_date = match invoice.due_date {
            DueDate::On(date) => date.format("%b %-d, %Y").to_string(),
            DueDate::Unset => DueDate::SENTINEL.to_string(),
        };
        let status = invoice.status.label();

        Row::new(vec![
            Cell::from(invoice.id.to_string()),
            Cell::from(invoice.client.as_str()),
            Cell::from(invoice.amount.as_str()),
            Cell::from(invoice.date.format("%b %-d, %Y").to_string()),
            Cell::from(due_date),
            Cell::from(status).style(Style::default().fg(status_color(status))),
        ])
        .height(1)
    });

    let table = Table::new(rows)
        .header(header)
        .block(Block::default().title("Invoices").borders(Borders::ALL))
        .highlight_style(highlight_style())
        .widths(&[
            Constraint::Percentage(12),
            Constraint::Percentage(26),
            Constraint::Percentage(14),
            Constraint::Percentage(16),
            Constraint::Percentage(16),
            Constraint::Percentage(16),
        ]);

    frame.render_stateful_widget(table, body[1], &mut state.table_state);

    let help = if let Some(notice) = state.notice() {
        notice
    } else if state.searching {
        "Type to filter by id or client | <Enter>/<Esc> Done"
    } else {
        "<N> Create Invoice | </> Search | <Up/Down> Select | <1-5> Switch screen | <Q> Quit"
    };
    render_help(frame, chunks[2], help);
}

pub fn handle_input(state: &mut InvoicesState) -> Result<Option<InvoiceAction>> {
    if let Event::Key(key) = event::read()? {
        state.notice = None;
        if state.searching {
            match key.code {
                KeyCode::Enter | KeyCode::Esc => state.searching = false,
                code => {
                    edit_text(&mut state.query, code);
                    return Ok(Some(InvoiceAction::Search(state.query.clone())));
                }
            }
            return Ok(None);
        }

        if let Some(tab) = Tab::from_key(key.code) {
            return Ok(Some(InvoiceAction::SwitchTab(tab)));
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(Some(InvoiceAction::Quit)),
            KeyCode::Char('n') => return Ok(Some(InvoiceAction::NewInvoice)),
            KeyCode::Char('/') => state.searching = true,
            KeyCode::Down => state.next(),
            KeyCode::Up => state.previous(),
            _ => {}
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refreshing_the_list_clears_the_notice() {
        let mut state = InvoicesState::new(Vec::new(), String::new());
        state.set_notice("No invoice numbers left to assign");
        assert_eq!(state.notice(), Some("No invoice numbers left to assign"));

        state.set_invoices(Vec::new());
        assert_eq!(state.notice(), None);
    }
}
