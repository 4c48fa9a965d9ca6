use anyhow::Result;
use chrono::NaiveDate;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{BarChart, Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use freelancer_crm::aggregation::{
    dashboard_totals, revenue_series, upcoming_tasks, DashboardTotals, RevenuePoint, Snapshot, Task,
};
use freelancer_crm::models::{format_amount, DueDate};

use crate::ui::components::layout::{render_help, render_tabs, screen_chunks, status_color};
use crate::ui::Tab;

pub struct DashboardState {
    totals: DashboardTotals,
    tasks: Vec<Task>,
    revenue: Vec<RevenuePoint>,
}

impl DashboardState {
    pub fn new(snapshot: &Snapshot, hours_fallback: f64, today: NaiveDate) -> Self {
        Self {
            totals: dashboard_totals(snapshot, hours_fallback),
            tasks: upcoming_tasks(snapshot, today),
            revenue: revenue_series(&snapshot.invoices, today),
        }
    }
}

pub enum DashboardAction {
    Quit,
    Refresh,
    SwitchTab(Tab),
}

pub fn render_dashboard<B: Backend>(frame: &mut Frame<B>, state: &DashboardState) {
    let chunks = screen_chunks(frame.size());
    render_tabs(frame, chunks[0], Tab::Dashboard);

    let body = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(8)].as_ref())
        .split(chunks[1]);

    render_cards(frame, &state.totals, body[0]);

    let lower = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)].as_ref())
        .split(body[1]);

    render_tasks(frame, &state.tasks, lower[0]);
    render_revenue(frame, &state.revenue, lower[1]);

    render_help(frame, chunks[2], "<1-5> Switch screen | <R> Refresh | <Q> Quit");
}

fn render_cards<B: Backend>(frame: &mut Frame<B>, totals: &DashboardTotals, area: Rect) {
    let cards = [
        ("Total Clients", totals.clients.to_string(), Color::Blue),
        ("Active Projects", totals.active_projects.to_string(), Color::Green),
        ("Pending Invoices", format_amount(totals.pending_invoices), Color::Yellow),
        ("Hours Tracked", format!("{}h", totals.hours_tracked), Color::Magenta),
    ];

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25); 4].as_ref())
        .split(area);

    for ((title, value, color), column) in cards.into_iter().zip(columns) {
        let card = Paragraph::new(Spans::from(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )))
        .block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(card, column);
    }
}

fn render_tasks<B: Backend>(frame: &mut Frame<B>, tasks: &[Task], area: Rect) {
    let items: Vec<ListItem> = if tasks.is_empty() {
        vec![ListItem::new("Nothing scheduled")]
    } else {
        tasks
            .iter()
            .map(|task| {
                let due = match task.due {
                    DueDate::On(date) => date.format("%b %-d").to_string(),
                    DueDate::Unset => "-".to_string(),
                };
                let label = task.status.label();
                let mut spans = vec![
                    Span::styled(format!("{:<8}", due), Style::default().fg(Color::Gray)),
                    Span::raw(task.title.clone()),
                ];
                if let Some(client) = &task.client {
                    spans.push(Span::styled(format!("  {client}"), Style::default().fg(Color::DarkGray)));
                }
                spans.push(Span::styled(format!("  [{label}]"), Style::default().fg(status_color(label))));
                ListItem::new(Spans::from(spans))
            })
            .collect()
    };

    let list = List::new(items).block(Block::default().title("Upcoming Tasks").borders(Borders::ALL));
    frame.render_widget(list, area);
}

fn render_revenue<B: Backend>(frame: &mut Frame<B>, revenue: &[RevenuePoint], area: Rect) {
    let data: Vec<(&str, u64)> = revenue
        .iter()
        .map(|point| (point.name.as_str(), point.revenue.max(0.0).round() as u64))
        .collect();

    let chart = BarChart::default()
        .block(Block::default().title("Revenue Overview").borders(Borders::ALL))
        .data(&data)
        .bar_width(5)
        .bar_gap(1)
        .bar_style(Style::default().fg(Color::Magenta))
        .value_style(Style::default().fg(Color::Black).bg(Color::Magenta));

    frame.render_widget(chart, area);
}

pub fn handle_input() -> Result<Option<DashboardAction>> {
    if let Event::Key(key) = event::read()? {
        if let Some(tab) = Tab::from_key(key.code) {
            return Ok(Some(DashboardAction::SwitchTab(tab)));
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(Some(DashboardAction::Quit)),
            KeyCode::Char('r') => return Ok(Some(DashboardAction::Refresh)),
            _ => {}
        }
    }
    Ok(None)
}
