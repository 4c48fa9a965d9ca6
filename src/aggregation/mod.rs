//! Dashboard figures derived from the four collections.
//!
//! Nothing here is cached: every query folds over a [`Snapshot`] taken from
//! current storage, so the figures can never go stale relative to it.

use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;

use crate::models::{Client, DueDate, Event, Invoice, InvoiceStatus, Project, ProjectStatus};
use crate::storage::{KeyValueStore, Storage};

/// Number of entries in the upcoming-task feed
pub const UPCOMING_TASK_LIMIT: usize = 5;

/// Number of trailing months in the revenue series
pub const REVENUE_MONTHS: u32 = 6;

/// The four collections as read at one point in time
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub clients: Vec<Client>,
    pub projects: Vec<Project>,
    pub invoices: Vec<Invoice>,
    pub events: Vec<Event>,
}

impl Snapshot {
    pub async fn load<S: KeyValueStore>(storage: &Storage<S>) -> Self {
        Self {
            clients: storage.clients().load_all().await,
            projects: storage.projects().load_all().await,
            invoices: storage.invoices().load_all().await,
            events: storage.events().load_all().await,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardTotals {
    pub clients: usize,
    pub active_projects: usize,
    pub pending_invoices: f64,
    pub hours_tracked: f64,
}

/// Headline numbers for the dashboard cards.
///
/// `hours_fallback` is shown when no project has logged any hours.
pub fn dashboard_totals(snapshot: &Snapshot, hours_fallback: f64) -> DashboardTotals {
    let active_projects = snapshot
        .projects
        .iter()
        .filter(|project| project.status == ProjectStatus::InProgress)
        .count();

    let pending_invoices = snapshot
        .invoices
        .iter()
        .filter(|invoice| invoice.status == InvoiceStatus::Pending)
        .map(Invoice::amount_value)
        .sum();

    let logged: f64 = snapshot.projects.iter().map(Project::hours).sum();
    let hours_tracked = if logged == 0.0 { hours_fallback } else { logged };

    DashboardTotals {
        clients: snapshot.clients.len(),
        active_projects,
        pending_invoices,
        hours_tracked,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    NotStarted,
    InProgress,
    Completed,
    Overdue,
}

impl TaskStatus {
    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::NotStarted => "Not Started",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
            TaskStatus::Overdue => "Overdue",
        }
    }
}

impl From<ProjectStatus> for TaskStatus {
    fn from(status: ProjectStatus) -> Self {
        match status {
            ProjectStatus::NotStarted => TaskStatus::NotStarted,
            ProjectStatus::InProgress => TaskStatus::InProgress,
            ProjectStatus::Completed => TaskStatus::Completed,
            ProjectStatus::Overdue => TaskStatus::Overdue,
        }
    }
}

impl From<InvoiceStatus> for TaskStatus {
    fn from(status: InvoiceStatus) -> Self {
        match status {
            InvoiceStatus::Paid => TaskStatus::Completed,
            InvoiceStatus::Pending => TaskStatus::InProgress,
            InvoiceStatus::Overdue => TaskStatus::Overdue,
            InvoiceStatus::Draft => TaskStatus::NotStarted,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskSource {
    Project,
    Event,
    Invoice,
}

/// One line of the upcoming-task feed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Task {
    pub title: String,
    pub client: Option<String>,
    /// `Unset` sorts after every dated task (see the `Ord` note on [`DueDate`])
    pub due: DueDate,
    pub status: TaskStatus,
    pub source: TaskSource,
}

/// Projects, events and invoices merged into one feed, soonest first.
///
/// The sort is stable, so tasks due the same day keep merge order
/// (projects, then events, then invoices). Only the first
/// [`UPCOMING_TASK_LIMIT`] tasks are returned.
pub fn upcoming_tasks(snapshot: &Snapshot, today: NaiveDate) -> Vec<Task> {
    let projects = snapshot.projects.iter().map(|project| Task {
        title: format!("Project: {}", project.name),
        client: Some(project.client.clone()),
        due: DueDate::On(project.deadline),
        status: project.status.into(),
        source: TaskSource::Project,
    });

    let events = snapshot.events.iter().map(|event| Task {
        title: event.title.clone(),
        client: None,
        due: DueDate::On(event.date),
        status: if event.date < today {
            TaskStatus::Completed
        } else {
            TaskStatus::NotStarted
        },
        source: TaskSource::Event,
    });

    let invoices = snapshot.invoices.iter().map(|invoice| Task {
        title: format!("Invoice #{}", invoice.id),
        client: Some(invoice.client.clone()),
        due: invoice.due_date,
        status: invoice.status.into(),
        source: TaskSource::Invoice,
    });

    let mut tasks: Vec<Task> = projects.chain(events).chain(invoices).collect();
    tasks.sort_by_key(|task| task.due);
    tasks.truncate(UPCOMING_TASK_LIMIT);
    tasks
}

/// Revenue for one calendar month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenuePoint {
    /// Short month name, e.g. "Jan"
    pub name: String,
    pub year: i32,
    pub month: u32,
    pub revenue: f64,
    /// Not tracked yet; always zero
    pub expenses: f64,
}

/// Paid revenue for the trailing [`REVENUE_MONTHS`] months, oldest first.
///
/// The current month is the last entry. Paid invoices dated outside the
/// window are dropped.
pub fn revenue_series(invoices: &[Invoice], today: NaiveDate) -> Vec<RevenuePoint> {
    let this_month = today.with_day(1).unwrap_or(today);

    let mut series: Vec<RevenuePoint> = (0..REVENUE_MONTHS)
        .rev()
        .filter_map(|back| this_month.checked_sub_months(Months::new(back)))
        .map(|start| RevenuePoint {
            name: start.format("%b").to_string(),
            year: start.year(),
            month: start.month(),
            revenue: 0.0,
            expenses: 0.0,
        })
        .collect();

    for invoice in invoices.iter().filter(|i| i.status == InvoiceStatus::Paid) {
        let bucket = series
            .iter_mut()
            .find(|point| point.year == invoice.date.year() && point.month == invoice.date.month());
        if let Some(point) = bucket {
            point.revenue += invoice.amount_value();
        }
    }

    series
}
