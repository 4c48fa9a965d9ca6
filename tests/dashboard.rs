mod common;

use common::{client, date, event, invoice, memory_storage, project};

use freelancer_crm::aggregation::{
    dashboard_totals, revenue_series, upcoming_tasks, Snapshot, TaskSource, TaskStatus,
};
use freelancer_crm::config::DEFAULT_HOURS_FALLBACK;
use freelancer_crm::models::{DueDate, InvoiceStatus, ProjectStatus};

#[tokio::test]
async fn empty_store_shows_zeroes_and_fallback_hours() {
    let storage = memory_storage().await;
    let snapshot = Snapshot::load(&storage).await;

    let totals = dashboard_totals(&snapshot, DEFAULT_HOURS_FALLBACK);
    assert_eq!(totals.clients, 0);
    assert_eq!(totals.active_projects, 0);
    assert_eq!(totals.pending_invoices, 0.0);
    assert_eq!(totals.hours_tracked, 164.0);

    assert!(upcoming_tasks(&snapshot, date(2025, 5, 15)).is_empty());

    let series = revenue_series(&snapshot.invoices, date(2025, 5, 15));
    assert_eq!(series.len(), 6);
    assert!(series.iter().all(|point| point.revenue == 0.0 && point.expenses == 0.0));
}

#[tokio::test]
async fn dashboard_follows_writes() {
    let storage = memory_storage().await;
    let today = date(2025, 5, 15);

    storage.clients().add(client(1, "ABC Corporation")).await;
    storage.clients().add(client(2, "XYZ Ltd")).await;
    storage
        .projects()
        .add(project(1, "Website", date(2025, 5, 25), ProjectStatus::InProgress).with_hours(12.5))
        .await;
    storage
        .projects()
        .add(project(2, "Logo", date(2025, 6, 1), ProjectStatus::NotStarted))
        .await;
    storage
        .invoices()
        .add(invoice(1, "$2,400", InvoiceStatus::Pending, date(2025, 5, 1), Some(date(2025, 5, 20))))
        .await;
    storage
        .invoices()
        .add(invoice(2, "$2,600.50", InvoiceStatus::Pending, date(2025, 5, 2), None))
        .await;
    storage
        .invoices()
        .add(invoice(3, "$1,000", InvoiceStatus::Paid, date(2025, 4, 10), Some(date(2025, 4, 30))))
        .await;
    storage.events().add(event(1, "Kickoff", date(2025, 5, 10))).await;

    let snapshot = Snapshot::load(&storage).await;

    let totals = dashboard_totals(&snapshot, DEFAULT_HOURS_FALLBACK);
    assert_eq!(totals.clients, 2);
    assert_eq!(totals.active_projects, 1);
    assert_eq!(totals.pending_invoices, 5000.50);
    assert_eq!(totals.hours_tracked, 12.5);

    let tasks = upcoming_tasks(&snapshot, today);
    assert_eq!(tasks.len(), 5);
    let titles: Vec<&str> = tasks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "Invoice #INV-003",
            "Kickoff",
            "Invoice #INV-001",
            "Project: Website",
            "Project: Logo",
        ]
    );
    assert_eq!(tasks[0].status, TaskStatus::Completed);
    assert_eq!(tasks[1].status, TaskStatus::Completed);
    assert_eq!(tasks[1].source, TaskSource::Event);
    assert_eq!(tasks[2].status, TaskStatus::InProgress);
    assert_eq!(tasks[4].status, TaskStatus::NotStarted);
    assert!(tasks.iter().all(|t| t.due != DueDate::Unset));

    let series = revenue_series(&snapshot.invoices, today);
    let april = series.iter().find(|p| p.name == "Apr").unwrap();
    assert_eq!(april.revenue, 1000.0);
    assert_eq!(series.last().unwrap().name, "May");
    assert_eq!(series.iter().map(|p| p.revenue).sum::<f64>(), 1000.0);
}
