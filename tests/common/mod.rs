#![allow(dead_code)]

use chrono::NaiveDate;

use freelancer_crm::models::{
    Client, ClientStatus, DueDate, Event, EventTime, Invoice, InvoiceId, InvoiceStatus, Project,
    ProjectStatus,
};
use freelancer_crm::storage::{MemoryStore, Storage};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Storage over a fresh in-memory store with every collection seeded
pub async fn memory_storage() -> Storage<MemoryStore> {
    let storage = Storage::new(MemoryStore::new());
    storage.seed_collections().await;
    storage
}

pub fn client(id: i64, name: &str) -> Client {
    Client {
        id,
        name: name.to_string(),
        contact: "John Smith".to_string(),
        email: format!("hello@{}.com", name.to_lowercase().replace(' ', "")),
        phone: "(555) 123-4567".to_string(),
        projects: 1,
        status: ClientStatus::Active,
    }
}

pub fn project(id: i64, name: &str, deadline: NaiveDate, status: ProjectStatus) -> Project {
    Project::new(id, name, "ABC Corporation", deadline, status)
}

pub fn invoice(id: u32, amount: &str, status: InvoiceStatus, date: NaiveDate, due: Option<NaiveDate>) -> Invoice {
    Invoice {
        id: InvoiceId(id),
        client: "ABC Corporation".to_string(),
        amount: amount.to_string(),
        status,
        date,
        due_date: DueDate::from(due),
    }
}

pub fn event(id: i64, title: &str, date: NaiveDate) -> Event {
    Event::new(id, title, date, EventTime::AllDay)
}
