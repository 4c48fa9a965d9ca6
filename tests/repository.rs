mod common;

use common::{client, date, event, invoice, memory_storage, project};

use freelancer_crm::models::{InvoiceId, InvoiceStatus, ProjectStatus};
use freelancer_crm::storage::{Collection, MemoryStore, Storage};

#[tokio::test]
async fn added_clients_come_first() {
    let storage = memory_storage().await;
    let repo = storage.clients();

    repo.add(client(1, "ABC Corporation")).await;
    let in_memory = repo.add(client(2, "XYZ Ltd")).await;

    let names: Vec<String> = repo.load_all().await.into_iter().map(|c| c.name).collect();
    assert_eq!(names, vec!["XYZ Ltd", "ABC Corporation"]);
    assert_eq!(in_memory, repo.load_all().await);
}

#[tokio::test]
async fn every_collection_prepends() {
    let storage = memory_storage().await;

    storage.projects().add(project(1, "Website", date(2025, 6, 1), ProjectStatus::InProgress)).await;
    storage.projects().add(project(2, "Logo", date(2025, 7, 1), ProjectStatus::NotStarted)).await;
    let projects = storage.projects().load_all().await;
    assert_eq!(projects[0].name, "Logo");
    assert_eq!(projects[1].progress, 50);

    storage.invoices().add(invoice(1, "$100", InvoiceStatus::Paid, date(2025, 5, 1), None)).await;
    storage.invoices().add(invoice(2, "$200", InvoiceStatus::Draft, date(2025, 5, 2), None)).await;
    let ids: Vec<String> = storage
        .invoices()
        .load_all()
        .await
        .iter()
        .map(|i| i.id.to_string())
        .collect();
    assert_eq!(ids, vec!["INV-002", "INV-001"]);

    storage.events().add(event(1, "Kickoff", date(2025, 5, 20))).await;
    storage.events().add(event(2, "Review", date(2025, 5, 10))).await;
    let titles: Vec<String> = storage.events().load_all().await.into_iter().map(|e| e.title).collect();
    assert_eq!(titles, vec!["Review", "Kickoff"]);
}

#[tokio::test]
async fn stored_json_uses_wire_names() {
    let storage = memory_storage().await;
    storage
        .invoices()
        .add(invoice(7, "$2,400", InvoiceStatus::Pending, date(2025, 5, 1), None))
        .await;
    storage.events().add(event(3, "Holiday", date(2025, 5, 2))).await;

    let raw = storage.store().raw(Collection::Invoices.key()).unwrap();
    assert!(raw.contains(r#""id":"INV-007""#));
    assert!(raw.contains(r#""dueDate":"-""#));
    assert!(raw.contains(r#""amount":"$2,400""#));

    let raw = storage.store().raw(Collection::Events.key()).unwrap();
    assert!(raw.contains(r#""time":"All day""#));
    assert!(raw.contains(r#""displayDate":"May 2, 2025""#));
}

#[tokio::test]
async fn removing_an_event_persists() {
    let storage = memory_storage().await;
    for (id, title) in [(1, "A"), (2, "B"), (3, "C")] {
        storage.events().add(event(id, title, date(2025, 5, 1))).await;
    }

    let remaining = storage.events().remove(2).await;
    let titles: Vec<&str> = remaining.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["C", "A"]);
    assert_eq!(storage.events().load_all().await, remaining);

    // Unknown ids leave the collection untouched
    assert_eq!(storage.events().remove(42).await, remaining);
}

#[tokio::test]
async fn search_filters_in_stored_order() {
    let storage = memory_storage().await;
    storage.clients().add(client(1, "ABC Corporation")).await;
    storage.clients().add(client(2, "XYZ Ltd")).await;
    storage.clients().add(client(3, "Abc Studio")).await;

    let found: Vec<String> = storage
        .clients()
        .search("abc")
        .await
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(found, vec!["Abc Studio", "ABC Corporation"]);
    assert_eq!(storage.clients().search("").await.len(), 3);

    storage.invoices().add(invoice(1, "$10", InvoiceStatus::Paid, date(2025, 1, 1), None)).await;
    assert_eq!(storage.invoices().search("inv-001").await.len(), 1);
    assert!(storage.invoices().search("nobody").await.is_empty());
}

#[tokio::test]
async fn client_names_are_distinct() {
    let storage = memory_storage().await;
    storage.clients().add(client(1, "ABC Corporation")).await;
    storage.clients().add(client(2, "XYZ Ltd")).await;
    storage.clients().add(client(3, "ABC Corporation")).await;

    assert_eq!(storage.clients().names().await, vec!["ABC Corporation", "XYZ Ltd"]);
}

#[tokio::test]
async fn invoice_ids_follow_the_maximum() {
    let storage = memory_storage().await;
    assert_eq!(storage.invoices().last_id().await.to_string(), "INV-000");
    assert_eq!(storage.invoices().next_id().await, Some(InvoiceId(1)));

    for id in [1, 7, 3] {
        storage.invoices().add(invoice(id, "$1", InvoiceStatus::Draft, date(2025, 5, 1), None)).await;
    }
    assert_eq!(storage.invoices().last_id().await.to_string(), "INV-007");

    let next = storage.invoices().next_id().await.unwrap();
    storage.invoices().add(invoice(next.number(), "$1", InvoiceStatus::Draft, date(2025, 5, 1), None)).await;
    assert_eq!(storage.invoices().last_id().await.to_string(), "INV-008");
}

#[tokio::test]
async fn save_all_replaces_the_collection() {
    let storage = memory_storage().await;
    storage.clients().add(client(1, "Old")).await;

    assert!(storage.clients().save_all(&[client(5, "New")]).await);
    let clients = storage.clients().load_all().await;
    assert_eq!(clients.len(), 1);
    assert_eq!(clients[0].id, 5);
}

#[tokio::test]
async fn failed_add_still_returns_the_new_list() {
    let storage = Storage::new(MemoryStore::with_quota(8));
    storage.seed_collections().await;

    let in_memory = storage.clients().add(client(1, "ABC Corporation")).await;
    assert_eq!(in_memory.len(), 1);
    assert!(storage.clients().load_all().await.is_empty());
}

#[tokio::test]
async fn malformed_collection_reads_as_empty() {
    let store = MemoryStore::new();
    store.insert_raw(Collection::Projects.key(), "[{broken");
    store.insert_raw(
        Collection::Clients.key(),
        r#"[{"id":1,"name":"Kept","contact":"A","email":"a@b.c","phone":"1"},{"name":"No id"}]"#,
    );
    let storage = Storage::new(store);

    assert!(storage.projects().load_all().await.is_empty());
    let clients = storage.clients().load_all().await;
    assert_eq!(clients.len(), 1);
    assert_eq!(clients[0].name, "Kept");
}

#[tokio::test]
async fn concurrent_adds_are_not_lost() {
    let storage = std::sync::Arc::new(memory_storage().await);

    let mut handles = Vec::new();
    for id in 0..20 {
        let storage = storage.clone();
        handles.push(tokio::spawn(async move {
            storage.events().add(event(id, "Parallel", date(2025, 5, 1))).await;
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(storage.events().load_all().await.len(), 20);
}

#[tokio::test]
async fn next_id_is_none_once_ids_run_out() {
    let storage = memory_storage().await;
    storage
        .invoices()
        .add(invoice(u32::MAX, "$1", InvoiceStatus::Draft, date(2025, 5, 1), None))
        .await;

    assert_eq!(storage.invoices().last_id().await.to_string(), "INV-4294967295");
    assert_eq!(storage.invoices().next_id().await, None);
}

const UNREADABLE_EVENT: &str =
    r#"{"id":1,"title":"Client Meeting","date":"2025-05-20","displayDate":"May 20, 2025","time":"10:00 AM - 11:00 AM"}"#;

#[tokio::test]
async fn add_keeps_records_it_cannot_read() {
    let storage = memory_storage().await;
    storage
        .store()
        .insert_raw(Collection::Events.key(), &format!("[{UNREADABLE_EVENT}]"));

    let in_memory = storage.events().add(event(2, "New", date(2025, 5, 21))).await;
    assert_eq!(in_memory.len(), 1);

    let stored: Vec<serde_json::Value> =
        serde_json::from_str(&storage.store().raw(Collection::Events.key()).unwrap()).unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0]["title"], "New");
    assert_eq!(stored[1], serde_json::from_str::<serde_json::Value>(UNREADABLE_EVENT).unwrap());
}

#[tokio::test]
async fn remove_keeps_records_it_cannot_read() {
    let storage = memory_storage().await;
    storage
        .store()
        .insert_raw(Collection::Events.key(), &format!("[{UNREADABLE_EVENT}]"));
    storage.events().add(event(2, "New", date(2025, 5, 21))).await;
    storage.events().add(event(3, "Other", date(2025, 5, 22))).await;

    let remaining = storage.events().remove(2).await;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].title, "Other");

    let raw = storage.store().raw(Collection::Events.key()).unwrap();
    assert!(raw.contains("Client Meeting"));
    assert!(!raw.contains(r#""title":"New""#));
}

#[tokio::test]
async fn unknown_fields_survive_an_add() {
    let storage = memory_storage().await;
    storage.store().insert_raw(
        Collection::Events.key(),
        r#"[{"id":1,"title":"Sync","date":"2025-05-20","displayDate":"May 20, 2025","time":"All day","location":"Zoom"}]"#,
    );

    storage.events().add(event(2, "New", date(2025, 5, 21))).await;

    let stored: Vec<serde_json::Value> =
        serde_json::from_str(&storage.store().raw(Collection::Events.key()).unwrap()).unwrap();
    assert_eq!(stored[1]["id"], 1);
    assert_eq!(stored[1]["location"], "Zoom");
    assert_eq!(storage.events().load_all().await.len(), 2);
}
