//! Per-entity operations over the shared [`Storage`].
//!
//! Every mutation is write-through: the whole collection is read, changed
//! and written back under the collection's lock before the call returns.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info};

use crate::models::{Client, Event, Invoice, InvoiceId, Project};
use crate::storage::{decode_records, Collection, KeyValueStore, Storage};

/// A record type that lives in one of the named collections
pub trait Record: Serialize + DeserializeOwned {
    const COLLECTION: Collection;
}

impl Record for Client {
    const COLLECTION: Collection = Collection::Clients;
}

impl Record for Project {
    const COLLECTION: Collection = Collection::Projects;
}

impl Record for Invoice {
    const COLLECTION: Collection = Collection::Invoices;
}

impl Record for Event {
    const COLLECTION: Collection = Collection::Events;
}

pub struct Repository<'a, S, T> {
    storage: &'a Storage<S>,
    _record: PhantomData<T>,
}

pub type ClientRepository<'a, S> = Repository<'a, S, Client>;
pub type ProjectRepository<'a, S> = Repository<'a, S, Project>;
pub type InvoiceRepository<'a, S> = Repository<'a, S, Invoice>;
pub type EventRepository<'a, S> = Repository<'a, S, Event>;

impl<'a, S: KeyValueStore, T: Record> Repository<'a, S, T> {
    pub fn new(storage: &'a Storage<S>) -> Self {
        Self {
            storage,
            _record: PhantomData,
        }
    }

    /// Every stored record, in stored order
    pub async fn load_all(&self) -> Vec<T> {
        self.storage.read_records(T::COLLECTION).await
    }

    /// Replace the whole collection
    pub async fn save_all(&self, records: &[T]) -> bool {
        let _guard = self.storage.lock(T::COLLECTION).await;
        self.storage.write(T::COLLECTION, records).await
    }

    /// Put `record` at the front of the collection and persist it.
    ///
    /// The rest of the collection is carried over as stored JSON, so
    /// records this version cannot read are kept rather than dropped.
    /// Returns the readable records as they now stand in memory. If the
    /// write failed, that differs from what is stored until the next good
    /// write.
    pub async fn add(&self, record: T) -> Vec<T> {
        let _guard = self.storage.lock(T::COLLECTION).await;
        let mut values = self.storage.read_values(T::COLLECTION).await;

        let value = match serde_json::to_value(&record) {
            Ok(value) => value,
            Err(err) => {
                error!(key = T::COLLECTION.key(), error = %err, "could not encode record");
                let mut records = decode_records(T::COLLECTION, &values);
                records.insert(0, record);
                return records;
            }
        };

        values.insert(0, value);
        if self.storage.write(T::COLLECTION, &values).await {
            info!(key = T::COLLECTION.key(), len = values.len(), "added record");
        }
        decode_records(T::COLLECTION, &values)
    }

    /// Stored records matching `predicate`, in stored order
    pub async fn filter<P>(&self, predicate: P) -> Vec<T>
    where
        P: Fn(&T) -> bool,
    {
        let mut records = self.load_all().await;
        records.retain(|record| predicate(record));
        records
    }
}

impl<S: KeyValueStore> ClientRepository<'_, S> {
    pub async fn search(&self, query: &str) -> Vec<Client> {
        self.filter(|client| client.matches(query)).await
    }

    /// Distinct client names in stored order, for picking a client by name
    pub async fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for client in self.load_all().await {
            if !names.contains(&client.name) {
                names.push(client.name);
            }
        }
        names
    }
}

impl<S: KeyValueStore> InvoiceRepository<'_, S> {
    pub async fn search(&self, query: &str) -> Vec<Invoice> {
        self.filter(|invoice| invoice.matches(query)).await
    }

    /// Highest invoice id in use; see [`last_invoice_id`]
    pub async fn last_id(&self) -> InvoiceId {
        last_invoice_id(&self.load_all().await)
    }

    /// Id the next created invoice should get; see [`next_invoice_id`]
    pub async fn next_id(&self) -> Option<InvoiceId> {
        next_invoice_id(&self.load_all().await)
    }
}

impl<S: KeyValueStore> EventRepository<'_, S> {
    /// Drop every event with `id` and persist. Returns the remaining events.
    ///
    /// Stored entries that are not readable events stay in place.
    pub async fn remove(&self, id: i64) -> Vec<Event> {
        let _guard = self.storage.lock(Collection::Events).await;
        let mut values = self.storage.read_values(Collection::Events).await;
        let before = values.len();
        values.retain(|value| value.get("id").and_then(Value::as_i64) != Some(id));

        if values.len() == before {
            debug!(id, "no event to remove");
        } else if self.storage.write(Collection::Events, &values).await {
            info!(id, "removed event");
        }
        decode_records(Collection::Events, &values)
    }
}

/// The current maximum invoice id, or `INV-000` when there are none.
///
/// This is the last id handed out, not the next one: the creation form
/// does the increment via [`next_invoice_id`].
pub fn last_invoice_id(invoices: &[Invoice]) -> InvoiceId {
    invoices
        .iter()
        .map(|invoice| invoice.id)
        .max()
        .unwrap_or_default()
}

/// `None` once the highest possible id is taken.
pub fn next_invoice_id(invoices: &[Invoice]) -> Option<InvoiceId> {
    last_invoice_id(invoices).next()
}

impl<S: KeyValueStore> Storage<S> {
    pub fn clients(&self) -> ClientRepository<'_, S> {
        Repository::new(self)
    }

    pub fn projects(&self) -> ProjectRepository<'_, S> {
        Repository::new(self)
    }

    pub fn invoices(&self) -> InvoiceRepository<'_, S> {
        Repository::new(self)
    }

    pub fn events(&self) -> EventRepository<'_, S> {
        Repository::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DueDate, InvoiceStatus};
    use chrono::NaiveDate;

    fn invoice(id: &str) -> Invoice {
        Invoice {
            id: id.parse().unwrap(),
            client: "ABC Corporation".into(),
            amount: "$100".into(),
            status: InvoiceStatus::Paid,
            date: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
            due_date: DueDate::Unset,
        }
    }

    #[test]
    fn last_id_is_the_current_maximum() {
        let invoices = vec![invoice("INV-001"), invoice("INV-007"), invoice("INV-003")];
        assert_eq!(last_invoice_id(&invoices).to_string(), "INV-007");
        assert_eq!(next_invoice_id(&invoices), Some(InvoiceId(8)));
    }

    #[test]
    fn empty_collection_starts_at_zero() {
        assert_eq!(last_invoice_id(&[]).to_string(), "INV-000");
        assert_eq!(next_invoice_id(&[]), Some(InvoiceId(1)));
    }

    #[test]
    fn no_next_id_past_the_largest() {
        let invoices = vec![invoice("INV-001"), invoice("INV-4294967295")];
        assert_eq!(last_invoice_id(&invoices), InvoiceId(u32::MAX));
        assert_eq!(next_invoice_id(&invoices), None);
    }
}
