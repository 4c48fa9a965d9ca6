//! Persistence for the four CRM collections.
//!
//! A [`KeyValueStore`] maps string keys to string values, much like a
//! browser's local storage. [`Storage`] sits on top of it and speaks JSON:
//! reads never fail (they fall back to the caller's default) and writes
//! never fail either (a failed write is logged and dropped).

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use std::future::Future;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, error, info, warn};

/// Errors raised by a [`KeyValueStore`] backend
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("quota exceeded writing {key}: {size} bytes over a limit of {limit}")]
    QuotaExceeded {
        key: String,
        size: usize,
        limit: usize,
    },

    #[error("failed to encode {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// The fixed set of named collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Clients,
    Projects,
    Invoices,
    Events,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Clients,
        Collection::Projects,
        Collection::Invoices,
        Collection::Events,
    ];

    /// Key the collection is stored under
    pub fn key(self) -> &'static str {
        match self {
            Collection::Clients => "freelancer-crm-clients",
            Collection::Projects => "freelancer-crm-projects",
            Collection::Invoices => "freelancer-crm-invoices",
            Collection::Events => "freelancer-crm-events",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// A persistent string-keyed store
pub trait KeyValueStore: Send + Sync {
    /// Fetch the raw value stored under `key`, if any
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, StorageError>> + Send;

    /// Store `value` under `key`, replacing whatever was there
    fn set(&self, key: &str, value: String) -> impl Future<Output = Result<(), StorageError>> + Send;
}

/// JSON adapter over a [`KeyValueStore`]
///
/// One handle is shared by every repository, so a write through one
/// repository is visible to every later read through another.
pub struct Storage<S> {
    store: S,
    locks: [Mutex<()>; 4],
}

impl<S: KeyValueStore> Storage<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            locks: Default::default(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Take the write lock for one collection.
    ///
    /// Mutations hold it across their whole read-modify-write so two
    /// writes to the same key are never in flight together.
    pub async fn lock(&self, collection: Collection) -> MutexGuard<'_, ()> {
        self.locks[collection.index()].lock().await
    }

    /// Parse the value stored under `collection`.
    ///
    /// Returns `default` when the key is absent, the backend fails, or the
    /// stored text is not valid for `T`.
    pub async fn read<T: DeserializeOwned>(&self, collection: Collection, default: T) -> T {
        let key = collection.key();
        let raw = match self.store.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return default,
            Err(err) => {
                warn!(key, error = %err, "failed to read from store");
                return default;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                warn!(key, error = %err, "stored value is not valid, using default");
                default
            }
        }
    }

    /// Read a collection as a list of typed records.
    ///
    /// A value that is not a JSON array yields an empty list. Inside a valid
    /// array, records that fail validation are skipped and the rest kept.
    pub async fn read_records<T: DeserializeOwned>(&self, collection: Collection) -> Vec<T> {
        let values = self.read_values(collection).await;
        decode_records(collection, &values)
    }

    /// Read a collection as untyped JSON values, exactly as stored.
    ///
    /// Mutations go through this so records that fail typed validation, and
    /// fields this version does not know about, are written back untouched.
    pub async fn read_values(&self, collection: Collection) -> Vec<Value> {
        self.read(collection, Vec::new()).await
    }

    /// Serialize `value` and store it under `collection`.
    ///
    /// Failures are logged and otherwise ignored; callers must not assume
    /// the write went through. Returns whether it did.
    pub async fn write<T: Serialize + ?Sized>(&self, collection: Collection, value: &T) -> bool {
        let key = collection.key();
        let encoded = match serde_json::to_string(value) {
            Ok(encoded) => encoded,
            Err(source) => {
                let err = StorageError::Encode {
                    key: key.to_string(),
                    source,
                };
                error!(error = %err, "failed to save to store");
                return false;
            }
        };

        match self.store.set(key, encoded).await {
            Ok(()) => {
                debug!(key, "saved collection");
                true
            }
            Err(err) => {
                error!(key, error = %err, "failed to save to store");
                false
            }
        }
    }

    /// Make sure every collection key exists, seeding absent ones with `[]`.
    ///
    /// Keys that already hold data are left alone, so this is safe to run
    /// at every start-up.
    pub async fn seed_collections(&self) {
        for collection in Collection::ALL {
            let _guard = self.lock(collection).await;
            match self.store.get(collection.key()).await {
                Ok(Some(_)) => {}
                Ok(None) => {
                    if self.write(collection, &Vec::<Value>::new()).await {
                        info!(key = collection.key(), "seeded empty collection");
                    }
                }
                Err(err) => {
                    warn!(key = collection.key(), error = %err, "could not check collection");
                }
            }
        }
    }
}

/// Decode the stored values of `collection` into typed records.
///
/// Values that fail validation are skipped with a warning; `values` itself
/// is left as it was.
pub fn decode_records<T: DeserializeOwned>(collection: Collection, values: &[Value]) -> Vec<T> {
    let key = collection.key();
    values
        .iter()
        .enumerate()
        .filter_map(|(position, value)| match T::deserialize(value) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(key, position, error = %err, "skipping malformed record");
                None
            }
        })
        .collect()
}
