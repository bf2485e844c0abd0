pub mod json_backend;
pub mod memory;

use serde::{de::DeserializeOwned, Serialize};

use crate::core::errors::{Result, TrackerError};

pub use json_backend::JsonFileStore;
pub use memory::MemoryStore;

/// Store key holding the transaction collection.
pub const TRANSACTIONS_KEY: &str = "transactions";
/// Store key holding the category collection.
pub const CATEGORIES_KEY: &str = "categories";

/// Opaque string-keyed blob store. Values are whole JSON documents.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Loads the collection stored under `key`, or `default()` when the key is absent.
pub fn load_collection<T, F>(store: &dyn KeyValueStore, key: &str, default: F) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    F: FnOnce() -> Vec<T>,
{
    match store.get(key)? {
        Some(raw) => {
            let items: Vec<T> =
                serde_json::from_str(&raw).map_err(|err| TrackerError::corrupt(key, err))?;
            tracing::debug!(key, count = items.len(), "loaded collection");
            Ok(items)
        }
        None => {
            tracing::debug!(key, "no stored collection, using default");
            Ok(default())
        }
    }
}

/// Persists the entire collection under `key`.
pub fn save_collection<T: Serialize>(store: &dyn KeyValueStore, key: &str, items: &[T]) -> Result<()> {
    let json = serde_json::to_string_pretty(items)?;
    store.set(key, &json)?;
    tracing::debug!(key, count = items.len(), "saved collection");
    Ok(())
}
