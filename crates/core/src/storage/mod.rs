//! Local key/value cache backing the store
//!
//! Mirrors the browser's local storage: string values under string keys,
//! each collection stored whole as a JSON array.

mod file;
mod memory;

use async_trait::async_trait;

use crate::entity::Entity;
use crate::{Error, Result};

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Key/value storage interface
#[async_trait]
pub trait LocalStorage: Send + Sync {
    /// Read the value stored under `key`, if any
    async fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`
    async fn set_item(&self, key: &str, value: &str) -> Result<()>;
}

/// Load a whole collection, returning `None` when nothing is stored yet
pub async fn load_collection<T: Entity>(storage: &dyn LocalStorage) -> Result<Option<Vec<T>>> {
    let Some(raw) = storage.get_item(T::STORAGE_KEY).await? else {
        return Ok(None);
    };

    let items = serde_json::from_str(&raw).map_err(|e| {
        Error::Storage(format!("Failed to parse {}: {}", T::STORAGE_KEY, e))
    })?;
    Ok(Some(items))
}

/// Persist a whole collection under its storage key
pub async fn save_collection<T: Entity>(storage: &dyn LocalStorage, items: &[T]) -> Result<()> {
    let raw = serde_json::to_string(items)?;
    storage.set_item(T::STORAGE_KEY, &raw).await
}
