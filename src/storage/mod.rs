//! Key-value storage the order store persists into.
//!
//! The store treats its backend as an opaque string map: one key holds the
//! whole serialized order list and every write replaces it.

use crate::errors::Result;
use async_trait::async_trait;

/// In-memory backend
pub mod memory;
/// `SQLite` backend via `SeaORM`
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// A string key-value store.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Deletes `key`. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}
