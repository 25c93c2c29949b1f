//! In-memory key-value store for tests and embedding.

use super::KeyValueStore;
use crate::errors::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Key-value store held in a `HashMap`. Contents are lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with `value` already present under `key`
    #[must_use]
    pub fn with_value(key: &str, value: &str) -> Self {
        Self {
            values: RwLock::new(HashMap::from([(key.to_string(), value.to_string())])),
        }
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.values.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_then_get() -> Result<()> {
        let store = MemoryStore::new();
        assert_eq!(store.get("orders").await?, None);

        store.set("orders", "[]").await?;
        assert_eq!(store.get("orders").await?.as_deref(), Some("[]"));

        store.set("orders", "[1]").await?;
        assert_eq!(store.get("orders").await?.as_deref(), Some("[1]"));
        Ok(())
    }

    #[tokio::test]
    async fn test_remove_absent_key() -> Result<()> {
        let store = MemoryStore::with_value("orders", "[]");
        store.remove("other").await?;
        store.remove("orders").await?;
        assert_eq!(store.get("orders").await?, None);
        Ok(())
    }
}
