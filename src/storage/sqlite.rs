//! `SQLite` key-value store built on the `stored_values` table.
//!
//! Each key is one row. Writes run inside a database transaction so the
//! lookup and the insert/update for a key happen atomically.

use super::KeyValueStore;
use crate::{
    entities::{StoredValue, stored_value},
    errors::Result,
};
use async_trait::async_trait;
use sea_orm::{Set, TransactionTrait, prelude::*};
use tracing::{debug, instrument};

/// Key-value store persisted through a `SeaORM` connection.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db: DatabaseConnection,
}

impl SqliteStore {
    /// Wraps an open connection. Tables must already exist, see
    /// [`create_tables`](crate::config::database::create_tables).
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Connects using `DATABASE_URL` and creates missing tables.
    pub async fn connect() -> Result<Self> {
        Self::connect_to(&crate::config::database::get_database_url()).await
    }

    /// Connects to `database_url` and creates missing tables.
    pub async fn connect_to(database_url: &str) -> Result<Self> {
        let db = crate::config::database::connect_to(database_url).await?;
        crate::config::database::create_tables(&db).await?;
        Ok(Self::new(db))
    }

    /// The underlying connection
    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    #[instrument(skip(self))]
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let row = StoredValue::find()
            .filter(stored_value::Column::Key.eq(key))
            .one(&self.db)
            .await?;
        debug!("Stored value for key '{}' present: {}", key, row.is_some());
        Ok(row.map(|r| r.value))
    }

    #[instrument(skip(self, value), fields(len = value.len()))]
    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let now = chrono::Utc::now().naive_utc();
        let txn = self.db.begin().await?;

        let existing = StoredValue::find()
            .filter(stored_value::Column::Key.eq(key))
            .one(&txn)
            .await?;

        if let Some(row) = existing {
            let mut active_model: stored_value::ActiveModel = row.into();
            active_model.value = Set(value.to_string());
            active_model.updated_at = Set(now);
            active_model.update(&txn).await?;
        } else {
            let new_row = stored_value::ActiveModel {
                key: Set(key.to_string()),
                value: Set(value.to_string()),
                updated_at: Set(now),
                ..Default::default()
            };
            new_row.insert(&txn).await?;
        }

        txn.commit().await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove(&self, key: &str) -> Result<()> {
        StoredValue::delete_many()
            .filter(stored_value::Column::Key.eq(key))
            .exec(&self.db)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;

    #[tokio::test]
    async fn test_get_missing_key() -> Result<()> {
        let store = SqliteStore::new(setup_test_db().await?);
        assert_eq!(store.get("orders").await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_set_inserts_then_updates() -> Result<()> {
        let store = SqliteStore::new(setup_test_db().await?);

        store.set("orders", "[]").await?;
        assert_eq!(store.get("orders").await?.as_deref(), Some("[]"));

        store.set("orders", r#"[{"id":1}]"#).await?;
        assert_eq!(store.get("orders").await?.as_deref(), Some(r#"[{"id":1}]"#));

        // Still a single row for the key
        let rows = StoredValue::find().all(store.connection()).await?;
        assert_eq!(rows.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_connect_to_creates_tables() -> Result<()> {
        let store = SqliteStore::connect_to("sqlite::memory:").await?;
        store.set("orders", "[]").await?;
        assert_eq!(store.get("orders").await?.as_deref(), Some("[]"));
        Ok(())
    }

    #[tokio::test]
    async fn test_keys_are_independent() -> Result<()> {
        let store = SqliteStore::new(setup_test_db().await?);
        store.set("orders", "[]").await?;
        store.set("drafts", "{}").await?;

        store.remove("drafts").await?;
        assert_eq!(store.get("drafts").await?, None);
        assert_eq!(store.get("orders").await?.as_deref(), Some("[]"));

        // Removing again is fine
        store.remove("drafts").await?;
        Ok(())
    }
}
