//! Shared test utilities for the order desk.
//!
//! Helpers for setting up in-memory databases, the default menu, a ready desk
//! and a storage backend whose reads and writes can be made to fail.

use crate::{
    config::{AppConfig, database},
    core::{catalog::Menu, desk::OrderDesk},
    errors::{Error, Result},
    storage::{KeyValueStore, MemoryStore},
};
use async_trait::async_trait;
use sea_orm::{DatabaseConnection, DbErr};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use tracing_subscriber::EnvFilter;

/// Installs a test-writer subscriber once; later calls are ignored.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    database::create_tables(&db).await?;
    Ok(db)
}

/// The built-in menu: Burger/Fries (Fast Food), Pizza/Pasta (Italian),
/// paid by Cash, Card or UPI.
pub fn test_menu() -> Menu {
    match Menu::from_config(&AppConfig::default()) {
        Ok(menu) => menu,
        Err(e) => unreachable!("built-in menu is valid: {e}"),
    }
}

/// A desk over a fresh `MemoryStore` with the built-in menu.
/// Returns the storage too so tests can inspect what was written.
pub async fn setup_desk() -> (OrderDesk, Arc<MemoryStore>) {
    let storage = Arc::new(MemoryStore::new());
    let handle = Arc::clone(&storage) as Arc<dyn KeyValueStore>;
    let desk = match OrderDesk::open(&AppConfig::default(), handle).await {
        Ok(desk) => desk,
        Err(e) => unreachable!("built-in menu is valid: {e}"),
    };
    (desk, storage)
}

/// Memory-backed store that fails reads or writes on demand.
#[derive(Debug, Default)]
pub struct FailingStore {
    inner: MemoryStore,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl FailingStore {
    /// Makes subsequent reads fail (or succeed again)
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Makes subsequent writes fail (or succeed again)
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check(flag: &AtomicBool, operation: &str) -> Result<()> {
        if flag.load(Ordering::SeqCst) {
            return Err(Error::Database(DbErr::Custom(format!(
                "simulated {operation} failure"
            ))));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Self::check(&self.fail_reads, "read")?;
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        Self::check(&self.fail_writes, "write")?;
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        Self::check(&self.fail_writes, "write")?;
        self.inner.remove(key).await
    }
}
