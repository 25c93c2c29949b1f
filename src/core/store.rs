//! Order store - The single owner of the booking collection.
//!
//! Every mutation is written through to the key-value storage before it is
//! committed in memory, so the in-memory list always matches the last
//! successful write. Mutations are serialized by one async mutex, which keeps
//! writes ordered even though the storage backend is asynchronous.
//!
//! Persisted data that cannot be decoded is logged and treated as "no prior
//! orders"; it never fails construction.

use crate::{
    core::booking::{Booking, IdSequence},
    errors::{Error, Result},
    storage::KeyValueStore,
};
use std::{collections::HashSet, fmt, sync::Arc};
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, info, warn};

static SHARED_STORE: OnceCell<Arc<OrderStore>> = OnceCell::const_new();

/// Which bookings [`OrderStore::list`] returns.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OrderFilter {
    /// Every booking
    #[default]
    All,
    /// Bookings whose item belongs to this category
    Category(String),
}

impl OrderFilter {
    /// Whether `booking` passes the filter
    #[must_use]
    pub fn matches(&self, booking: &Booking) -> bool {
        match self {
            Self::All => true,
            Self::Category(category) => booking.category() == category,
        }
    }
}

impl From<&str> for OrderFilter {
    /// `"all"` selects everything, any other value is a category name.
    fn from(value: &str) -> Self {
        if value == "all" {
            Self::All
        } else {
            Self::Category(value.to_string())
        }
    }
}

impl From<String> for OrderFilter {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

/// Holds all bookings and persists them under a single storage key.
pub struct OrderStore {
    storage: Arc<dyn KeyValueStore>,
    key: String,
    ids: IdSequence,
    bookings: Mutex<Vec<Booking>>,
}

impl fmt::Debug for OrderStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderStore")
            .field("key", &self.key)
            .field("ids", &self.ids)
            .finish_non_exhaustive()
    }
}

impl OrderStore {
    /// Opens a store over `storage`, loading whatever is stored under `key`.
    ///
    /// The id sequence starts after the largest loaded id.
    pub async fn open(storage: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        let key = key.into();
        let bookings = load(storage.as_ref(), &key).await;

        let ids = IdSequence::new();
        if let Some(max_id) = bookings.iter().map(|b| b.id).max() {
            ids.advance_past(max_id);
        }

        info!(
            key = %key,
            orders = bookings.len(),
            next_id = ?ids.peek(),
            "Order store opened"
        );

        Self {
            storage,
            key,
            ids,
            bookings: Mutex::new(bookings),
        }
    }

    /// Returns the process-wide store, opening it on the first call.
    ///
    /// Later calls return the same instance and ignore their arguments.
    pub async fn shared(storage: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Arc<Self> {
        let key = key.into();
        let store = SHARED_STORE
            .get_or_init(|| async move { Arc::new(Self::open(storage, key).await) })
            .await;
        Arc::clone(store)
    }

    /// The process-wide store, if [`shared`](Self::shared) has run
    #[must_use]
    pub fn get_shared() -> Option<Arc<Self>> {
        SHARED_STORE.get().map(Arc::clone)
    }

    /// Id source for bookings added to this store
    #[must_use]
    pub const fn ids(&self) -> &IdSequence {
        &self.ids
    }

    /// Storage key the collection is written under
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Appends a booking and persists the collection.
    ///
    /// # Errors
    /// Returns [`Error::DuplicateOrder`] if a booking with the same id is stored.
    pub async fn add(&self, booking: Booking) -> Result<()> {
        let mut bookings = self.bookings.lock().await;
        self.push_locked(&mut bookings, booking).await
    }

    /// Creates a booking while holding the store lock and appends it.
    ///
    /// `make` sees the current bookings and this store's id sequence, so ids
    /// are allocated in the same order bookings are appended.
    pub async fn add_with<F>(&self, make: F) -> Result<Booking>
    where
        F: FnOnce(&[Booking], &IdSequence) -> Result<Booking>,
    {
        let mut bookings = self.bookings.lock().await;
        let booking = make(bookings.as_slice(), &self.ids)?;
        self.push_locked(&mut bookings, booking.clone()).await?;
        Ok(booking)
    }

    async fn push_locked(&self, bookings: &mut Vec<Booking>, booking: Booking) -> Result<()> {
        if bookings.iter().any(|b| b.id == booking.id) {
            warn!(id = booking.id, "Rejecting booking with duplicate id");
            return Err(Error::DuplicateOrder { id: booking.id });
        }
        self.ids.advance_past(booking.id);

        let id = booking.id;
        let mut next = bookings.clone();
        next.push(booking);
        self.persist(&next).await?;
        *bookings = next;

        info!(id, total = bookings.len(), "Order added");
        Ok(())
    }

    /// Returns a copy of the bookings passing `filter`, in insertion order.
    pub async fn list(&self, filter: &OrderFilter) -> Vec<Booking> {
        let bookings = self.bookings.lock().await;
        let listed: Vec<Booking> = bookings
            .iter()
            .filter(|b| filter.matches(b))
            .cloned()
            .collect();
        debug!(?filter, count = listed.len(), "Listed orders");
        listed
    }

    /// Removes the booking with `id` and persists the collection.
    ///
    /// Returns whether a booking was removed; an unknown id is a no-op.
    pub async fn cancel(&self, id: i64) -> Result<bool> {
        let mut bookings = self.bookings.lock().await;
        let mut next = bookings.clone();
        next.retain(|b| b.id != id);
        let removed = next.len() != bookings.len();

        self.persist(&next).await?;
        *bookings = next;

        if removed {
            info!(id, "Order cancelled");
        } else {
            debug!(id, "Cancel for unknown order id");
        }
        Ok(removed)
    }

    /// Removes every booking and persists the empty collection.
    pub async fn clear(&self) -> Result<()> {
        let mut bookings = self.bookings.lock().await;
        self.persist(&[]).await?;
        let cleared = bookings.len();
        bookings.clear();
        info!(cleared, "All orders cleared");
        Ok(())
    }

    /// Writes the current collection to storage.
    pub async fn save(&self) -> Result<()> {
        let bookings = self.bookings.lock().await;
        self.persist(&bookings).await
    }

    /// Number of bookings
    pub async fn len(&self) -> usize {
        self.bookings.lock().await.len()
    }

    /// Whether the store holds no bookings
    pub async fn is_empty(&self) -> bool {
        self.bookings.lock().await.is_empty()
    }

    /// The most recently added booking
    pub async fn last(&self) -> Option<Booking> {
        self.bookings.lock().await.last().cloned()
    }

    /// The booking with `id`
    pub async fn get(&self, id: i64) -> Option<Booking> {
        self.bookings
            .lock()
            .await
            .iter()
            .find(|b| b.id == id)
            .cloned()
    }

    async fn persist(&self, bookings: &[Booking]) -> Result<()> {
        let encoded = serde_json::to_string(bookings)?;
        self.storage.set(&self.key, &encoded).await?;
        debug!(key = %self.key, count = bookings.len(), "Orders persisted");
        Ok(())
    }
}

/// Reads the stored collection, falling back to empty on any failure.
async fn load(storage: &dyn KeyValueStore, key: &str) -> Vec<Booking> {
    let raw = match storage.get(key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!(key, "No stored orders");
            return Vec::new();
        }
        Err(e) => {
            warn!(key, "Failed to read stored orders, starting empty: {}", e);
            return Vec::new();
        }
    };

    match decode_bookings(&raw) {
        Ok(bookings) => bookings,
        Err(e) => {
            warn!(key, "{}; starting with no orders", e);
            Vec::new()
        }
    }
}

/// Decodes a persisted collection, keeping the first booking for each id.
pub(crate) fn decode_bookings(raw: &str) -> Result<Vec<Booking>> {
    let decoded: Vec<Booking> =
        serde_json::from_str(raw).map_err(|e| Error::StorageCorrupt {
            reason: e.to_string(),
        })?;

    let mut seen = HashSet::new();
    let total = decoded.len();
    let bookings: Vec<Booking> = decoded.into_iter().filter(|b| seen.insert(b.id)).collect();
    if bookings.len() != total {
        warn!(
            dropped = total - bookings.len(),
            "Dropped stored orders with duplicate ids"
        );
    }
    Ok(bookings)
}
