//! Order desk - The entry points a presentation layer calls.
//!
//! Bundles the menu with an order store. Each call runs to completion and
//! returns what the caller needs to re-render.

use crate::{
    config::AppConfig,
    core::{
        booking::{Booking, BookingBuilder},
        catalog::Menu,
        clone::clone_booking,
        store::{OrderFilter, OrderStore},
    },
    errors::{Error, Result},
    storage::KeyValueStore,
};
use std::sync::Arc;
use tracing::info;

/// Order placement, listing, cancellation, repeat and clear over one store.
#[derive(Debug, Clone)]
pub struct OrderDesk {
    menu: Arc<Menu>,
    store: Arc<OrderStore>,
}

impl OrderDesk {
    /// Creates a desk over an existing store
    #[must_use]
    pub const fn new(menu: Arc<Menu>, store: Arc<OrderStore>) -> Self {
        Self { menu, store }
    }

    /// Builds the menu from `config` and opens a dedicated store over `storage`.
    pub async fn open(config: &AppConfig, storage: Arc<dyn KeyValueStore>) -> Result<Self> {
        let menu = Menu::from_config(config)?;
        let store = OrderStore::open(storage, config.storage_key.as_str()).await;
        Ok(Self::new(Arc::new(menu), Arc::new(store)))
    }

    /// Builds the menu from `config` and attaches to the process-wide store.
    pub async fn open_shared(config: &AppConfig, storage: Arc<dyn KeyValueStore>) -> Result<Self> {
        let menu = Menu::from_config(config)?;
        let store = OrderStore::shared(storage, config.storage_key.as_str()).await;
        Ok(Self::new(Arc::new(menu), store))
    }

    /// The menu orders are resolved against
    #[must_use]
    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    /// The underlying store
    #[must_use]
    pub const fn store(&self) -> &Arc<OrderStore> {
        &self.store
    }

    /// Validates and places a new order.
    ///
    /// The id is allocated under the store lock, so list order always matches id order.
    pub async fn build_and_add(&self, name: &str, item: &str, payment: &str) -> Result<Booking> {
        let booking = self
            .store
            .add_with(|_, ids| {
                BookingBuilder::new(&self.menu, ids)
                    .name(name)
                    .item(item)
                    .payment(payment)
                    .build()
            })
            .await?;
        info!(
            id = booking.id,
            item = %booking.order.name,
            "Order placed successfully"
        );
        Ok(booking)
    }

    /// Cancels an order; unknown ids are ignored. Returns whether one was removed.
    pub async fn cancel(&self, id: i64) -> Result<bool> {
        self.store.cancel(id).await
    }

    /// Orders matching `filter` (`"all"` or a category name), in placement order.
    pub async fn list_filtered(&self, filter: impl Into<OrderFilter>) -> Vec<Booking> {
        self.store.list(&filter.into()).await
    }

    /// Repeats the most recent order.
    ///
    /// # Errors
    /// Returns [`Error::NoPriorOrder`] if there are no orders.
    pub async fn clone_last(&self) -> Result<Booking> {
        let repeat = self
            .store
            .add_with(|bookings, ids| {
                bookings
                    .last()
                    .ok_or(Error::NoPriorOrder)
                    .and_then(|last| clone_booking(last, ids))
            })
            .await?;
        info!(id = repeat.id, "Order repeated");
        Ok(repeat)
    }

    /// Removes every order.
    pub async fn clear_all(&self) -> Result<()> {
        self.store.clear().await
    }

    /// Total number of orders, regardless of filter
    pub async fn order_count(&self) -> usize {
        self.store.len().await
    }

    /// Category names for filter choices, in menu order
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        self.menu.factory().categories()
    }
}
