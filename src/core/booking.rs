//! Booking records and how they are assembled.
//!
//! A [`Booking`] is created once and never edited: the store only adds and
//! removes whole records. Ids come from an [`IdSequence`] shared by everything
//! that creates bookings for a store.

use crate::{
    core::catalog::{Item, Menu},
    errors::{Error, Result},
};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI64, Ordering};

/// A placed order.
///
/// Serialized as
/// `{"id", "name", "order": {"item", "price", "category"}, "payment", "time", "isClone"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    /// Unique, increasing identifier
    pub id: i64,
    /// Customer name
    pub name: String,
    /// The ordered item
    pub order: Item,
    /// Payment method (e.g. "Cash")
    pub payment: String,
    /// Local time the booking was created
    pub time: String,
    /// Whether this booking repeats an earlier one
    pub is_clone: bool,
}

impl Booking {
    /// Creates a booking stamped with the current local time.
    #[must_use]
    pub fn new(id: i64, name: String, order: Item, payment: String, is_clone: bool) -> Self {
        Self {
            id,
            name,
            order,
            payment,
            time: local_time(),
            is_clone,
        }
    }

    /// Category of the ordered item
    #[must_use]
    pub fn category(&self) -> &str {
        &self.order.category
    }
}

/// Current local time in the `3:04:05 PM` form bookings carry.
#[must_use]
pub fn local_time() -> String {
    chrono::Local::now().format("%-I:%M:%S %p").to_string()
}

/// Allocates booking ids. Never hands out the same id twice.
///
/// Tracks the last id handed out, so a sequence that has reached `i64::MAX`
/// refuses further allocations instead of wrapping.
#[derive(Debug)]
pub struct IdSequence {
    last: AtomicI64,
}

impl IdSequence {
    /// Starts allocating at 1
    #[must_use]
    pub const fn new() -> Self {
        Self::starting_at(1)
    }

    /// Starts allocating at `first`
    #[must_use]
    pub const fn starting_at(first: i64) -> Self {
        Self {
            last: AtomicI64::new(first.saturating_sub(1)),
        }
    }

    /// Returns a fresh id.
    ///
    /// # Errors
    /// Returns [`Error::IdsExhausted`] once `i64::MAX` has been handed out.
    pub fn allocate(&self) -> Result<i64> {
        let previous = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| last.checked_add(1))
            .map_err(|_| Error::IdsExhausted)?;
        let id = previous + 1;
        tracing::trace!(id, "Allocated booking id");
        Ok(id)
    }

    /// Ensures every future id is greater than `id`
    pub fn advance_past(&self, id: i64) {
        self.last.fetch_max(id, Ordering::SeqCst);
    }

    /// The id the next call to [`allocate`](Self::allocate) returns, if any is left
    #[must_use]
    pub fn peek(&self) -> Option<i64> {
        self.last.load(Ordering::SeqCst).checked_add(1)
    }
}

impl Default for IdSequence {
    fn default() -> Self {
        Self::new()
    }
}

/// Collects the fields of a new booking and validates them on [`build`](Self::build).
///
/// ```ignore
/// let booking = BookingBuilder::new(&menu, &ids)
///     .name("Bob")
///     .item("Burger")
///     .payment("Cash")
///     .build()?;
/// ```
#[derive(Debug, Clone)]
pub struct BookingBuilder<'a> {
    menu: &'a Menu,
    ids: &'a IdSequence,
    name: String,
    item: String,
    payment: String,
}

impl<'a> BookingBuilder<'a> {
    /// Starts an empty booking against `menu`, taking ids from `ids`
    #[must_use]
    pub const fn new(menu: &'a Menu, ids: &'a IdSequence) -> Self {
        Self {
            menu,
            ids,
            name: String::new(),
            item: String::new(),
            payment: String::new(),
        }
    }

    /// Sets the customer name
    pub fn name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = name.into();
        self
    }

    /// Sets the item name
    pub fn item(&mut self, item: impl Into<String>) -> &mut Self {
        self.item = item.into();
        self
    }

    /// Sets the payment method
    pub fn payment(&mut self, payment: impl Into<String>) -> &mut Self {
        self.payment = payment.into();
        self
    }

    /// Validates the fields and creates the booking.
    ///
    /// No id is consumed when validation fails.
    ///
    /// # Errors
    /// - [`Error::Validation`] if name, item or payment is empty, or the payment
    ///   method is not accepted
    /// - [`Error::UnknownItem`] if the item is not on the menu
    /// - [`Error::IdsExhausted`] if no id is left
    pub fn build(&self) -> Result<Booking> {
        let name = required("name", &self.name)?;
        let item_name = required("item", &self.item)?;
        let payment = required("payment", &self.payment)?;

        let order = self.menu.factory().create_order(item_name)?;

        if !self.menu.accepts_payment(payment) {
            return Err(Error::validation(
                "payment",
                format!("'{payment}' is not an accepted payment method"),
            ));
        }

        Ok(Booking::new(
            self.ids.allocate()?,
            name.to_string(),
            order,
            payment.to_string(),
            false,
        ))
    }
}

fn required<'v>(field: &'static str, value: &'v str) -> Result<&'v str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(field, "cannot be empty"));
    }
    Ok(trimmed)
}
