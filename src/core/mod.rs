//! Core business logic - framework-agnostic order handling.

/// Bookings, their ids and the booking builder
pub mod booking;
/// Item catalogs, the item factory and the configured menu
pub mod catalog;
/// Repeating an earlier booking
pub mod clone;
/// Entry points for a presentation layer
pub mod desk;
/// The write-through order store
pub mod store;
