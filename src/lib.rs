//! `OrderDesk` - food order placement core
//!
//! This crate provides the order-management core behind an order form: a
//! configurable menu of categorized items, a booking builder, a write-through
//! order store backed by pluggable key-value storage, filtering by category,
//! cancellation, and repeating the last order.

// Deny the most critical lints that could lead to bugs or security issues
#![deny(
    // Security and correctness
    unsafe_code,
    unsafe_op_in_unsafe_fn,

    // Code quality - things that are almost always bugs
    unreachable_code,
    unreachable_patterns,
    unused_must_use,

    // Documentation - broken links are bugs
    rustdoc::broken_intra_doc_links,
    rustdoc::private_intra_doc_links,
)]
// Warn on things that should be fixed but aren't necessarily bugs
#![warn(
    missing_docs,

    // Clippy categories for overall code quality
    clippy::all,
    clippy::pedantic,
    clippy::nursery,

    // Performance
    clippy::inefficient_to_string,
    clippy::large_types_passed_by_value,
    clippy::needless_pass_by_value,
    clippy::unnecessary_wraps,

    // Correctness
    clippy::clone_on_ref_ptr,
    clippy::dbg_macro,
    clippy::exit,
    clippy::expect_used,
    clippy::float_cmp,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,

    // Complexity and readability
    clippy::cognitive_complexity,
    clippy::large_enum_variant,
    clippy::match_same_arms,
    clippy::too_many_lines,

    // Style consistency
    clippy::enum_glob_use,
    clippy::inconsistent_struct_constructor,
    clippy::must_use_candidate,
    clippy::redundant_closure_for_method_calls,
    clippy::semicolon_if_nothing_returned,
    clippy::wildcard_imports,

    // Future compatibility
    future_incompatible,
    rust_2018_idioms,
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
)]

/// Configuration loading - menu, payment methods, storage key and database URL
pub mod config;
/// Core business logic - catalog, bookings, the order store and the desk facade
pub mod core;
/// SeaORM entity definitions for database tables
pub mod entities;
/// Unified error types and result handling
pub mod errors;
/// Key-value storage backends the order store persists into
pub mod storage;

pub use crate::core::{
    booking::{Booking, BookingBuilder, IdSequence},
    catalog::{Item, Menu, OrderCatalog, OrderFactory},
    desk::OrderDesk,
    store::{OrderFilter, OrderStore},
};
pub use errors::{Error, Result};
pub use storage::{KeyValueStore, MemoryStore, SqliteStore};

use tracing_subscriber::EnvFilter;

/// Installs the global `tracing` subscriber, filtered by `RUST_LOG` (default `info`).
///
/// Calling it again after a subscriber is installed is a no-op.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}


#[cfg(test)]
pub mod test_utils;
