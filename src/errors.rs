//! Unified error type for the order desk.
//!
//! Lookup and validation failures are returned to the caller so the
//! presentation layer can show them. `StorageCorrupt` never leaves the store:
//! it is logged and the store falls back to an empty collection.

use thiserror::Error;

/// All errors produced by the order desk
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid configuration file or menu table
    #[error("Configuration error: {message}")]
    Config {
        /// What was wrong with the configuration
        message: String,
    },

    /// Item name is not registered in any catalog
    #[error("Unknown item: {name}")]
    UnknownItem {
        /// The item name that was looked up
        name: String,
    },

    /// A required booking field is missing or not accepted
    #[error("Invalid {field}: {message}")]
    Validation {
        /// Builder field that failed validation
        field: &'static str,
        /// Human readable reason
        message: String,
    },

    /// Repeat-last-order requested while no order exists
    #[error("No prior order to repeat")]
    NoPriorOrder,

    /// A booking with this id is already stored
    #[error("Order {id} already exists")]
    DuplicateOrder {
        /// The id that is already taken
        id: i64,
    },

    /// Every booking id has been handed out
    #[error("Booking ids exhausted")]
    IdsExhausted,

    /// Persisted orders could not be decoded
    #[error("Stored orders are corrupt: {reason}")]
    StorageCorrupt {
        /// Decoder message
        reason: String,
    },

    /// Storage backend failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Failed to encode orders for storage
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Shorthand for a [`Error::Validation`] error.
    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
