//! Entity module - Contains the SeaORM entity definitions for the database.
//! The SQLite storage backend keeps every key in the `stored_values` table.

pub mod stored_value;

pub use stored_value::{
    Column as StoredValueColumn, Entity as StoredValue, Model as StoredValueModel,
};
