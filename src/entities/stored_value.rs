//! Stored value entity - One row per key of the key-value store.
//! The order store keeps its whole serialized collection under a single key.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Stored value database model - a key and its string value
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stored_values")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Storage key (e.g. `"orders"`)
    #[sea_orm(unique)]
    pub key: String,
    /// Stored value, the serialized order list for `"orders"`
    #[sea_orm(column_type = "Text")]
    pub value: String,
    /// When this value was last written
    pub updated_at: DateTime,
}

/// `StoredValue` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
