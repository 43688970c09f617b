//! Item models for database storage.

use native_db::*;
use native_model::{native_model, Model};
use schoolbase_core::Item;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Separator between table name and key in an item's primary key.
const KEY_SEPARATOR: char = '\u{1f}';

/// Stored item in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 2, version = 1)]
#[native_db]
pub struct StoredItem {
    /// Primary key - table name and rendered key value.
    #[primary_key]
    pub id: String,
    /// Owning table.
    #[secondary_key]
    pub table: String,
    /// Rendered key value.
    pub key: String,
    /// Serialized attributes.
    pub attributes: Vec<u8>,
}

impl StoredItem {
    /// Build the primary key for an item of `table` with key `key`.
    pub fn item_id(table: &str, key: &str) -> String {
        format!("{table}{KEY_SEPARATOR}{key}")
    }

    /// Create from an item.
    pub fn from_item(table: &str, key: String, item: &Item) -> Result<Self> {
        let attributes =
            bincode::serialize(item).map_err(|e| Error::Serialization(e.to_string()))?;
        Ok(Self {
            id: Self::item_id(table, &key),
            table: table.to_string(),
            key,
            attributes,
        })
    }

    /// Convert to an item.
    pub fn to_item(&self) -> Result<Item> {
        bincode::deserialize(&self.attributes).map_err(|e| Error::Serialization(e.to_string()))
    }
}
