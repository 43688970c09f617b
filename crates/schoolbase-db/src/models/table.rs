//! Table catalog models.

use native_db::*;
use native_model::{native_model, Model};
use schoolbase_core::{KeyType, TableSpec, Throughput};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::traits::TableStatus;

/// Stored table definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 1, version = 1)]
#[native_db]
pub struct StoredTable {
    /// Primary key - table name.
    #[primary_key]
    pub name: String,
    /// Hash key attribute name.
    pub key: String,
    /// Hash key type code ("S" or "N").
    pub key_type: String,
    /// Read capacity hint.
    pub read_capacity: i64,
    /// Write capacity hint.
    pub write_capacity: i64,
    /// Lifecycle status (serialized).
    pub status: u8,
}

impl StoredTable {
    /// Create from a table spec, in the creating state.
    pub fn from_spec(spec: &TableSpec) -> Self {
        Self {
            name: spec.name.clone(),
            key: spec.key.clone(),
            key_type: spec.key_type.code().to_string(),
            read_capacity: spec.throughput.read,
            write_capacity: spec.throughput.write,
            status: status_code(TableStatus::Creating),
        }
    }

    /// Convert back to a table spec. Fails on a key type code this
    /// version does not know.
    pub fn to_spec(&self) -> Result<TableSpec> {
        let key_type = KeyType::from_code(&self.key_type).ok_or_else(|| {
            Error::Serialization(format!(
                "table {} has unknown key type {:?}",
                self.name, self.key_type
            ))
        })?;
        Ok(TableSpec {
            name: self.name.clone(),
            key: self.key.clone(),
            key_type,
            throughput: Throughput {
                read: self.read_capacity,
                write: self.write_capacity,
            },
        })
    }

    pub fn status(&self) -> TableStatus {
        match self.status {
            0 => TableStatus::Creating,
            1 => TableStatus::Active,
            _ => TableStatus::Deleting,
        }
    }
}

pub fn status_code(status: TableStatus) -> u8 {
    match status {
        TableStatus::Creating => 0,
        TableStatus::Active => 1,
        TableStatus::Deleting => 2,
    }
}
