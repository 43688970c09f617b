//! Error types for schoolbase-core

use thiserror::Error;

/// Seed-row validation error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Item for table {table} is missing key attribute '{key}'")]
    MissingKey { table: String, key: String },

    #[error("Item for table {table} has an empty value for key attribute '{key}'")]
    EmptyKey { table: String, key: String },

    #[error("Key attribute '{key}' of table {table} must be {expected}, got {got}")]
    KeyTypeMismatch {
        table: String,
        key: String,
        expected: String,
        got: String,
    },

    #[error("Duplicate key {value} in table {table}")]
    DuplicateKey { table: String, value: String },

    #[error("Unknown table: {0}")]
    UnknownTable(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
