//! Error types for store operations.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Native DB error.
    #[error("Database error: {0}")]
    Database(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Remote store error.
    #[error("Backend error: {0}")]
    Backend(String),

    /// Table does not exist.
    #[error("Table not found: {0}")]
    TableNotFound(String),

    /// Table already exists.
    #[error("Table already exists: {0}")]
    TableExists(String),

    /// Item rejected before it reached storage.
    #[error("Invalid item: {0}")]
    InvalidItem(#[from] schoolbase_core::Error),

    /// Table never reported active.
    #[error("Table {table} not active after {attempts} attempts")]
    WaitTimeout { table: String, attempts: u32 },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, Error>;
