//! Error types for schoolbase-script

use thiserror::Error;

/// Catalog loading error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    #[error("Duplicate table: {0}")]
    DuplicateTable(String),

    #[error(transparent)]
    Seed(#[from] schoolbase_core::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
