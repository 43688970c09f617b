//! Error types for provisioning runs

use thiserror::Error;

/// Errors that abort a provisioning run
#[derive(Debug, Error)]
pub enum Error {
    #[error("Store error: {0}")]
    Store(#[from] schoolbase_db::Error),

    #[error("Catalog error: {0}")]
    Catalog(#[from] schoolbase_script::Error),

    #[error("DynamoDB error: {0}")]
    Dynamo(#[from] schoolbase_dynamo::DynamoError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for provisioning
pub type Result<T> = std::result::Result<T, Error>;
