//! Error types for the DynamoDB backend

use thiserror::Error;

/// Errors from setting up or talking to DynamoDB
#[derive(Debug, Error)]
pub enum DynamoError {
    /// Runtime could not be started
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Request could not be built
    #[error("Invalid request: {0}")]
    Build(String),

    /// Attribute value with no counterpart in the item model
    #[error("Unsupported attribute value: {0}")]
    UnsupportedAttribute(String),

    /// DynamoDB SDK error
    #[error("DynamoDB error: {0}")]
    DynamoDB(String),
}

impl DynamoError {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    pub fn dynamodb(msg: impl Into<String>) -> Self {
        Self::DynamoDB(msg.into())
    }
}

/// Result type for DynamoDB backend operations
pub type Result<T> = std::result::Result<T, DynamoError>;

impl From<DynamoError> for schoolbase_db::Error {
    fn from(err: DynamoError) -> Self {
        match err {
            DynamoError::Io(e) => schoolbase_db::Error::Io(e),
            DynamoError::UnsupportedAttribute(msg) => schoolbase_db::Error::Serialization(msg),
            other => schoolbase_db::Error::Backend(other.to_string()),
        }
    }
}
