//! Schoolbase Dynamo - `TableStore` over Amazon DynamoDB
//!
//! Targets DynamoDB Local by default (`http://localhost:8000`, dummy
//! credentials). The SDK is async; `DynamoStore` owns a current-thread
//! runtime and blocks on each call, so callers stay sequential.

mod config;
mod convert;
mod error;
mod store;

pub use config::DynamoConfig;
pub use convert::{from_attribute, from_attributes, to_attribute, to_attributes};
pub use error::{DynamoError, Result};
pub use store::DynamoStore;
