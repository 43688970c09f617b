//! Schoolbase DB - table store contract and local backend
//!
//! Provides:
//! - `TableStore`, the store operations the provisioner consumes
//!   (list, create, wait-until-active, put, get, scan, delete)
//! - `LocalStore`, an embedded implementation on native_db, in memory or
//!   file-backed

mod error;
mod models;
mod store;
mod traits;

pub use error::{Error, Result};
pub use store::LocalStore;
pub use traits::{TableStatus, TableStore, WaitPolicy};
