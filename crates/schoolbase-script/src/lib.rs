//! Schoolbase Script - RON catalog loader
//!
//! Loads table specs and seed rows from RON:
//! - the built-in school catalog (`Catalog::school`)
//! - site catalogs from files or directories (`Loader`)

mod catalog;
mod error;
mod loader;

pub use catalog::Catalog;
pub use error::{Error, Result};
pub use loader::Loader;
