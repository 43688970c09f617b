//! Schoolbase Core - data model for table provisioning
//!
//! This crate provides the types shared by every schoolbase crate:
//! - Dynamic attribute values (`Value`, `Item`)
//! - Table schema descriptors (`TableSpec`, `KeyType`, `Throughput`)
//! - Seed rows scoped to a table (`SeedRecord`)
//!
//! Nothing here talks to a store. Backends live in `schoolbase-db` and
//! `schoolbase-dynamo`; the catalog of school tables lives in
//! `schoolbase-script`.

mod error;
mod record;
mod table;
mod value;

pub use error::{Error, Result};
pub use record::SeedRecord;
pub use table::{KeyType, TableSpec, Throughput};
pub use value::{item_to_json, Item, Value};
