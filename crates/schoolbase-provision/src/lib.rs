//! Schoolbase Provision - creates and seeds the school management tables
//!
//! A run is a fixed pipeline against one [`TableStore`](schoolbase_db::TableStore):
//!
//! 1. create every managed table that is missing and wait for it
//! 2. upsert the seed records
//! 3. list every table in the store
//! 4. dump the contents of each managed table
//!
//! Each step prints progress to a writer and returns outcomes; the
//! [`ProvisionReport`] collects them for the caller.
//!
//! ```no_run
//! use schoolbase_db::LocalStore;
//! use schoolbase_provision::Provisioner;
//! use schoolbase_script::Catalog;
//!
//! let store = LocalStore::in_memory()?;
//! let catalog = Catalog::school()?;
//! let report = Provisioner::new(&store, &catalog, std::io::stdout()).run()?;
//! assert!(report.is_clean());
//! # Ok::<(), schoolbase_provision::Error>(())
//! ```

mod config;
mod error;
mod provisioner;
mod report;

pub use config::{Backend, ProvisionConfig};
pub use error::{Error, Result};
pub use provisioner::Provisioner;
pub use report::{ItemOutcome, ItemResult, ProvisionReport, TableOutcome, TableResult};
