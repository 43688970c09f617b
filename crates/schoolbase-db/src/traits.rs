//! The store contract consumed by the provisioner.

use crate::error::{Error, Result};
use schoolbase_core::{Item, TableSpec, Value};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Lifecycle state reported by a store for one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableStatus {
    Creating,
    Active,
    Deleting,
}

/// Bounds on the wait-until-active poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitPolicy {
    /// Number of describe calls before giving up
    #[serde(default = "default_attempts")]
    pub attempts: u32,
    /// Pause between describe calls, in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

fn default_attempts() -> u32 {
    25
}

fn default_delay_ms() -> u64 {
    200
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            attempts: default_attempts(),
            delay_ms: default_delay_ms(),
        }
    }
}

impl WaitPolicy {
    /// Policy that polls without sleeping
    pub fn immediate(attempts: u32) -> Self {
        Self {
            attempts,
            delay_ms: 0,
        }
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// A key-value store with named tables keyed by a single hash attribute.
///
/// Calls block until the store answers. One handle is used from one thread.
pub trait TableStore {
    /// Names of every table in the store.
    fn list_tables(&self) -> Result<Vec<String>>;

    /// Create a table. Fails with [`Error::TableExists`] if the name is taken.
    fn create_table(&self, spec: &TableSpec) -> Result<()>;

    /// Current status of a table, `None` if it does not exist.
    fn describe_table(&self, name: &str) -> Result<Option<TableStatus>>;

    /// Delete a table and all of its items.
    fn delete_table(&self, name: &str) -> Result<()>;

    /// Upsert a full item. An existing item with the same key is replaced.
    fn put_item(&self, table: &str, item: &Item) -> Result<()>;

    /// Fetch one item by its key value.
    fn get_item(&self, table: &str, key_name: &str, key: &Value) -> Result<Option<Item>>;

    /// Every item in the table.
    fn scan(&self, table: &str) -> Result<Vec<Item>>;

    /// Poll `describe_table` until the table reports active.
    fn wait_until_active(&self, name: &str, policy: &WaitPolicy) -> Result<()> {
        for attempt in 1..=policy.attempts {
            let status = self.describe_table(name)?;
            if status == Some(TableStatus::Active) {
                return Ok(());
            }
            debug!(table = name, attempt, ?status, "table not active yet");
            if attempt < policy.attempts {
                std::thread::sleep(policy.delay());
            }
        }
        Err(Error::WaitTimeout {
            table: name.to_string(),
            attempts: policy.attempts,
        })
    }
}

impl<T: TableStore + ?Sized> TableStore for &T {
    fn list_tables(&self) -> Result<Vec<String>> {
        (**self).list_tables()
    }

    fn create_table(&self, spec: &TableSpec) -> Result<()> {
        (**self).create_table(spec)
    }

    fn describe_table(&self, name: &str) -> Result<Option<TableStatus>> {
        (**self).describe_table(name)
    }

    fn delete_table(&self, name: &str) -> Result<()> {
        (**self).delete_table(name)
    }

    fn put_item(&self, table: &str, item: &Item) -> Result<()> {
        (**self).put_item(table, item)
    }

    fn get_item(&self, table: &str, key_name: &str, key: &Value) -> Result<Option<Item>> {
        (**self).get_item(table, key_name, key)
    }

    fn scan(&self, table: &str) -> Result<Vec<Item>> {
        (**self).scan(table)
    }

    fn wait_until_active(&self, name: &str, policy: &WaitPolicy) -> Result<()> {
        (**self).wait_until_active(name, policy)
    }
}

impl<T: TableStore + ?Sized> TableStore for Box<T> {
    fn list_tables(&self) -> Result<Vec<String>> {
        (**self).list_tables()
    }

    fn create_table(&self, spec: &TableSpec) -> Result<()> {
        (**self).create_table(spec)
    }

    fn describe_table(&self, name: &str) -> Result<Option<TableStatus>> {
        (**self).describe_table(name)
    }

    fn delete_table(&self, name: &str) -> Result<()> {
        (**self).delete_table(name)
    }

    fn put_item(&self, table: &str, item: &Item) -> Result<()> {
        (**self).put_item(table, item)
    }

    fn get_item(&self, table: &str, key_name: &str, key: &Value) -> Result<Option<Item>> {
        (**self).get_item(table, key_name, key)
    }

    fn scan(&self, table: &str) -> Result<Vec<Item>> {
        (**self).scan(table)
    }

    fn wait_until_active(&self, name: &str, policy: &WaitPolicy) -> Result<()> {
        (**self).wait_until_active(name, policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Reports `Creating` a fixed number of times, then `Active`.
    struct SlowStore {
        pending: Cell<u32>,
        describes: Cell<u32>,
    }

    impl TableStore for SlowStore {
        fn list_tables(&self) -> Result<Vec<String>> {
            Ok(vec![])
        }

        fn create_table(&self, _spec: &TableSpec) -> Result<()> {
            Ok(())
        }

        fn describe_table(&self, _name: &str) -> Result<Option<TableStatus>> {
            self.describes.set(self.describes.get() + 1);
            if self.pending.get() == 0 {
                return Ok(Some(TableStatus::Active));
            }
            self.pending.set(self.pending.get() - 1);
            Ok(Some(TableStatus::Creating))
        }

        fn delete_table(&self, _name: &str) -> Result<()> {
            Ok(())
        }

        fn put_item(&self, _table: &str, _item: &Item) -> Result<()> {
            Ok(())
        }

        fn get_item(&self, _table: &str, _key_name: &str, _key: &Value) -> Result<Option<Item>> {
            Ok(None)
        }

        fn scan(&self, _table: &str) -> Result<Vec<Item>> {
            Ok(vec![])
        }
    }

    #[test]
    fn test_wait_until_active_polls() {
        let store = SlowStore {
            pending: Cell::new(3),
            describes: Cell::new(0),
        };
        store
            .wait_until_active("Users", &WaitPolicy::immediate(5))
            .unwrap();
        assert_eq!(store.describes.get(), 4);
    }

    #[test]
    fn test_wait_until_active_is_bounded() {
        let store = SlowStore {
            pending: Cell::new(10),
            describes: Cell::new(0),
        };
        let err = store
            .wait_until_active("Users", &WaitPolicy::immediate(3))
            .unwrap_err();
        assert!(matches!(err, Error::WaitTimeout { attempts: 3, .. }));
        assert_eq!(store.describes.get(), 3);
    }

    #[test]
    fn test_wait_policy_from_defaults() {
        let policy = WaitPolicy::default();
        assert_eq!(policy.attempts, 25);
        assert_eq!(policy.delay(), Duration::from_millis(200));
    }
}
