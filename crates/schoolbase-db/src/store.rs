//! Embedded table store on native_db.

use crate::error::{Error, Result};
use crate::models::*;
use crate::traits::{TableStatus, TableStore};
use native_db::*;
use schoolbase_core::{Item, SeedRecord, TableSpec, Value};
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

// Static models for the database
static MODELS: LazyLock<Models> = LazyLock::new(|| {
    let mut models = Models::new();
    models.define::<StoredTable>().unwrap();
    models.define::<StoredItem>().unwrap();
    models
});

/// Local table store.
///
/// Newly created tables report `Creating` on their first describe and
/// `Active` from then on, the same shape a remote store shows.
pub struct LocalStore {
    pub(crate) db: Database<'static>,
}

impl LocalStore {
    /// Open or create a database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = Builder::new()
            .create(&MODELS, path.as_ref())
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(Self { db })
    }

    /// Create an in-memory database.
    pub fn in_memory() -> Result<Self> {
        let db = Builder::new()
            .create_in_memory(&MODELS)
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(Self { db })
    }

    pub(crate) fn load_table(&self, name: &str) -> Result<Option<StoredTable>> {
        let r = self.db.r_transaction()?;
        let stored: Option<StoredTable> = r.get().primary(name.to_string())?;
        Ok(stored)
    }

    fn require_table(&self, name: &str) -> Result<StoredTable> {
        self.load_table(name)?
            .ok_or_else(|| Error::TableNotFound(name.to_string()))
    }

    pub(crate) fn load_items(&self, table: &str) -> Result<Vec<StoredItem>> {
        let r = self.db.r_transaction()?;
        let scan = r.scan().secondary::<StoredItem>(StoredItemKey::table)?;
        let iter = scan.start_with(table.to_string())?;
        let items: std::result::Result<Vec<StoredItem>, _> = iter.collect();
        let items = items.map_err(|e| Error::Database(e.to_string()))?;
        // start_with is a prefix match; "Users" must not pick up "UsersArchive"
        Ok(items.into_iter().filter(|i| i.table == table).collect())
    }
}

impl TableStore for LocalStore {
    fn list_tables(&self) -> Result<Vec<String>> {
        let r = self.db.r_transaction()?;
        let scan = r.scan().primary::<StoredTable>()?;
        let iter = scan.all()?;
        let tables: std::result::Result<Vec<StoredTable>, _> = iter.collect();
        let tables = tables.map_err(|e| Error::Database(e.to_string()))?;
        Ok(tables.into_iter().map(|t| t.name).collect())
    }

    fn create_table(&self, spec: &TableSpec) -> Result<()> {
        let rw = self.db.rw_transaction()?;
        let existing: Option<StoredTable> = rw.get().primary(spec.name.clone())?;
        if existing.is_some() {
            return Err(Error::TableExists(spec.name.clone()));
        }
        rw.insert(StoredTable::from_spec(spec))?;
        rw.commit()?;
        debug!(table = %spec.name, key = %spec.key, "created local table");
        Ok(())
    }

    fn describe_table(&self, name: &str) -> Result<Option<TableStatus>> {
        let Some(mut stored) = self.load_table(name)? else {
            return Ok(None);
        };
        let status = stored.status();
        if status == TableStatus::Creating {
            // Creation finishes once somebody has observed it in progress
            stored.status = status_code(TableStatus::Active);
            let rw = self.db.rw_transaction()?;
            rw.upsert(stored)?;
            rw.commit()?;
        }
        Ok(Some(status))
    }

    fn delete_table(&self, name: &str) -> Result<()> {
        let stored = self.require_table(name)?;
        let items = self.load_items(name)?;

        let rw = self.db.rw_transaction()?;
        for item in items {
            rw.remove(item)?;
        }
        rw.remove(stored)?;
        rw.commit()?;
        debug!(table = name, "deleted local table");
        Ok(())
    }

    fn put_item(&self, table: &str, item: &Item) -> Result<()> {
        let spec = self.require_table(table)?.to_spec()?;
        let record = SeedRecord::from(item.clone());
        let key = record.key_value(&spec)?;
        let rendered = key.key_string().ok_or_else(|| {
            Error::Serialization(format!("{} is not usable as a key", key.type_name()))
        })?;

        let stored = StoredItem::from_item(table, rendered, item)?;
        let rw = self.db.rw_transaction()?;
        rw.upsert(stored)?;
        rw.commit()?;
        Ok(())
    }

    fn get_item(&self, table: &str, _key_name: &str, key: &Value) -> Result<Option<Item>> {
        self.require_table(table)?;
        let Some(rendered) = key.key_string() else {
            return Ok(None);
        };
        let r = self.db.r_transaction()?;
        let stored: Option<StoredItem> = r.get().primary(StoredItem::item_id(table, &rendered))?;
        stored.map(|s| s.to_item()).transpose()
    }

    fn scan(&self, table: &str) -> Result<Vec<Item>> {
        self.require_table(table)?;
        self.load_items(table)?
            .iter()
            .map(StoredItem::to_item)
            .collect()
    }
}

impl From<native_db::db_type::Error> for Error {
    fn from(err: native_db::db_type::Error) -> Self {
        Error::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::WaitPolicy;
    use schoolbase_core::KeyType;

    fn teacher(name: &str) -> Item {
        SeedRecord::new()
            .with("teacherId", "T001")
            .with("name", name)
            .with("classesAssigned", vec!["C001", "C002"])
            .into_item()
    }

    fn store_with_teachers() -> LocalStore {
        let store = LocalStore::in_memory().unwrap();
        store
            .create_table(&TableSpec::new("Teachers", "teacherId"))
            .unwrap();
        store
    }

    #[test]
    fn test_create_and_list() {
        let store = store_with_teachers();
        store.create_table(&TableSpec::new("Users", "username")).unwrap();

        let mut tables = store.list_tables().unwrap();
        tables.sort();
        assert_eq!(tables, vec!["Teachers", "Users"]);
    }

    #[test]
    fn test_create_twice_fails() {
        let store = store_with_teachers();
        let err = store
            .create_table(&TableSpec::new("Teachers", "teacherId"))
            .unwrap_err();
        assert!(matches!(err, Error::TableExists(name) if name == "Teachers"));
    }

    #[test]
    fn test_creating_then_active() {
        let store = store_with_teachers();
        assert_eq!(
            store.describe_table("Teachers").unwrap(),
            Some(TableStatus::Creating)
        );
        assert_eq!(
            store.describe_table("Teachers").unwrap(),
            Some(TableStatus::Active)
        );
        assert_eq!(store.describe_table("Nope").unwrap(), None);
    }

    #[test]
    fn test_wait_until_active() {
        let store = store_with_teachers();
        store
            .wait_until_active("Teachers", &WaitPolicy::immediate(2))
            .unwrap();
        let err = store
            .wait_until_active("Nope", &WaitPolicy::immediate(2))
            .unwrap_err();
        assert!(matches!(err, Error::WaitTimeout { .. }));
    }

    #[test]
    fn test_put_get_roundtrip() {
        let store = store_with_teachers();
        store.put_item("Teachers", &teacher("Ms. Shaw")).unwrap();

        let fetched = store
            .get_item("Teachers", "teacherId", &Value::from("T001"))
            .unwrap()
            .unwrap();
        assert_eq!(fetched, teacher("Ms. Shaw"));
        assert_eq!(
            store
                .get_item("Teachers", "teacherId", &Value::from("T999"))
                .unwrap(),
            None
        );
    }

    #[test]
    fn test_put_overwrites() {
        let store = store_with_teachers();
        store.put_item("Teachers", &teacher("Mr. Old")).unwrap();
        store.put_item("Teachers", &teacher("Ms. Shaw")).unwrap();

        let items = store.scan("Teachers").unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].get("name"), Some(&Value::from("Ms. Shaw")));
    }

    #[test]
    fn test_put_rejects_missing_key() {
        let store = store_with_teachers();
        let mut item = teacher("Ms. Shaw");
        item.shift_remove("teacherId");

        let err = store.put_item("Teachers", &item).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidItem(schoolbase_core::Error::MissingKey { .. })
        ));
        assert!(store.scan("Teachers").unwrap().is_empty());
    }

    #[test]
    fn test_number_key_type_persists() {
        let store = LocalStore::in_memory().unwrap();
        store
            .create_table(
                &TableSpec::new("Notifications", "notificationId").with_key_type(KeyType::Number),
            )
            .unwrap();

        let item = SeedRecord::new().with("notificationId", 1683824400000i64).into_item();
        store.put_item("Notifications", &item).unwrap();
        let fetched = store
            .get_item("Notifications", "notificationId", &Value::Int(1683824400000))
            .unwrap();
        assert_eq!(fetched, Some(item));

        let wrong = SeedRecord::new().with("notificationId", "N1").into_item();
        let err = store.put_item("Notifications", &wrong).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidItem(schoolbase_core::Error::KeyTypeMismatch { .. })
        ));
    }

    #[test]
    fn test_unknown_stored_key_type_is_an_error() {
        let store = LocalStore::in_memory().unwrap();
        let mut stored = StoredTable::from_spec(&TableSpec::new("Files", "fileId"));
        stored.key_type = "B".to_string();
        let rw = store.db.rw_transaction().unwrap();
        rw.insert(stored).unwrap();
        rw.commit().unwrap();

        let item = SeedRecord::new().with("fileId", "F1").into_item();
        let err = store.put_item("Files", &item).unwrap_err();
        assert!(matches!(err, Error::Serialization(msg) if msg.contains("unknown key type")));
    }

    #[test]
    fn test_put_into_missing_table() {
        let store = LocalStore::in_memory().unwrap();
        let err = store.put_item("Teachers", &teacher("Ms. Shaw")).unwrap_err();
        assert!(matches!(err, Error::TableNotFound(_)));
    }

    #[test]
    fn test_scan_does_not_leak_prefix_tables() {
        let store = store_with_teachers();
        store
            .create_table(&TableSpec::new("TeachersArchive", "teacherId"))
            .unwrap();
        store.put_item("Teachers", &teacher("Ms. Shaw")).unwrap();
        store.put_item("TeachersArchive", &teacher("Mr. Gone")).unwrap();

        assert_eq!(store.scan("Teachers").unwrap().len(), 1);
        assert_eq!(store.scan("TeachersArchive").unwrap().len(), 1);
    }

    #[test]
    fn test_delete_table_drops_items() {
        let store = store_with_teachers();
        store.put_item("Teachers", &teacher("Ms. Shaw")).unwrap();
        store.delete_table("Teachers").unwrap();

        assert!(store.list_tables().unwrap().is_empty());
        store
            .create_table(&TableSpec::new("Teachers", "teacherId"))
            .unwrap();
        assert!(store.scan("Teachers").unwrap().is_empty());
    }

    #[test]
    fn test_file_backed_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("school.db");
        {
            let store = LocalStore::open(&path).unwrap();
            store
                .create_table(&TableSpec::new("Teachers", "teacherId"))
                .unwrap();
            store.put_item("Teachers", &teacher("Ms. Shaw")).unwrap();
        }
        let store = LocalStore::open(&path).unwrap();
        assert_eq!(store.list_tables().unwrap(), vec!["Teachers"]);
        assert_eq!(store.scan("Teachers").unwrap().len(), 1);
    }
}
