//! The provisioning pipeline: create tables, seed them, show what is there.
//!
//! Every step writes human-readable progress to the output writer and
//! returns structured outcomes. Table and item failures are recorded and
//! the pipeline moves on; listing and scanning failures abort the run.

use crate::error::Result;
use crate::report::{ItemOutcome, ItemResult, ProvisionReport, TableOutcome, TableResult};
use schoolbase_core::{item_to_json, Item, TableSpec, Value};
use schoolbase_db::{Error as StoreError, TableStore, WaitPolicy};
use schoolbase_script::Catalog;
use std::collections::HashSet;
use std::io::Write;
use tracing::{debug, info, warn};

/// Applies a catalog to a store.
///
/// The store is borrowed for the provisioner's lifetime; nothing is global.
pub struct Provisioner<'a, S: TableStore + ?Sized, W: Write> {
    store: &'a S,
    catalog: &'a Catalog,
    wait: WaitPolicy,
    preview_width: usize,
    out: W,
}

impl<'a, S: TableStore + ?Sized, W: Write> Provisioner<'a, S, W> {
    pub fn new(store: &'a S, catalog: &'a Catalog, out: W) -> Self {
        Self {
            store,
            catalog,
            wait: WaitPolicy::default(),
            preview_width: 50,
            out,
        }
    }

    pub fn with_wait_policy(mut self, wait: WaitPolicy) -> Self {
        self.wait = wait;
        self
    }

    pub fn with_preview_width(mut self, width: usize) -> Self {
        self.preview_width = width;
        self
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Create every managed table that does not exist yet and wait for it
    /// to become active. Existing tables are skipped untouched.
    pub fn ensure_tables(&mut self) -> Result<Vec<TableResult>> {
        let existing: HashSet<String> = self.store.list_tables()?.into_iter().collect();
        let catalog = self.catalog;

        let mut results = Vec::with_capacity(catalog.tables.len());
        for spec in &catalog.tables {
            let outcome = if existing.contains(&spec.name) {
                writeln!(self.out, "Table {} already exists, skipping.", spec.name)?;
                TableOutcome::Skipped
            } else {
                self.create_table(spec)?
            };
            results.push((spec.name.clone(), outcome));
        }
        Ok(results)
    }

    fn create_table(&mut self, spec: &TableSpec) -> Result<TableOutcome> {
        writeln!(self.out, "Creating table: {}", spec.name)?;
        match self.store.create_table(spec) {
            Ok(()) => {}
            // Created by someone else since we listed
            Err(StoreError::TableExists(_)) => {
                writeln!(self.out, "Table {} already exists, skipping.", spec.name)?;
                return Ok(TableOutcome::Skipped);
            }
            Err(e) => return self.table_failed("creating", &spec.name, e),
        }

        writeln!(self.out, "Waiting for table {} to be created...", spec.name)?;
        if let Err(e) = self.store.wait_until_active(&spec.name, &self.wait) {
            return self.table_failed("creating", &spec.name, e);
        }

        writeln!(self.out, "Table {} created successfully!", spec.name)?;
        info!(table = %spec.name, key = %spec.key, "created table");
        Ok(TableOutcome::Created)
    }

    fn table_failed(&mut self, action: &str, table: &str, err: StoreError) -> Result<TableOutcome> {
        writeln!(self.out, "Error {} table {}: {}", action, table, err)?;
        warn!(table, error = %err, "error {} table", action);
        Ok(TableOutcome::Failed(err.to_string()))
    }

    /// Write every seed record, overwriting records with the same key.
    ///
    /// A rejected record is reported and the remaining records are still
    /// written.
    pub fn insert_initial_data(&mut self) -> Result<Vec<ItemResult>> {
        let catalog = self.catalog;

        let mut results = Vec::with_capacity(catalog.seed_count());
        for (table, records) in &catalog.seeds {
            writeln!(self.out, "Inserting data into {}...", table)?;
            let key_name = catalog.table(table).map(|spec| spec.key.as_str());

            for record in records {
                let key = key_name
                    .and_then(|name| record.get(name))
                    .and_then(Value::key_string)
                    .unwrap_or_else(|| "?".to_string());

                let outcome = match self.store.put_item(table, record.item()) {
                    Ok(()) => {
                        writeln!(self.out, "  Added item: {}...", record.preview(self.preview_width))?;
                        debug!(table = %table, key = %key, "inserted seed record");
                        ItemOutcome::Inserted
                    }
                    Err(e) => {
                        writeln!(self.out, "Error inserting item into {}: {}", table, e)?;
                        warn!(table = %table, key = %key, error = %e, "seed record rejected");
                        ItemOutcome::Failed(e.to_string())
                    }
                };
                results.push((table.clone(), key, outcome));
            }
        }
        Ok(results)
    }

    /// Print and return every table name the store knows, managed or not
    pub fn list_all_tables(&mut self) -> Result<Vec<String>> {
        let names = self.store.list_tables()?;
        writeln!(self.out, "\nExisting tables:")?;
        for name in &names {
            writeln!(self.out, "- {}", name)?;
        }
        Ok(names)
    }

    /// Print and return every item in a table as indented JSON
    pub fn dump_table_data(&mut self, table: &str) -> Result<Vec<Item>> {
        let items = self.store.scan(table)?;
        writeln!(self.out, "\nData in {} table:", table)?;
        for item in &items {
            writeln!(self.out, "{}", serde_json::to_string_pretty(&item_to_json(item))?)?;
        }
        Ok(items)
    }

    /// Drop the managed tables that exist and wait for them to disappear.
    /// Tables outside the catalog are never touched.
    pub fn reset(&mut self) -> Result<Vec<TableResult>> {
        let existing: HashSet<String> = self.store.list_tables()?.into_iter().collect();
        let catalog = self.catalog;

        let mut results = Vec::new();
        for spec in catalog.tables.iter().filter(|s| existing.contains(&s.name)) {
            writeln!(self.out, "Deleting table: {}", spec.name)?;
            let outcome = match self.delete_table(&spec.name) {
                Ok(()) => {
                    info!(table = %spec.name, "deleted table");
                    TableOutcome::Deleted
                }
                Err(e) => self.table_failed("deleting", &spec.name, e)?,
            };
            results.push((spec.name.clone(), outcome));
        }
        Ok(results)
    }

    fn delete_table(&self, table: &str) -> schoolbase_db::Result<()> {
        match self.store.delete_table(table) {
            Ok(()) | Err(StoreError::TableNotFound(_)) => {}
            Err(e) => return Err(e),
        }
        for attempt in 0..self.wait.attempts {
            if self.store.describe_table(table)?.is_none() {
                return Ok(());
            }
            debug!(table, attempt, "waiting for table to be deleted");
            std::thread::sleep(self.wait.delay());
        }
        Err(StoreError::WaitTimeout {
            table: table.to_string(),
            attempts: self.wait.attempts,
        })
    }

    /// Run the whole pipeline: ensure tables, seed them, list every table,
    /// then dump each managed table.
    pub fn run(&mut self) -> Result<ProvisionReport> {
        writeln!(self.out, "Creating tables for School Management System...")?;

        let tables = self.ensure_tables()?;
        let items = self.insert_initial_data()?;
        let existing_tables = self.list_all_tables()?;

        let catalog = self.catalog;
        let mut dumped = Vec::with_capacity(catalog.tables.len());
        for name in catalog.table_names() {
            let items = self.dump_table_data(name)?;
            dumped.push((name.to_string(), items.len()));
        }

        let report = ProvisionReport {
            tables,
            items,
            existing_tables,
            dumped,
        };

        if report.is_clean() {
            writeln!(self.out, "\nSetup completed successfully!")?;
        } else {
            writeln!(
                self.out,
                "\nSetup completed with {} failure(s).",
                report.failures()
            )?;
        }
        info!(
            created = report.created(),
            skipped = report.skipped(),
            inserted = report.inserted(),
            failures = report.failures(),
            "provisioning finished"
        );
        Ok(report)
    }
}
