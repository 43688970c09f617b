//! Table specs plus the seed rows destined for them

use crate::error::Result;
use crate::loader::Loader;
use indexmap::IndexMap;
use schoolbase_core::{Error as SeedError, SeedRecord, TableSpec};
use std::collections::HashSet;

const SCHOOL_CATALOG: &str = include_str!("../data/school.ron");

/// Everything a provisioning run applies to a store
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    /// Managed tables, in provisioning order
    pub tables: Vec<TableSpec>,
    /// Seed rows by table name, in insertion order
    pub seeds: IndexMap<String, Vec<SeedRecord>>,
}

impl Catalog {
    /// The built-in school management catalog: six tables, demo rows for
    /// all but Attendance.
    pub fn school() -> Result<Self> {
        let mut loader = Loader::new();
        loader.load_str(SCHOOL_CATALOG)?;
        loader.finish()
    }

    /// Look up a managed table
    pub fn table(&self, name: &str) -> Option<&TableSpec> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Managed table names in provisioning order
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|t| t.name.as_str())
    }

    /// Seed rows for a table (empty if it has none)
    pub fn seeds_for(&self, table: &str) -> &[SeedRecord] {
        self.seeds.get(table).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of seed rows
    pub fn seed_count(&self) -> usize {
        self.seeds.values().map(Vec::len).sum()
    }

    /// Every problem with the seed rows: unknown tables, missing, empty or
    /// mistyped keys, duplicate keys.
    pub fn validate(&self) -> Vec<SeedError> {
        let mut problems = Vec::new();
        for (table, records) in &self.seeds {
            let Some(spec) = self.table(table) else {
                problems.push(SeedError::UnknownTable(table.clone()));
                continue;
            };
            let mut seen = HashSet::new();
            for record in records {
                match record.key_value(spec) {
                    Ok(key) => {
                        let rendered = key.key_string().unwrap_or_default();
                        if !seen.insert(rendered.clone()) {
                            problems.push(SeedError::DuplicateKey {
                                table: table.clone(),
                                value: rendered,
                            });
                        }
                    }
                    Err(e) => problems.push(e),
                }
            }
        }
        problems
    }
}
