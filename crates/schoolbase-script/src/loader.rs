//! RON catalog loader

use crate::catalog::Catalog;
use crate::error::{Error, Result};
use indexmap::IndexMap;
use schoolbase_core::{Error as SeedError, SeedRecord, TableSpec};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// On-disk shape of a catalog file. Either section may be omitted.
#[derive(serde::Deserialize)]
struct CatalogFile {
    #[serde(default)]
    tables: Vec<TableSpec>,
    #[serde(default)]
    seeds: IndexMap<String, Vec<SeedRecord>>,
}

/// Loader for RON catalogs.
///
/// Several files can be loaded into one catalog; tables and seed rows are
/// cross-checked in [`Loader::finish`], so a seed file may come before the
/// file declaring its table.
pub struct Loader {
    catalog: Catalog,
}

impl Loader {
    /// Create a new loader
    pub fn new() -> Self {
        Self {
            catalog: Catalog::default(),
        }
    }

    /// Load a single RON file
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let content = fs::read_to_string(path.as_ref())?;
        self.load_str(&content)
    }

    /// Load a catalog from a RON string
    pub fn load_str(&mut self, content: &str) -> Result<()> {
        let file: CatalogFile = ron::from_str(content)?;
        for table in file.tables {
            if self.catalog.table(&table.name).is_some() {
                return Err(Error::DuplicateTable(table.name));
            }
            self.catalog.tables.push(table);
        }
        for (table, records) in file.seeds {
            self.catalog.seeds.entry(table).or_default().extend(records);
        }
        Ok(())
    }

    /// Load all RON files from a directory, in file name order
    pub fn load_directory(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if !path.is_dir() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Not a directory: {:?}", path),
            )));
        }

        let mut entries = fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<Vec<_>>>()?;
        entries.sort();

        for file_path in entries {
            if file_path.extension().map(|e| e == "ron").unwrap_or(false) {
                self.load_file(&file_path)?;
            } else if file_path.is_dir() {
                // Recursively load subdirectories
                self.load_directory(&file_path)?;
            }
        }

        Ok(())
    }

    /// Load a file or a directory, whichever `path` is
    pub fn load_path(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if path.is_dir() {
            self.load_directory(path)
        } else {
            self.load_file(path)
        }
    }

    /// Finish loading and return the catalog.
    ///
    /// Rejects seed rows for undeclared tables and duplicate keys within a
    /// table. Rows with a missing or mistyped key pass through; the store
    /// rejects them one by one at insert time.
    pub fn finish(self) -> Result<Catalog> {
        let catalog = self.catalog;
        for (table, records) in &catalog.seeds {
            let spec = catalog
                .table(table)
                .ok_or_else(|| SeedError::UnknownTable(table.clone()))?;
            let mut seen = HashSet::new();
            for record in records {
                let Some(key) = record.key_value(spec).ok().and_then(|k| k.key_string()) else {
                    continue;
                };
                if !seen.insert(key.clone()) {
                    return Err(SeedError::DuplicateKey {
                        table: table.clone(),
                        value: key,
                    }
                    .into());
                }
            }
        }
        Ok(catalog)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLES: &str = r#"
    (
        tables: [
            (name: "Exams", key: "examId"),
            (name: "Grades", key: "gradeId", throughput: (read: 1, write: 1)),
        ],
    )
    "#;

    const SEEDS: &str = r#"
    (
        seeds: {
            "Exams": [
                { "examId": String("E1"), "subject": String("English") },
                { "subject": String("No key") },
            ],
        },
    )
    "#;

    #[test]
    fn test_load_tables_and_seeds() {
        let mut loader = Loader::new();
        loader.load_str(SEEDS).unwrap();
        loader.load_str(TABLES).unwrap();

        let catalog = loader.finish().unwrap();
        assert_eq!(catalog.tables.len(), 2);
        assert_eq!(catalog.table("Grades").unwrap().throughput.read, 1);
        // rows without keys are kept for the store to reject
        assert_eq!(catalog.seeds_for("Exams").len(), 2);
    }

    #[test]
    fn test_duplicate_table() {
        let mut loader = Loader::new();
        loader.load_str(TABLES).unwrap();
        let err = loader.load_str(TABLES).unwrap_err();
        assert!(matches!(err, Error::DuplicateTable(name) if name == "Exams"));
    }

    #[test]
    fn test_seeds_for_unknown_table() {
        let mut loader = Loader::new();
        loader.load_str(SEEDS).unwrap();
        let err = loader.finish().unwrap_err();
        assert!(matches!(err, Error::Seed(SeedError::UnknownTable(name)) if name == "Exams"));
    }

    #[test]
    fn test_duplicate_key() {
        let mut loader = Loader::new();
        loader.load_str(TABLES).unwrap();
        loader.load_str(SEEDS).unwrap();
        loader.load_str(SEEDS).unwrap();
        let err = loader.finish().unwrap_err();
        assert!(matches!(
            err,
            Error::Seed(SeedError::DuplicateKey { value, .. }) if value == "E1"
        ));
    }

    #[test]
    fn test_load_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("01-tables.ron"), TABLES).unwrap();
        fs::create_dir(dir.path().join("seeds")).unwrap();
        fs::write(dir.path().join("seeds").join("exams.ron"), SEEDS).unwrap();
        fs::write(dir.path().join("README.txt"), "ignored").unwrap();

        let mut loader = Loader::new();
        loader.load_path(dir.path()).unwrap();
        let catalog = loader.finish().unwrap();
        assert_eq!(catalog.tables.len(), 2);
        assert_eq!(catalog.seed_count(), 2);
    }

    #[test]
    fn test_parse_error() {
        let mut loader = Loader::new();
        assert!(matches!(loader.load_str("(tables: [("), Err(Error::Ron(_))));
    }
}
