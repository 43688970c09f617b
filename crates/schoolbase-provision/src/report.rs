//! Per-table and per-item outcomes of a provisioning run

use std::fmt;

/// What happened to one managed table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableOutcome {
    /// Created and seen active
    Created,
    /// Already present; left untouched
    Skipped,
    /// Dropped by `reset`
    Deleted,
    /// Create, wait or delete failed
    Failed(String),
}

impl TableOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, TableOutcome::Failed(_))
    }
}

impl fmt::Display for TableOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableOutcome::Created => write!(f, "created"),
            TableOutcome::Skipped => write!(f, "skipped"),
            TableOutcome::Deleted => write!(f, "deleted"),
            TableOutcome::Failed(msg) => write!(f, "failed: {}", msg),
        }
    }
}

/// What happened to one seed record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    Inserted,
    Failed(String),
}

impl ItemOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, ItemOutcome::Failed(_))
    }
}

/// Outcome of one table operation, by table name
pub type TableResult = (String, TableOutcome);

/// Outcome of one seed record: table name, key (or `?` when the record
/// has none), outcome
pub type ItemResult = (String, String, ItemOutcome);

/// Everything a full run did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProvisionReport {
    /// Outcome per managed table, in catalog order
    pub tables: Vec<TableResult>,
    /// Outcome per seed record, in catalog order
    pub items: Vec<ItemResult>,
    /// Every table name the store reported after seeding
    pub existing_tables: Vec<String>,
    /// Item count per dumped table
    pub dumped: Vec<(String, usize)>,
}

impl ProvisionReport {
    /// Tables whose create or wait failed
    pub fn table_failures(&self) -> usize {
        self.tables.iter().filter(|(_, o)| o.is_failure()).count()
    }

    /// Seed records that were not written
    pub fn item_failures(&self) -> usize {
        self.items.iter().filter(|(_, _, o)| o.is_failure()).count()
    }

    pub fn failures(&self) -> usize {
        self.table_failures() + self.item_failures()
    }

    pub fn is_clean(&self) -> bool {
        self.failures() == 0
    }

    pub fn created(&self) -> usize {
        self.count_tables(&TableOutcome::Created)
    }

    pub fn skipped(&self) -> usize {
        self.count_tables(&TableOutcome::Skipped)
    }

    pub fn inserted(&self) -> usize {
        self.items
            .iter()
            .filter(|(_, _, o)| *o == ItemOutcome::Inserted)
            .count()
    }

    /// Process exit status: 0 when clean, 1 when anything was recorded
    /// as failed
    pub fn exit_code(&self) -> u8 {
        if self.is_clean() {
            0
        } else {
            1
        }
    }

    fn count_tables(&self, outcome: &TableOutcome) -> usize {
        self.tables.iter().filter(|(_, o)| o == outcome).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_report() {
        let report = ProvisionReport {
            tables: vec![
                ("Teachers".into(), TableOutcome::Created),
                ("Classes".into(), TableOutcome::Skipped),
            ],
            items: vec![("Teachers".into(), "T001".into(), ItemOutcome::Inserted)],
            ..Default::default()
        };
        assert!(report.is_clean());
        assert_eq!(report.created(), 1);
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.inserted(), 1);
        assert_eq!(report.exit_code(), 0);
    }

    #[test]
    fn test_item_failure_sets_exit_code() {
        let report = ProvisionReport {
            items: vec![
                ("Teachers".into(), "T001".into(), ItemOutcome::Inserted),
                ("Teachers".into(), "?".into(), ItemOutcome::Failed("missing key".into())),
            ],
            ..Default::default()
        };
        assert_eq!(report.item_failures(), 1);
        assert_eq!(report.table_failures(), 0);
        assert_eq!(report.exit_code(), 1);
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(TableOutcome::Created.to_string(), "created");
        assert_eq!(
            TableOutcome::Failed("throttled".into()).to_string(),
            "failed: throttled"
        );
    }
}
