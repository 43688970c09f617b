//! RON configuration for provisioning runs

use crate::error::{Error, Result};
use schoolbase_db::{LocalStore, TableStore, WaitPolicy};
use schoolbase_dynamo::{DynamoConfig, DynamoStore};
use schoolbase_script::{Catalog, Loader};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Which store a run talks to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Backend {
    /// DynamoDB or DynamoDB Local
    #[default]
    Dynamo,
    /// Embedded native_db store
    Local,
}

/// Root configuration
///
/// ```ron
/// (
///     backend: Dynamo,
///     dynamodb: (endpoint: Some("http://localhost:8000"), region: "local"),
///     wait: (attempts: 25, delay_ms: 200),
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvisionConfig {
    #[serde(default)]
    pub backend: Backend,
    /// Connection settings for the Dynamo backend
    #[serde(default)]
    pub dynamodb: DynamoConfig,
    /// Database file for the local backend; in-memory when absent
    #[serde(default)]
    pub local_path: Option<PathBuf>,
    /// RON file or directory replacing the built-in school catalog
    #[serde(default)]
    pub catalog: Option<PathBuf>,
    /// Bounds on waiting for a new table to become active
    #[serde(default)]
    pub wait: WaitPolicy,
    /// Characters of compact JSON shown per inserted item
    #[serde(default = "default_preview_width")]
    pub preview_width: usize,
    /// Drop the managed tables before provisioning
    #[serde(default)]
    pub reset: bool,
}

fn default_preview_width() -> usize {
    50
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            dynamodb: DynamoConfig::default(),
            local_path: None,
            catalog: None,
            wait: WaitPolicy::default(),
            preview_width: default_preview_width(),
            reset: false,
        }
    }
}

impl ProvisionConfig {
    /// Load configuration from a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        Self::parse(&content)
    }

    /// Parse configuration from RON text
    pub fn parse(content: &str) -> Result<Self> {
        ron::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Apply environment overrides (`DYNAMODB_ENDPOINT`, `DYNAMODB_REGION`)
    pub fn apply_env(&mut self) {
        self.dynamodb.apply_env();
    }

    /// Open the configured store
    pub fn open_store(&self) -> Result<Box<dyn TableStore>> {
        match self.backend {
            Backend::Dynamo => Ok(Box::new(DynamoStore::connect(&self.dynamodb)?)),
            Backend::Local => {
                let store = match &self.local_path {
                    Some(path) => LocalStore::open(path)?,
                    None => LocalStore::in_memory()?,
                };
                Ok(Box::new(store))
            }
        }
    }

    /// The configured catalog, or the built-in school catalog
    pub fn load_catalog(&self) -> Result<Catalog> {
        match &self.catalog {
            Some(path) => {
                let mut loader = Loader::new();
                loader.load_path(path)?;
                Ok(loader.finish()?)
            }
            None => Ok(Catalog::school()?),
        }
    }
}
