//! Table schema descriptors

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Scalar type of a table's primary key attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum KeyType {
    /// String key (`S`)
    #[default]
    String,
    /// Number key (`N`)
    Number,
}

impl KeyType {
    /// Attribute type code used on the wire
    pub fn code(&self) -> &'static str {
        match self {
            KeyType::String => "S",
            KeyType::Number => "N",
        }
    }

    /// Parse a wire attribute type code
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "S" => Some(KeyType::String),
            "N" => Some(KeyType::Number),
            _ => None,
        }
    }

    /// Whether a value can be used as a key of this type
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            KeyType::String => matches!(value, Value::String(_)),
            KeyType::Number => matches!(value, Value::Int(_) | Value::Float(_)),
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyType::String => write!(f, "string"),
            KeyType::Number => write!(f, "number"),
        }
    }
}

/// Provisioned throughput hints.
///
/// Informational only for on-demand backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Throughput {
    /// Read capacity units
    #[serde(default = "default_capacity")]
    pub read: i64,
    /// Write capacity units
    #[serde(default = "default_capacity")]
    pub write: i64,
}

fn default_capacity() -> i64 {
    5
}

impl Default for Throughput {
    fn default() -> Self {
        Self {
            read: default_capacity(),
            write: default_capacity(),
        }
    }
}

/// Static definition of a table: name, hash key, capacity hints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSpec {
    /// Table name, unique within a store
    pub name: String,
    /// Primary (hash) key attribute name
    pub key: String,
    /// Primary key type
    #[serde(default)]
    pub key_type: KeyType,
    /// Capacity hints
    #[serde(default)]
    pub throughput: Throughput,
}

impl TableSpec {
    /// Create a table spec with a string hash key and default throughput
    pub fn new(name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: key.into(),
            key_type: KeyType::String,
            throughput: Throughput::default(),
        }
    }

    /// Set the key type
    pub fn with_key_type(mut self, key_type: KeyType) -> Self {
        self.key_type = key_type;
        self
    }

    /// Set the throughput hints
    pub fn with_throughput(mut self, read: i64, write: i64) -> Self {
        self.throughput = Throughput { read, write };
        self
    }
}
