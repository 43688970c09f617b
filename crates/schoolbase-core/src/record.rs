//! Seed rows

use crate::error::{Error, Result};
use crate::table::TableSpec;
use crate::value::{item_to_json, Item, Value};
use serde::{Deserialize, Serialize};
use serde_json::ser::Formatter;
use std::io;

/// A static data row inserted into one table at provisioning time.
///
/// The owning table is given by where the record sits in a catalog; the
/// record itself is just its attributes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeedRecord {
    fields: Item,
}

impl SeedRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an attribute
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Get an attribute
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// All attributes in declaration order
    pub fn item(&self) -> &Item {
        &self.fields
    }

    pub fn into_item(self) -> Item {
        self.fields
    }

    /// The record's value for the table's key attribute, checked against
    /// the key type.
    pub fn key_value(&self, spec: &TableSpec) -> Result<&Value> {
        let value = self.fields.get(&spec.key).ok_or_else(|| Error::MissingKey {
            table: spec.name.clone(),
            key: spec.key.clone(),
        })?;
        if value.is_blank() {
            return Err(Error::EmptyKey {
                table: spec.name.clone(),
                key: spec.key.clone(),
            });
        }
        if !spec.key_type.accepts(value) {
            return Err(Error::KeyTypeMismatch {
                table: spec.name.clone(),
                key: spec.key.clone(),
                expected: spec.key_type.to_string(),
                got: value.type_name().to_string(),
            });
        }
        Ok(value)
    }

    /// Compact JSON rendering
    pub fn to_json(&self) -> serde_json::Value {
        item_to_json(&self.fields)
    }

    /// Single-line JSON cut to at most `width` characters.
    ///
    /// Separators are followed by a space and non-ASCII characters are
    /// written as `\uXXXX` escapes.
    pub fn preview(&self, width: usize) -> String {
        let mut buf = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
        let json = match self.to_json().serialize(&mut ser) {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => self.to_json().to_string(),
        };
        json.chars().take(width).collect()
    }
}

/// Compact JSON with a space after each separator and ASCII-only strings
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W: ?Sized + io::Write>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()> {
        if fragment.is_ascii() {
            return writer.write_all(fragment.as_bytes());
        }
        let mut units = [0u16; 2];
        for c in fragment.chars() {
            if c.is_ascii() {
                writer.write_all(&[c as u8])?;
            } else {
                for unit in c.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
        }
        Ok(())
    }
}

impl From<Item> for SeedRecord {
    fn from(fields: Item) -> Self {
        Self { fields }
    }
}
