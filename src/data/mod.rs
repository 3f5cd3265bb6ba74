//! Run records and the immutable dataset they live in.
//!
//! A [`Record`] is one run's data keyed by raw field name. Records are
//! persistent maps, so enrichment produces new records that share structure
//! with the originals instead of mutating them. A [`Dataset`] is loaded and
//! enriched once, then shared read-only by every comparison.

pub mod csv;

use crate::value::Number;
use im::HashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

pub use self::csv::{parse_csv, read_csv};

/// A raw cell value as held by a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Numeric view of the value, parsing text with the same rule the
    /// comparison engine uses.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => crate::value::classify(Some(self))
                .as_number()
                .map(Number::as_f64),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// One run's data. Absent keys are legal and distinct from empty text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    fields: HashMap<String, FieldValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns a new record with `key` set to `value`; `self` is untouched.
    #[must_use]
    pub fn with_field(&self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self {
            fields: self.fields.update(key.into(), value.into()),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.fields.keys()
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// The loaded runs plus the column order of the source table.
///
/// Cloning is cheap; all clones share the same records.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    columns: Arc<[String]>,
    records: Arc<[Record]>,
    enriched: bool,
}

impl Dataset {
    pub fn new(columns: Vec<String>, records: Vec<Record>) -> Self {
        Self {
            columns: columns.into(),
            records: records.into(),
            enriched: false,
        }
    }

    /// Whether derived metrics have been applied.
    pub fn is_enriched(&self) -> bool {
        self.enriched
    }

    pub(crate) fn into_enriched(mut self) -> Self {
        self.enriched = true;
        self
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
