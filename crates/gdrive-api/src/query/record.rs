//! Read-only wrappers for records returned by a search.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::{QueryError, QueryResult};

/// One record as returned by the service.
///
/// The record exposes exactly the keys the service sent, in the order it sent
/// them. Lookups return `None` for absent keys; two records in the same set
/// may have different keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    /// Wraps a raw mapping.
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Returns the value for `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Returns the value for `key` if it is a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Returns the value for `key` if it is a boolean.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    /// Returns the record's `id`, if it has one.
    pub fn id(&self) -> Option<&str> {
        self.get_str("id")
    }

    /// Returns true if `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Iterates over the keys in service order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Iterates over `(key, value)` pairs in service order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of keys.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the record has no keys.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the underlying mapping.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }
}

impl From<Map<String, Value>> for Record {
    fn from(fields: Map<String, Value>) -> Self {
        Self::new(fields)
    }
}

/// An ordered batch of records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordSet {
    records: Vec<Record>,
}

impl RecordSet {
    /// Returns the first record.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::EmptyResult` if the set is empty.
    pub fn first(&self) -> QueryResult<&Record> {
        self.get(0)
    }

    /// Returns the record at `index`.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::EmptyResult` if the set is empty and
    /// `QueryError::IndexOutOfRange` if `index` is past the end.
    pub fn get(&self, index: usize) -> QueryResult<&Record> {
        if self.records.is_empty() {
            return Err(QueryError::EmptyResult);
        }
        self.records.get(index).ok_or(QueryError::IndexOutOfRange {
            index,
            len: self.records.len(),
        })
    }

    /// Iterates over the records in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Returns the number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if there are no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Appends the records of `other`.
    pub fn extend(&mut self, other: RecordSet) {
        self.records.extend(other.records);
    }

    /// Keeps at most `len` records.
    pub fn truncate(&mut self, len: usize) {
        self.records.truncate(len);
    }

    /// Consumes the set, returning the records.
    pub fn into_vec(self) -> Vec<Record> {
        self.records
    }
}

impl IntoIterator for RecordSet {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl FromIterator<Record> for RecordSet {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

/// Wraps raw record mappings, keeping order and per-record keys.
pub fn adapt<I>(records: I) -> RecordSet
where
    I: IntoIterator<Item = Map<String, Value>>,
{
    records.into_iter().map(Record::new).collect()
}

/// Wraps a JSON array of objects. Non-object elements are dropped.
pub fn adapt_values(values: Vec<Value>) -> RecordSet {
    adapt(values.into_iter().filter_map(|value| match value {
        Value::Object(map) => Some(map),
        _ => None,
    }))
}
