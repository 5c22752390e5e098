//! Input and output types of the query compiler.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use indexmap::IndexMap;

use super::registry::OperatorKind;

/// A loosely-typed filter value as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    /// Plain text. Parsed as a timestamp when given for a timestamp field.
    Text(String),
    /// A date/time without a zone; interpreted as UTC.
    DateTime(NaiveDateTime),
    /// A date/time already in UTC.
    Instant(DateTime<Utc>),
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

impl From<NaiveDateTime> for RawValue {
    fn from(value: NaiveDateTime) -> Self {
        RawValue::DateTime(value)
    }
}

impl From<DateTime<Utc>> for RawValue {
    fn from(value: DateTime<Utc>) -> Self {
        RawValue::Instant(value)
    }
}

/// Caller-supplied filters, keyed by `field` or `field_operator`.
///
/// Iteration follows insertion order so the same input always compiles to
/// the same query.
///
/// # Example
///
/// ```
/// use gdrive_api::query::RawFilterInput;
///
/// let input = RawFilterInput::new()
///     .with("title_contains", "report")
///     .with("trashed", "false");
/// assert_eq!(input.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFilterInput {
    entries: IndexMap<String, RawValue>,
}

impl RawFilterInput {
    /// Creates an empty input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a filter, replacing any earlier value for the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<RawValue>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Iterates over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of filters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no filters.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RawFilterInput
where
    K: Into<String>,
    V: Into<RawValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut input = Self::new();
        for (key, value) in iter {
            input.insert(key, value);
        }
        input
    }
}

/// A validated filter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    /// A single word (or a normalized timestamp).
    Scalar(String),
    /// Several whitespace-separated words, e.g. `Grad School`.
    WordSequence(Vec<String>),
}

impl FilterValue {
    /// Shapes raw text: more than one word becomes a `WordSequence`.
    ///
    /// Surrounding whitespace is dropped in both shapes.
    pub fn from_text(text: &str) -> Self {
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.len() > 1 {
            FilterValue::WordSequence(words.into_iter().map(str::to_string).collect())
        } else {
            FilterValue::Scalar(text.trim().to_string())
        }
    }

    /// Renders the value as it appears between quotes in a query.
    pub fn render(&self) -> String {
        match self {
            FilterValue::Scalar(value) => value.clone(),
            FilterValue::WordSequence(words) => words.join(" "),
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// A validated `field operator value` triple, ready for compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterToken {
    /// The registered field name.
    pub field: String,
    /// The resolved operator.
    pub operator: OperatorKind,
    /// The normalized value.
    pub value: FilterValue,
}

impl FilterToken {
    /// Creates a token.
    pub fn new(field: impl Into<String>, operator: OperatorKind, value: FilterValue) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
        }
    }
}

/// A conjunctive query string for the Drive `q` parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CompiledQuery {
    query_string: String,
}

impl CompiledQuery {
    pub(crate) fn new(query_string: String) -> Self {
        Self { query_string }
    }

    /// Returns the query string.
    pub fn as_str(&self) -> &str {
        &self.query_string
    }

    /// Returns true if the query has no conditions.
    pub fn is_empty(&self) -> bool {
        self.query_string.is_empty()
    }

    /// Consumes the query, returning the string.
    pub fn into_string(self) -> String {
        self.query_string
    }
}

impl fmt::Display for CompiledQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.query_string)
    }
}

impl AsRef<str> for CompiledQuery {
    fn as_ref(&self) -> &str {
        &self.query_string
    }
}
