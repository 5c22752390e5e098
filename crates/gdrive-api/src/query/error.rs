//! Error types for the query compiler.

use thiserror::Error;

use super::registry::OperatorKind;

/// A specialized Result type for query compilation.
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors that can occur while validating or compiling filters.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryError {
    /// The field is not present in the registry.
    #[error("unknown field: {field}{}", suggestion_hint(.suggestion))]
    UnknownField {
        /// The unrecognized field name.
        field: String,
        /// The closest registered field name, if any is close enough.
        suggestion: Option<String>,
    },

    /// The key does not match `field` or `field_operator`.
    #[error("malformed filter key: '{key}'")]
    MalformedKey {
        /// The raw key as supplied by the caller.
        key: String,
    },

    /// The operator is not allowed for this field.
    #[error("operator '{operator}' is not supported for field '{field}'")]
    UnsupportedOperator {
        /// The field the operator was applied to.
        field: String,
        /// The rejected operator.
        operator: OperatorKind,
    },

    /// The value would corrupt the compiled query or could not be coerced.
    #[error("invalid value for '{field}': {reason} (got '{value}')")]
    InvalidValue {
        /// The field the value was given for.
        field: String,
        /// The offending value.
        value: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// A caller indexed into an empty result set.
    #[error("result set is empty")]
    EmptyResult,

    /// A caller indexed past the end of a non-empty result set.
    #[error("index {index} out of range for result set of {len} records")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// The number of records in the set.
        len: usize,
    },

    /// A registry was built with the same field twice.
    #[error("field registered more than once: {field}")]
    DuplicateField {
        /// The repeated field name.
        field: String,
    },

    /// A registry field was built with no allowed operators.
    #[error("field has no allowed operators: {field}")]
    NoOperators {
        /// The field name.
        field: String,
    },
}

fn suggestion_hint(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(name) => format!(" (did you mean '{name}'?)"),
        None => String::new(),
    }
}

impl QueryError {
    /// Creates an unknown field error without a suggestion.
    pub fn unknown_field(field: impl Into<String>) -> Self {
        QueryError::UnknownField {
            field: field.into(),
            suggestion: None,
        }
    }

    /// Creates a malformed key error.
    pub fn malformed_key(key: impl Into<String>) -> Self {
        QueryError::MalformedKey { key: key.into() }
    }

    /// Creates an unsupported operator error.
    pub fn unsupported_operator(field: impl Into<String>, operator: OperatorKind) -> Self {
        QueryError::UnsupportedOperator {
            field: field.into(),
            operator,
        }
    }

    /// Creates an invalid value error.
    pub fn invalid_value(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        QueryError::InvalidValue {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}
