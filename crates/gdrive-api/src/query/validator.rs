//! Turns raw `field[_operator]=value` filters into validated tokens.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

use super::compiler::check_literal;
use super::error::{QueryError, QueryResult};
use super::lexer::{KeyLexer, KeyShape};
use super::registry::{FieldRegistry, FieldSpec, OperatorKind, ValueKind};
use super::token::{FilterToken, FilterValue, RawFilterInput, RawValue};

/// Zone-less formats accepted for timestamp text, tried in order.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// How keys that match no registered field are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// Skip unknown or malformed keys.
    #[default]
    Lenient,
    /// Reject unknown or malformed keys with an error.
    Strict,
}

/// Validates raw filter input against a [`FieldRegistry`].
///
/// # Example
///
/// ```
/// use gdrive_api::query::{FieldRegistry, FilterValidator, FilterValue, OperatorKind, RawFilterInput};
///
/// let validator = FilterValidator::new(FieldRegistry::drive());
/// let tokens = validator
///     .validate(&RawFilterInput::new().with("title_contains", "blue"))
///     .unwrap();
///
/// assert_eq!(tokens.len(), 1);
/// assert_eq!(tokens[0].field, "title");
/// assert_eq!(tokens[0].operator, OperatorKind::Contains);
/// assert_eq!(tokens[0].value, FilterValue::Scalar("blue".to_string()));
/// ```
#[derive(Debug, Clone)]
pub struct FilterValidator {
    registry: FieldRegistry,
    mode: ParseMode,
}

impl FilterValidator {
    /// Creates a lenient validator over `registry`.
    pub fn new(registry: FieldRegistry) -> Self {
        Self {
            registry,
            mode: ParseMode::default(),
        }
    }

    /// Sets the parse mode.
    pub fn with_mode(mut self, mode: ParseMode) -> Self {
        self.mode = mode;
        self
    }

    /// Returns the registry.
    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    /// Returns the parse mode.
    pub fn mode(&self) -> ParseMode {
        self.mode
    }

    /// Validates every filter in `input`, in input order.
    ///
    /// Either all filters validate or the call fails; no partial token list
    /// is returned.
    ///
    /// # Errors
    ///
    /// - `QueryError::UnsupportedOperator` if a field is given an operator it
    ///   does not allow. Raised in both modes.
    /// - `QueryError::InvalidValue` if a value contains a single quote or a
    ///   backslash, or if a timestamp field's text cannot be parsed.
    /// - `QueryError::UnknownField` / `QueryError::MalformedKey` in
    ///   [`ParseMode::Strict`] only.
    pub fn validate(&self, input: &RawFilterInput) -> QueryResult<Vec<FilterToken>> {
        let mut tokens = Vec::with_capacity(input.len());
        for (key, value) in input.iter() {
            if let Some(token) = self.validate_one(key, value)? {
                tokens.push(token);
            }
        }
        Ok(tokens)
    }

    /// Validates a single filter. Returns `Ok(None)` for a skipped key.
    pub fn validate_one(&self, key: &str, value: &RawValue) -> QueryResult<Option<FilterToken>> {
        let (spec, operator) = match self.resolve_key(key) {
            Ok(resolved) => resolved,
            Err(err) => {
                return match self.mode {
                    ParseMode::Strict => Err(err),
                    ParseMode::Lenient => {
                        tracing::debug!(key, error = %err, "skipping filter key");
                        Ok(None)
                    }
                };
            }
        };

        if !spec.allows(operator) {
            return Err(QueryError::unsupported_operator(spec.name(), operator));
        }

        let value = normalize_value(spec, value)?;
        Ok(Some(FilterToken::new(spec.name(), operator, value)))
    }

    /// Resolves a key to its field and operator.
    ///
    /// The `field_operator` reading is tried before the bare `field` reading.
    fn resolve_key(&self, key: &str) -> QueryResult<(&FieldSpec, OperatorKind)> {
        let shape = KeyLexer::new(key)
            .lex()
            .map_err(|_| QueryError::malformed_key(key))?;

        if let KeyShape::Suffixed { field, suffix, .. } = shape {
            if let Some(operator) = OperatorKind::from_token(suffix) {
                if let Some(spec) = self.registry.field(field) {
                    return Ok((spec, operator));
                }
                if !self.registry.contains(key) {
                    return Err(self.registry.unknown_field(field));
                }
            }
        }

        self.registry
            .field(shape.key())
            .map(|spec| (spec, OperatorKind::Equals))
            .ok_or_else(|| self.registry.unknown_field(shape.key()))
    }
}

/// Coerces and shapes a raw value for `spec`.
fn normalize_value(spec: &FieldSpec, value: &RawValue) -> QueryResult<FilterValue> {
    let text = match (spec.kind(), value) {
        (ValueKind::Timestamp, RawValue::Text(text)) => {
            let instant = parse_timestamp(text)
                .ok_or_else(|| QueryError::invalid_value(spec.name(), text, "not a date/time"))?;
            render_timestamp(instant)
        }
        (_, RawValue::Text(text)) => text.clone(),
        (_, RawValue::DateTime(naive)) => render_timestamp(naive.and_utc()),
        (_, RawValue::Instant(instant)) => render_timestamp(*instant),
    };

    check_literal(spec.name(), &text)?;
    Ok(FilterValue::from_text(&text))
}

/// Parses timestamp text. Zone-less values are taken as UTC.
fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();

    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Some(instant.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Renders an instant as RFC 3339 with whole seconds and a `+00:00` offset.
///
/// Sub-second precision is truncated.
fn render_timestamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, false)
}
