//! Field registry: which fields can be searched and with which operators.

use std::fmt;

use super::error::{QueryError, QueryResult};

/// Minimum Jaro-Winkler similarity for an unknown field to get a suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Comparison operator applied to a field.
///
/// Each operator has two spellings: the key token used in filter input
/// (`lte` in `modifiedDate_lte`) and the symbol rendered into the compiled
/// query (`<=`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OperatorKind {
    /// `field = 'value'`. Implied by a key without an operator suffix.
    Equals,
    /// `field contains 'value'`.
    Contains,
    /// `'value' in field`.
    In,
    /// `field < 'value'`.
    LessThan,
    /// `field <= 'value'`.
    LessOrEqual,
    /// `field > 'value'`.
    GreaterThan,
    /// `field >= 'value'`.
    GreaterOrEqual,
}

impl OperatorKind {
    /// Every operator, in declaration order.
    pub const ALL: [OperatorKind; 7] = [
        OperatorKind::Equals,
        OperatorKind::Contains,
        OperatorKind::In,
        OperatorKind::LessThan,
        OperatorKind::LessOrEqual,
        OperatorKind::GreaterThan,
        OperatorKind::GreaterOrEqual,
    ];

    /// Operators that order values (`<`, `<=`, `>`, `>=`) plus equality.
    pub const COMPARISON: [OperatorKind; 5] = [
        OperatorKind::Equals,
        OperatorKind::LessThan,
        OperatorKind::LessOrEqual,
        OperatorKind::GreaterThan,
        OperatorKind::GreaterOrEqual,
    ];

    /// Resolves a key suffix (`lte`, `contains`, ...) to an operator.
    ///
    /// Equality has no suffix, so `"eq"` and `""` are not recognized.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "contains" => Some(OperatorKind::Contains),
            "in" => Some(OperatorKind::In),
            "lt" => Some(OperatorKind::LessThan),
            "lte" => Some(OperatorKind::LessOrEqual),
            "gt" => Some(OperatorKind::GreaterThan),
            "gte" => Some(OperatorKind::GreaterOrEqual),
            _ => None,
        }
    }

    /// The key suffix naming this operator, or `None` for equality.
    pub fn token(self) -> Option<&'static str> {
        match self {
            OperatorKind::Equals => None,
            OperatorKind::Contains => Some("contains"),
            OperatorKind::In => Some("in"),
            OperatorKind::LessThan => Some("lt"),
            OperatorKind::LessOrEqual => Some("lte"),
            OperatorKind::GreaterThan => Some("gt"),
            OperatorKind::GreaterOrEqual => Some("gte"),
        }
    }

    /// The symbol or keyword used in the compiled query.
    pub fn symbol(self) -> &'static str {
        match self {
            OperatorKind::Equals => "=",
            OperatorKind::Contains => "contains",
            OperatorKind::In => "in",
            OperatorKind::LessThan => "<",
            OperatorKind::LessOrEqual => "<=",
            OperatorKind::GreaterThan => ">",
            OperatorKind::GreaterOrEqual => ">=",
        }
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// How a field's values are coerced before rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueKind {
    /// Rendered as given.
    #[default]
    Text,
    /// Normalized to a UTC ISO-8601 timestamp.
    Timestamp,
}

/// A searchable field and the operators it accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    name: String,
    operators: Vec<OperatorKind>,
    kind: ValueKind,
}

impl FieldSpec {
    /// Creates a text field accepting the given operators.
    ///
    /// Duplicate operators are collapsed.
    pub fn new(name: impl Into<String>, operators: impl IntoIterator<Item = OperatorKind>) -> Self {
        let mut operators: Vec<OperatorKind> = operators.into_iter().collect();
        operators.sort();
        operators.dedup();
        Self {
            name: name.into(),
            operators,
            kind: ValueKind::Text,
        }
    }

    /// Creates a timestamp field accepting equality and ordering operators.
    pub fn timestamp(name: impl Into<String>) -> Self {
        Self::new(name, OperatorKind::COMPARISON).with_kind(ValueKind::Timestamp)
    }

    /// Sets the value kind.
    pub fn with_kind(mut self, kind: ValueKind) -> Self {
        self.kind = kind;
        self
    }

    /// Returns the field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the allowed operators, sorted.
    pub fn operators(&self) -> &[OperatorKind] {
        &self.operators
    }

    /// Returns the value kind.
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Returns true if `operator` is allowed on this field.
    pub fn allows(&self, operator: OperatorKind) -> bool {
        self.operators.contains(&operator)
    }
}

/// Immutable table of searchable fields.
///
/// A registry is a plain value: build one with [`FieldRegistry::builder`] or
/// take the Drive defaults from [`FieldRegistry::drive`], then hand it to a
/// [`FilterValidator`](super::FilterValidator).
///
/// # Example
///
/// ```
/// use gdrive_api::query::{FieldRegistry, OperatorKind};
///
/// let registry = FieldRegistry::drive();
/// let ops = registry.operators_for("fullText").unwrap();
/// assert_eq!(ops, &[OperatorKind::Contains]);
/// assert!(registry.operators_for("nope").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRegistry {
    fields: Vec<FieldSpec>,
}

impl FieldRegistry {
    /// Starts building a registry.
    pub fn builder() -> FieldRegistryBuilder {
        FieldRegistryBuilder::default()
    }

    /// The fields supported by the Drive v2 `files.list` search.
    pub fn drive() -> Self {
        use OperatorKind::*;

        let fields = vec![
            FieldSpec::new("title", [Equals, Contains]),
            FieldSpec::new("fullText", [Contains]),
            FieldSpec::new("mimeType", [Equals]),
            FieldSpec::timestamp("modifiedDate"),
            FieldSpec::timestamp("lastViewedByMeDate"),
            FieldSpec::new("trashed", [Equals]),
            FieldSpec::new("starred", [Equals]),
            FieldSpec::new("hidden", [Equals]),
            FieldSpec::new("sharedWithMe", [Equals]),
            FieldSpec::new("parents", [In]),
            FieldSpec::new("owners", [In]),
            FieldSpec::new("writers", [In]),
            FieldSpec::new("readers", [In]),
        ];
        Self { fields }
    }

    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns true if `name` is a registered field.
    pub fn contains(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Returns the operators allowed on `field`.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::UnknownField` if the field is not registered. The
    /// error carries the closest registered name when one is similar enough.
    pub fn operators_for(&self, field: &str) -> QueryResult<&[OperatorKind]> {
        self.field(field)
            .map(FieldSpec::operators)
            .ok_or_else(|| self.unknown_field(field))
    }

    /// Builds an `UnknownField` error for `field`, with a suggestion.
    pub fn unknown_field(&self, field: &str) -> QueryError {
        QueryError::UnknownField {
            field: field.to_string(),
            suggestion: self.suggest(field).map(str::to_string),
        }
    }

    /// Finds the registered field name most similar to `field`.
    pub fn suggest(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .map(|f| (f.name.as_str(), strsim::jaro_winkler(field, &f.name)))
            .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(name, _)| name)
    }

    /// Iterates over the registered fields in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter()
    }

    /// Returns the number of registered fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no fields are registered.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Default for FieldRegistry {
    fn default() -> Self {
        Self::drive()
    }
}

/// Builder for [`FieldRegistry`] that checks the table's invariants.
#[derive(Debug, Default)]
pub struct FieldRegistryBuilder {
    fields: Vec<FieldSpec>,
}

impl FieldRegistryBuilder {
    /// Adds a field.
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    /// Builds the registry.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::DuplicateField` if a name was added twice and
    /// `QueryError::NoOperators` if a field allows no operators.
    pub fn build(self) -> QueryResult<FieldRegistry> {
        for (i, spec) in self.fields.iter().enumerate() {
            if spec.operators.is_empty() {
                return Err(QueryError::NoOperators {
                    field: spec.name.clone(),
                });
            }
            if self.fields[..i].iter().any(|other| other.name == spec.name) {
                return Err(QueryError::DuplicateField {
                    field: spec.name.clone(),
                });
            }
        }
        Ok(FieldRegistry {
            fields: self.fields,
        })
    }
}
