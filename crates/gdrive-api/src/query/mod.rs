//! Filter compiler for the Drive v2 search syntax.
//!
//! Named filter parameters such as `title_contains=report` or
//! `modifiedDate_gte=2024-01-01` are validated against a [`FieldRegistry`]
//! and compiled into one conjunctive query string for the `q` parameter of
//! `files.list`.
//!
//! # Key Syntax
//!
//! A key is `field` (equality) or `field_operator`, where `operator` is one of
//! `contains`, `in`, `lt`, `lte`, `gt`, `gte`.
//!
//! # Rendering
//!
//! - `title_contains=blue` → `title contains 'blue'`
//! - `parents_in=F123` → `'F123' in parents`
//! - `modifiedDate_gt=2012-06-04` → `modifiedDate > '2012-06-04T00:00:00+00:00'`
//!
//! Conditions are joined with ` and `. There is no `or`, negation or
//! grouping.
//!
//! # Example
//!
//! ```
//! use gdrive_api::query::{FieldRegistry, FilterValidator, QueryCompiler, RawFilterInput};
//!
//! let validator = FilterValidator::new(FieldRegistry::drive());
//! let input = RawFilterInput::new()
//!     .with("title_contains", "blue")
//!     .with("parents_in", "F123");
//!
//! let tokens = validator.validate(&input).unwrap();
//! let query = QueryCompiler::compile(&tokens).unwrap();
//! assert_eq!(query.as_str(), "title contains 'blue' and 'F123' in parents");
//! ```

mod compiler;
mod error;
mod lexer;
mod record;
mod registry;
mod token;
mod validator;

pub use compiler::{QueryCompiler, FOLDER_MIME_TYPE};
pub use error::{QueryError, QueryResult};
pub use lexer::{KeyLexError, KeyLexer, KeyShape};
pub use record::{adapt, adapt_values, Record, RecordSet};
pub use registry::{FieldRegistry, FieldRegistryBuilder, FieldSpec, OperatorKind, ValueKind};
pub use token::{CompiledQuery, FilterToken, FilterValue, RawFilterInput, RawValue};
pub use validator::{FilterValidator, ParseMode};

/// Validates `input` and compiles it in one step.
pub fn compile(validator: &FilterValidator, input: &RawFilterInput) -> QueryResult<CompiledQuery> {
    let tokens = validator.validate(input)?;
    QueryCompiler::compile(&tokens)
}

/// Validates `input` and compiles it as a folder search.
pub fn compile_folders(
    validator: &FilterValidator,
    input: &RawFilterInput,
) -> QueryResult<CompiledQuery> {
    let tokens = validator.validate(input)?;
    QueryCompiler::compile_folders(&tokens)
}

#[cfg(test)]
mod tests;
