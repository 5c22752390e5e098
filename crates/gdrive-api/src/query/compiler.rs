//! Renders validated filter tokens into a Drive query string.

use super::error::{QueryError, QueryResult};
use super::registry::OperatorKind;
use super::token::{CompiledQuery, FilterToken};

/// MIME type Drive assigns to folders.
pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

/// Separator between conjuncts.
const CONJUNCTION: &str = " and ";

/// Compiles filter tokens into a single conjunctive query.
///
/// Two rendering forms exist:
///
/// ```text
/// In:     '<value>' in <field>
/// others: <field> <symbol> '<value>'
/// ```
///
/// # Example
///
/// ```
/// use gdrive_api::query::{FilterToken, FilterValue, OperatorKind, QueryCompiler};
///
/// let tokens = vec![
///     FilterToken::new("title", OperatorKind::Contains, FilterValue::Scalar("blue".into())),
///     FilterToken::new("parents", OperatorKind::In, FilterValue::Scalar("F123".into())),
/// ];
/// let query = QueryCompiler::compile(&tokens).unwrap();
/// assert_eq!(query.as_str(), "title contains 'blue' and 'F123' in parents");
/// ```
pub struct QueryCompiler;

impl QueryCompiler {
    /// Compiles `tokens` in order. An empty slice yields an empty query.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::InvalidValue` if a rendered value contains a
    /// single quote or a backslash.
    pub fn compile(tokens: &[FilterToken]) -> QueryResult<CompiledQuery> {
        let conjuncts = Self::render_all(tokens)?;
        Ok(CompiledQuery::new(conjuncts.join(CONJUNCTION)))
    }

    /// Compiles `tokens` and restricts the results to folders.
    ///
    /// The folder conjunct is always last.
    pub fn compile_folders(tokens: &[FilterToken]) -> QueryResult<CompiledQuery> {
        let mut conjuncts = Self::render_all(tokens)?;
        conjuncts.push(format!("mimeType = '{FOLDER_MIME_TYPE}'"));
        Ok(CompiledQuery::new(conjuncts.join(CONJUNCTION)))
    }

    fn render_all(tokens: &[FilterToken]) -> QueryResult<Vec<String>> {
        let query: Vec<String> = tokens
            .iter()
            .map(Self::render)
            .collect::<QueryResult<_>>()?;
        tracing::debug!(conditions = query.len(), "compiled filter tokens");
        Ok(query)
    }

    /// Renders one token as a conjunct.
    pub fn render(token: &FilterToken) -> QueryResult<String> {
        let value = token.value.render();
        check_literal(&token.field, &value)?;

        Ok(match token.operator {
            OperatorKind::In => format!("'{}' in {}", value, token.field),
            op => format!("{} {} '{}'", token.field, op.symbol(), value),
        })
    }
}

/// Rejects text that would break out of a quoted query literal.
///
/// `'` ends the literal and `\` escapes the next character, so a trailing
/// backslash would swallow the closing quote.
pub(crate) fn check_literal(field: &str, value: &str) -> QueryResult<()> {
    if value.contains('\'') {
        return Err(QueryError::invalid_value(
            field,
            value,
            "single quotes are not allowed",
        ));
    }
    if value.contains('\\') {
        return Err(QueryError::invalid_value(
            field,
            value,
            "backslashes are not allowed",
        ));
    }
    Ok(())
}
