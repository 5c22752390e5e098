//! Lexer for compound filter keys (`field` or `field_operator`).

use std::fmt;

/// Error encountered while lexing a filter key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyLexError {
    /// The character that could not be accepted, or `None` at end of input.
    pub character: Option<char>,
    /// The byte offset where the error occurred.
    pub position: usize,
}

impl fmt::Display for KeyLexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.character {
            Some(c) => write!(f, "unexpected character '{}' at position {}", c, self.position),
            None => write!(f, "unexpected end of key at position {}", self.position),
        }
    }
}

impl std::error::Error for KeyLexError {}

/// The syntactic shape of a filter key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyShape<'a> {
    /// A key with no separator, e.g. `title`.
    Bare {
        /// The whole key.
        field: &'a str,
    },
    /// A key split at its last `_`, e.g. `modifiedDate_gte`.
    ///
    /// The suffix is not yet known to be an operator; the caller decides
    /// whether to read it as one or to fall back to the whole key.
    Suffixed {
        /// Everything before the last separator.
        field: &'a str,
        /// Everything after the last separator.
        suffix: &'a str,
        /// The whole key.
        key: &'a str,
    },
}

impl<'a> KeyShape<'a> {
    /// Returns the whole key.
    pub fn key(&self) -> &'a str {
        match self {
            KeyShape::Bare { field } => field,
            KeyShape::Suffixed { key, .. } => key,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    Field,
    Separator,
    Suffix,
}

/// State machine over the characters of one filter key.
///
/// Keys are made of ASCII alphanumeric segments joined by single `_`
/// separators. Anything else (whitespace, punctuation, a leading, trailing or
/// doubled `_`, an empty key) is a lexing error.
pub struct KeyLexer<'a> {
    input: &'a str,
}

impl<'a> KeyLexer<'a> {
    /// Creates a lexer for `input`.
    pub fn new(input: &'a str) -> Self {
        Self { input }
    }

    /// Runs the lexer to completion.
    pub fn lex(self) -> Result<KeyShape<'a>, KeyLexError> {
        let mut state = State::Start;
        let mut last_separator = None;

        for (position, c) in self.input.char_indices() {
            state = match (state, c) {
                (State::Start | State::Field, c) if is_ident_char(c) => State::Field,
                (State::Separator | State::Suffix, c) if is_ident_char(c) => State::Suffix,
                (State::Field | State::Suffix, '_') => {
                    last_separator = Some(position);
                    State::Separator
                }
                _ => {
                    return Err(KeyLexError {
                        character: Some(c),
                        position,
                    })
                }
            };
        }

        match (state, last_separator) {
            (State::Field, _) => Ok(KeyShape::Bare { field: self.input }),
            (State::Suffix, Some(sep)) => Ok(KeyShape::Suffixed {
                field: &self.input[..sep],
                suffix: &self.input[sep + 1..],
                key: self.input,
            }),
            _ => Err(KeyLexError {
                character: None,
                position: self.input.len(),
            }),
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
}
