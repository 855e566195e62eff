//! Lexical errors.

use crate::Span;

/// What went wrong while lexing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LexErrorKind {
    /// A `\` escape in a string literal with an unrecognized follow-up.
    InvalidEscape,
    /// A string literal that ran into a newline or the end of input.
    UnterminatedString,
    /// An identifier was required here but the run breaks the identifier
    /// shape, for example a leading or trailing hyphen.
    InvalidIdentifier,
}

/// An error produced by the tokenizer, with the offending span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub message: String,
    pub span: Span,
}

impl LexError {
    pub fn new(kind: LexErrorKind, message: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            message: message.into(),
            span,
        }
    }
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at line {}, column {}",
            self.message, self.span.start.line, self.span.start.column
        )
    }
}

impl std::error::Error for LexError {}
