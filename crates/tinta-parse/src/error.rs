//! Parse diagnostics.

use tinta_tokenizer::{LexError, LexErrorKind, Span};

/// What went wrong at the grammar level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxErrorKind {
    /// A `{` body reached the end of input before its `}`.
    UnterminatedBlock,
    /// A shorthand block is missing its `;` terminator.
    MissingTerminator,
    /// A shorthand body is empty where a text node was required.
    ExpectedText,
    /// A block header was not followed by `{` or `:`.
    ExpectedBlockBody,
    /// A label sigil without an identifier after it.
    InvalidLabel,
    /// Something other than a string literal inside a shorthand body.
    ExpectedString,
    /// A block header with no type segment at all.
    EmptyTypeChain,
    /// Standard blocks nested beyond the supported depth.
    NestingTooDeep,
}

/// The kind of a [`Diagnostic`]: either a lexical error or a syntax error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    Lex(LexErrorKind),
    Syntax(SyntaxErrorKind),
}

/// A parse failure with its kind, a human-readable message and the offending
/// source span. Parsing is fail-fast, so one parse produces at most one.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub span: Span,
}

impl Diagnostic {
    pub fn syntax(kind: SyntaxErrorKind, message: impl Into<String>, span: Span) -> Self {
        Self {
            kind: DiagnosticKind::Syntax(kind),
            message: message.into(),
            span,
        }
    }
}

impl From<LexError> for Diagnostic {
    fn from(error: LexError) -> Self {
        Self {
            kind: DiagnosticKind::Lex(error.kind),
            message: error.message,
            span: error.span,
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at line {}, column {}",
            self.message, self.span.start.line, self.span.start.column
        )
    }
}

impl std::error::Error for Diagnostic {}
