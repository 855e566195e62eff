//! Tokens produced by the tokenizer.

use crate::Span;

/// The kind of a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `--`, which introduces a line comment.
    Dashes,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `:`
    Colon,
    /// `;`
    Semicolon,
    /// `.`
    Dot,
    /// `@`
    At,
    /// `#`
    Hash,
    /// `$`
    Dollar,
    /// `*`
    Star,
    /// A double-quoted string literal. The token value is the decoded
    /// content, with escape sequences resolved.
    StringLiteral,
    /// An identifier.
    Identifier,
    /// A run of raw free text, or a run the tokenizer could not lex as
    /// anything more structured.
    TextChunk,
    /// End of input.
    Eof,
}

impl TokenKind {
    /// Whether this token opens a block body after a header.
    pub fn opens_body(&self) -> bool {
        matches!(self, TokenKind::LBrace | TokenKind::Colon)
    }

    /// Whether this token is one of the label sigils `@`, `#` or `$`.
    pub fn is_label_sigil(&self) -> bool {
        matches!(self, TokenKind::At | TokenKind::Hash | TokenKind::Dollar)
    }
}

/// A token with its payload and location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// The literal payload: the decoded value for string literals, the name
    /// for identifiers, the raw text for chunks and the lexeme otherwise.
    pub value: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            value: value.into(),
            span,
        }
    }
}
