#![doc = include_str!("../README.md")]

pub use tinta_tokenizer::{
    LexError, LexErrorKind, Position, Span, Token, TokenKind, Tokenizer,
};

mod ast;
mod error;
mod parser;

pub use ast::{
    Block, BlockHeader, Body, Label, LineComment, Program, Statement, TextFragment, TextNode,
};
pub use error::{Diagnostic, DiagnosticKind, SyntaxErrorKind};
pub use parser::{MAX_NESTING_DEPTH, Parser, parse, parse_header};
