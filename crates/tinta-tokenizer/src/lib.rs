//! A tokenizer for Tinta, a small markup language of labeled blocks and
//! free-flowing text.
//!
//! The tokenizer is a pull model: the parser asks for one token at a time
//! and clones the tokenizer wherever it needs a checkpoint to rewind to.

mod error;
mod span;
mod token;
mod tokenizer;

pub use error::{LexError, LexErrorKind};
pub use span::{Position, Span};
pub use token::{Token, TokenKind};
pub use tokenizer::Tokenizer;
