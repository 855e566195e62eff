//! The abstract syntax tree for Tinta documents.
//!
//! Every node owns its data and carries the [`Span`] of the source text it
//! was parsed from.

use tinta_tokenizer::Span;

/// A parsed document, the root of the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    /// Top-level statements in document order.
    pub statements: Vec<Statement>,
    pub span: Span,
}

/// One item at the top level or inside a standard block body.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Block(Block),
    LineComment(LineComment),
    TextFragment(TextFragment),
}

impl Statement {
    pub fn span(&self) -> Span {
        match self {
            Statement::Block(block) => block.span,
            Statement::LineComment(comment) => comment.span,
            Statement::TextFragment(fragment) => fragment.span,
        }
    }
}

/// A `--` comment running to the end of its line. The content excludes the
/// `--` opener and the line break.
#[derive(Debug, Clone, PartialEq)]
pub struct LineComment {
    pub content: String,
    pub span: Span,
}

/// A run of free text, kept verbatim, delimited only by the surrounding
/// syntax.
#[derive(Debug, Clone, PartialEq)]
pub struct TextFragment {
    pub content: String,
    pub span: Span,
}

/// A block: a header introducing it and a body.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub header: BlockHeader,
    pub body: Body,
    pub span: Span,
}

/// The `type.chain @group #anchor $link` part introducing a block.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockHeader {
    /// Dotted type segments, at least one.
    pub type_chain: Vec<String>,
    /// Labels in source order. Repeats of the same kind are permitted.
    pub labels: Vec<Label>,
    pub span: Span,
}

/// A label attached to a block header.
#[derive(Debug, Clone, PartialEq)]
pub enum Label {
    /// `@name`
    Group { name: String, span: Span },
    /// `#name`
    Anchor { name: String, span: Span },
    /// `$name`
    Link { name: String, span: Span },
}

impl Label {
    pub fn name(&self) -> &str {
        match self {
            Label::Group { name, .. } | Label::Anchor { name, .. } | Label::Link { name, .. } => {
                name
            }
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Label::Group { span, .. } | Label::Anchor { span, .. } | Label::Link { span, .. } => {
                *span
            }
        }
    }
}

/// The body of a block.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// `{ ... }` holding nested statements.
    Standard(Vec<Statement>),
    /// `: "text";` holding a single text node.
    Shorthand(TextNode),
}

/// The inline text of a shorthand block. The two `*` emphasis markers are
/// independently optional; nothing requires them to pair up.
#[derive(Debug, Clone, PartialEq)]
pub struct TextNode {
    /// The decoded string content.
    pub content: String,
    pub emphasis_leading: bool,
    pub emphasis_trailing: bool,
    pub span: Span,
}
