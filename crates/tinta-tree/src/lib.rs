#![doc = include_str!("../README.md")]

mod diagnostic;

pub use diagnostic::{render, write_report};
pub use tinta_parse::{
    Block, BlockHeader, Body, Diagnostic, DiagnosticKind, Label, LexError, LexErrorKind,
    LineComment, MAX_NESTING_DEPTH, Position, Program, Span, Statement, SyntaxErrorKind,
    TextFragment, TextNode,
};

/// Parse a source text into a [`Document`].
pub fn parse(source: &str) -> Result<Document, Diagnostic> {
    Document::parse(source)
}

/// A parsed Tinta document with label-based lookup over its blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub program: Program,
}

impl Document {
    pub fn parse(source: &str) -> Result<Self, Diagnostic> {
        Ok(Self {
            program: tinta_parse::parse(source)?,
        })
    }

    /// Top-level blocks in document order, skipping comments and text.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.program.statements.iter().filter_map(|s| match s {
            Statement::Block(block) => Some(block),
            _ => None,
        })
    }

    /// The first block carrying `#name`, searching depth first in document
    /// order. Anchors are not required to be unique; this returns the first.
    pub fn block_by_anchor(&self, name: &str) -> Option<&Block> {
        find_block(&self.program.statements, &|block| {
            block
                .header
                .labels
                .iter()
                .any(|l| matches!(l, Label::Anchor { name: n, .. } if n == name))
        })
    }

    /// Every block carrying `@name`, depth first in document order.
    pub fn blocks_in_group(&self, name: &str) -> Vec<&Block> {
        let mut found = Vec::new();
        collect_blocks(
            &self.program.statements,
            &|block| {
                block
                    .header
                    .labels
                    .iter()
                    .any(|l| matches!(l, Label::Group { name: n, .. } if n == name))
            },
            &mut found,
        );
        found
    }
}

fn find_block<'a>(
    statements: &'a [Statement],
    predicate: &impl Fn(&Block) -> bool,
) -> Option<&'a Block> {
    for statement in statements {
        if let Statement::Block(block) = statement {
            if predicate(block) {
                return Some(block);
            }
            if let Body::Standard(children) = &block.body {
                if let Some(found) = find_block(children, predicate) {
                    return Some(found);
                }
            }
        }
    }
    None
}

fn collect_blocks<'a>(
    statements: &'a [Statement],
    predicate: &impl Fn(&Block) -> bool,
    found: &mut Vec<&'a Block>,
) {
    for statement in statements {
        if let Statement::Block(block) = statement {
            if predicate(block) {
                found.push(block);
            }
            if let Body::Standard(children) = &block.body {
                collect_blocks(children, predicate, found);
            }
        }
    }
}
