//! The recursive-descent parser.
//!
//! Disambiguation between block headers and free text works by speculation:
//! at each statement boundary the parser checkpoints the tokenizer, probes
//! for a header shape and commits only if a `{` or `:` body opener follows.
//! A failed probe rewinds to the checkpoint and the input is consumed as a
//! text fragment instead. Backtracking is bounded: one header-shaped
//! lookahead per boundary.

use tracing::trace;

use tinta_tokenizer::{LexErrorKind, Span, TokenKind, Tokenizer};

use crate::ast::{
    Block, BlockHeader, Body, Label, LineComment, Program, Statement, TextFragment, TextNode,
};
use crate::error::{Diagnostic, SyntaxErrorKind};

/// Deepest allowed standard-block nesting. Exceeding it produces a
/// [`SyntaxErrorKind::NestingTooDeep`] diagnostic instead of exhausting the
/// stack.
pub const MAX_NESTING_DEPTH: usize = 2048;

/// Parse a complete Tinta document.
///
/// Parsing is deterministic and fail-fast: the same input always yields the
/// same tree, and the first error aborts the parse.
pub fn parse(source: &str) -> Result<Program, Diagnostic> {
    Parser::new(source).parse_program()
}

/// Parse a standalone block header such as `sec.note@draft#overview`,
/// requiring that nothing follow it.
pub fn parse_header(source: &str) -> Result<BlockHeader, Diagnostic> {
    let mut parser = Parser::new(source);
    let header = parser.parse_header_parts()?;
    match parser.tok.next_token() {
        Ok(t) if t.kind == TokenKind::Eof => Ok(header),
        Ok(t) => Err(Diagnostic::syntax(
            SyntaxErrorKind::ExpectedBlockBody,
            "unexpected content after block header",
            t.span,
        )),
        Err(e) => Err(e.into()),
    }
}

pub struct Parser<'src> {
    tok: Tokenizer<'src>,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            tok: Tokenizer::new(source),
        }
    }

    pub fn parse_program(mut self) -> Result<Program, Diagnostic> {
        let start = self.tok.position();
        let statements = self.parse_statements(0, false)?;
        Ok(Program {
            statements,
            span: Span::new(start, self.tok.position()),
        })
    }

    /// Parse a run of statements: the whole document when `in_block` is
    /// false, otherwise the inside of a `{ ... }` body, stopping before the
    /// closing `}` without consuming it.
    fn parse_statements(
        &mut self,
        depth: usize,
        in_block: bool,
    ) -> Result<Vec<Statement>, Diagnostic> {
        let mut statements = Vec::new();
        loop {
            let checkpoint = self.tok.clone();
            let token = match self.tok.next_token() {
                Ok(token) => token,
                Err(e) if e.kind == LexErrorKind::InvalidIdentifier => return Err(e.into()),
                Err(_) => {
                    // A broken string literal at a statement boundary is
                    // still free text; strings only carry meaning inside
                    // shorthand bodies.
                    self.tok = checkpoint;
                    statements.push(self.parse_text_fragment(in_block));
                    continue;
                }
            };
            match token.kind {
                TokenKind::Eof => break,
                TokenKind::RBrace if in_block => {
                    // Leave the `}` for the caller.
                    self.tok = checkpoint;
                    break;
                }
                TokenKind::Dashes => {
                    let content = self.tok.rest_of_line();
                    let span = Span::new(token.span.start, content.span.end);
                    trace!("line comment at {span}");
                    statements.push(Statement::LineComment(LineComment {
                        content: content.value,
                        span,
                    }));
                }
                TokenKind::Identifier => {
                    self.tok = checkpoint.clone();
                    match self.try_header()? {
                        Some(header) => {
                            statements.push(Statement::Block(self.parse_block(header, depth)?));
                        }
                        None => {
                            self.tok = checkpoint;
                            statements.push(self.parse_text_fragment(in_block));
                        }
                    }
                }
                _ => {
                    self.tok = checkpoint;
                    statements.push(self.parse_text_fragment(in_block));
                }
            }
        }
        Ok(statements)
    }

    fn parse_text_fragment(&mut self, in_block: bool) -> Statement {
        let chunk = self.tok.next_text_chunk(in_block);
        trace!("text fragment at {}", chunk.span);
        Statement::TextFragment(TextFragment {
            content: chunk.value,
            span: chunk.span,
        })
    }

    /// Probe for a block header at the current position. Commits, returning
    /// the header with the tokenizer left before the body opener, only when
    /// a `{` or `:` follows the header shape; otherwise `Ok(None)` and the
    /// caller rewinds its checkpoint.
    ///
    /// Hard errors still surface: a malformed identifier pressed against a
    /// body opener, or a label sigil with no identifier in an otherwise
    /// unambiguous header position.
    fn try_header(&mut self) -> Result<Option<BlockHeader>, Diagnostic> {
        let header = self.parse_header_parts()?;
        let mark = self.tok.clone();
        match self.tok.next_token() {
            Ok(t) if t.kind.opens_body() => {
                self.tok = mark;
                trace!("committed header {:?}", header.type_chain);
                Ok(Some(header))
            }
            _ => {
                trace!("header probe at {} rolled back", header.span);
                Ok(None)
            }
        }
    }

    /// Parse the header shape itself: a dotted type chain followed by any
    /// number of labels. Stops before the first token that cannot continue
    /// the header.
    fn parse_header_parts(&mut self) -> Result<BlockHeader, Diagnostic> {
        let first = self.tok.next_token().map_err(Diagnostic::from)?;
        if first.kind != TokenKind::Identifier {
            return Err(Diagnostic::syntax(
                SyntaxErrorKind::EmptyTypeChain,
                "a block header needs at least one type segment",
                first.span,
            ));
        }
        let start = first.span.start;
        let mut end = first.span.end;
        let mut type_chain = vec![first.value];

        // `.`-continued type segments.
        loop {
            let mark = self.tok.clone();
            match self.tok.next_token() {
                Ok(t) if t.kind == TokenKind::Dot => match self.tok.next_token() {
                    Ok(t) if t.kind == TokenKind::Identifier => {
                        end = t.span.end;
                        type_chain.push(t.value);
                    }
                    Err(e) if e.kind == LexErrorKind::InvalidIdentifier => return Err(e.into()),
                    _ => {
                        // `sec. prose` is not a chain; the dot stays with
                        // the surrounding text.
                        self.tok = mark;
                        break;
                    }
                },
                _ => {
                    self.tok = mark;
                    break;
                }
            }
        }

        // Labels.
        let mut labels = Vec::new();
        loop {
            let mark = self.tok.clone();
            let sigil = match self.tok.next_token() {
                Ok(t) if t.kind.is_label_sigil() => t,
                _ => {
                    self.tok = mark;
                    break;
                }
            };
            match self.tok.next_token() {
                Ok(name) if name.kind == TokenKind::Identifier => {
                    end = name.span.end;
                    let span = Span::new(sigil.span.start, name.span.end);
                    labels.push(match sigil.kind {
                        TokenKind::At => Label::Group {
                            name: name.value,
                            span,
                        },
                        TokenKind::Hash => Label::Anchor {
                            name: name.value,
                            span,
                        },
                        _ => Label::Link {
                            name: name.value,
                            span,
                        },
                    });
                }
                Ok(t) if t.kind.opens_body() || t.kind.is_label_sigil() => {
                    return Err(Diagnostic::syntax(
                        SyntaxErrorKind::InvalidLabel,
                        format!("label sigil `{}` must be followed by an identifier", sigil.value),
                        sigil.span,
                    ));
                }
                Err(e) if e.kind == LexErrorKind::InvalidIdentifier => return Err(e.into()),
                _ => {
                    // `user@host prose` stays text.
                    self.tok = mark;
                    break;
                }
            }
        }

        Ok(BlockHeader {
            type_chain,
            labels,
            span: Span::new(start, end),
        })
    }

    /// Parse a block body after a committed header. The tokenizer stands
    /// just before the `{` or `:` opener.
    fn parse_block(&mut self, header: BlockHeader, depth: usize) -> Result<Block, Diagnostic> {
        let opener = self.tok.next_token().map_err(Diagnostic::from)?;
        let start = header.span.start;
        match opener.kind {
            TokenKind::LBrace => {
                if depth + 1 > MAX_NESTING_DEPTH {
                    return Err(Diagnostic::syntax(
                        SyntaxErrorKind::NestingTooDeep,
                        format!("blocks nest deeper than the supported {MAX_NESTING_DEPTH} levels"),
                        opener.span,
                    ));
                }
                let statements = self.parse_statements(depth + 1, true)?;
                match self.tok.next_token() {
                    Ok(t) if t.kind == TokenKind::RBrace => Ok(Block {
                        header,
                        body: Body::Standard(statements),
                        span: Span::new(start, t.span.end),
                    }),
                    _ => Err(Diagnostic::syntax(
                        SyntaxErrorKind::UnterminatedBlock,
                        "block is missing its closing `}`",
                        opener.span,
                    )),
                }
            }
            TokenKind::Colon => {
                let node = self.parse_text_node()?;
                match self.tok.next_token() {
                    Ok(t) if t.kind == TokenKind::Semicolon => Ok(Block {
                        header,
                        body: Body::Shorthand(node),
                        span: Span::new(start, t.span.end),
                    }),
                    Ok(t) => Err(Diagnostic::syntax(
                        SyntaxErrorKind::MissingTerminator,
                        "shorthand block must end with `;`",
                        t.span,
                    )),
                    Err(e) => Err(e.into()),
                }
            }
            _ => Err(Diagnostic::syntax(
                SyntaxErrorKind::ExpectedBlockBody,
                "block header must be followed by `{` or `:`",
                opener.span,
            )),
        }
    }

    /// Parse the `*"text"*` of a shorthand body, each `*` independently
    /// optional.
    fn parse_text_node(&mut self) -> Result<TextNode, Diagnostic> {
        let first = self.tok.next_token().map_err(Diagnostic::from)?;
        let start = first.span.start;
        let (leading, string) = match first.kind {
            TokenKind::Star => {
                let string = self.tok.next_token().map_err(Diagnostic::from)?;
                if string.kind != TokenKind::StringLiteral {
                    return Err(Diagnostic::syntax(
                        SyntaxErrorKind::ExpectedString,
                        "expected a string literal",
                        string.span,
                    ));
                }
                (true, string)
            }
            TokenKind::StringLiteral => (false, first),
            TokenKind::Semicolon | TokenKind::RBrace | TokenKind::Eof => {
                return Err(Diagnostic::syntax(
                    SyntaxErrorKind::ExpectedText,
                    "shorthand body is empty where a text node was expected",
                    first.span,
                ));
            }
            _ => {
                return Err(Diagnostic::syntax(
                    SyntaxErrorKind::ExpectedString,
                    "expected a string literal",
                    first.span,
                ));
            }
        };

        let mut end = string.span.end;
        let mark = self.tok.clone();
        let trailing = match self.tok.next_token() {
            Ok(t) if t.kind == TokenKind::Star => {
                end = t.span.end;
                true
            }
            _ => {
                self.tok = mark;
                false
            }
        };

        Ok(TextNode {
            content: string.value,
            emphasis_leading: leading,
            emphasis_trailing: trailing,
            span: Span::new(start, end),
        })
    }
}
