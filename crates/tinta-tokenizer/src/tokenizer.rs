//! The Tinta tokenizer.

use tracing::trace;

use crate::{LexError, LexErrorKind, Position, Span, Token, TokenKind};

/// Whether `c` may appear in the interior of an identifier.
#[inline]
fn is_identifier_interior(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// A tokenizer over Tinta source text.
///
/// Cloning is cheap and produces an independent checkpoint; the parser clones
/// before speculative reads and assigns the clone back to rewind.
#[derive(Clone)]
pub struct Tokenizer<'src> {
    /// The entire source text.
    source: &'src str,
    /// The unconsumed tail of `source`.
    remaining: &'src str,
    /// Position of the next unconsumed character.
    pos: Position,
}

impl<'src> Tokenizer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            remaining: source,
            pos: Position::start(),
        }
    }

    /// The position of the next unconsumed character.
    #[inline]
    pub fn position(&self) -> Position {
        self.pos
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.remaining.is_empty()
    }

    #[inline]
    fn peek(&self) -> Option<char> {
        self.remaining.chars().next()
    }

    #[inline]
    fn peek_nth(&self, n: usize) -> Option<char> {
        self.remaining.chars().nth(n)
    }

    #[inline]
    fn starts_with(&self, prefix: &str) -> bool {
        self.remaining.starts_with(prefix)
    }

    #[inline]
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos.offset += c.len_utf8() as u32;
        if c == '\n' {
            self.pos.line += 1;
            self.pos.column = 1;
        } else {
            self.pos.column += 1;
        }
        self.remaining = &self.remaining[c.len_utf8()..];
        Some(c)
    }

    fn token(&self, kind: TokenKind, value: impl Into<String>, start: Position) -> Token {
        let token = Token::new(kind, value, Span::new(start, self.pos));
        trace!(
            "token {:?} at {}: {:?}",
            token.kind, token.span, token.value
        );
        token
    }

    /// A token whose value is the raw source text it covers.
    fn lexeme(&self, kind: TokenKind, start: Position) -> Token {
        let text = &self.source[start.offset as usize..self.pos.offset as usize];
        self.token(kind, text, start)
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.advance();
        }
    }

    /// Get the next token, skipping any whitespace in front of it.
    ///
    /// Runs that merely fail to be an identifier come back as a
    /// [`TokenKind::TextChunk`] so the parser can fall back to free text; an
    /// error is returned only where the grammar leaves no such fallback, for
    /// example a malformed identifier sitting directly against a `:` or `{`.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();

        if self.is_eof() {
            return Ok(self.token(TokenKind::Eof, "", self.pos));
        }

        let start = self.pos;
        let c = self.peek().unwrap();
        match c {
            '{' => self.symbol(TokenKind::LBrace, start),
            '}' => self.symbol(TokenKind::RBrace, start),
            ':' => self.symbol(TokenKind::Colon, start),
            ';' => self.symbol(TokenKind::Semicolon, start),
            '.' => self.symbol(TokenKind::Dot, start),
            '@' => self.symbol(TokenKind::At, start),
            '#' => self.symbol(TokenKind::Hash, start),
            '$' => self.symbol(TokenKind::Dollar, start),
            '*' => self.symbol(TokenKind::Star, start),
            '"' => self.lex_string(),
            '-' if self.starts_with("--") => {
                self.advance();
                self.advance();
                Ok(self.lexeme(TokenKind::Dashes, start))
            }
            '-' => self.lex_hyphen_run(),
            c if c.is_ascii_alphabetic() => self.lex_identifier(),
            _ => {
                // Not the start of any token: one character of free text.
                self.advance();
                Ok(self.lexeme(TokenKind::TextChunk, start))
            }
        }
    }

    fn symbol(&mut self, kind: TokenKind, start: Position) -> Result<Token, LexError> {
        self.advance();
        Ok(self.lexeme(kind, start))
    }

    /// Lex an identifier: a letter, then letters, digits, `_` or `-`, ending
    /// on anything but a hyphen. A hyphen is only consumed as part of the
    /// identifier when another interior character follows it.
    fn lex_identifier(&mut self) -> Result<Token, LexError> {
        let start = self.pos;
        self.advance(); // first letter, checked by the caller

        loop {
            match self.peek() {
                Some('-') => {
                    if matches!(self.peek_nth(1), Some(c) if is_identifier_interior(c)) {
                        self.advance();
                    } else {
                        // Trailing hyphen. Consume it so the reported span
                        // covers the whole run.
                        self.advance();
                        return self
                            .identifier_violation(start, "identifier cannot end with a hyphen `-`");
                    }
                }
                Some(c) if is_identifier_interior(c) => {
                    self.advance();
                }
                _ => break,
            }
        }

        Ok(self.lexeme(TokenKind::Identifier, start))
    }

    /// A single `-` that does not open a `--` comment. If an identifier run
    /// follows, the author may have meant a header type; otherwise the hyphen
    /// is plain text.
    fn lex_hyphen_run(&mut self) -> Result<Token, LexError> {
        let start = self.pos;
        self.advance(); // the `-`

        let mut saw_run = false;
        while let Some(c) = self.peek() {
            if !is_identifier_interior(c) {
                break;
            }
            saw_run = true;
            self.advance();
        }

        if saw_run {
            self.identifier_violation(start, "identifier cannot start with a hyphen `-`")
        } else {
            Ok(self.lexeme(TokenKind::TextChunk, start))
        }
    }

    /// A run that breaks the identifier shape. When it sits directly against
    /// a `:` or `{` body opener an identifier is contextually required and
    /// this is a hard error; anywhere else the run folds into free text.
    fn identifier_violation(
        &mut self,
        start: Position,
        message: &str,
    ) -> Result<Token, LexError> {
        if matches!(self.peek(), Some(':' | '{')) {
            Err(LexError::new(
                LexErrorKind::InvalidIdentifier,
                message,
                Span::new(start, self.pos),
            ))
        } else {
            Ok(self.lexeme(TokenKind::TextChunk, start))
        }
    }

    /// Lex a string literal, decoding escape sequences into the token value.
    /// A raw newline inside the literal is an unterminated string.
    fn lex_string(&mut self) -> Result<Token, LexError> {
        let start = self.pos;
        self.advance(); // opening quote

        let mut value = String::new();
        loop {
            match self.peek() {
                None => {
                    return Err(LexError::new(
                        LexErrorKind::UnterminatedString,
                        "unterminated string: expected `\"` but found end of input",
                        Span::new(start, self.pos),
                    ));
                }
                Some('\n' | '\r') => {
                    return Err(LexError::new(
                        LexErrorKind::UnterminatedString,
                        "unterminated string: expected `\"` but found end of line",
                        Span::new(start, self.pos),
                    ));
                }
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\\') => value.push(self.lex_escape()?),
                Some(c) => {
                    self.advance();
                    value.push(c);
                }
            }
        }

        Ok(self.token(TokenKind::StringLiteral, value, start))
    }

    /// Decode one escape sequence: `\"`, `\\`, `\n`, `\r` or `\t`.
    fn lex_escape(&mut self) -> Result<char, LexError> {
        let start = self.pos;
        self.advance(); // backslash

        let decoded = match self.peek() {
            Some('"') => '"',
            Some('\\') => '\\',
            Some('n') => '\n',
            Some('r') => '\r',
            Some('t') => '\t',
            other => {
                let found = match other {
                    Some(c) => {
                        self.advance();
                        format!("`\\{c}`")
                    }
                    None => "end of input".to_string(),
                };
                return Err(LexError::new(
                    LexErrorKind::InvalidEscape,
                    format!("invalid escape sequence {found}"),
                    Span::new(start, self.pos),
                ));
            }
        };
        self.advance();
        Ok(decoded)
    }

    /// Consume the remainder of the current line, for line comments. The
    /// returned token covers everything up to the line break, which is
    /// consumed but not included.
    pub fn rest_of_line(&mut self) -> Token {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c == '\n' || c == '\r' {
                break;
            }
            self.advance();
        }
        let token = self.lexeme(TokenKind::TextChunk, start);
        if self.peek() == Some('\r') {
            self.advance();
        }
        if self.peek() == Some('\n') {
            self.advance();
        }
        token
    }

    /// Consume a run of raw free text, whitespace included.
    ///
    /// The run ends at end of input, at a `--` comment opener, at `}` when
    /// `stop_at_rbrace` is set, or at any position where a fresh block header
    /// is recognized ahead.
    pub fn next_text_chunk(&mut self, stop_at_rbrace: bool) -> Token {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c == '}' && stop_at_rbrace {
                break;
            }
            if c == '-' && self.starts_with("--") {
                break;
            }
            if c.is_ascii_alphabetic() && self.header_ahead() {
                break;
            }
            self.advance();
        }
        self.lexeme(TokenKind::TextChunk, start)
    }

    /// Probe whether a block header starts exactly here. Within running text
    /// only a single type segment plus labels is recognized; a dotted chain
    /// needs a clean statement boundary, which keeps prose like `ran
    /// before.noon` from being split at `before`.
    fn header_ahead(&self) -> bool {
        let mut probe = self.clone();
        match probe.next_token() {
            Ok(t) if t.kind == TokenKind::Identifier => {}
            // A hard identifier error: stop the chunk so the parser
            // surfaces it.
            Err(e) => return e.kind == LexErrorKind::InvalidIdentifier,
            _ => return false,
        }

        loop {
            let mut ahead = probe.clone();
            match ahead.next_token() {
                Ok(t) if t.kind.opens_body() => return true,
                Ok(t) if t.kind.is_label_sigil() => {
                    probe = ahead;
                    match probe.next_token() {
                        Ok(t) if t.kind == TokenKind::Identifier => {}
                        // A sigil with no identifier is still a header
                        // position when a body opener or another sigil
                        // follows; the parser reports the bad label there.
                        Ok(t) if t.kind.opens_body() || t.kind.is_label_sigil() => return true,
                        Err(e) => return e.kind == LexErrorKind::InvalidIdentifier,
                        _ => return false,
                    }
                }
                _ => return false,
            }
        }
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Result<Token, LexError>;

    /// Yields tokens until [`TokenKind::Eof`]. After an error, iteration
    /// resumes at the next lexable position.
    fn next(&mut self) -> Option<Self::Item> {
        match self.next_token() {
            Ok(token) if token.kind == TokenKind::Eof => None,
            other => Some(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Lex the entire source, panicking on lexer errors.
    fn lex(source: &str) -> Vec<(TokenKind, String)> {
        Tokenizer::new(source)
            .map(|result| {
                let token = result.unwrap();
                (token.kind, token.value)
            })
            .collect()
    }

    /// Lex until the first error and return it.
    fn lex_err(source: &str) -> LexError {
        for result in Tokenizer::new(source) {
            if let Err(error) = result {
                return error;
            }
        }
        panic!("expected a lexer error in {source:?}");
    }

    fn ident(name: &str) -> (TokenKind, String) {
        (TokenKind::Identifier, name.to_string())
    }

    #[test]
    fn symbols() {
        assert_eq!(
            lex("{ } : ; . @ # $ *"),
            vec![
                (TokenKind::LBrace, "{".to_string()),
                (TokenKind::RBrace, "}".to_string()),
                (TokenKind::Colon, ":".to_string()),
                (TokenKind::Semicolon, ";".to_string()),
                (TokenKind::Dot, ".".to_string()),
                (TokenKind::At, "@".to_string()),
                (TokenKind::Hash, "#".to_string()),
                (TokenKind::Dollar, "$".to_string()),
                (TokenKind::Star, "*".to_string()),
            ]
        );
    }

    #[test]
    fn empty_input() {
        assert_eq!(lex(""), vec![]);
        assert_eq!(lex("   \n\t  "), vec![]);
    }

    #[test]
    fn eof_token_repeats() {
        let mut tokenizer = Tokenizer::new("");
        assert_eq!(tokenizer.next_token().unwrap().kind, TokenKind::Eof);
        assert_eq!(tokenizer.next_token().unwrap().kind, TokenKind::Eof);
    }

    #[test]
    fn identifiers() {
        assert_eq!(lex("para"), vec![ident("para")]);
        assert_eq!(lex("a"), vec![ident("a")]);
        assert_eq!(lex("a-b"), vec![ident("a-b")]);
        assert_eq!(lex("a_b9"), vec![ident("a_b9")]);
        assert_eq!(lex("x-1-y"), vec![ident("x-1-y")]);
        // Consecutive interior hyphens are allowed; they are not a comment
        // opener inside an identifier.
        assert_eq!(lex("a--b"), vec![ident("a--b")]);
    }

    #[test]
    fn identifier_cannot_start_with_digit() {
        // The digit is not an identifier start, so it comes back as a chunk
        // of text and the rest lexes on its own.
        assert_eq!(
            lex("9abc"),
            vec![(TokenKind::TextChunk, "9".to_string()), ident("abc")]
        );
    }

    #[test]
    fn trailing_hyphen_folds_into_text() {
        let mut tokenizer = Tokenizer::new("a- b");
        let token = tokenizer.next_token().unwrap();
        assert_eq!(token.kind, TokenKind::TextChunk);
        assert_eq!(token.value, "a-");
    }

    #[test]
    fn trailing_hyphen_against_colon_is_an_error() {
        let error = lex_err("a-: \"x\";");
        assert_eq!(error.kind, LexErrorKind::InvalidIdentifier);
        assert_eq!(error.span.range(), 0..2);
    }

    #[test]
    fn leading_hyphen_against_opener_is_an_error() {
        let error = lex_err("-abc: \"x\";");
        assert_eq!(error.kind, LexErrorKind::InvalidIdentifier);
        assert_eq!(error.span.range(), 0..4);

        let error = lex_err("-abc{");
        assert_eq!(error.kind, LexErrorKind::InvalidIdentifier);
    }

    #[test]
    fn leading_hyphen_elsewhere_folds_into_text() {
        let mut tokenizer = Tokenizer::new("-abc def");
        let token = tokenizer.next_token().unwrap();
        assert_eq!(token.kind, TokenKind::TextChunk);
        assert_eq!(token.value, "-abc");
    }

    #[test]
    fn dashes() {
        assert_eq!(lex("--"), vec![(TokenKind::Dashes, "--".to_string())]);
    }

    #[test]
    fn strings() {
        assert_eq!(
            lex("\"hello world\""),
            vec![(TokenKind::StringLiteral, "hello world".to_string())]
        );
        assert_eq!(
            lex("\"\""),
            vec![(TokenKind::StringLiteral, "".to_string())]
        );
    }

    #[test]
    fn string_escapes_decode() {
        assert_eq!(
            lex(r#""a\n\t\r\\\"b""#),
            vec![(TokenKind::StringLiteral, "a\n\t\r\\\"b".to_string())]
        );
    }

    #[test]
    fn invalid_escape() {
        let error = lex_err(r#""bad\q""#);
        assert_eq!(error.kind, LexErrorKind::InvalidEscape);
        // The span covers the backslash and the offending character.
        assert_eq!(error.span.range(), 4..6);
    }

    #[test]
    fn unterminated_string_at_eof() {
        let error = lex_err("\"abc");
        assert_eq!(error.kind, LexErrorKind::UnterminatedString);
    }

    #[test]
    fn unterminated_string_at_newline() {
        let error = lex_err("\"ab\ncd\"");
        assert_eq!(error.kind, LexErrorKind::UnterminatedString);
        assert_eq!(error.span.start.offset, 0);
    }

    #[test]
    fn positions_track_lines_and_columns() {
        let mut tokenizer = Tokenizer::new("a\n  b");
        let a = tokenizer.next_token().unwrap();
        assert_eq!((a.span.start.line, a.span.start.column), (1, 1));
        let b = tokenizer.next_token().unwrap();
        assert_eq!((b.span.start.line, b.span.start.column), (2, 3));
        assert_eq!(b.span.start.offset, 4);
    }

    #[test]
    fn clone_is_a_checkpoint() {
        let mut tokenizer = Tokenizer::new("a b c");
        tokenizer.next_token().unwrap();
        let checkpoint = tokenizer.clone();
        assert_eq!(tokenizer.next_token().unwrap().value, "b");
        tokenizer = checkpoint;
        assert_eq!(tokenizer.next_token().unwrap().value, "b");
    }

    #[test]
    fn rest_of_line_excludes_the_break() {
        let mut tokenizer = Tokenizer::new("-- a note\nnext");
        assert_eq!(tokenizer.next_token().unwrap().kind, TokenKind::Dashes);
        let content = tokenizer.rest_of_line();
        assert_eq!(content.value, " a note");
        assert_eq!(tokenizer.next_token().unwrap().value, "next");
    }

    #[test]
    fn rest_of_line_at_eof() {
        let mut tokenizer = Tokenizer::new("--tail");
        assert_eq!(tokenizer.next_token().unwrap().kind, TokenKind::Dashes);
        assert_eq!(tokenizer.rest_of_line().value, "tail");
        assert!(tokenizer.is_eof());
    }

    #[test]
    fn text_chunk_stops_at_comment() {
        let mut tokenizer = Tokenizer::new("hello -- note");
        let chunk = tokenizer.next_text_chunk(false);
        assert_eq!(chunk.value, "hello ");
    }

    #[test]
    fn text_chunk_stops_at_rbrace_only_when_asked() {
        let mut tokenizer = Tokenizer::new("a } b");
        assert_eq!(tokenizer.next_text_chunk(true).value, "a ");

        let mut tokenizer = Tokenizer::new("} b");
        assert_eq!(tokenizer.next_text_chunk(false).value, "} b");
    }

    #[test]
    fn text_chunk_stops_at_header() {
        let mut tokenizer = Tokenizer::new("some prose sec { }");
        let chunk = tokenizer.next_text_chunk(false);
        assert_eq!(chunk.value, "some prose ");

        let mut tokenizer = Tokenizer::new("see para: \"x\";");
        assert_eq!(tokenizer.next_text_chunk(false).value, "see ");
    }

    #[test]
    fn text_chunk_does_not_stop_at_dotted_chain() {
        // A dotted chain needs a statement boundary, so the orphaned dot
        // stays with the text and the chunk ends at the final segment.
        let mut tokenizer = Tokenizer::new("plain text before.block: \"x\";");
        let chunk = tokenizer.next_text_chunk(false);
        assert_eq!(chunk.value, "plain text before.");
    }

    #[test]
    fn text_chunk_stops_at_labeled_header() {
        let mut tokenizer = Tokenizer::new("intro sec@notes#s1 { }");
        assert_eq!(tokenizer.next_text_chunk(false).value, "intro ");
    }

    #[test]
    fn text_chunk_keeps_plain_prose() {
        let mut tokenizer = Tokenizer::new("just words, nothing else.");
        let chunk = tokenizer.next_text_chunk(false);
        assert_eq!(chunk.value, "just words, nothing else.");
        assert!(tokenizer.is_eof());
    }

    #[test]
    fn text_chunk_spans_unicode() {
        let mut tokenizer = Tokenizer::new("héllo wörld");
        let chunk = tokenizer.next_text_chunk(false);
        assert_eq!(chunk.value, "héllo wörld");
    }
}
