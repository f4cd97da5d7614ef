//! Outline parser for the squash script dialect.
//!
//! Produces the declaration tree the packaging passes work on. Only the
//! declaration structure is modelled: namespaces, types, members and
//! using directives. Method bodies, accessor bodies and initializers are
//! stepped over as balanced token runs and stay inside their declaration's
//! tokens.
//!
//! Every input token lands in exactly one place in the tree, so
//! `parse(lex(src))?.render() == src` for any source that parses.

mod cursor;
mod error;
mod grammar;

pub use cursor::Cursor;
pub use error::{SyntaxError, SyntaxErrorKind};

use squash_ir::{Span, SyntaxTree, Token, TokenKind};
use tracing::debug;

/// Parser state.
pub struct Parser<'a> {
    cursor: Cursor<'a>,
}

impl<'a> Parser<'a> {
    /// Create a parser over lexer output.
    pub fn new(tokens: &'a [Token]) -> Self {
        Parser {
            cursor: Cursor::new(tokens),
        }
    }

    // Cursor delegation methods

    #[inline]
    fn current(&self) -> &'a Token {
        self.cursor.current()
    }

    #[inline]
    fn current_kind(&self) -> TokenKind {
        self.cursor.current_kind()
    }

    #[inline]
    fn current_span(&self) -> Span {
        self.cursor.current_span()
    }

    #[inline]
    fn check(&self, kind: TokenKind) -> bool {
        self.cursor.check(kind)
    }

    #[inline]
    fn check_word(&self, word: &str) -> bool {
        self.cursor.check_word(word)
    }

    #[inline]
    fn peek_kind(&self, n: usize) -> TokenKind {
        self.cursor.peek_kind(n)
    }

    #[inline]
    fn position(&self) -> usize {
        self.cursor.position()
    }

    #[inline]
    fn advance(&mut self) -> &'a Token {
        self.cursor.advance()
    }

    #[inline]
    fn eat(&mut self, kind: TokenKind) -> bool {
        self.cursor.eat(kind)
    }

    #[inline]
    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<&'a Token, SyntaxError> {
        self.cursor.expect(kind, expected)
    }

    #[inline]
    fn slice(&self, start: usize, end: usize) -> Vec<Token> {
        self.cursor.slice(start, end)
    }
}

/// Parse lexer output into a declaration tree.
///
/// A missing trailing end-of-file token is synthesized.
#[tracing::instrument(level = "debug", skip_all, fields(tokens = tokens.len()))]
pub fn parse(tokens: &[Token]) -> Result<SyntaxTree, SyntaxError> {
    let owned;
    let tokens = if tokens.last().is_some_and(|t| t.is(TokenKind::Eof)) {
        tokens
    } else {
        let end = tokens.last().map_or(0, |t| t.span.end);
        let mut with_eof = tokens.to_vec();
        with_eof.push(Token::eof(end));
        owned = with_eof;
        &owned
    };
    let tree = Parser::new(tokens).parse_document()?;
    debug!(
        usings = tree.usings.len(),
        decls = tree.decl_count(),
        "parsed document"
    );
    Ok(tree)
}

/// Lex and parse source text.
pub fn parse_source(source: &str) -> Result<SyntaxTree, SyntaxError> {
    parse(&squash_lexer::lex(source))
}
