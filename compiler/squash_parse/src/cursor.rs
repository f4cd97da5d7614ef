//! Token cursor for navigating the token stream.
//!
//! Provides lookahead, consumption and the bracket-skipping helpers the
//! outline parser uses to step over bodies it does not model.

use squash_ir::{Span, Token, TokenKind};

use crate::{SyntaxError, SyntaxErrorKind};

/// Cursor over a token slice that ends in [`TokenKind::Eof`].
///
/// Positions never move past the end-of-file token.
pub struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Create a cursor. `tokens` must be non-empty and end in end of file.
    pub fn new(tokens: &'a [Token]) -> Self {
        debug_assert!(tokens.last().is_some_and(|t| t.is(TokenKind::Eof)));
        Cursor { tokens, pos: 0 }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos.min(self.last());
    }

    #[inline]
    fn last(&self) -> usize {
        self.tokens.len().saturating_sub(1)
    }

    /// Token at absolute index `i`, clamped to end of file.
    #[inline]
    pub fn token_at(&self, i: usize) -> &'a Token {
        &self.tokens[i.min(self.last())]
    }

    #[inline]
    pub fn current(&self) -> &'a Token {
        self.token_at(self.pos)
    }

    #[inline]
    pub fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    #[inline]
    pub fn current_span(&self) -> Span {
        self.current().span
    }

    /// Token `n` positions ahead.
    #[inline]
    pub fn peek(&self, n: usize) -> &'a Token {
        self.token_at(self.pos + n)
    }

    #[inline]
    pub fn peek_kind(&self, n: usize) -> TokenKind {
        self.peek(n).kind
    }

    #[inline]
    pub fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    /// Check for an identifier or keyword spelled `word`.
    #[inline]
    pub fn check_word(&self, word: &str) -> bool {
        self.current().is_word(word)
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.check(TokenKind::Eof)
    }

    /// Advance one token and return the one passed over.
    pub fn advance(&mut self) -> &'a Token {
        let token = self.current();
        if self.pos < self.last() {
            self.pos += 1;
        }
        token
    }

    /// Consume `kind` if present.
    pub fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub fn expect(
        &mut self,
        kind: TokenKind,
        expected: &'static str,
    ) -> Result<&'a Token, SyntaxError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error_expected(expected))
        }
    }

    /// Consume an identifier or keyword.
    pub fn expect_word(&mut self, expected: &'static str) -> Result<&'a Token, SyntaxError> {
        if self.current_kind().is_word() {
            Ok(self.advance())
        } else {
            Err(self.error_expected(expected))
        }
    }

    pub fn error_expected(&self, expected: &'static str) -> SyntaxError {
        let token = self.current();
        let found = match token.kind {
            TokenKind::Eof => "end of file".to_owned(),
            _ => format!("`{}`", token.text),
        };
        SyntaxError::new(SyntaxErrorKind::Expected { expected, found }, token.span)
    }

    /// Clone the tokens in `start..end`.
    pub fn slice(&self, start: usize, end: usize) -> Vec<Token> {
        self.tokens[start..end].to_vec()
    }

    /// Step over a bracketed group starting at the current opener, checking
    /// that every bracket inside is matched.
    pub fn skip_balanced(&mut self) -> Result<(), SyntaxError> {
        let mut stack: Vec<(TokenKind, Span)> = Vec::new();
        loop {
            let token = self.current();
            match token.kind {
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => {
                    stack.push((token.kind, token.span));
                }
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    let Some((open, _)) = stack.pop() else {
                        return Err(SyntaxError::new(
                            SyntaxErrorKind::Stray(token.text.to_string()),
                            token.span,
                        ));
                    };
                    if closer(open) != token.kind {
                        return Err(SyntaxError::new(
                            SyntaxErrorKind::Mismatched {
                                open,
                                close: token.kind,
                            },
                            token.span,
                        ));
                    }
                }
                TokenKind::Eof => {
                    let (open, span) = stack.pop().unwrap_or((TokenKind::Eof, token.span));
                    return Err(SyntaxError::new(SyntaxErrorKind::Unclosed(open), span));
                }
                TokenKind::Unknown => return Err(unknown(token)),
                _ => {}
            }
            self.advance();
            if stack.is_empty() {
                return Ok(());
            }
        }
    }

    /// Index just past the `>` closing a generic argument list that opens
    /// at index `at`, if the tokens between can only form type arguments.
    pub fn generic_end(&self, at: usize) -> Option<usize> {
        if !self.token_at(at).is(TokenKind::Lt) {
            return None;
        }
        let mut depth = 0usize;
        let mut parens = 0usize;
        let mut i = at;
        loop {
            match self.token_at(i).kind {
                TokenKind::Lt => depth += 1,
                TokenKind::Gt => {
                    depth -= 1;
                    if depth == 0 {
                        return (parens == 0).then_some(i + 1);
                    }
                }
                TokenKind::LParen => parens += 1,
                TokenKind::RParen => parens = parens.checked_sub(1)?,
                TokenKind::Ident
                | TokenKind::Keyword
                | TokenKind::Dot
                | TokenKind::ColonColon
                | TokenKind::Comma
                | TokenKind::Question
                | TokenKind::Star
                | TokenKind::LBracket
                | TokenKind::RBracket => {}
                _ => return None,
            }
            i += 1;
        }
    }

    /// Step over an expression up to (not including) one of `stops` at
    /// bracket depth zero.
    pub fn skip_expression(&mut self, stops: &[TokenKind]) -> Result<(), SyntaxError> {
        loop {
            let kind = self.current_kind();
            if stops.contains(&kind) {
                return Ok(());
            }
            match kind {
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => {
                    self.skip_balanced()?;
                }
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace | TokenKind::Eof => {
                    return Err(self.error_expected("end of expression"));
                }
                TokenKind::Unknown => return Err(unknown(self.current())),
                TokenKind::Lt if self.pos > 0 && self.token_at(self.pos - 1).kind.is_word() => {
                    let generic = self
                        .generic_end(self.pos)
                        .filter(|&end| ends_generic(self.token_at(end).kind));
                    match generic {
                        Some(end) => self.pos = end.min(self.last()),
                        None => {
                            self.advance();
                        }
                    }
                }
                _ => {
                    self.advance();
                }
            }
        }
    }
}

/// Tokens that may follow a generic argument list: the ones C# accepts in
/// expressions, plus words for declarations such as `List<int> items`.
fn ends_generic(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Ident
            | TokenKind::Keyword
            | TokenKind::LParen
            | TokenKind::RParen
            | TokenKind::RBracket
            | TokenKind::RBrace
            | TokenKind::Colon
            | TokenKind::Semicolon
            | TokenKind::Comma
            | TokenKind::Dot
            | TokenKind::Question
            | TokenKind::EqEq
            | TokenKind::BangEq
            | TokenKind::Pipe
            | TokenKind::Caret
            | TokenKind::AmpAmp
            | TokenKind::PipePipe
            | TokenKind::Amp
            | TokenKind::LBracket
            | TokenKind::LBrace
            | TokenKind::Eof
    )
}

fn closer(open: TokenKind) -> TokenKind {
    match open {
        TokenKind::LParen => TokenKind::RParen,
        TokenKind::LBracket => TokenKind::RBracket,
        _ => TokenKind::RBrace,
    }
}

pub(crate) fn unknown(token: &Token) -> SyntaxError {
    SyntaxError::new(SyntaxErrorKind::Unknown(token.text.to_string()), token.span)
}
