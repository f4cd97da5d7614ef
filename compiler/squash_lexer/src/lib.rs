//! Lossless lexer for the squash script dialect, built on logos.
//!
//! [`lex`] turns a document into significant tokens, each carrying the
//! trivia around it:
//!
//! - trailing trivia: everything after the token up to and including the
//!   first newline
//! - leading trivia: everything else before the token
//!
//! The final [`TokenKind::Eof`] token holds whatever trivia follows the last
//! significant token, so concatenating all tokens reproduces the input.
//! Bytes no rule accepts become [`TokenKind::Unknown`] tokens rather than
//! errors; later passes decide whether that is fatal.

mod interpolated;
mod keywords;
mod raw_token;

use std::sync::Arc;

use logos::Logos;
use squash_ir::{Span, Token, TokenKind, Trivia, TriviaKind, TriviaList};

use raw_token::{Piece, RawToken};

/// Lex a document into tokens with attached trivia. The last token is
/// always [`TokenKind::Eof`].
pub fn lex(source: &str) -> Vec<Token> {
    let mut out = Vec::new();
    let mut pending = TriviaList::new();
    let mut current: Option<Token> = None;
    // Trailing trivia of `current` is still open (no newline seen yet).
    let mut trailing_open = false;

    let mut logos = RawToken::lexer(source);
    while let Some(result) = logos.next() {
        let range = logos.span();
        let piece = match result {
            Ok(raw) => raw.classify(logos.slice()),
            Err(()) => {
                // Resynchronize on a char boundary so the slice stays valid.
                let mut end = range.end;
                while end < source.len() && !source.is_char_boundary(end) {
                    end += 1;
                }
                logos.bump(end - range.end);
                Piece::Token(TokenKind::Unknown)
            }
        };
        let range = range.start..logos.span().end;
        let text = &source[range.clone()];

        match piece {
            Piece::Trivia(kind) => {
                let trivia = Trivia::new(kind, text);
                match current.as_mut() {
                    Some(token) if trailing_open => {
                        token.trailing.push(trivia);
                        if kind == TriviaKind::Newline {
                            trailing_open = false;
                        }
                    }
                    _ => pending.push(trivia),
                }
            }
            Piece::Token(TokenKind::Unknown)
                if trailing_open
                    && current.as_ref().is_some_and(|t| {
                        t.kind == TokenKind::Unknown
                            && t.trailing.is_empty()
                            && t.span.end as usize == range.start
                    }) =>
            {
                // Glue runs of unknown bytes into one token.
                if let Some(token) = current.as_mut() {
                    let mut joined = String::with_capacity(token.text.len() + text.len());
                    joined.push_str(&token.text);
                    joined.push_str(text);
                    token.text = Arc::from(joined);
                    token.span = token.span.merge(Span::from_range(range));
                }
            }
            Piece::Token(kind) => {
                out.extend(current.take());
                let mut token = Token::new(kind, text, Span::from_range(range));
                token.leading = std::mem::take(&mut pending);
                current = Some(token);
                trailing_open = true;
            }
        }
    }
    out.extend(current);

    let mut eof = Token::eof(u32::try_from(source.len()).unwrap_or(u32::MAX));
    eof.leading = pending;
    out.push(eof);
    out
}

/// Significant `(kind, text)` sequence of a document, end of file excluded.
///
/// Two texts that relex to the same sequence are lexically equivalent.
pub fn relex(source: &str) -> Vec<(TokenKind, Arc<str>)> {
    significant(&lex(source))
}

/// Significant `(kind, text)` sequence of a token stream, end of file
/// excluded.
pub fn significant(tokens: &[Token]) -> Vec<(TokenKind, Arc<str>)> {
    tokens
        .iter()
        .filter(|t| t.kind != TokenKind::Eof)
        .map(|t| (t.kind, Arc::clone(&t.text)))
        .collect()
}

#[cfg(test)]
mod tests;
