//! Parse error types.

use squash_ir::{Span, TokenKind};
use thiserror::Error;

/// What went wrong.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum SyntaxErrorKind {
    #[error("expected {expected}, found {found}")]
    Expected {
        expected: &'static str,
        found: String,
    },

    #[error("{close} does not match {open}")]
    Mismatched { open: TokenKind, close: TokenKind },

    #[error("unclosed {0}")]
    Unclosed(TokenKind),

    #[error("unexpected `{0}` outside any declaration")]
    Stray(String),

    #[error("unrecognized input `{0}`")]
    Unknown(String),
}

/// A syntax error with its location in the document.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("{kind} at {span}")]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    pub span: Span,
}

impl SyntaxError {
    pub fn new(kind: SyntaxErrorKind, span: Span) -> Self {
        SyntaxError { kind, span }
    }
}
