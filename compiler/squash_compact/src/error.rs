//! Compaction errors.
//!
//! Both variants are implementation bugs, never a property of the input
//! document.

use squash_ir::{Span, TokenKind};
use thiserror::Error;

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum CompactError {
    #[error("no collision entry for {left} followed by {right} at {span}")]
    MissingCollisionEntry {
        left: TokenKind,
        right: TokenKind,
        span: Span,
    },

    #[error("compacted stream has {found} tokens but the tree holds {expected}")]
    TokenCount { expected: usize, found: usize },
}
