//! Collision-safe token compaction for squash scripts.
//!
//! [`compact`] strips trivia from a tree without changing what a lexer
//! reads back: re-lexing the output yields the same `(kind, text)` sequence
//! as the input. Two adjacent tokens are written back to back unless the
//! [collision table](collision) says the joined text would lex differently,
//! in which case one space separates them.
//!
//! Tokens flagged [`RegionFlags::PRESERVE`](squash_ir::RegionFlags) keep
//! their trivia; a line break is synthesized where a preserved run starts
//! mid-line. Directive lines other than `#region`/`#endregion` survive on
//! lines of their own.

pub mod collision;
mod compactor;
mod error;

pub use collision::{global_collision_table, lookup_separator, CollisionTable, Separator};
pub use error::CompactError;

use squash_ir::{SyntaxTree, Token};
use tracing::debug;

use compactor::Compactor;

/// How much trivia to remove.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum CompactMode {
    /// Delete comments; keep whitespace and line structure, dropping lines
    /// that held nothing but a comment.
    StripComments,
    /// Keep only the trivia needed to separate tokens.
    #[default]
    Full,
}

/// Compact every token of a tree.
#[tracing::instrument(level = "debug", skip_all, fields(mode = ?mode))]
pub fn compact(mut tree: SyntaxTree, mode: CompactMode) -> Result<SyntaxTree, CompactError> {
    let tokens: Vec<Token> = tree.tokens().cloned().collect();
    let expected = tokens.len();
    let compacted = compact_tokens(&tokens, mode)?;
    let found = compacted.len();
    if !tree.replace_tokens(compacted) {
        return Err(CompactError::TokenCount { expected, found });
    }
    Ok(tree)
}

/// Compact a token stream. The result has one token per input token, with
/// the same kinds, texts and region flags.
pub fn compact_tokens(tokens: &[Token], mode: CompactMode) -> Result<Vec<Token>, CompactError> {
    let mut compactor = Compactor::new(mode);
    let out = compactor.run(tokens)?;
    debug!(
        tokens = out.len(),
        separators = compactor.separators(),
        "compacted tokens"
    );
    Ok(out)
}

#[cfg(test)]
mod tests;
