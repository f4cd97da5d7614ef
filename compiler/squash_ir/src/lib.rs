//! Squash IR - shared token and declaration model
//!
//! This crate contains the data structures every packaging pass works on:
//! - Spans for source locations
//! - Tokens with attached trivia and region flags
//! - The declaration tree produced by the outline parser
//! - A pre-order declaration index with qualified-name lookup
//!
//! # Design Philosophy
//!
//! - **Lossless**: every byte of a document lives in some token's text or
//!   trivia, so a tree renders back to its source exactly
//! - **Owned trees**: passes take a tree by value and return a new one
//! - **Flat ids**: `DeclId(u32)` indices instead of parent pointers

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod decl;
mod index;
mod span;
mod token;

pub use decl::{Decl, DeclKind, MemberLayout, Modifiers, SyntaxTree, UsingDirective};
pub use index::{DeclId, DeclIndex};
pub use span::Span;
pub use token::{render_tokens, RegionFlags, Token, TokenKind, Trivia, TriviaKind, TriviaList};

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::{DeclId, Span, TokenKind};
    crate::static_assert_size!(Span, 8);
    crate::static_assert_size!(DeclId, 4);
    crate::static_assert_size!(TokenKind, 1);
}
