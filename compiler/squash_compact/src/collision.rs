//! Token collision table.
//!
//! Answers one question for every pair of adjacent significant tokens: if
//! all trivia between them is removed, does the re-lexer still see the same
//! two tokens? When it does not (`a` `b` would read as `ab`, `+` `+` as
//! `++`), the compactor keeps a single space.
//!
//! The answer depends only on the two token kinds, so the table is keyed on
//! `(TokenKind, TokenKind)`, computed once from the declarative rules in
//! [`rules`] and shared through [`global_collision_table`].

mod lookup;
mod matcher;
mod rules;

pub use lookup::{global_collision_table, lookup_separator, CollisionTable};
pub use matcher::TokenMatcher;
pub use rules::{CollisionRule, COLLISION_RULES};

/// What must separate two adjacent tokens once trivia is stripped.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Separator {
    /// The texts can be written back to back.
    #[default]
    Join,
    /// Written back to back the texts would re-lex differently; keep one
    /// space.
    Space,
}

impl Separator {
    #[inline]
    pub fn needs_space(self) -> bool {
        matches!(self, Separator::Space)
    }
}

#[cfg(test)]
mod tests;
