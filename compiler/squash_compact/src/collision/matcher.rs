//! Token matcher for collision rules.

use squash_ir::TokenKind;

/// Which token kinds one side of a collision rule accepts.
#[derive(Clone, Copy, Debug)]
pub enum TokenMatcher {
    Any,
    Exact(TokenKind),
    OneOf(&'static [TokenKind]),
    /// Kinds for which the predicate holds, e.g. [`TokenKind::is_word`].
    Category(fn(TokenKind) -> bool),
}

impl TokenMatcher {
    /// Identifiers and keywords.
    pub const WORD: TokenMatcher = TokenMatcher::Category(TokenKind::is_word);

    /// Integer and real literals.
    pub const NUMBER: TokenMatcher = TokenMatcher::Category(TokenKind::is_number);

    /// Punctuation and operators with a fixed spelling.
    pub const PUNCT: TokenMatcher = TokenMatcher::Category(TokenKind::is_punct);

    #[inline]
    pub fn matches(&self, kind: TokenKind) -> bool {
        match self {
            TokenMatcher::Any => true,
            TokenMatcher::Exact(expected) => *expected == kind,
            TokenMatcher::OneOf(kinds) => kinds.contains(&kind),
            TokenMatcher::Category(predicate) => predicate(kind),
        }
    }
}
