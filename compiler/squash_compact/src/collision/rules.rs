//! Declarative collision rules.
//!
//! Every separator decision is one entry in [`COLLISION_RULES`]. A pair no
//! rule claims falls through to the `Fallback` rule and is joined.

use squash_ir::TokenKind;

use super::{Separator, TokenMatcher};

/// A declarative collision rule.
#[derive(Clone, Copy, Debug)]
pub struct CollisionRule {
    /// Human-readable name for debugging.
    pub name: &'static str,

    /// Matcher for the preceding token.
    pub left: TokenMatcher,

    /// Matcher for the following token.
    pub right: TokenMatcher,

    /// Extra test on the pair, for rules that depend on both spellings.
    pub condition: Option<fn(TokenKind, TokenKind) -> bool>,

    pub separator: Separator,

    /// Lower is checked first; ties keep definition order.
    pub priority: u8,
}

impl CollisionRule {
    #[inline]
    const fn new(
        name: &'static str,
        left: TokenMatcher,
        right: TokenMatcher,
        separator: Separator,
    ) -> Self {
        CollisionRule {
            name,
            left,
            right,
            condition: None,
            separator,
            priority: 50,
        }
    }

    #[inline]
    const fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    #[inline]
    const fn when(mut self, condition: fn(TokenKind, TokenKind) -> bool) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Check if this rule matches the given token pair.
    #[inline]
    pub fn matches(&self, left: TokenKind, right: TokenKind) -> bool {
        self.left.matches(left)
            && self.right.matches(right)
            && self.condition.is_none_or(|condition| condition(left, right))
    }
}

#[allow(
    clippy::enum_glob_use,
    reason = "rule table reads better with bare kind names"
)]
use TokenKind::*;
use TokenMatcher::{Any, Exact, OneOf};

/// String literals that open with a prefix character (`@"..."`, `$"..."`).
static PREFIXED_STRINGS: &[TokenKind] = &[VerbatimString, InterpolatedString];

/// Two-character sequences that open or close a comment. The lexer has no
/// token for them, but gluing a `/` to a `/` or `*` would start one.
const COMMENT_MARKERS: [&str; 3] = ["//", "/*", "*/"];

/// Whether the first character of `right` would extend `left` into a
/// longer operator or a comment marker.
pub(crate) fn merges_into_operator(left: TokenKind, right: TokenKind) -> bool {
    let (Some(left), Some(right)) = (left.lexeme(), right.lexeme()) else {
        return false;
    };
    let Some(first) = right.chars().next() else {
        return false;
    };
    let joined = format!("{left}{first}");

    TokenKind::ALL
        .iter()
        .filter_map(|kind| kind.lexeme())
        .chain(COMMENT_MARKERS)
        .any(|op| op.starts_with(joined.as_str()))
}

/// All collision rules.
///
/// - Priority 10: end of file
/// - Priority 20: word and number runs
/// - Priority 30: prefixed string literals
/// - Priority 40: operator merging
/// - Priority 90: fallback
pub static COLLISION_RULES: &[CollisionRule] = &[
    // Priority 10: nothing follows end of file
    CollisionRule::new("BeforeEof", Any, Exact(Eof), Separator::Join).with_priority(10),
    // Priority 20: `int x`, `x 1`, `1 f`, `1 .ToString()`, `. 5`
    CollisionRule::new(
        "WordWord",
        TokenMatcher::WORD,
        TokenMatcher::WORD,
        Separator::Space,
    )
    .with_priority(20),
    CollisionRule::new(
        "WordNumber",
        TokenMatcher::WORD,
        TokenMatcher::NUMBER,
        Separator::Space,
    )
    .with_priority(20),
    CollisionRule::new(
        "NumberWord",
        TokenMatcher::NUMBER,
        TokenMatcher::WORD,
        Separator::Space,
    )
    .with_priority(20),
    CollisionRule::new(
        "NumberNumber",
        TokenMatcher::NUMBER,
        TokenMatcher::NUMBER,
        Separator::Space,
    )
    .with_priority(20),
    CollisionRule::new("NumberDot", TokenMatcher::NUMBER, Exact(Dot), Separator::Space)
        .with_priority(20),
    CollisionRule::new("DotNumber", Exact(Dot), TokenMatcher::NUMBER, Separator::Space)
        .with_priority(20),
    // Priority 30: `@` and `$` literals after a word, and `""` escapes
    CollisionRule::new(
        "WordPrefixedString",
        TokenMatcher::WORD,
        OneOf(PREFIXED_STRINGS),
        Separator::Space,
    )
    .with_priority(30),
    CollisionRule::new(
        "VerbatimQuote",
        OneOf(PREFIXED_STRINGS),
        Exact(String),
        Separator::Space,
    )
    .with_priority(30),
    // Priority 40: `+ +`, `< <=`, `/ /`, `? ??`, ...
    CollisionRule::new(
        "OperatorMerge",
        TokenMatcher::PUNCT,
        TokenMatcher::PUNCT,
        Separator::Space,
    )
    .when(merges_into_operator)
    .with_priority(40),
    // Priority 90: everything else can touch
    CollisionRule::new("Fallback", Any, Any, Separator::Join).with_priority(90),
];
