//! O(1) collision lookup.
//!
//! Evaluates [`COLLISION_RULES`] against every kind pair once and keeps the
//! result in a hash map.

use std::sync::OnceLock;

use rustc_hash::FxHashMap;
use squash_ir::TokenKind;

use super::rules::{CollisionRule, COLLISION_RULES};
use super::Separator;

/// Pre-computed separator for every `(left, right)` kind pair.
///
/// Pairs involving [`TokenKind::Unknown`] have no entry: the compactor
/// cannot reason about bytes the lexer did not classify.
pub struct CollisionTable {
    entries: FxHashMap<(TokenKind, TokenKind), Separator>,
}

impl CollisionTable {
    /// Build the table from the static rules.
    pub fn new() -> Self {
        Self::from_rules(COLLISION_RULES)
    }

    pub fn from_rules(rules: &[CollisionRule]) -> Self {
        let mut sorted: Vec<&CollisionRule> = rules.iter().collect();
        sorted.sort_by_key(|rule| rule.priority);

        let mut entries = FxHashMap::default();
        let kinds = TokenKind::ALL
            .iter()
            .copied()
            .filter(|&kind| kind != TokenKind::Unknown);
        for left in kinds.clone() {
            for right in kinds.clone() {
                if let Some(rule) = sorted.iter().find(|rule| rule.matches(left, right)) {
                    entries.insert((left, right), rule.separator);
                }
            }
        }
        CollisionTable { entries }
    }

    /// Separator required between `left` and `right`, or `None` if the
    /// table has no entry for the pair.
    #[inline]
    pub fn lookup(&self, left: TokenKind, right: TokenKind) -> Option<Separator> {
        self.entries.get(&(left, right)).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CollisionTable {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL_COLLISION_TABLE: OnceLock<CollisionTable> = OnceLock::new();

/// The shared collision table, built on first use.
pub fn global_collision_table() -> &'static CollisionTable {
    GLOBAL_COLLISION_TABLE.get_or_init(CollisionTable::new)
}

/// Look up a pair in the shared table.
#[inline]
pub fn lookup_separator(left: TokenKind, right: TokenKind) -> Option<Separator> {
    global_collision_table().lookup(left, right)
}
