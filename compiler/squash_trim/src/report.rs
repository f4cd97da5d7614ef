//! What a trim run kept and removed.

use std::fmt;

/// A configured root name that matched no declaration.
///
/// Not an error: the analyzer proceeds with the roots it did find, which
/// may trim the program down to nothing.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct UnresolvedEntryPoint {
    pub name: String,
}

impl fmt::Display for UnresolvedEntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entry point `{}` matches no declaration", self.name)
    }
}

/// Outcome of one trim run.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TrimReport {
    /// Declarations in the input.
    pub total: usize,
    /// Declarations kept.
    pub retained: usize,
    /// Qualified names of removed declarations, in source order.
    pub removed: Vec<String>,
    pub unresolved: Vec<UnresolvedEntryPoint>,
    /// Usage edges followed while computing the closure.
    pub edges: usize,
}

impl TrimReport {
    pub fn removed_count(&self) -> usize {
        self.total - self.retained
    }
}
