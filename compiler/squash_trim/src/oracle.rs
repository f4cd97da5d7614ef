//! Semantic facts the analyzer consumes.
//!
//! The analyzer never inspects declaration bodies itself. Everything it
//! knows about references, dispatch and imports comes through a
//! [`SemanticOracle`]. Two implementations ship:
//!
//! - [`LexicalOracle`]: name matching over declaration tokens. Every
//!   answer errs towards keeping code.
//! - [`StaticOracle`]: facts supplied by the caller, keyed by qualified
//!   name.

mod fixed;
mod lexical;

pub use fixed::StaticOracle;
pub use lexical::LexicalOracle;

use squash_ir::{DeclId, DeclIndex, SyntaxTree};

/// How a declaration mentions another.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum UsageKind {
    /// Plain name reference or call.
    Reference,
    /// `new T(...)`.
    Instantiation,
    /// Base class in a type header.
    BaseType,
    /// Implemented interface in a type header.
    Interface,
    /// Mentioned in a `where` clause.
    Constraint,
    /// Generic argument for a parameter constrained with `new()`.
    NewConstrainedArgument,
    /// `typeof(T)`, `nameof(T)` and other reflective handles.
    Opaque,
}

/// A usage edge from the declaration being asked about.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Usage {
    pub target: DeclId,
    pub kind: UsageKind,
}

impl Usage {
    pub fn new(target: DeclId, kind: UsageKind) -> Self {
        Usage { target, kind }
    }
}

/// Semantic facts about a program.
///
/// Answers must be over-approximations: reporting a usage that does not
/// exist only keeps dead code, while missing one deletes live code.
pub trait SemanticOracle {
    /// Usage edges out of `id`'s own tokens. Members report their own
    /// edges; a container only reports what its header and closing tokens
    /// mention.
    fn usages(&self, index: &DeclIndex<'_>, id: DeclId) -> Vec<Usage>;

    /// Whether `id` is the type the runtime instantiates.
    fn is_entry_container(&self, index: &DeclIndex<'_>, id: DeclId) -> bool;

    /// Whether `id` overrides a base member or implements an interface
    /// member, so virtual dispatch may call it without a static reference.
    fn is_override_or_implementation(&self, index: &DeclIndex<'_>, id: DeclId) -> bool;

    /// Whether `id` is an extension method.
    fn is_extension_method(&self, index: &DeclIndex<'_>, id: DeclId) -> bool;

    /// Targets of using directives in `merged` that no longer resolve,
    /// given the documents it was merged from.
    fn unresolved_imports(&self, merged: &SyntaxTree, sources: &[&SyntaxTree]) -> Vec<String>;
}
