//! Caller-supplied semantic facts.

use rustc_hash::{FxHashMap, FxHashSet};
use squash_ir::{DeclId, DeclIndex, SyntaxTree};

use super::{SemanticOracle, Usage, UsageKind};

/// Oracle answering from facts registered by qualified name.
///
/// Names are resolved with [`DeclIndex::resolve`], so `Program.Main` and
/// a bare `Main` both work.
#[derive(Clone, Debug, Default)]
pub struct StaticOracle {
    usages: FxHashMap<String, Vec<(String, UsageKind)>>,
    entry_containers: FxHashSet<String>,
    overrides: FxHashSet<String>,
    extensions: FxHashSet<String>,
    unresolved: Vec<String>,
}

impl StaticOracle {
    pub fn new() -> Self {
        StaticOracle::default()
    }

    /// Record that `from` mentions `to`.
    #[must_use]
    pub fn with_usage(mut self, from: &str, to: &str, kind: UsageKind) -> Self {
        self.usages
            .entry(from.to_owned())
            .or_default()
            .push((to.to_owned(), kind));
        self
    }

    #[must_use]
    pub fn with_entry_container(mut self, name: &str) -> Self {
        self.entry_containers.insert(name.to_owned());
        self
    }

    #[must_use]
    pub fn with_override(mut self, name: &str) -> Self {
        self.overrides.insert(name.to_owned());
        self
    }

    #[must_use]
    pub fn with_extension(mut self, name: &str) -> Self {
        self.extensions.insert(name.to_owned());
        self
    }

    /// Report a using directive target as unresolved.
    #[must_use]
    pub fn with_unresolved_import(mut self, target: &str) -> Self {
        self.unresolved.push(target.to_owned());
        self
    }

    fn named(set: &FxHashSet<String>, index: &DeclIndex<'_>, id: DeclId) -> bool {
        set.iter().any(|name| index.resolve(name).contains(&id))
    }
}

impl SemanticOracle for StaticOracle {
    fn usages(&self, index: &DeclIndex<'_>, id: DeclId) -> Vec<Usage> {
        let Some(edges) = self.usages.get(index.qualified_name(id)) else {
            return Vec::new();
        };
        edges
            .iter()
            .flat_map(|(to, kind)| {
                index
                    .resolve(to)
                    .into_iter()
                    .map(move |target| Usage::new(target, *kind))
            })
            .collect()
    }

    fn is_entry_container(&self, index: &DeclIndex<'_>, id: DeclId) -> bool {
        Self::named(&self.entry_containers, index, id)
    }

    fn is_override_or_implementation(&self, index: &DeclIndex<'_>, id: DeclId) -> bool {
        Self::named(&self.overrides, index, id)
    }

    fn is_extension_method(&self, index: &DeclIndex<'_>, id: DeclId) -> bool {
        Self::named(&self.extensions, index, id)
    }

    fn unresolved_imports(&self, merged: &SyntaxTree, _sources: &[&SyntaxTree]) -> Vec<String> {
        merged
            .usings
            .iter()
            .filter(|using| self.unresolved.contains(&using.target))
            .map(|using| using.target.clone())
            .collect()
    }
}
