//! Root-set seeding.

use squash_ir::{DeclId, DeclIndex};
use tracing::warn;

use crate::report::UnresolvedEntryPoint;
use crate::rules;
use crate::{SemanticOracle, TrimOptions};

pub(crate) struct RootSet {
    pub ids: Vec<DeclId>,
    pub unresolved: Vec<UnresolvedEntryPoint>,
}

/// Protected declarations, declarations in preserved regions, the entry
/// container with its constructors, and every configured name.
pub(crate) fn seed(index: &DeclIndex<'_>, oracle: &dyn SemanticOracle, options: &TrimOptions) -> RootSet {
    let mut ids = Vec::new();
    for id in index.ids() {
        let decl = index.decl(id);
        if decl.protected || decl.first_token().is_some_and(|t| t.is_preserved()) {
            ids.push(id);
        }
        if oracle.is_entry_container(index, id) {
            ids.push(id);
            ids.extend(rules::entry_roots(index, id));
        }
    }

    let mut unresolved = Vec::new();
    for name in options.entry_points.iter().chain(&options.protected) {
        let found = index.resolve(name);
        if found.is_empty() {
            warn!(name = name.as_str(), "entry point matches no declaration");
            unresolved.push(UnresolvedEntryPoint { name: name.clone() });
        }
        ids.extend(found);
    }
    RootSet { ids, unresolved }
}
