//! Reachability-based removal of unused declarations.
//!
//! [`trim`] keeps exactly the declarations a program can observe:
//!
//! 1. Seed roots: protected and preserved declarations, the entry
//!    container, configured entry points.
//! 2. Close over usage edges with a worklist. Retaining a declaration
//!    retains its ancestors; kind-specific rules in `rules` add members
//!    that run without a visible reference (overrides, operators, effectful
//!    initializers, ...).
//! 3. Rebuild the tree without everything outside the closure.
//!
//! The analyzer is only as precise as its [`SemanticOracle`]. With the
//! default [`LexicalOracle`] it keeps anything whose name is mentioned.

mod closure;
mod effect;
mod oracle;
mod prune;
mod report;
mod roots;
mod rules;

pub use effect::{has_side_effect, initializer_has_side_effect};
pub use oracle::{LexicalOracle, SemanticOracle, StaticOracle, Usage, UsageKind};
pub use report::{TrimReport, UnresolvedEntryPoint};

use serde::{Deserialize, Serialize};
use squash_ir::{DeclIndex, SyntaxTree};
use tracing::debug;

use closure::{Closure, Retention};
use prune::Pruner;

/// How finely to trim.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrimLevel {
    /// Remove unused types and unused members of kept types.
    #[default]
    Members,
    /// Remove unused types only; kept types keep every member.
    Types,
}

/// Trim settings.
#[derive(Clone, Debug, Default)]
pub struct TrimOptions {
    pub level: TrimLevel,
    /// Names the runtime calls, e.g. `Program.Main`.
    pub entry_points: Vec<String>,
    /// Further names to keep regardless of references.
    pub protected: Vec<String>,
}

/// A trimmed tree and what happened to it.
#[derive(Clone, Debug)]
pub struct Trimmed {
    pub tree: SyntaxTree,
    pub report: TrimReport,
}

/// Remove every declaration not reachable from the roots.
#[tracing::instrument(level = "debug", skip_all, fields(decls = tree.decl_count()))]
pub fn trim(tree: SyntaxTree, oracle: &dyn SemanticOracle, options: &TrimOptions) -> Trimmed {
    let (state, names, mut report) = {
        let index = DeclIndex::new(&tree);
        let roots = roots::seed(&index, oracle, options);

        let mut closure = Closure::new(&index, oracle, options.level);
        for &id in &roots.ids {
            closure.retain(id, Retention::Direct);
        }
        closure.run();
        let edges = closure.edges();
        let state = closure.into_state();

        let names: Vec<Option<String>> = index
            .ids()
            .map(|id| {
                let decl = index.decl(id);
                (!decl.name.is_empty()).then(|| index.qualified_name(id).to_owned())
            })
            .collect();
        let report = TrimReport {
            total: index.len(),
            unresolved: roots.unresolved,
            edges,
            ..TrimReport::default()
        };
        (state, names, report)
    };

    let (tree, removed) = Pruner::new(&state, &names).prune_tree(tree);
    report.retained = tree.decl_count();
    report.removed = removed;
    debug!(
        retained = report.retained,
        removed = report.removed_count(),
        edges = report.edges,
        "trimmed"
    );
    Trimmed { tree, report }
}
