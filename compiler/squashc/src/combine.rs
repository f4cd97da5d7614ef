//! The default combiner.
//!
//! Documents are ordered by weight (stable, so equal weights keep input
//! order), concatenated with their namespaces removed, and deduplicated:
//!
//! - using directives by target, first occurrence wins;
//! - `partial` types by kind and name, later halves appended to the first;
//! - using directives the oracle no longer resolves are dropped last.
//!
//! A document without a caller-supplied weight may declare one with a
//! `// squash sortorder <n>` comment in front of its first token.

mod flatten;
mod partial;

use std::sync::Arc;

use squash_ir::{SyntaxTree, TriviaKind, UsingDirective};
use squash_trim::{LexicalOracle, SemanticOracle};
use tracing::debug;

use crate::document::Document;
use crate::error::PackError;
use crate::processor::{Combiner, ProcessContext, ProcessorDescriptor, Stage};

use flatten::{directive_carry, prepend, Merger};

/// Name of the combined document.
pub const COMBINED: &str = "combined";

pub struct DefaultCombiner {
    descriptor: ProcessorDescriptor,
    oracle: Arc<dyn SemanticOracle + Send + Sync>,
}

impl DefaultCombiner {
    pub const NAME: &'static str = "combine";

    pub fn new(oracle: Arc<dyn SemanticOracle + Send + Sync>) -> Self {
        DefaultCombiner {
            descriptor: ProcessorDescriptor::new(Self::NAME, Stage::Combine),
            oracle,
        }
    }
}

impl Default for DefaultCombiner {
    fn default() -> Self {
        DefaultCombiner::new(Arc::new(LexicalOracle::new()))
    }
}

impl Combiner for DefaultCombiner {
    fn descriptor(&self) -> &ProcessorDescriptor {
        &self.descriptor
    }

    #[tracing::instrument(level = "debug", skip_all, fields(documents = documents.len()))]
    fn combine(
        &self,
        documents: Vec<Document>,
        ctx: &ProcessContext<'_>,
    ) -> Result<Document, PackError> {
        let mut entries = Vec::with_capacity(documents.len());
        for document in documents {
            ctx.cancel.check()?;
            let (tree, notes) = document.into_tree()?;
            let weight = notes.weight.or_else(|| sort_order(&tree)).unwrap_or(0);
            entries.push((weight, tree, notes.diagnostics));
        }
        entries.sort_by_key(|(weight, ..)| *weight);

        let sources: Vec<SyntaxTree> = entries.iter().map(|(_, tree, _)| tree.clone()).collect();
        let mut merger = Merger::default();
        let mut diagnostics = Vec::new();
        for (_, tree, notes) in entries {
            merger.add(tree);
            diagnostics.extend(notes);
        }
        let mut merged = merger.finish();
        let partials = partial::merge_partials(&mut merged.items);

        let sources: Vec<&SyntaxTree> = sources.iter().collect();
        let unresolved = self.oracle.unresolved_imports(&merged, &sources);
        let dropped = drop_usings(&mut merged, &unresolved);

        debug!(
            usings = merged.usings.len(),
            items = merged.items.len(),
            partials,
            dropped,
            "combined documents"
        );
        let mut combined = Document::from_tree(COMBINED, merged);
        combined.diagnostics = diagnostics;
        Ok(combined)
    }
}

/// Weight from a `// squash sortorder <n>` comment before the first token.
pub fn sort_order(tree: &SyntaxTree) -> Option<i32> {
    let first = tree.tokens().next()?;
    first
        .leading
        .iter()
        .filter(|p| p.kind == TriviaKind::LineComment)
        .find_map(|p| {
            let mut words = p.text.trim_start_matches('/').split_whitespace();
            let tool = words.next()?;
            let key = words.next()?;
            if !tool.eq_ignore_ascii_case("squash") || !key.eq_ignore_ascii_case("sortorder") {
                return None;
            }
            words.next()?.parse().ok()
        })
}

/// Remove usings whose target is in `targets`, keeping their directive
/// lines.
fn drop_usings(tree: &mut SyntaxTree, targets: &[String]) -> usize {
    if targets.is_empty() {
        return 0;
    }
    let (dropped, kept): (Vec<UsingDirective>, Vec<UsingDirective>) = std::mem::take(&mut tree.usings)
        .into_iter()
        .partition(|u| targets.contains(&u.target));
    tree.usings = kept;

    let carry: Vec<_> = dropped
        .iter()
        .flat_map(|u| u.tokens.iter())
        .flat_map(directive_carry)
        .collect();
    let next = match tree.items.first_mut().and_then(|d| d.first_token_mut()) {
        Some(token) => token,
        None => &mut tree.eof,
    };
    prepend(next, carry);
    dropped.len()
}
