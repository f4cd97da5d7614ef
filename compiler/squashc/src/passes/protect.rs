//! Marking declarations the trimmer must keep.

use rustc_hash::FxHashSet;
use squash_ir::{Decl, DeclId, DeclIndex, SyntaxTree, Token};
use tracing::{debug, trace};

use crate::document::Document;
use crate::error::PackError;
use crate::processor::{DocumentProcessor, ProcessContext, ProcessorDescriptor, Stage};

use super::RegionAnnotator;

/// Sets [`Decl::protected`] on declarations that start inside a preserved
/// region and on those named as entry points or protected in the
/// configuration.
pub struct ProtectionAnnotator {
    descriptor: ProcessorDescriptor,
}

impl ProtectionAnnotator {
    pub const NAME: &'static str = "protect";

    pub fn new() -> Self {
        ProtectionAnnotator {
            descriptor: ProcessorDescriptor::new(Self::NAME, Stage::Postprocess)
                .after(RegionAnnotator::NAME),
        }
    }
}

impl Default for ProtectionAnnotator {
    fn default() -> Self {
        ProtectionAnnotator::new()
    }
}

impl DocumentProcessor for ProtectionAnnotator {
    fn descriptor(&self) -> &ProcessorDescriptor {
        &self.descriptor
    }

    fn process(&self, document: Document, ctx: &ProcessContext<'_>) -> Result<Document, PackError> {
        let names = ctx.config.entry_points.iter().chain(&ctx.config.protected);
        document.map_tree(|mut tree| {
            let marked = protect(&mut tree, names);
            debug!(marked, "protected declarations");
            Ok(tree)
        })
    }
}

/// Protect preserved declarations and every declaration `names` resolve
/// to. Returns how many were newly marked.
pub fn protect<'a>(tree: &mut SyntaxTree, names: impl IntoIterator<Item = &'a String>) -> usize {
    let ids: FxHashSet<DeclId> = {
        let index = DeclIndex::new(tree);
        let mut ids: FxHashSet<DeclId> = index
            .ids()
            .filter(|&id| index.decl(id).first_token().is_some_and(Token::is_preserved))
            .collect();
        for name in names {
            let found = index.resolve(name);
            trace!(%name, matches = found.len(), "resolving protected name");
            ids.extend(found);
        }
        ids
    };

    let mut next = 0u32;
    let mut marked = 0;
    mark(&mut tree.items, &ids, &mut next, &mut marked);
    marked
}

/// Walk in the same pre-order the index numbers declarations in.
fn mark(decls: &mut [Decl], ids: &FxHashSet<DeclId>, next: &mut u32, marked: &mut usize) {
    for decl in decls {
        let id = DeclId::from_raw(*next);
        *next += 1;
        if ids.contains(&id) && !decl.protected {
            decl.protected = true;
            *marked += 1;
        }
        mark(&mut decl.members, ids, next, marked);
    }
}
