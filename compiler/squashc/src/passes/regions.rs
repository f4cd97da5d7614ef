//! Region annotations.
//!
//! `#region squash preserve` and `#region squash macros` open regions whose
//! tokens get [`RegionFlags::PRESERVE`] and [`RegionFlags::MACRO_EXPAND`].
//! Regions nest; `#endregion` closes the innermost one, including plain
//! `#region` blocks, which push no flags.

use squash_ir::{RegionFlags, SyntaxTree, Trivia};
use tracing::{debug, trace};

use crate::document::Document;
use crate::error::PackError;
use crate::processor::{DocumentProcessor, ProcessContext, ProcessorDescriptor, Stage};

pub struct RegionAnnotator {
    descriptor: ProcessorDescriptor,
}

impl RegionAnnotator {
    pub const NAME: &'static str = "regions";

    pub fn new() -> Self {
        RegionAnnotator {
            descriptor: ProcessorDescriptor::new(Self::NAME, Stage::Postprocess),
        }
    }
}

impl Default for RegionAnnotator {
    fn default() -> Self {
        RegionAnnotator::new()
    }
}

impl DocumentProcessor for RegionAnnotator {
    fn descriptor(&self) -> &ProcessorDescriptor {
        &self.descriptor
    }

    fn process(&self, document: Document, _ctx: &ProcessContext<'_>) -> Result<Document, PackError> {
        document.map_tree(|mut tree| {
            let flagged = annotate_regions(&mut tree);
            debug!(flagged, "annotated regions");
            Ok(tree)
        })
    }
}

/// Flag every token inside a squash region. Returns the number of tokens
/// that received a flag.
pub fn annotate_regions(tree: &mut SyntaxTree) -> usize {
    let mut stack: Vec<RegionFlags> = Vec::new();
    let mut flagged = 0;
    for token in tree.tokens_mut() {
        for piece in &token.leading {
            apply(piece, &mut stack);
        }
        let flags = stack.iter().fold(RegionFlags::empty(), |acc, f| acc | *f);
        if !flags.is_empty() {
            token.region |= flags;
            flagged += 1;
        }
        for piece in &token.trailing {
            apply(piece, &mut stack);
        }
    }
    if !stack.is_empty() {
        debug!(open = stack.len(), "regions left open at end of file");
    }
    flagged
}

fn apply(piece: &Trivia, stack: &mut Vec<RegionFlags>) {
    match piece.directive_name() {
        Some("region") => stack.push(region_flags(piece.directive_argument())),
        Some("endregion") => {
            if stack.pop().is_none() {
                trace!("ignoring #endregion without #region");
            }
        }
        _ => {}
    }
}

fn region_flags(argument: Option<&str>) -> RegionFlags {
    let mut words = argument.unwrap_or("").split_whitespace();
    match (words.next(), words.next()) {
        (Some(tool), Some(kind)) if tool.eq_ignore_ascii_case("squash") => {
            if kind.eq_ignore_ascii_case("preserve") {
                RegionFlags::PRESERVE
            } else if kind.eq_ignore_ascii_case("macros") {
                RegionFlags::MACRO_EXPAND
            } else {
                RegionFlags::empty()
            }
        }
        _ => RegionFlags::empty(),
    }
}
