//! Comment and whitespace stripping.

use squash_compact::{compact, CompactMode};

use crate::config::MinifyLevel;
use crate::document::Document;
use crate::error::PackError;
use crate::processor::{DocumentProcessor, ProcessContext, ProcessorDescriptor, Stage};

use super::TrimProcessor;

pub struct CompactProcessor {
    descriptor: ProcessorDescriptor,
}

impl CompactProcessor {
    pub const NAME: &'static str = "compact";

    pub fn new() -> Self {
        CompactProcessor {
            descriptor: ProcessorDescriptor::new(Self::NAME, Stage::Postprocess)
                .after(TrimProcessor::NAME),
        }
    }

    /// Mode for a level, or `None` below `strip-comments`.
    pub fn mode(level: MinifyLevel) -> Option<CompactMode> {
        match level {
            MinifyLevel::None => None,
            MinifyLevel::StripComments => Some(CompactMode::StripComments),
            MinifyLevel::CompactWhitespace
            | MinifyLevel::TrimDeadCode
            | MinifyLevel::RenameSymbols => Some(CompactMode::Full),
        }
    }
}

impl Default for CompactProcessor {
    fn default() -> Self {
        CompactProcessor::new()
    }
}

impl DocumentProcessor for CompactProcessor {
    fn descriptor(&self) -> &ProcessorDescriptor {
        &self.descriptor
    }

    fn is_active(&self, level: MinifyLevel) -> bool {
        CompactProcessor::mode(level).is_some()
    }

    fn process(&self, document: Document, ctx: &ProcessContext<'_>) -> Result<Document, PackError> {
        let Some(mode) = CompactProcessor::mode(ctx.level()) else {
            return Ok(document);
        };
        document.map_tree(|tree| Ok(compact(tree, mode)?))
    }
}
