//! `#if` evaluation on source text.

use squash_preproc::evaluate;

use crate::document::Document;
use crate::error::PackError;
use crate::processor::{DocumentProcessor, ProcessContext, ProcessorDescriptor, Stage};

/// Resolves `#if`/`#elif`/`#else`/`#endif` blocks against the configured
/// symbols.
pub struct ConditionalCompilation {
    descriptor: ProcessorDescriptor,
}

impl ConditionalCompilation {
    pub const NAME: &'static str = "conditionals";

    pub fn new() -> Self {
        ConditionalCompilation {
            descriptor: ProcessorDescriptor::new(Self::NAME, Stage::Preprocess),
        }
    }
}

impl Default for ConditionalCompilation {
    fn default() -> Self {
        ConditionalCompilation::new()
    }
}

impl DocumentProcessor for ConditionalCompilation {
    fn descriptor(&self) -> &ProcessorDescriptor {
        &self.descriptor
    }

    fn process(&self, document: Document, ctx: &ProcessContext<'_>) -> Result<Document, PackError> {
        let name = document.name.clone();
        document.map_text(|text| {
            evaluate(&text, ctx.symbols).map_err(|source| PackError::Structural {
                document: name,
                source,
            })
        })
    }
}
