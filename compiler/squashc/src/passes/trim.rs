//! Dead-code removal.

use std::sync::Arc;

use squash_trim::{trim, LexicalOracle, SemanticOracle, TrimOptions};

use crate::config::MinifyLevel;
use crate::document::Document;
use crate::error::PackError;
use crate::processor::{DocumentProcessor, ProcessContext, ProcessorDescriptor, Stage};
use crate::report::Diagnostic;

use super::{MacroSubstitution, ProtectionAnnotator};

/// Runs the reachability analyzer over the combined tree.
///
/// Without an explicit oracle, a [`LexicalOracle`] for the configured
/// entry container is used.
pub struct TrimProcessor {
    descriptor: ProcessorDescriptor,
    oracle: Option<Arc<dyn SemanticOracle + Send + Sync>>,
}

impl TrimProcessor {
    pub const NAME: &'static str = "trim";

    pub fn new() -> Self {
        TrimProcessor {
            descriptor: ProcessorDescriptor::new(Self::NAME, Stage::Postprocess)
                .after(ProtectionAnnotator::NAME)
                .after(MacroSubstitution::NAME),
            oracle: None,
        }
    }

    #[must_use]
    pub fn with_oracle(mut self, oracle: Arc<dyn SemanticOracle + Send + Sync>) -> Self {
        self.oracle = Some(oracle);
        self
    }
}

impl Default for TrimProcessor {
    fn default() -> Self {
        TrimProcessor::new()
    }
}

impl DocumentProcessor for TrimProcessor {
    fn descriptor(&self) -> &ProcessorDescriptor {
        &self.descriptor
    }

    fn is_active(&self, level: MinifyLevel) -> bool {
        level >= MinifyLevel::TrimDeadCode
    }

    fn process(&self, document: Document, ctx: &ProcessContext<'_>) -> Result<Document, PackError> {
        let config = ctx.config;
        let options = TrimOptions {
            level: config.trim_level,
            entry_points: config.entry_points.clone(),
            protected: config.protected.clone(),
        };
        let lexical;
        let oracle: &dyn SemanticOracle = match &self.oracle {
            Some(oracle) => oracle.as_ref(),
            None => {
                lexical = LexicalOracle::new().with_entry_container(config.entry_container.clone());
                &lexical
            }
        };

        let mut report = None;
        let mut document = document.map_tree(|tree| {
            let trimmed = trim(tree, oracle, &options);
            report = Some(trimmed.report);
            Ok(trimmed.tree)
        })?;
        if let Some(report) = report {
            document.diagnostics.extend(
                report
                    .unresolved
                    .iter()
                    .map(|u| Diagnostic::new(Self::NAME, u.to_string())),
            );
            document.trim_report = Some(report);
        }
        Ok(document)
    }
}
