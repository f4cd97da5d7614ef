//! The processor plug-in contract.
//!
//! Built-in and third-party processors implement the same traits and
//! register through the same [`PipelineBuilder`](crate::PipelineBuilder).
//! Each one exposes a [`ProcessorDescriptor`] naming it, placing it in a
//! [`Stage`], and listing ordering constraints against other processors of
//! that stage.

use std::fmt;

use squash_preproc::MacroSet;

use crate::cancel::CancellationToken;
use crate::config::{MinifyLevel, PackConfig};
use crate::document::Document;
use crate::error::PackError;
use crate::produce::Artifact;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum Stage {
    /// Per document, on source text.
    Preprocess,
    /// All documents into one.
    Combine,
    /// On the combined tree.
    Postprocess,
    /// Combined tree into artifact files.
    Produce,
}

impl Stage {
    pub const ALL: [Stage; 4] = [
        Stage::Preprocess,
        Stage::Combine,
        Stage::Postprocess,
        Stage::Produce,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Preprocess => "preprocess",
            Stage::Combine => "combine",
            Stage::Postprocess => "postprocess",
            Stage::Produce => "produce",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name, stage and ordering constraints of a processor.
///
/// `runs_after` and `runs_before` name other processors of the same stage.
/// Names that match nothing are ignored.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProcessorDescriptor {
    pub name: String,
    pub stage: Stage,
    pub runs_after: Vec<String>,
    pub runs_before: Vec<String>,
}

impl ProcessorDescriptor {
    pub fn new(name: impl Into<String>, stage: Stage) -> Self {
        ProcessorDescriptor {
            name: name.into(),
            stage,
            runs_after: Vec::new(),
            runs_before: Vec::new(),
        }
    }

    #[must_use]
    pub fn after(mut self, name: impl Into<String>) -> Self {
        self.runs_after.push(name.into());
        self
    }

    #[must_use]
    pub fn before(mut self, name: impl Into<String>) -> Self {
        self.runs_before.push(name.into());
        self
    }
}

/// Read-only state shared by every processor of a run.
#[derive(Copy, Clone)]
pub struct ProcessContext<'a> {
    pub config: &'a PackConfig,
    pub symbols: &'a MacroSet,
    pub cancel: &'a CancellationToken,
    /// Readme template, if the input has one.
    pub readme: Option<&'a str>,
    pub thumbnail: Option<&'a [u8]>,
}

impl ProcessContext<'_> {
    pub fn level(&self) -> MinifyLevel {
        self.config.level
    }
}

/// A pass over one document, in the preprocess or postprocess stage.
pub trait DocumentProcessor: Send + Sync {
    fn descriptor(&self) -> &ProcessorDescriptor;

    /// Whether the processor runs at `level`. Inactive processors keep
    /// their place in the order and are skipped.
    fn is_active(&self, _level: MinifyLevel) -> bool {
        true
    }

    fn process(&self, document: Document, ctx: &ProcessContext<'_>) -> Result<Document, PackError>;
}

/// Merges every parsed document into one.
pub trait Combiner: Send + Sync {
    fn descriptor(&self) -> &ProcessorDescriptor;

    fn combine(
        &self,
        documents: Vec<Document>,
        ctx: &ProcessContext<'_>,
    ) -> Result<Document, PackError>;
}

/// Adds files to the artifact.
pub trait Producer: Send + Sync {
    fn descriptor(&self) -> &ProcessorDescriptor;

    fn is_active(&self, _level: MinifyLevel) -> bool {
        true
    }

    fn produce(
        &self,
        document: &Document,
        ctx: &ProcessContext<'_>,
        artifact: &mut Artifact,
    ) -> Result<(), PackError>;
}
