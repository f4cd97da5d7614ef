//! Squash packager: many script files in, one minimized script out.
//!
//! # Architecture
//!
//! ```text
//! PackInput ──► Pipeline::run ──► PackOutput { Artifact, PackReport }
//!                   │
//!     preprocess    │  conditionals            (per document, parallel)
//!     parse         │  squash_parse
//!     combine       │  DefaultCombiner         (one tree, no namespaces)
//!     postprocess   │  regions, protect, macros, trim, compact
//!     produce       │  script, readme, thumbnail
//! ```
//!
//! Every processor names its stage and its ordering constraints in a
//! [`ProcessorDescriptor`]; the order of each stage is fixed when the
//! [`Pipeline`] is built. Third-party processors go through the same
//! [`PipelineBuilder`] as the built-ins.
//!
//! ```text
//! let output = squashc::pack(
//!     PackInput::new(vec![Document::new("Program.cs", source)]),
//!     PackConfig::default().with_level(MinifyLevel::TrimDeadCode),
//! )?;
//! ```

mod cancel;
pub mod combine;
mod config;
mod document;
mod error;
mod logging;
pub mod passes;
mod pipeline;
mod processor;
mod produce;
mod report;
pub mod schedule;
mod sink;

pub use cancel::CancellationToken;
pub use combine::DefaultCombiner;
pub use config::{MinifyLevel, PackConfig};
pub use document::{Content, Document, DocumentNotes};
pub use error::{CyclicDependencyError, PackError};
pub use logging::init_tracing;
pub use pipeline::{pack, PackInput, PackOutput, Pipeline, PipelineBuilder};
pub use processor::{
    Combiner, DocumentProcessor, ProcessContext, ProcessorDescriptor, Producer, Stage,
};
pub use produce::{
    Artifact, OutputFile, OutputKind, ReadmeProducer, ScriptProducer, ThumbnailProducer,
};
pub use report::{Diagnostic, PackReport, StageReport};
pub use sink::{ArtifactSink, DirectorySink, MemorySink};

// Analyzer types used to configure a pipeline.
pub use squash_trim::{LexicalOracle, SemanticOracle, StaticOracle, TrimLevel, TrimReport};
