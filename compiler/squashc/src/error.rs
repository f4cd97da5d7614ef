//! Errors that abort a packaging run.

use squash_compact::CompactError;
use squash_parse::SyntaxError;
use squash_preproc::MalformedConditionalError;
use thiserror::Error;

use crate::processor::Stage;

/// Processors whose ordering constraints form a cycle.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("ordering constraints in the {stage} stage form a cycle through {}", processors.join(", "))]
pub struct CyclicDependencyError {
    pub stage: Stage,
    /// Processors that could not be placed, in registration order.
    pub processors: Vec<String>,
}

/// Why a packaging run failed. Nothing is published when a run fails.
#[derive(Debug, Error)]
pub enum PackError {
    #[error("{document}: malformed conditional block: {source}")]
    Structural {
        document: String,
        #[source]
        source: MalformedConditionalError,
    },

    #[error(transparent)]
    CyclicDependency(#[from] CyclicDependencyError),

    #[error("{document}: {source}")]
    Syntax {
        document: String,
        #[source]
        source: SyntaxError,
    },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal invariant violated: {0}")]
    InternalInvariant(String),

    #[error("internal invariant violated during compaction: {0}")]
    Compaction(#[from] CompactError),

    #[error("invalid pipeline configuration: {0}")]
    Configuration(String),

    #[error("run cancelled")]
    Cancelled,

    /// Failure reported by a third-party processor.
    #[error("processor `{processor}` failed: {message}")]
    Processor { processor: String, message: String },
}

impl PackError {
    /// Whether the error means the pipeline itself is wrong rather than
    /// one of the documents fed to it.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            PackError::InternalInvariant(_) | PackError::Compaction(_)
        )
    }
}
