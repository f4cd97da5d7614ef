//! What a run did.

use std::fmt;

use squash_trim::TrimReport;

use crate::processor::Stage;

/// A soft finding. The run continues.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Diagnostic {
    /// Name of the processor that raised it.
    pub origin: String,
    pub message: String,
}

impl Diagnostic {
    pub fn new(origin: impl Into<String>, message: impl Into<String>) -> Self {
        Diagnostic {
            origin: origin.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.origin, self.message)
    }
}

/// Processors of one stage in execution order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StageReport {
    pub stage: Stage,
    pub executed: Vec<String>,
    /// Inactive at the configured level.
    pub skipped: Vec<String>,
}

#[derive(Clone, Debug, Default)]
pub struct PackReport {
    pub stages: Vec<StageReport>,
    /// Present when the trimmer ran.
    pub trim: Option<TrimReport>,
    pub diagnostics: Vec<Diagnostic>,
    /// Bytes across all input documents.
    pub input_bytes: usize,
    /// Bytes of the produced script.
    pub output_bytes: usize,
}

impl PackReport {
    pub fn executed(&self, stage: Stage) -> &[String] {
        self.stages
            .iter()
            .find(|s| s.stage == stage)
            .map_or(&[], |s| s.executed.as_slice())
    }

    pub fn skipped(&self, stage: Stage) -> &[String] {
        self.stages
            .iter()
            .find(|s| s.stage == stage)
            .map_or(&[], |s| s.skipped.as_slice())
    }
}
