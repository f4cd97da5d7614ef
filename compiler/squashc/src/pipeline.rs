//! Building and running a pipeline.
//!
//! ```text
//! documents ──► preprocess (per document, parallel) ──► parse
//!                                                        │
//!                                                        ▼
//!           artifact ◄── produce ◄── postprocess ◄── combine
//! ```
//!
//! Processor order is fixed when the pipeline is built, so ordering
//! mistakes surface before any document is read. The minification level
//! only switches processors on and off; it never reorders them.

use std::sync::Arc;

use rayon::prelude::*;
use rustc_hash::FxHashSet;
use squash_preproc::MacroSet;
use squash_trim::{LexicalOracle, SemanticOracle};
use tracing::{debug, trace, warn};

use crate::cancel::CancellationToken;
use crate::combine::DefaultCombiner;
use crate::config::PackConfig;
use crate::document::Document;
use crate::error::PackError;
use crate::passes::{
    CompactProcessor, ConditionalCompilation, MacroSubstitution, ProtectionAnnotator,
    RegionAnnotator, TrimProcessor,
};
use crate::processor::{
    Combiner, DocumentProcessor, ProcessContext, ProcessorDescriptor, Producer, Stage,
};
use crate::produce::{Artifact, ReadmeProducer, ScriptProducer, ThumbnailProducer};
use crate::report::{PackReport, StageReport};
use crate::schedule::{arrange, linearize};
use crate::sink::ArtifactSink;

/// What a run consumes.
#[derive(Clone, Debug, Default)]
pub struct PackInput {
    /// Source documents in input order.
    pub documents: Vec<Document>,
    /// Readme template with `$NAME$` placeholders.
    pub readme: Option<String>,
    pub thumbnail: Option<Vec<u8>>,
}

impl PackInput {
    pub fn new(documents: Vec<Document>) -> Self {
        PackInput {
            documents,
            ..PackInput::default()
        }
    }

    #[must_use]
    pub fn with_readme(mut self, readme: impl Into<String>) -> Self {
        self.readme = Some(readme.into());
        self
    }

    #[must_use]
    pub fn with_thumbnail(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.thumbnail = Some(bytes.into());
        self
    }
}

/// What a successful run produces.
#[derive(Clone, Debug)]
pub struct PackOutput {
    pub artifact: Artifact,
    pub report: PackReport,
}

/// Collects processors for a [`Pipeline`].
pub struct PipelineBuilder {
    config: PackConfig,
    processors: Vec<Box<dyn DocumentProcessor>>,
    combiners: Vec<Box<dyn Combiner>>,
    producers: Vec<Box<dyn Producer>>,
}

impl PipelineBuilder {
    /// A builder with no processors.
    pub fn new(config: PackConfig) -> Self {
        PipelineBuilder {
            config,
            processors: Vec::new(),
            combiners: Vec::new(),
            producers: Vec::new(),
        }
    }

    /// A builder with every built-in processor registered, using the
    /// default lexical oracle.
    pub fn standard(config: PackConfig) -> Self {
        let oracle = LexicalOracle::new().with_entry_container(config.entry_container.clone());
        PipelineBuilder::with_oracle(config, Arc::new(oracle))
    }

    /// A builder with every built-in processor registered, sharing
    /// `oracle` between the combiner and the trimmer.
    pub fn with_oracle(config: PackConfig, oracle: Arc<dyn SemanticOracle + Send + Sync>) -> Self {
        PipelineBuilder::new(config)
            .processor(ConditionalCompilation::new())
            .combiner(DefaultCombiner::new(Arc::clone(&oracle)))
            .processor(RegionAnnotator::new())
            .processor(ProtectionAnnotator::new())
            .processor(MacroSubstitution::new())
            .processor(TrimProcessor::new().with_oracle(oracle))
            .processor(CompactProcessor::new())
            .producer(ScriptProducer::new())
            .producer(ReadmeProducer::new())
            .producer(ThumbnailProducer::new())
    }

    /// Register a preprocess or postprocess processor.
    #[must_use]
    pub fn processor(mut self, processor: impl DocumentProcessor + 'static) -> Self {
        self.processors.push(Box::new(processor));
        self
    }

    #[must_use]
    pub fn combiner(mut self, combiner: impl Combiner + 'static) -> Self {
        self.combiners.push(Box::new(combiner));
        self
    }

    #[must_use]
    pub fn producer(mut self, producer: impl Producer + 'static) -> Self {
        self.producers.push(Box::new(producer));
        self
    }

    /// Validate registrations and fix the order of every stage.
    pub fn build(self) -> Result<Pipeline, PackError> {
        let PipelineBuilder {
            config,
            processors,
            mut combiners,
            producers,
        } = self;

        let mut names: FxHashSet<&str> = FxHashSet::default();
        let descriptors = processors
            .iter()
            .map(|p| p.descriptor())
            .chain(combiners.iter().map(|c| c.descriptor()))
            .chain(producers.iter().map(|p| p.descriptor()));
        for descriptor in descriptors {
            if !names.insert(descriptor.name.as_str()) {
                return Err(PackError::Configuration(format!(
                    "processor `{}` is registered twice",
                    descriptor.name
                )));
            }
        }

        expect_stage(combiners.iter().map(|c| c.descriptor()), &[Stage::Combine])?;
        expect_stage(producers.iter().map(|p| p.descriptor()), &[Stage::Produce])?;
        expect_stage(
            processors.iter().map(|p| p.descriptor()),
            &[Stage::Preprocess, Stage::Postprocess],
        )?;

        let combiner = match (combiners.pop(), combiners.len()) {
            (Some(combiner), 0) => combiner,
            (None, _) => return Err(PackError::Configuration("no combiner registered".to_owned())),
            (Some(_), rest) => {
                return Err(PackError::Configuration(format!(
                    "{} combiners registered, expected one",
                    rest + 1
                )))
            }
        };

        let (preprocess, postprocess): (Vec<_>, Vec<_>) = processors
            .into_iter()
            .partition(|p| p.descriptor().stage == Stage::Preprocess);
        let preprocess = ordered(Stage::Preprocess, preprocess, |p| p.descriptor())?;
        let postprocess = ordered(Stage::Postprocess, postprocess, |p| p.descriptor())?;
        let producers = ordered(Stage::Produce, producers, |p| p.descriptor())?;

        let symbols = config.macro_set();
        debug!(
            preprocess = preprocess.len(),
            postprocess = postprocess.len(),
            producers = producers.len(),
            "built pipeline"
        );
        Ok(Pipeline {
            config,
            symbols,
            preprocess,
            combiner,
            postprocess,
            producers,
        })
    }
}

fn expect_stage<'a>(
    descriptors: impl Iterator<Item = &'a ProcessorDescriptor>,
    allowed: &[Stage],
) -> Result<(), PackError> {
    for descriptor in descriptors {
        if !allowed.contains(&descriptor.stage) {
            return Err(PackError::Configuration(format!(
                "processor `{}` cannot run in the {} stage",
                descriptor.name, descriptor.stage
            )));
        }
    }
    Ok(())
}

fn ordered<T: ?Sized>(
    stage: Stage,
    items: Vec<Box<T>>,
    descriptor: impl Fn(&T) -> &ProcessorDescriptor,
) -> Result<Vec<Box<T>>, PackError> {
    let descriptors: Vec<&ProcessorDescriptor> = items.iter().map(|p| descriptor(&**p)).collect();
    let order = linearize(stage, &descriptors)?;
    Ok(arrange(items, &order))
}

/// A validated, ordered set of processors.
pub struct Pipeline {
    config: PackConfig,
    symbols: MacroSet,
    preprocess: Vec<Box<dyn DocumentProcessor>>,
    combiner: Box<dyn Combiner>,
    postprocess: Vec<Box<dyn DocumentProcessor>>,
    producers: Vec<Box<dyn Producer>>,
}

impl Pipeline {
    /// The built-in pipeline for `config`.
    pub fn standard(config: PackConfig) -> Result<Pipeline, PackError> {
        PipelineBuilder::standard(config).build()
    }

    pub fn config(&self) -> &PackConfig {
        &self.config
    }

    /// Processor names of `stage` in execution order, inactive ones
    /// included.
    pub fn order(&self, stage: Stage) -> Vec<&str> {
        match stage {
            Stage::Preprocess => names(self.preprocess.iter().map(|p| p.descriptor())),
            Stage::Combine => vec![self.combiner.descriptor().name.as_str()],
            Stage::Postprocess => names(self.postprocess.iter().map(|p| p.descriptor())),
            Stage::Produce => names(self.producers.iter().map(|p| p.descriptor())),
        }
    }

    /// Run every stage and return the artifact.
    #[tracing::instrument(level = "debug", skip_all, fields(documents = input.documents.len(), level = ?self.config.level))]
    pub fn run(&self, input: PackInput, cancel: &CancellationToken) -> Result<PackOutput, PackError> {
        cancel.check()?;
        let PackInput {
            documents,
            readme,
            thumbnail,
        } = input;
        let ctx = ProcessContext {
            config: &self.config,
            symbols: &self.symbols,
            cancel,
            readme: readme.as_deref(),
            thumbnail: thumbnail.as_deref(),
        };
        let mut report = PackReport {
            stages: self.stage_reports(),
            input_bytes: documents.iter().map(Document::len).sum(),
            ..PackReport::default()
        };

        let documents = self.preprocess_all(documents, &ctx)?;
        cancel.check()?;

        let mut document = self.combiner.combine(documents, &ctx)?;

        let level = self.config.level;
        for processor in &self.postprocess {
            cancel.check()?;
            if !processor.is_active(level) {
                trace!(processor = %processor.descriptor().name, "skipped");
                continue;
            }
            document = processor.process(document, &ctx)?;
        }

        let mut artifact = Artifact::default();
        for producer in &self.producers {
            cancel.check()?;
            if producer.is_active(level) {
                producer.produce(&document, &ctx, &mut artifact)?;
            }
        }
        cancel.check()?;

        report.trim = document.trim_report.take();
        report.diagnostics = document.diagnostics;
        report.output_bytes = artifact.script().map_or(0, str::len);
        debug!(
            input_bytes = report.input_bytes,
            output_bytes = report.output_bytes,
            diagnostics = report.diagnostics.len(),
            "run finished"
        );
        Ok(PackOutput { artifact, report })
    }

    /// Run and hand the artifact to `sink`. Nothing reaches the sink when
    /// the run fails.
    pub fn publish(
        &self,
        input: PackInput,
        cancel: &CancellationToken,
        sink: &mut dyn ArtifactSink,
    ) -> Result<PackReport, PackError> {
        let PackOutput { artifact, report } = self.run(input, cancel)?;
        sink.publish(&artifact)?;
        Ok(report)
    }

    /// Preprocess and parse every document. The first failure in input
    /// order wins.
    fn preprocess_all(
        &self,
        documents: Vec<Document>,
        ctx: &ProcessContext<'_>,
    ) -> Result<Vec<Document>, PackError> {
        let results: Vec<Result<Document, PackError>> = if self.config.parallel && documents.len() > 1 {
            let run = |document: &Document| self.preprocess_one(document.clone(), ctx);
            rayon::ThreadPoolBuilder::new()
                .build_scoped(rayon::ThreadBuilder::run, |pool| {
                    pool.install(|| documents.par_iter().map(run).collect())
                })
                .unwrap_or_else(|e| {
                    warn!("failed to build thread pool, preprocessing sequentially: {e}");
                    documents.iter().map(run).collect()
                })
        } else {
            documents
                .into_iter()
                .map(|document| self.preprocess_one(document, ctx))
                .collect()
        };
        results.into_iter().collect()
    }

    fn preprocess_one(&self, mut document: Document, ctx: &ProcessContext<'_>) -> Result<Document, PackError> {
        let level = self.config.level;
        for processor in &self.preprocess {
            ctx.cancel.check()?;
            if processor.is_active(level) {
                document = processor.process(document, ctx)?;
            }
        }
        ctx.cancel.check()?;
        document.parse()
    }

    fn stage_reports(&self) -> Vec<StageReport> {
        let level = self.config.level;
        vec![
            stage_report(
                Stage::Preprocess,
                self.preprocess.iter().map(|p| (p.descriptor(), p.is_active(level))),
            ),
            stage_report(
                Stage::Combine,
                std::iter::once((self.combiner.descriptor(), true)),
            ),
            stage_report(
                Stage::Postprocess,
                self.postprocess.iter().map(|p| (p.descriptor(), p.is_active(level))),
            ),
            stage_report(
                Stage::Produce,
                self.producers.iter().map(|p| (p.descriptor(), p.is_active(level))),
            ),
        ]
    }
}

fn stage_report<'a>(
    stage: Stage,
    entries: impl Iterator<Item = (&'a ProcessorDescriptor, bool)>,
) -> StageReport {
    let mut report = StageReport {
        stage,
        executed: Vec::new(),
        skipped: Vec::new(),
    };
    for (descriptor, active) in entries {
        let list = if active {
            &mut report.executed
        } else {
            &mut report.skipped
        };
        list.push(descriptor.name.clone());
    }
    report
}

fn names<'a>(descriptors: impl Iterator<Item = &'a ProcessorDescriptor>) -> Vec<&'a str> {
    descriptors.map(|d| d.name.as_str()).collect()
}

/// Package `input` with the built-in pipeline.
pub fn pack(input: PackInput, config: PackConfig) -> Result<PackOutput, PackError> {
    Pipeline::standard(config)?.run(input, &CancellationToken::new())
}
