//! Producers and the artifact they fill.

use tracing::debug;

use crate::document::Document;
use crate::error::PackError;
use crate::passes::expand_placeholders;
use crate::processor::{ProcessContext, ProcessorDescriptor, Producer, Stage};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum OutputKind {
    Script,
    Readme,
    Thumbnail,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OutputFile {
    pub kind: OutputKind,
    /// File name relative to the output location.
    pub name: String,
    pub contents: Vec<u8>,
}

/// Files produced by a run.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Artifact {
    pub files: Vec<OutputFile>,
}

impl Artifact {
    pub fn push(&mut self, kind: OutputKind, name: impl Into<String>, contents: impl Into<Vec<u8>>) {
        self.files.push(OutputFile {
            kind,
            name: name.into(),
            contents: contents.into(),
        });
    }

    pub fn get(&self, kind: OutputKind) -> Option<&OutputFile> {
        self.files.iter().find(|f| f.kind == kind)
    }

    pub fn script(&self) -> Option<&str> {
        self.text(OutputKind::Script)
    }

    pub fn readme(&self) -> Option<&str> {
        self.text(OutputKind::Readme)
    }

    pub fn thumbnail(&self) -> Option<&[u8]> {
        self.get(OutputKind::Thumbnail).map(|f| f.contents.as_slice())
    }

    fn text(&self, kind: OutputKind) -> Option<&str> {
        self.get(kind).and_then(|f| std::str::from_utf8(&f.contents).ok())
    }
}

/// Renders the combined tree.
pub struct ScriptProducer {
    descriptor: ProcessorDescriptor,
}

impl ScriptProducer {
    pub const NAME: &'static str = "script";

    pub fn new() -> Self {
        ScriptProducer {
            descriptor: ProcessorDescriptor::new(Self::NAME, Stage::Produce),
        }
    }
}

impl Default for ScriptProducer {
    fn default() -> Self {
        ScriptProducer::new()
    }
}

impl Producer for ScriptProducer {
    fn descriptor(&self) -> &ProcessorDescriptor {
        &self.descriptor
    }

    fn produce(
        &self,
        document: &Document,
        ctx: &ProcessContext<'_>,
        artifact: &mut Artifact,
    ) -> Result<(), PackError> {
        let Some(tree) = document.tree() else {
            return Err(PackError::InternalInvariant(format!(
                "`{}` reached the script producer unparsed",
                document.name
            )));
        };
        let script = tree.render();
        debug!(bytes = script.len(), "produced script");
        artifact.push(OutputKind::Script, ctx.config.script_name.as_str(), script);
        Ok(())
    }
}

/// Copies the readme template with placeholders substituted.
pub struct ReadmeProducer {
    descriptor: ProcessorDescriptor,
}

impl ReadmeProducer {
    pub const NAME: &'static str = "readme";

    pub fn new() -> Self {
        ReadmeProducer {
            descriptor: ProcessorDescriptor::new(Self::NAME, Stage::Produce),
        }
    }
}

impl Default for ReadmeProducer {
    fn default() -> Self {
        ReadmeProducer::new()
    }
}

impl Producer for ReadmeProducer {
    fn descriptor(&self) -> &ProcessorDescriptor {
        &self.descriptor
    }

    fn produce(
        &self,
        _document: &Document,
        ctx: &ProcessContext<'_>,
        artifact: &mut Artifact,
    ) -> Result<(), PackError> {
        let Some(template) = ctx.readme else {
            return Ok(());
        };
        let readme = expand_placeholders(template, &ctx.config.macros, str::to_owned)
            .unwrap_or_else(|| template.to_owned());
        artifact.push(OutputKind::Readme, ctx.config.readme_name.as_str(), readme);
        Ok(())
    }
}

/// Copies the thumbnail bytes unchanged.
pub struct ThumbnailProducer {
    descriptor: ProcessorDescriptor,
}

impl ThumbnailProducer {
    pub const NAME: &'static str = "thumbnail";

    pub fn new() -> Self {
        ThumbnailProducer {
            descriptor: ProcessorDescriptor::new(Self::NAME, Stage::Produce),
        }
    }
}

impl Default for ThumbnailProducer {
    fn default() -> Self {
        ThumbnailProducer::new()
    }
}

impl Producer for ThumbnailProducer {
    fn descriptor(&self) -> &ProcessorDescriptor {
        &self.descriptor
    }

    fn produce(
        &self,
        _document: &Document,
        ctx: &ProcessContext<'_>,
        artifact: &mut Artifact,
    ) -> Result<(), PackError> {
        if let Some(bytes) = ctx.thumbnail {
            artifact.push(OutputKind::Thumbnail, ctx.config.thumbnail_name.as_str(), bytes);
        }
        Ok(())
    }
}
