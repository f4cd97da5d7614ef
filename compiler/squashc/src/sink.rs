//! Publishing artifacts.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::PackError;
use crate::produce::Artifact;

/// Destination for a finished artifact.
pub trait ArtifactSink {
    fn publish(&mut self, artifact: &Artifact) -> Result<(), PackError>;
}

/// Keeps the last published artifact in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    published: Option<Artifact>,
}

impl MemorySink {
    pub fn new() -> Self {
        MemorySink::default()
    }

    pub fn artifact(&self) -> Option<&Artifact> {
        self.published.as_ref()
    }

    pub fn into_artifact(self) -> Option<Artifact> {
        self.published
    }
}

impl ArtifactSink for MemorySink {
    fn publish(&mut self, artifact: &Artifact) -> Result<(), PackError> {
        self.published = Some(artifact.clone());
        Ok(())
    }
}

/// Writes each file of the artifact into a directory.
///
/// Every file is first written to a temporary file in the target
/// directory; they are renamed into place only once all of them were
/// written.
#[derive(Clone, Debug)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirectorySink { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ArtifactSink for DirectorySink {
    fn publish(&mut self, artifact: &Artifact) -> Result<(), PackError> {
        fs::create_dir_all(&self.dir)?;
        let mut staged = Vec::with_capacity(artifact.files.len());
        for file in &artifact.files {
            let mut temp = NamedTempFile::new_in(&self.dir)?;
            temp.write_all(&file.contents)?;
            temp.flush()?;
            staged.push((temp, self.dir.join(&file.name)));
        }
        for (temp, path) in staged {
            temp.persist(&path).map_err(|err| err.error)?;
            debug!(path = %path.display(), "published");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::produce::OutputKind;

    fn artifact() -> Artifact {
        let mut artifact = Artifact::default();
        artifact.push(OutputKind::Script, "script.cs", "class A{}");
        artifact.push(OutputKind::Thumbnail, "thumb.png", vec![0x89, b'P', b'N', b'G']);
        artifact
    }

    #[test]
    fn memory_sink_keeps_a_copy() {
        let mut sink = MemorySink::new();
        assert!(sink.artifact().is_none());
        assert!(sink.publish(&artifact()).is_ok());
        assert_eq!(sink.artifact().and_then(Artifact::script), Some("class A{}"));
    }

    #[test]
    fn directory_sink_writes_every_file() {
        let dir = tempfile::tempdir().unwrap_or_else(|err| panic!("{err}"));
        let out = dir.path().join("nested").join("out");
        let mut sink = DirectorySink::new(&out);
        assert!(sink.publish(&artifact()).is_ok());

        let script = fs::read_to_string(out.join("script.cs")).unwrap_or_default();
        assert_eq!(script, "class A{}");
        let thumb = fs::read(out.join("thumb.png")).unwrap_or_default();
        assert_eq!(thumb, vec![0x89, b'P', b'N', b'G']);

        let mut names: Vec<String> = fs::read_dir(&out)
            .map(|entries| {
                entries
                    .filter_map(Result::ok)
                    .map(|e| e.file_name().to_string_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default();
        names.sort();
        assert_eq!(names, ["script.cs", "thumb.png"]);
    }

    #[test]
    fn directory_sink_replaces_existing_files() {
        let dir = tempfile::tempdir().unwrap_or_else(|err| panic!("{err}"));
        fs::write(dir.path().join("script.cs"), "old").unwrap_or_else(|err| panic!("{err}"));
        let mut sink = DirectorySink::new(dir.path());
        assert!(sink.publish(&artifact()).is_ok());
        let script = fs::read_to_string(dir.path().join("script.cs")).unwrap_or_default();
        assert_eq!(script, "class A{}");
    }
}
