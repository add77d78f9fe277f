use crate::error::Result;
use crate::utils::sanitize_filename;
use std::fs;
use std::path::{Path, PathBuf};

/// Destination for capture artifacts
pub trait ArtifactSink {
    /// Store one PNG image under `name`
    fn write_image(&mut self, name: &str, png: &[u8]) -> Result<PathBuf>;

    /// Store the text manifest under `name`
    fn write_manifest(&mut self, name: &str, text: &str) -> Result<PathBuf>;
}

/// Writes artifacts as files in a directory
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// Create the sink, creating `dir` if it does not exist
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ArtifactSink for DirectorySink {
    fn write_image(&mut self, name: &str, png: &[u8]) -> Result<PathBuf> {
        let path = self.dir.join(sanitize_filename(name));
        fs::write(&path, png)?;
        ::log::debug!("Wrote {} ({} bytes)", path.display(), png.len());
        Ok(path)
    }

    fn write_manifest(&mut self, name: &str, text: &str) -> Result<PathBuf> {
        let path = self.dir.join(sanitize_filename(name));
        fs::write(&path, text.as_bytes())?;
        ::log::info!("Wrote manifest {}", path.display());
        Ok(path)
    }
}
