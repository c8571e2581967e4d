use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

/// Flat directory of checkpoint screenshots. Each checkpoint name maps to a
/// single PNG that is overwritten on every capture, so the directory always
/// holds the latest occurrence of each checkpoint.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create artifact directory {}", dir.display()))?;
        debug!("Artifact directory ready at {}", dir.display());
        Ok(Self { dir })
    }

    /// Target file for a checkpoint, e.g. `login_success` becomes
    /// `<dir>/login_success.png`.
    pub fn path_for(&self, checkpoint: &str) -> PathBuf {
        self.dir.join(format!("{}.png", checkpoint))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
