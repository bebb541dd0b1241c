use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;

/// Scratch directory owned by one transfer invocation.
///
/// Inputs are staged here before they are touched, so the caller's files are
/// only read. The directory is removed by `remove` or, failing that, on drop.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Create the scratch dir under `parent`, or the system temp dir.
    pub fn create(parent: Option<&Path>) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("song-metadata-copier-");
        let dir = match parent {
            Some(p) => {
                std::fs::create_dir_all(p)
                    .with_context(|| format!("creating work dir {}", p.display()))?;
                builder.tempdir_in(p)
            }
            None => builder.tempdir(),
        }
        .context("creating scratch workspace")?;
        debug!("Workspace at {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Copy `input` into the `area` subdirectory under its file name,
    /// replacing any earlier staged copy. Returns the staged path.
    pub fn stage_in(&self, area: &str, input: &Path) -> Result<PathBuf> {
        let name = input
            .file_name()
            .with_context(|| format!("{} has no file name", input.display()))?;
        self.stage_as(area, input, &name.to_string_lossy())
    }

    /// Copy `input` into the `area` subdirectory as `name`.
    pub fn stage_as(&self, area: &str, input: &Path, name: &str) -> Result<PathBuf> {
        let dir = self.dir.path().join(area);
        std::fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
        let staged = dir.join(name);
        std::fs::copy(input, &staged)
            .with_context(|| format!("staging {} into workspace", input.display()))?;
        Ok(staged)
    }

    pub fn remove(self) -> Result<()> {
        let path = self.dir.path().to_path_buf();
        self.dir
            .close()
            .with_context(|| format!("removing workspace {}", path.display()))
    }
}
