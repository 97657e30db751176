//! Temporary directories of configuration documents.
//!
//! # Examples
//!
//! ```
//! use test_helpers::fixtures::ConfigDir;
//!
//! # fn main() -> anyhow::Result<()> {
//! let dir = ConfigDir::new()?;
//! let path = dir.write("base.yaml", "server:\n  port: 80\n")?;
//! assert!(path.ends_with("base.yaml"));
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;

/// A temporary directory deleted when dropped.
#[derive(Debug)]
pub struct ConfigDir {
    root: Utf8PathBuf,
    _dir: TempDir,
}

impl ConfigDir {
    /// Create an empty directory.
    ///
    /// # Errors
    ///
    /// Fails when the directory cannot be created or its path is not UTF-8.
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("create temporary config directory")?;
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
            .map_err(|path| anyhow::anyhow!("non UTF-8 temp path: {}", path.display()))?;
        Ok(Self { root, _dir: dir })
    }

    /// The directory itself.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Path of `name` inside the directory, whether or not it exists.
    #[must_use]
    pub fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }

    /// Write `contents` to `name`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Fails when the file or its parents cannot be written.
    pub fn write(&self, name: &str, contents: &str) -> Result<Utf8PathBuf> {
        let path = self.path(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| format!("create {parent}"))?;
        }
        std::fs::write(&path, contents).with_context(|| format!("write {path}"))?;
        Ok(path)
    }
}
