//! Scratch working area owned by a single run.

use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A scratch directory that is wiped on creation and removed on release.
///
/// Call [`ScratchDir::close`] on the success path to surface removal errors.
/// If the guard is dropped without being closed (an earlier step failed), the
/// directory is removed on a best-effort basis.
#[derive(Debug)]
pub struct ScratchDir {
    path: PathBuf,
    released: bool,
}

impl ScratchDir {
    /// Removes any leftover directory at `path` and creates it afresh
    pub fn reset(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        remove_if_present(&path)?;
        fs::create_dir_all(&path).map_err(|e| Error::directory_create(&path, e))?;
        debug!("Created scratch directory {}", path.display());
        Ok(Self {
            path,
            released: false,
        })
    }

    /// Path of the scratch directory
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Removes the scratch directory
    pub fn close(mut self) -> Result<()> {
        self.released = true;
        remove_if_present(&self.path)?;
        debug!("Removed scratch directory {}", self.path.display());
        Ok(())
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = remove_if_present(&self.path) {
            warn!("Failed to clean up scratch directory: {}", e);
        }
    }
}

fn remove_if_present(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_dir_all(path).map_err(|e| Error::directory_remove(path, e))?;
    }
    Ok(())
}
