//! Per-site directory layout
//!
//! Every site works inside three directories derived from the base directory:
//!
//! - `base/temp/<site>` - mirror destination, wiped before every run
//! - `base/backup/<site>` - finished tar.gz archives
//! - `base/logs/<site>` - run logs and lftp transcripts

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{MirrorError, MirrorResult};

/// Derived working directories for one site
#[derive(Debug, Clone)]
pub struct SitePaths {
    base_dir: PathBuf,
    site_name: String,
}

impl SitePaths {
    /// Compute the layout for `site_name` under `base_dir`
    pub fn new(base_dir: &Path, site_name: &str) -> Self {
        Self {
            base_dir: base_dir.to_path_buf(),
            site_name: site_name.to_string(),
        }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Mirror destination, emptied before each run
    pub fn temp_dir(&self) -> PathBuf {
        self.base_dir.join("temp").join(&self.site_name)
    }

    /// Where finished archives land
    pub fn backup_dir(&self) -> PathBuf {
        self.base_dir.join("backup").join(&self.site_name)
    }

    /// Where run logs and lftp transcripts land
    pub fn log_dir(&self) -> PathBuf {
        self.base_dir.join("logs").join(&self.site_name)
    }

    /// Wipe the temp directory and recreate it empty
    ///
    /// Unconditional and destructive: leftover state from a previous or
    /// interrupted run is discarded so an archive never mixes two runs.
    pub fn reset_temp(&self) -> MirrorResult<()> {
        let temp_dir = self.temp_dir();

        if temp_dir.exists() {
            fs::remove_dir_all(&temp_dir).map_err(|e| {
                MirrorError::Io(format!("Failed to clear {}: {}", temp_dir.display(), e))
            })?;
        }

        fs::create_dir_all(&temp_dir).map_err(|e| {
            MirrorError::Io(format!("Failed to create {}: {}", temp_dir.display(), e))
        })?;

        Ok(())
    }
}

/// Create `dir` (and parents) if absent, idempotently
///
/// Returns whether anything was created. The return value is informational
/// only; callers do not branch on it.
pub fn ensure_directory(dir: &Path) -> MirrorResult<bool> {
    if dir.exists() {
        return Ok(false);
    }

    fs::create_dir_all(dir)
        .map_err(|e| MirrorError::Io(format!("Failed to create {}: {}", dir.display(), e)))?;

    Ok(true)
}

/// Ensure the three top-level directories under the base directory exist
pub fn ensure_base_layout(base_dir: &Path) -> MirrorResult<()> {
    for name in ["backup", "logs", "temp"] {
        ensure_directory(&base_dir.join(name))?;
    }
    Ok(())
}
