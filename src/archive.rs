//! Archive creation
//!
//! Packages a mirrored temp directory into a gzip-compressed tar archive in
//! the site's backup directory. Archives are write-once: they are created
//! here and never updated, and log rotation does not touch them.

use std::fs::File;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;

use crate::error::{MirrorError, MirrorResult};

/// Create `backup_dir/<site_name>_<stamp>.tar.gz` from `temp_dir`
///
/// The archive's root entry is the temp directory's base name, so extraction
/// reproduces a directory named after the site regardless of where the temp
/// tree lived on disk.
///
/// Returns the path of the created archive.
pub fn create_archive(
    temp_dir: &Path,
    backup_dir: &Path,
    site_name: &str,
    stamp: &str,
) -> MirrorResult<PathBuf> {
    let archive_path = backup_dir.join(format!("{}_{}.tar.gz", site_name, stamp));

    let root_name = temp_dir
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            MirrorError::Archive(format!(
                "Temp directory {} has no usable base name",
                temp_dir.display()
            ))
        })?;

    let file = File::create(&archive_path).map_err(|e| {
        MirrorError::Archive(format!(
            "Failed to create {}: {}",
            archive_path.display(),
            e
        ))
    })?;

    let encoder = GzEncoder::new(file, Compression::default());
    let mut builder = tar::Builder::new(encoder);

    builder.append_dir_all(root_name, temp_dir).map_err(|e| {
        MirrorError::Archive(format!(
            "Failed to add {} to archive: {}",
            temp_dir.display(),
            e
        ))
    })?;

    let encoder = builder
        .into_inner()
        .map_err(|e| MirrorError::Archive(format!("Failed to finish archive: {}", e)))?;

    encoder
        .finish()
        .map_err(|e| MirrorError::Archive(format!("Failed to finish compression: {}", e)))?;

    Ok(archive_path)
}
