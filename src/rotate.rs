//! Age-based log retention
//!
//! Recursively deletes `.log` files older than the retention window. Runs
//! once at the end of a run, independent of site results. Everything here is
//! best effort: a file that cannot be deleted is logged and skipped.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::logging::SiteLogger;

/// Default retention window in days
pub const DEFAULT_RETENTION_DAYS: i64 = 7;

/// Delete `.log` files under `log_root` older than `retention_days`
///
/// Age is measured in whole days from last-modified time to now, and the
/// boundary is strict: a file exactly `retention_days` old is retained.
/// A missing `log_root` is a logged no-op.
pub fn rotate_logs(log_root: &Path, retention_days: i64, logger: &SiteLogger) {
    logger.info(&format!(
        "Cleaning log files older than {} days under {}",
        retention_days,
        log_root.display()
    ));

    if !log_root.exists() {
        logger.info(&format!(
            "Log directory {} does not exist, skipping cleanup",
            log_root.display()
        ));
        return;
    }

    visit(log_root, retention_days, Utc::now(), logger);
}

fn visit(dir: &Path, retention_days: i64, now: DateTime<Utc>, logger: &SiteLogger) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            logger.warning(&format!("Failed to read {}: {}", dir.display(), e));
            return;
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                logger.warning(&format!("Failed to read entry in {}: {}", dir.display(), e));
                continue;
            }
        };

        let path = entry.path();
        if path.is_dir() {
            visit(&path, retention_days, now, logger);
            continue;
        }

        if !path.extension().map_or(false, |ext| ext == "log") {
            continue;
        }

        match file_age_days(&path, now) {
            Ok(age_days) if age_days > retention_days => match fs::remove_file(&path) {
                Ok(()) => logger.info(&format!(
                    "Deleted old log file: {} (age: {} days)",
                    path.display(),
                    age_days
                )),
                Err(e) => {
                    logger.error(&format!("Failed to delete {}: {}", path.display(), e))
                }
            },
            Ok(_) => {}
            Err(e) => logger.warning(&format!("Skipping {}: {}", path.display(), e)),
        }
    }
}

/// Whole days elapsed since the file was last modified
fn file_age_days(path: &Path, now: DateTime<Utc>) -> Result<i64, std::io::Error> {
    let modified = fs::metadata(path)?.modified()?;
    let modified: DateTime<Utc> = modified.into();
    Ok((now - modified).num_days())
}
