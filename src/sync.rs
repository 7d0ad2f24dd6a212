//! Per-site sync orchestration
//!
//! Drives one site through directory reset, mirroring, and archiving. Every
//! error is caught at the site boundary and folded into the outcome, so one
//! site's failure never affects the next. Sites are processed sequentially
//! and are logically independent.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::archive;
use crate::config::{paths, SiteConfig, SitePaths};
use crate::error::{MirrorError, MirrorResult};
use crate::logging::SiteLogger;
use crate::mirror;

/// Timestamp captured once at the start of a site sync
///
/// One stamp names the run log, the lftp transcript, and the archive, so all
/// three artifacts of a run correspond. Rendered as 14 digits,
/// `%Y%m%d%H%M%S`.
#[derive(Debug, Clone)]
pub struct RunStamp(String);

impl RunStamp {
    /// Capture the current wall-clock time
    pub fn now() -> Self {
        Self::from_datetime(Local::now())
    }

    /// Build a stamp from an explicit time
    pub fn from_datetime(when: DateTime<Local>) -> Self {
        Self(when.format("%Y%m%d%H%M%S").to_string())
    }

    /// The 14-digit stamp string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Terminal state of one site's sync
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteOutcome {
    /// Mirror and archive both succeeded
    Archived,
    /// Directory setup or the mirror step failed; nothing was archived
    MirrorFailed,
    /// Mirror succeeded but the archive could not be written
    ArchiveFailed,
}

impl SiteOutcome {
    pub fn is_success(self) -> bool {
        matches!(self, SiteOutcome::Archived)
    }
}

/// Sync one site end to end
///
/// Never returns an error: failures are logged with context and folded into
/// the returned outcome. `program` is the mirroring binary to invoke.
pub fn sync_site(site: &SiteConfig, base_dir: &Path, program: &str) -> SiteOutcome {
    let stamp = RunStamp::now();
    let site_paths = SitePaths::new(base_dir, &site.name);

    // The log directory must exist before the logger can write into it; if
    // directory setup itself fails there is no file sink to report to.
    if let Err(e) = prepare_dirs(&site_paths) {
        let logger = SiteLogger::console(&site.name);
        logger.error(&format!(
            "Failed to prepare directories for site {}: {}",
            site.name, e
        ));
        return SiteOutcome::MirrorFailed;
    }

    let log_path = site_paths
        .log_dir()
        .join(format!("{}_{}.log", site.name, stamp.as_str()));
    let logger = SiteLogger::new(&site.name, log_path);

    logger.info(&format!("Starting sync for site: {}", site.name));

    if let Err(e) = mirror_stage(site, &site_paths, &stamp, program, &logger) {
        logger.error(&format!("Sync failed for site {}: {}", site.name, e));
        return SiteOutcome::MirrorFailed;
    }

    match archive_stage(site, &site_paths, &stamp, &logger) {
        Ok(_) => {
            logger.info(&format!("Site {} sync complete", site.name));
            SiteOutcome::Archived
        }
        Err(e) => {
            logger.error(&format!("Archiving failed for site {}: {}", site.name, e));
            SiteOutcome::ArchiveFailed
        }
    }
}

fn prepare_dirs(site_paths: &SitePaths) -> MirrorResult<()> {
    paths::ensure_directory(&site_paths.backup_dir())?;
    paths::ensure_directory(&site_paths.log_dir())?;
    Ok(())
}

fn mirror_stage(
    site: &SiteConfig,
    site_paths: &SitePaths,
    stamp: &RunStamp,
    program: &str,
    logger: &SiteLogger,
) -> MirrorResult<()> {
    let temp_dir = site_paths.temp_dir();

    logger.info(&format!("Resetting temp directory: {}", temp_dir.display()));
    site_paths.reset_temp()?;

    mirror::run_mirror(site, site_paths, stamp, program, logger)?;

    let entries = list_entries(&temp_dir)?;
    logger.info(&format!(
        "Mirror finished, temp directory contains: [{}]",
        entries.join(", ")
    ));

    Ok(())
}

fn archive_stage(
    site: &SiteConfig,
    site_paths: &SitePaths,
    stamp: &RunStamp,
    logger: &SiteLogger,
) -> MirrorResult<PathBuf> {
    let archive_path = archive::create_archive(
        &site_paths.temp_dir(),
        &site_paths.backup_dir(),
        &site.name,
        stamp.as_str(),
    )?;

    logger.info(&format!("Created archive: {}", archive_path.display()));
    Ok(archive_path)
}

fn list_entries(dir: &Path) -> MirrorResult<Vec<String>> {
    let mut entries = Vec::new();

    let read = std::fs::read_dir(dir)
        .map_err(|e| MirrorError::Io(format!("Failed to list {}: {}", dir.display(), e)))?;

    for entry in read {
        let entry = entry
            .map_err(|e| MirrorError::Io(format!("Failed to list {}: {}", dir.display(), e)))?;
        entries.push(entry.file_name().to_string_lossy().into_owned());
    }

    entries.sort();
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::fs;
    use tempfile::TempDir;

    fn site(name: &str) -> SiteConfig {
        SiteConfig {
            name: name.to_string(),
            host: "ftp.example.com".to_string(),
            username: "user".to_string(),
            password: "pass".to_string(),
            remote_path: "/pub".to_string(),
            enabled: true,
        }
    }

    #[test]
    fn test_run_stamp_is_fourteen_digits() {
        let when = Local.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        let stamp = RunStamp::from_datetime(when);
        assert_eq!(stamp.as_str(), "20250102030405");
        assert_eq!(stamp.as_str().len(), 14);
        assert!(stamp.as_str().chars().all(|c| c.is_ascii_digit()));
    }

    #[cfg(unix)]
    fn fake_lftp(dir: &Path, body: &str) -> String {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("fake_lftp.sh");
        fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        let mut perms = fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[cfg(unix)]
    fn archives_for(base: &Path, site_name: &str) -> Vec<String> {
        let backup_dir = base.join("backup").join(site_name);
        if !backup_dir.exists() {
            return Vec::new();
        }
        fs::read_dir(backup_dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect()
    }

    #[cfg(unix)]
    #[test]
    fn test_successful_sync_archives_and_precleans() {
        let temp = TempDir::new().unwrap();
        let program = fake_lftp(temp.path(), "exit 0");
        let site = site("alpha");

        // Leftovers from a previous run must not survive into the archive.
        let temp_dir = temp.path().join("temp").join("alpha");
        fs::create_dir_all(&temp_dir).unwrap();
        fs::write(temp_dir.join("stale.txt"), "old").unwrap();

        let outcome = sync_site(&site, temp.path(), &program);
        assert_eq!(outcome, SiteOutcome::Archived);

        assert!(!temp_dir.join("stale.txt").exists());

        let archives = archives_for(temp.path(), "alpha");
        assert_eq!(archives.len(), 1);
        let name = &archives[0];
        assert!(name.starts_with("alpha_"));
        assert!(name.ends_with(".tar.gz"));
        let stamp = &name["alpha_".len()..name.len() - ".tar.gz".len()];
        assert_eq!(stamp.len(), 14);
        assert!(stamp.chars().all(|c| c.is_ascii_digit()));
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_mirror_produces_no_archive() {
        let temp = TempDir::new().unwrap();
        let program = fake_lftp(temp.path(), "exit 3");
        let site = site("alpha");

        let outcome = sync_site(&site, temp.path(), &program);
        assert_eq!(outcome, SiteOutcome::MirrorFailed);
        assert!(archives_for(temp.path(), "alpha").is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_missing_temp_dir_after_mirror_fails_site() {
        let temp = TempDir::new().unwrap();
        let temp_dir = temp.path().join("temp").join("alpha");
        // The fake tool exits zero but removes the destination, simulating a
        // tool that tore down its own work.
        let program = fake_lftp(
            temp.path(),
            &format!("rm -rf '{}'\nexit 0", temp_dir.display()),
        );
        let site = site("alpha");

        let outcome = sync_site(&site, temp.path(), &program);
        assert_eq!(outcome, SiteOutcome::MirrorFailed);
        assert!(archives_for(temp.path(), "alpha").is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_run_log_and_transcript_share_the_stamp() {
        let temp = TempDir::new().unwrap();
        let program = fake_lftp(temp.path(), "exit 0");
        let site = site("alpha");

        let outcome = sync_site(&site, temp.path(), &program);
        assert_eq!(outcome, SiteOutcome::Archived);

        let log_dir = temp.path().join("logs").join("alpha");
        let logs: Vec<String> = fs::read_dir(&log_dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        let run_log = logs
            .iter()
            .find(|n| n.ends_with(".log") && !n.ends_with("_lftp.log"))
            .expect("run log present");
        let stamp = &run_log["alpha_".len()..run_log.len() - ".log".len()];

        // The archive carries the same stamp as the run log.
        let archives = archives_for(temp.path(), "alpha");
        assert_eq!(archives.len(), 1);
        assert_eq!(archives[0], format!("alpha_{}.tar.gz", stamp));
    }

    #[cfg(unix)]
    #[test]
    fn test_one_site_failure_does_not_poison_the_next() {
        let temp = TempDir::new().unwrap();
        let bad = fake_lftp(temp.path(), "exit 1");

        let outcome = sync_site(&site("alpha"), temp.path(), &bad);
        assert_eq!(outcome, SiteOutcome::MirrorFailed);

        // A later site with a working tool still succeeds.
        let good_path = temp.path().join("good_lftp.sh");
        fs::write(&good_path, "#!/bin/sh\nexit 0\n").unwrap();
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&good_path).unwrap().permissions();
            perms.set_mode(0o755);
            fs::set_permissions(&good_path, perms).unwrap();
        }

        let outcome = sync_site(
            &site("beta"),
            temp.path(),
            &good_path.to_string_lossy(),
        );
        assert_eq!(outcome, SiteOutcome::Archived);
        assert_eq!(archives_for(temp.path(), "beta").len(), 1);
    }
}
