//! lftp invocation
//!
//! Builds the lftp command line for one site and runs it synchronously,
//! capturing combined output. All transfer logic (timeouts, parallelism,
//! deletion of local-only files) lives inside lftp; this module only fixes
//! the flags and checks the result.

use std::path::Path;
use std::process::Command;

use crate::config::{SiteConfig, SitePaths};
use crate::error::{MirrorError, MirrorResult};
use crate::logging::SiteLogger;
use crate::sync::RunStamp;

/// Network timeout handed to lftp, in seconds
const NET_TIMEOUT_SECS: u32 = 60;

/// Parallel transfer streams requested from lftp
const PARALLEL_TRANSFERS: u32 = 4;

/// Build the scripted command sequence passed to lftp via `-e`
///
/// Enables transfer logging to the per-run transcript, sets the network
/// timeout, lists hidden entries, selects plaintext FTP, and runs a mirror
/// that makes `temp_dir` a faithful copy of the remote path.
fn mirror_script(remote_path: &str, lftp_log: &Path, temp_dir: &Path) -> String {
    format!(
        "set xfer:log yes; \
         set xfer:log-file {log}; \
         set net:timeout {timeout}; \
         set ftp:list-options -a; \
         set ftp:ssl-allow no; \
         mirror --verbose --delete --parallel={parallel} --include-glob * {remote} {local}; \
         quit",
        log = lftp_log.display(),
        timeout = NET_TIMEOUT_SECS,
        parallel = PARALLEL_TRANSFERS,
        remote = remote_path,
        local = temp_dir.display(),
    )
}

/// Mirror one site into its temp directory
///
/// Blocks until the subprocess exits; no orchestration-level timeout is
/// imposed beyond lftp's own network timeout. Captured stdout is logged at
/// INFO and stderr at WARNING regardless of exit status, since lftp emits
/// warnings even on success.
///
/// # Errors
///
/// Returns an error if the subprocess cannot be spawned, exits non-zero, or
/// leaves no temp directory behind.
pub fn run_mirror(
    site: &SiteConfig,
    paths: &SitePaths,
    stamp: &RunStamp,
    program: &str,
    logger: &SiteLogger,
) -> MirrorResult<()> {
    let temp_dir = paths.temp_dir();
    let lftp_log = paths
        .log_dir()
        .join(format!("{}_{}_lftp.log", site.name, stamp.as_str()));

    logger.info(&format!(
        "Mirroring ftp://{}{} into {}",
        site.host,
        site.remote_path,
        temp_dir.display()
    ));

    let output = Command::new(program)
        .arg("-u")
        .arg(format!("{},{}", site.username, site.password))
        .arg(format!("ftp://{}", site.host))
        .arg("-e")
        .arg(mirror_script(&site.remote_path, &lftp_log, &temp_dir))
        .output()
        .map_err(|e| MirrorError::Mirror(format!("Failed to run {}: {}", program, e)))?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.trim().is_empty() {
        logger.info(&format!("lftp output: {}", stdout.trim()));
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.trim().is_empty() {
        logger.warning(&format!("lftp stderr: {}", stderr.trim()));
    }

    if !output.status.success() {
        return Err(MirrorError::Mirror(format!(
            "lftp exited with {}",
            output.status
        )));
    }

    if !temp_dir.exists() {
        return Err(MirrorError::Mirror(format!(
            "Temp directory {} missing after mirror",
            temp_dir.display()
        )));
    }

    Ok(())
}

/// Check that the mirroring binary can be spawned at all
///
/// Run once before the site loop so a missing binary produces one clear
/// diagnostic instead of an identical spawn failure per site.
pub fn preflight(program: &str) -> MirrorResult<()> {
    Command::new(program)
        .arg("--version")
        .output()
        .map_err(|e| MirrorError::Mirror(format!("{} is not available: {}", program, e)))?;

    Ok(())
}
