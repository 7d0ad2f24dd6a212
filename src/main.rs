use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use mirrorpack::config::{paths, Config};
use mirrorpack::logging::SiteLogger;
use mirrorpack::{mirror, rotate, sync};

#[derive(Parser)]
#[command(
    name = "mirrorpack",
    version,
    about = "Mirrors remote FTP sites into timestamped tar.gz archives",
    long_about = "mirrorpack runs a single mirroring pass: every enabled site in the \
                  configuration file is mirrored into a local temp directory via lftp, \
                  packaged into a tar.gz archive under backup/, and log files older \
                  than the retention window are deleted. Scheduling is left to cron \
                  or a similar runner; one invocation is one run."
)]
struct Cli {
    /// Base directory holding temp/, backup/ and logs/
    #[arg(long, env = "MIRRORPACK_BASE_DIR", default_value = ".")]
    base_dir: PathBuf,

    /// Site configuration file (defaults to ftp_config.json under the base directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Delete log files older than this many days
    #[arg(long, default_value_t = rotate::DEFAULT_RETENTION_DAYS)]
    retention_days: i64,

    /// Mirroring binary to invoke
    #[arg(long, env = "MIRRORPACK_LFTP_BIN", default_value = "lftp")]
    lftp_bin: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    paths::ensure_base_layout(&cli.base_dir).with_context(|| {
        format!(
            "Failed to create base directories under {}",
            cli.base_dir.display()
        )
    })?;

    // The only fatal path: without a readable site list there is nothing to
    // do. Everything after this point degrades to log output.
    let config_path = cli
        .config
        .unwrap_or_else(|| cli.base_dir.join("ftp_config.json"));
    let config = Config::load(&config_path)?;

    let logger = SiteLogger::console("mirrorpack");

    match mirror::preflight(&cli.lftp_bin) {
        Ok(()) => {
            for site in config.enabled_sites() {
                let outcome = sync::sync_site(site, &cli.base_dir, &cli.lftp_bin);
                if !outcome.is_success() {
                    logger.error(&format!("Site {} sync failed", site.name));
                }
            }
        }
        Err(e) => {
            logger.error(&format!("{}; skipping all sites", e));
        }
    }

    rotate::rotate_logs(&cli.base_dir.join("logs"), cli.retention_days, &logger);

    Ok(())
}
