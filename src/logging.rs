//! Per-site run logging
//!
//! Provides the SiteLogger struct, an explicit logger value scoped to one
//! site invocation. There is no global logger registry: each site sync
//! constructs its own logger and drops it at the site boundary.
//!
//! Lines go to two sinks, the site's log file and the console, formatted as
//! `timestamp - name - level - message`. File writes are append-and-flush
//! per line so a killed run leaves a complete transcript.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::error::{MirrorError, MirrorResult};

/// Log severity, rendered into each line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warning,
    Error,
}

impl Level {
    fn as_str(self) -> &'static str {
        match self {
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
        }
    }
}

/// Writes run log lines to a file and the console
pub struct SiteLogger {
    /// Logger name, rendered into each line
    name: String,
    /// Log file sink; `None` for console-only loggers
    log_path: Option<PathBuf>,
}

impl SiteLogger {
    /// Logger for one site invocation, writing to the given log file
    pub fn new(name: &str, log_path: PathBuf) -> Self {
        Self {
            name: name.to_string(),
            log_path: Some(log_path),
        }
    }

    /// Console-only logger for stages that have no site log (startup,
    /// preflight, rotation)
    pub fn console(name: &str) -> Self {
        Self {
            name: name.to_string(),
            log_path: None,
        }
    }

    /// Log at INFO level
    pub fn info(&self, message: &str) {
        self.write(Level::Info, message);
    }

    /// Log at WARNING level
    pub fn warning(&self, message: &str) {
        self.write(Level::Warning, message);
    }

    /// Log at ERROR level
    pub fn error(&self, message: &str) {
        self.write(Level::Error, message);
    }

    /// Get the log file path, if this logger has a file sink
    pub fn path(&self) -> Option<&Path> {
        self.log_path.as_deref()
    }

    fn write(&self, level: Level, message: &str) {
        let line = format!(
            "{} - {} - {} - {}",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            self.name,
            level.as_str(),
            message
        );

        println!("{}", line);

        // Logging must never abort the run; a failed file write is reported
        // on stderr and the line survives on the console sink.
        if let Some(path) = &self.log_path {
            if let Err(e) = append_line(path, &line) {
                eprintln!("{}", e);
            }
        }
    }
}

fn append_line(path: &Path, line: &str) -> MirrorResult<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| MirrorError::Io(format!("Failed to open log {}: {}", path.display(), e)))?;

    writeln!(file, "{}", line)
        .map_err(|e| MirrorError::Io(format!("Failed to write log {}: {}", path.display(), e)))?;

    file.flush()
        .map_err(|e| MirrorError::Io(format!("Failed to flush log {}: {}", path.display(), e)))?;

    Ok(())
}
