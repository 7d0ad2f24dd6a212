//! Site configuration for mirrorpack
//!
//! Loads the list of remote FTP sites from a JSON configuration file.
//! A failure here is the only fatal error in the whole run: without a
//! readable site list there is nothing to do.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MirrorError, MirrorResult};

/// One configured remote FTP endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Unique site identifier; also names the per-site directories
    pub name: String,
    /// FTP host to connect to
    pub host: String,
    /// Login username
    pub username: String,
    /// Login password
    pub password: String,
    /// Remote directory to mirror
    pub remote_path: String,
    /// Whether this site is processed; absent means disabled
    #[serde(default)]
    pub enabled: bool,
}

/// Root of the configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Sites in file order
    #[serde(default)]
    pub sites: Vec<SiteConfig>,
}

impl Config {
    /// Load the configuration from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, unreadable, or malformed.
    pub fn load(path: &Path) -> MirrorResult<Config> {
        if !path.exists() {
            return Err(MirrorError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            MirrorError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        serde_json::from_str(&contents).map_err(|e| {
            MirrorError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Iterate over sites with `enabled == true`, in file order
    pub fn enabled_sites(&self) -> impl Iterator<Item = &SiteConfig> {
        self.sites.iter().filter(|site| site.enabled)
    }
}
