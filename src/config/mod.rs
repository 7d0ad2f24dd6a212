//! Configuration module for mirrorpack
//!
//! This module provides configuration management including:
//! - Site descriptor loading from `ftp_config.json`
//! - Deterministic per-site directory layout

pub mod paths;
pub mod sites;

pub use paths::SitePaths;
pub use sites::{Config, SiteConfig};
