//! mirrorpack - FTP site mirroring and archival
//!
//! Runs a single mirroring pass over a set of configured FTP sites: each
//! enabled site is mirrored into a local temp directory by the external
//! `lftp` tool, the mirrored tree is packaged into a timestamped tar.gz
//! archive, and old log files are rotated out. Scheduling is external;
//! one invocation is one run.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: site configuration and per-site directory layout
//! - `error`: custom error types
//! - `logging`: scoped per-site run logger
//! - `mirror`: lftp invocation and output capture
//! - `archive`: tar.gz packaging of mirrored trees
//! - `rotate`: age-based log retention
//! - `sync`: per-site orchestration

pub mod archive;
pub mod config;
pub mod error;
pub mod logging;
pub mod mirror;
pub mod rotate;
pub mod sync;

pub use error::MirrorError;
