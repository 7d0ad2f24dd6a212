//! Custom error types for mirrorpack
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for mirrorpack operations
#[derive(Error, Debug)]
pub enum MirrorError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Errors from the external mirroring subprocess
    #[error("Mirror error: {0}")]
    Mirror(String),

    /// Archive creation errors
    #[error("Archive error: {0}")]
    Archive(String),
}

/// Convenience alias for results carrying a [`MirrorError`]
pub type MirrorResult<T> = Result<T, MirrorError>;
