//! Error types for lesskit
//!
//! Uses `thiserror` for library errors. Errors from one file's compilation
//! never abort sibling files in a batch; the batch entry points collect a
//! per-file result instead of propagating the first failure.

use std::path::PathBuf;

use thiserror::Error;

use crate::render::RenderError;

/// Result type alias for lesskit operations
pub type LessResult<T> = Result<T, LessError>;

/// Main error type for lesskit operations
#[derive(Error, Debug)]
pub enum LessError {
    /// A resolved `out` or `main` path escapes the project boundary.
    /// Paths are validated in full before any write happens.
    #[error("invalid \"{option}\" path '{}' resolves outside the project root '{}'", path.display(), root.display())]
    BoundaryViolation {
        option: &'static str,
        path: PathBuf,
        root: PathBuf,
    },

    /// A `main` entry does not reference a Less stylesheet
    #[error("\"main\" option must reference a .less file: '{}'", path.display())]
    InvalidMainTarget { path: PathBuf },

    /// A cycle was detected while following `main` redirections
    #[error("circular \"main\" reference detected: {cycle}")]
    CircularMainReference { cycle: String },

    /// The external render engine rejected the source
    #[error("render failed for {}: {source}", file.display())]
    Render {
        file: PathBuf,
        #[source]
        source: RenderError,
    },

    /// Invalid project configuration file
    #[error("invalid config {}: {message}", file.display())]
    InvalidConfig { file: PathBuf, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
