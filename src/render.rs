//! External render contract
//!
//! The Less-to-CSS engine is an external collaborator: lesskit hands it
//! source text plus fully resolved options and gets back CSS and an
//! optional source map. Everything the orchestrator decides (output paths,
//! option merging, main redirection) happens before this boundary.

use std::collections::BTreeMap;
use std::path::PathBuf;

use thiserror::Error;

use crate::error::LessResult;

/// Error reported by the render engine (syntax error, missing import, ...)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct RenderError {
    /// Human-readable diagnostic
    pub message: String,
    /// 1-based source line, when the engine reports one
    pub line: Option<usize>,
    /// 1-based source column, when the engine reports one
    pub column: Option<usize>,
}

impl RenderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            line: None,
            column: None,
        }
    }

    pub fn at(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            message: message.into(),
            line: Some(line),
            column: Some(column),
        }
    }
}

/// Source-map settings handed to the engine, derived from the output path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceMapOptions {
    /// Base path stripped from source filenames in the map (the source dir)
    pub base_path: PathBuf,
    /// Source dir expressed relative to the CSS dir
    pub root_path: PathBuf,
    /// Embed the map in the CSS instead of producing separate map text
    pub inline: bool,
    /// `sourceMappingURL` written into the CSS when the map is a sibling file
    pub url: Option<String>,
    /// Whether to embed full source text in the map (always off here)
    pub output_source_files: bool,
}

/// Ordered rendering extension hooks forwarded to the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderHook {
    /// Post-process the CSS with vendor prefixes for the given browsers
    Autoprefixer { browsers: Vec<String> },
}

/// Fully resolved per-render options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// The source file being rendered (diagnostics, relative import base)
    pub filename: PathBuf,
    /// When true the engine must use the provided text and never re-read
    /// the file from disk (set after preprocessors have run)
    pub content_provided: bool,
    pub compress: bool,
    pub relative_urls: bool,
    pub ie_compat: bool,
    pub javascript_enabled: bool,
    pub math: Option<String>,
    pub source_map: Option<SourceMapOptions>,
    pub hooks: Vec<RenderHook>,
}

/// Successful render result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutput {
    pub css: String,
    /// Text form of the source map, present when one was requested and the
    /// engine produced a separate (non-inline) map
    pub map: Option<String>,
}

/// The render contract implemented by the external engine
pub trait RenderEngine: Send + Sync {
    fn render(&self, source: &str, options: &RenderOptions) -> Result<RenderOutput, RenderError>;
}

/// Mutable context shared across one preprocessor pipeline invocation.
/// Lets one stage leave data for a later stage; never persisted across
/// compilation requests.
pub type SharedContext = BTreeMap<String, serde_json::Value>;

/// A registered pre-render transform, applied in registration order
pub type Preprocessor = Box<dyn Fn(String, &mut SharedContext) -> LessResult<String> + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_error_display_is_message() {
        let err = RenderError::at("Unrecognised input", 3, 14);
        assert_eq!(err.to_string(), "Unrecognised input");
        assert_eq!(err.line, Some(3));
        assert_eq!(err.column, Some(14));
    }
}
