//! lesskit - compile-on-save orchestration for Less stylesheets
//!
//! lesskit decides what a save means: it reads the first-line directive
//! comment of a `.less` file, resolves `main` redirections and output
//! paths inside the project boundary, hands the source to an external
//! render engine, and writes the CSS (and source map) atomically. Batch
//! entry points cover import-graph cascades and whole-project compiles
//! with bounded concurrency.

pub mod batch;
pub mod cli;
pub mod compiler;
pub mod config;
pub mod directive;
pub mod engine;
pub mod error;
pub mod fs;
pub mod imports;
pub mod mainchain;
pub mod options;
pub mod render;
pub mod resolve;
pub mod workspace;

// Re-exports for convenience
pub use batch::{run_bounded, DEFAULT_CONCURRENCY};
pub use compiler::{CompileReport, Compiler};
pub use config::Config;
pub use engine::LesscEngine;
pub use error::{LessError, LessResult};
pub use fs::{FileSystem, LocalFs};
pub use options::{CompileOptions, OutSetting};
pub use render::{RenderEngine, RenderError, RenderOptions, RenderOutput};
