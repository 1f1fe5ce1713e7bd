//! `main` redirection resolution
//!
//! A file can declare `main: other.less` to have the orchestrator compile
//! the referenced file(s) in its place. This module resolves the declared
//! entries to absolute, boundary-checked paths; the orchestrator owns the
//! recursive descent and its cycle detection.

use std::path::{Path, PathBuf};

use crate::error::{LessError, LessResult};
use crate::resolve::{assert_within_root, interpolate, resolve_absolute};

/// The only extension accepted for `main` targets
pub const LESS_EXT: &str = "less";

/// Resolve the `main` entries of `current_file` to the set of files to
/// compile in its place.
///
/// Each entry is interpolated, resolved relative to the current file's
/// directory, boundary-checked, and gated on the `.less` extension. If the
/// resolved set contains the current file itself the whole set collapses to
/// empty: a trivial self-redirect means "just compile this file".
pub fn resolve_main_paths(
    main: &[String],
    current_file: &Path,
    boundary: &Path,
) -> LessResult<Vec<PathBuf>> {
    let current_dir = current_file.parent().unwrap_or(Path::new(""));

    let mut resolved = Vec::with_capacity(main.len());
    for entry in main {
        let interpolated = interpolate(entry, boundary);
        let candidate = resolve_absolute(current_dir, Path::new(&interpolated));
        let candidate = assert_within_root(&candidate, boundary, "main")?;

        if candidate.extension().and_then(|e| e.to_str()) != Some(LESS_EXT) {
            return Err(LessError::InvalidMainTarget { path: candidate });
        }

        resolved.push(candidate);
    }

    if resolved.iter().any(|path| path == current_file) {
        return Ok(Vec::new());
    }

    Ok(resolved)
}
