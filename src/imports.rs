//! Reverse import-graph resolution
//!
//! Answers "does this file import that file?" by scanning `@import`
//! statements. Used to cascade recompilation: when a partial changes, every
//! file whose imports resolve to it gets recompiled.
//!
//! Path comparison is case-insensitive and separator-normalized to match
//! the common case-insensitive file systems. On a case-sensitive file
//! system this over-approximates (differently-cased paths compare equal),
//! which can only cause a redundant recompile, never a missed one.

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::resolve::{normalize, resolve_absolute};

static IMPORT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"@import\s*(?:\([^)]*\)\s*)?["']([^"']+)["']"#).expect("valid regex")
});

static EXTERNAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(https?:)?//").expect("valid regex"));

/// Does `importer` (with the given text) import `target`?
///
/// Stateless: repeated invocations with the same arguments always return
/// the same result.
pub fn imports_target(importer: &Path, importer_content: &str, target: &Path) -> bool {
    let target_key = comparison_key(target);

    extract_import_paths(importer_content).iter().any(|raw| {
        resolve_import_candidates(importer, raw)
            .iter()
            .any(|candidate| comparison_key(candidate) == target_key)
    })
}

/// Pull the quoted paths out of every `@import` statement, including the
/// optioned form `@import (reference) "path";`
fn extract_import_paths(content: &str) -> Vec<String> {
    IMPORT_RE
        .captures_iter(content)
        .filter_map(|captures| {
            let raw = captures[1].trim();
            (!raw.is_empty()).then(|| raw.to_string())
        })
        .collect()
}

/// Absolute paths an import statement could refer to. Extensionless imports
/// expand to two candidates: the path with `.less` appended, and the path
/// as a directory holding an `index.less` (implicit index resolution is
/// part of the import syntax).
fn resolve_import_candidates(importer: &Path, import_path: &str) -> Vec<PathBuf> {
    if is_external(import_path) {
        return Vec::new();
    }

    let importer_dir = importer.parent().unwrap_or(Path::new(""));
    let absolute = resolve_absolute(importer_dir, Path::new(import_path));

    if absolute.extension().is_some() {
        vec![absolute]
    } else {
        let mut with_ext = absolute.clone().into_os_string();
        with_ext.push(".less");
        vec![PathBuf::from(with_ext), absolute.join("index.less")]
    }
}

/// Absolute URLs and data URIs can never resolve to a local file
fn is_external(import_path: &str) -> bool {
    EXTERNAL_RE.is_match(import_path) || import_path.starts_with("data:")
}

/// Normalized, separator-folded, lowercased form used for path equality
fn comparison_key(path: &Path) -> String {
    normalize(path)
        .to_string_lossy()
        .replace('\\', "/")
        .to_lowercase()
}
