//! Project discovery
//!
//! Locates the project boundary for a given file and enumerates the `.less`
//! sources beneath it. Discovery respects `.gitignore` and always skips
//! `node_modules`.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use tracing::warn;

use crate::config::CONFIG_FILE;

/// Directories never worth descending into, ignore files or not
const SKIPPED_DIRS: [&str; 1] = ["node_modules"];

/// Every `.less` file under `root`, sorted for deterministic batch order
pub fn find_less_files(root: &Path) -> Vec<PathBuf> {
    let walker = WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(true)
        .filter_entry(|entry| {
            let name = entry.file_name().to_string_lossy();
            !SKIPPED_DIRS.contains(&name.as_ref())
        })
        .build();

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(%err, "skipping unreadable entry during discovery");
                continue;
            }
        };
        let path = entry.path();
        if path.is_file() && path.extension().map(|e| e == "less").unwrap_or(false) {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    files
}

/// Find the project boundary for `file`: the nearest ancestor directory
/// holding a `lesskit.toml` or a `.git` directory. Falls back to the file's
/// own directory when no marker exists.
pub fn find_project_root(file: &Path) -> PathBuf {
    let start = if file.is_dir() {
        file
    } else {
        file.parent().unwrap_or(Path::new("."))
    };

    for ancestor in start.ancestors() {
        if ancestor.join(CONFIG_FILE).is_file() || ancestor.join(".git").is_dir() {
            return ancestor.to_path_buf();
        }
    }

    start.to_path_buf()
}
