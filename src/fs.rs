//! File-system boundary
//!
//! The orchestrator reads sources and writes outputs through this trait so
//! tests can observe every write without touching the disk. `LocalFs` is
//! the real implementation: UTF-8 reads, and atomic writes (tempfile +
//! rename) that create parent directories first.

use std::path::Path;
#[cfg(test)]
use std::path::PathBuf;

use crate::error::LessResult;

/// Abstract file system used by the compilation orchestrator
pub trait FileSystem: Send + Sync {
    /// Read a file as UTF-8 text
    fn read_to_string(&self, path: &Path) -> LessResult<String>;

    /// Write UTF-8 text, creating parent directories as needed
    fn write(&self, path: &Path, content: &str) -> LessResult<()>;
}

/// Local disk implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl LocalFs {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for LocalFs {
    fn read_to_string(&self, path: &Path) -> LessResult<String> {
        std::fs::read_to_string(path).map_err(Into::into)
    }

    fn write(&self, path: &Path, content: &str) -> LessResult<()> {
        use std::io::Write;

        let parent = path.parent().unwrap_or(Path::new("."));
        std::fs::create_dir_all(parent)?;

        // Write to a sibling tempfile, then rename into place
        let mut temp = tempfile::NamedTempFile::new_in(parent)?;
        temp.write_all(content.as_bytes())?;
        temp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}

/// In-memory file system for tests
///
/// Uses `Arc<Mutex<>>` internally so it can be cloned and shared; writes
/// are recorded in insertion order for assertions.
#[cfg(test)]
#[derive(Clone, Default)]
pub struct MockFileSystem {
    state: std::sync::Arc<std::sync::Mutex<MockState>>,
}

#[cfg(test)]
#[derive(Default)]
struct MockState {
    files: std::collections::HashMap<PathBuf, String>,
    writes: Vec<PathBuf>,
}

#[cfg(test)]
impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file before the code under test runs
    pub fn seed(&self, path: impl Into<PathBuf>, content: impl Into<String>) {
        let mut state = self.state.lock().unwrap();
        state.files.insert(path.into(), content.into());
    }

    /// Paths written through the trait, in write order
    pub fn written_paths(&self) -> Vec<PathBuf> {
        self.state.lock().unwrap().writes.clone()
    }

    pub fn content(&self, path: &Path) -> Option<String> {
        self.state.lock().unwrap().files.get(path).cloned()
    }
}

#[cfg(test)]
impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> LessResult<String> {
        let state = self.state.lock().unwrap();
        state.files.get(path).cloned().ok_or_else(|| {
            crate::error::LessError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("file not found: {}", path.display()),
            ))
        })
    }

    fn write(&self, path: &Path, content: &str) -> LessResult<()> {
        let mut state = self.state.lock().unwrap();
        state.files.insert(path.to_path_buf(), content.to_string());
        state.writes.push(path.to_path_buf());
        Ok(())
    }
}
