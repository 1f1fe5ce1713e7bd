//! Project configuration
//!
//! Project-wide compile defaults live in `lesskit.toml` at the project
//! root. Per-file directives override these defaults field by field; the
//! file is optional and absence means built-in defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::batch::DEFAULT_CONCURRENCY;
use crate::error::{LessError, LessResult};
use crate::options::CompileOptions;

/// Name of the project configuration file, also used as a root marker
pub const CONFIG_FILE: &str = "lesskit.toml";

/// Template written by `lesskit init`
const CONFIG_TEMPLATE: &str = r#"# lesskit project configuration
#
# Compile defaults apply to every .less file; a first-line directive
# comment in a file overrides them for that file.

# Maximum number of files compiled at once by compile-all
concurrency = 8

[compile]
sourceDir = "${workspaceFolder}/less/"
outputDir = "${workspaceFolder}/css/"
# sourceMap = true
# compress = false
"#;

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Defaults merged under every file's directives
    pub compile: CompileOptions,
    /// Concurrency ceiling for compile-all
    pub concurrency: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            compile: CompileOptions::default(),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl Config {
    /// Load the configuration from `root`, falling back to defaults when
    /// the file does not exist. A present-but-invalid file is an error.
    pub fn load(root: &Path) -> LessResult<Self> {
        let path = root.join(CONFIG_FILE);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(err) => return Err(err.into()),
        };

        toml::from_str(&content).map_err(|e| LessError::InvalidConfig {
            file: path,
            message: e.to_string(),
        })
    }

    /// Write a starter `lesskit.toml` into `root`. Refuses to overwrite an
    /// existing file.
    pub fn init(root: &Path) -> LessResult<PathBuf> {
        let path = root.join(CONFIG_FILE);
        if path.exists() {
            return Err(LessError::InvalidConfig {
                file: path,
                message: "configuration file already exists".to_string(),
            });
        }
        std::fs::write(&path, CONFIG_TEMPLATE)?;
        Ok(path)
    }
}
