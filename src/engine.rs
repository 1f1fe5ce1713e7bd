//! `lessc` subprocess engine
//!
//! Implements [`RenderEngine`] by shelling out to the Less compiler CLI.
//! Source text goes in on stdin, CSS comes back on stdout; when a separate
//! source map is requested, lessc writes it into a scratch directory and we
//! read it back. Argument construction is factored out so it can be tested
//! without a lessc install.

use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::render::{RenderEngine, RenderError, RenderHook, RenderOptions, RenderOutput};

/// Extracts "line N, column M" positions from lessc diagnostics
static POSITION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"line (\d+), column (\d+)").expect("valid regex"));

/// Render engine backed by the `lessc` executable
#[derive(Debug, Clone)]
pub struct LesscEngine {
    command: PathBuf,
}

impl Default for LesscEngine {
    fn default() -> Self {
        Self {
            command: PathBuf::from("lessc"),
        }
    }
}

impl LesscEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific compiler executable instead of `lessc` from PATH
    pub fn with_command(command: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl RenderEngine for LesscEngine {
    fn render(&self, source: &str, options: &RenderOptions) -> Result<RenderOutput, RenderError> {
        // Scratch location for the separate map file, cleaned up on drop
        let scratch = tempfile::tempdir()
            .map_err(|err| RenderError::new(format!("cannot create scratch directory: {err}")))?;
        let map_out = needs_map_file(options).then(|| scratch.path().join("out.css.map"));

        let args = build_args(options, map_out.as_deref());
        debug!(command = %self.command.display(), ?args, "invoking lessc");

        let mut child = Command::new(&self.command)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| {
                RenderError::new(format!("cannot run {}: {err}", self.command.display()))
            })?;

        child
            .stdin
            .take()
            .ok_or_else(|| RenderError::new("lessc stdin unavailable"))?
            .write_all(source.as_bytes())
            .map_err(|err| RenderError::new(format!("cannot write to lessc: {err}")))?;

        let output = child
            .wait_with_output()
            .map_err(|err| RenderError::new(format!("lessc did not finish: {err}")))?;

        if !output.status.success() {
            return Err(diagnostic_from_stderr(&output.stderr));
        }

        let css = String::from_utf8_lossy(&output.stdout).into_owned();
        let map = match &map_out {
            Some(path) => Some(std::fs::read_to_string(path).map_err(|err| {
                RenderError::new(format!("lessc produced no source map: {err}"))
            })?),
            None => None,
        };

        Ok(RenderOutput { css, map })
    }
}

/// A separate map file is needed unless the map is inlined into the CSS
fn needs_map_file(options: &RenderOptions) -> bool {
    options
        .source_map
        .as_ref()
        .map(|map| !map.inline)
        .unwrap_or(false)
}

/// Command-line arguments for one render. `map_out` is where lessc should
/// write the separate map file, when one was requested.
fn build_args(options: &RenderOptions, map_out: Option<&Path>) -> Vec<OsString> {
    let mut args: Vec<OsString> = Vec::new();

    // Relative imports resolve against the source file's directory
    if let Some(dir) = options.filename.parent() {
        let mut include = OsString::from("--include-path=");
        include.push(dir);
        args.push(include);
    }

    if options.compress {
        args.push("--compress".into());
    }
    if options.relative_urls {
        args.push("--rewrite-urls=all".into());
    }
    if options.ie_compat {
        args.push("--ie-compat".into());
    }
    if options.javascript_enabled {
        args.push("--js".into());
    }
    if let Some(math) = &options.math {
        args.push(format!("--math={math}").into());
    }

    if let Some(map) = &options.source_map {
        if map.inline {
            args.push("--source-map-map-inline".into());
        } else if let Some(map_out) = map_out {
            let mut flag = OsString::from("--source-map=");
            flag.push(map_out);
            args.push(flag);

            let mut base = OsString::from("--source-map-basepath=");
            base.push(&map.base_path);
            args.push(base);

            let mut root = OsString::from("--source-map-rootpath=");
            root.push(&map.root_path);
            args.push(root);

            if let Some(url) = &map.url {
                args.push(format!("--source-map-url={url}").into());
            }
        }
        if map.output_source_files {
            args.push("--source-map-less-inline".into());
        }
    }

    for hook in &options.hooks {
        match hook {
            RenderHook::Autoprefixer { browsers } => {
                args.push(format!("--autoprefix={}", browsers.join(", ")).into());
            }
        }
    }

    // Read source from stdin
    args.push("-".into());
    args
}

fn diagnostic_from_stderr(stderr: &[u8]) -> RenderError {
    let text = String::from_utf8_lossy(stderr);
    let message = text
        .lines()
        .find(|line| !line.trim().is_empty())
        .unwrap_or("lessc failed")
        .trim()
        .to_string();

    match POSITION_RE.captures(&text) {
        Some(captures) => {
            let line = captures[1].parse().unwrap_or(0);
            let column = captures[2].parse().unwrap_or(0);
            RenderError::at(message, line, column)
        }
        None => RenderError::new(message),
    }
}
