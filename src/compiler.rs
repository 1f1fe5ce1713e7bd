//! Compilation orchestrator
//!
//! Composes the directive parser, main-chain resolver, and path resolver
//! for a single compile request, then hands the text to the external render
//! engine and writes the result(s). Batch entry points cover "compile every
//! importer of this file" and "compile the whole project" with a bounded
//! concurrency ceiling.
//!
//! Within one request the steps are strictly sequential: parse directives,
//! resolve main redirection, resolve the output path, render, write CSS,
//! write the source map. All paths are fully resolved and boundary-checked
//! before the first write.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::batch;
use crate::directive;
use crate::error::{LessError, LessResult};
use crate::fs::FileSystem;
use crate::imports;
use crate::mainchain;
use crate::options::CompileOptions;
use crate::render::{
    Preprocessor, RenderEngine, RenderHook, RenderOptions, SharedContext, SourceMapOptions,
};
use crate::resolve::{self, normalize, relative_to};
use crate::workspace;

/// Outcome of one file's compilation inside a batch
#[derive(Debug)]
pub struct CompileReport {
    pub file: PathBuf,
    /// Paths written on success (empty when output was suppressed)
    pub result: LessResult<Vec<PathBuf>>,
}

/// The compilation orchestrator
///
/// Holds the external render engine, the file-system boundary, and the
/// registered preprocessor pipeline. The project boundary is a parameter of
/// each call, never ambient state.
pub struct Compiler<E, F> {
    engine: E,
    fs: F,
    preprocessors: Vec<Preprocessor>,
}

impl<E: RenderEngine, F: FileSystem> Compiler<E, F> {
    pub fn new(engine: E, fs: F) -> Self {
        Self {
            engine,
            fs,
            preprocessors: Vec::new(),
        }
    }

    /// Register pre-render transforms, applied in registration order
    pub fn with_preprocessors(mut self, preprocessors: Vec<Preprocessor>) -> Self {
        self.preprocessors = preprocessors;
        self
    }

    /// Compile one file from the given text.
    ///
    /// Returns the output paths written. `main` redirection may compile
    /// other files in place of this one; a redirection cycle is an error
    /// and performs zero writes.
    pub fn compile(
        &self,
        file: &Path,
        content: &str,
        defaults: &CompileOptions,
        boundary: &Path,
    ) -> LessResult<Vec<PathBuf>> {
        let file = normalize(file);
        let mut chain: Vec<PathBuf> = Vec::new();
        self.compile_inner(&file, content, defaults, boundary, &mut chain)
    }

    fn compile_inner(
        &self,
        file: &Path,
        content: &str,
        defaults: &CompileOptions,
        boundary: &Path,
        chain: &mut Vec<PathBuf>,
    ) -> LessResult<Vec<PathBuf>> {
        let options = directive::parse(content, defaults);

        if !options.main.is_empty() {
            let mains = mainchain::resolve_main_paths(&options.main, file, boundary)?;
            if !mains.is_empty() {
                // The chain holds every file on the current descent; a main
                // target already in it means we are going in circles.
                chain.push(file.to_path_buf());
                let mut written = Vec::new();
                for main in &mains {
                    if chain.contains(main) {
                        return Err(LessError::CircularMainReference {
                            cycle: describe_cycle(chain, main),
                        });
                    }
                    debug!(from = %file.display(), to = %main.display(), "following main redirection");
                    let main_content = self.fs.read_to_string(main)?;
                    written.extend(self.compile_inner(
                        main,
                        &main_content,
                        defaults,
                        boundary,
                        chain,
                    )?);
                }
                chain.pop();
                return Ok(written);
            }
        }

        let Some(css_path) = resolve::choose_output_path(&options, file, boundary)? else {
            debug!(file = %file.display(), "output suppressed by out: false");
            return Ok(Vec::new());
        };

        let (source_map, map_path) = configure_source_map(&options, file, &css_path);

        let mut source = content.to_string();
        let content_provided = !self.preprocessors.is_empty();
        if content_provided {
            let mut context = SharedContext::new();
            for preprocessor in &self.preprocessors {
                source = preprocessor(source, &mut context)?;
            }
        }

        let render_options = RenderOptions {
            filename: file.to_path_buf(),
            content_provided,
            compress: options.compress,
            relative_urls: options.relative_urls,
            ie_compat: options.ie_compat,
            javascript_enabled: options.javascript_enabled,
            math: options.math.clone(),
            source_map,
            hooks: hooks_for(&options),
        };

        let output = self
            .engine
            .render(&source, &render_options)
            .map_err(|source| LessError::Render {
                file: file.to_path_buf(),
                source,
            })?;

        let mut written = Vec::new();
        self.fs.write(&css_path, &output.css)?;
        debug!(css = %css_path.display(), "wrote output");
        written.push(css_path);

        if let (Some(map), Some(map_path)) = (output.map, map_path) {
            self.fs.write(&map_path, &map)?;
            debug!(map = %map_path.display(), "wrote source map");
            written.push(map_path);
        }

        Ok(written)
    }

    /// Compile every candidate whose imports resolve to `target`.
    ///
    /// The candidate list is supplied by the caller (see
    /// [`workspace::find_less_files`]); the target itself is skipped.
    /// Failures are isolated per file.
    pub fn compile_importers(
        &self,
        target: &Path,
        candidates: &[PathBuf],
        defaults: &CompileOptions,
        boundary: &Path,
    ) -> Vec<CompileReport> {
        let target = normalize(target);

        let mut reports = Vec::new();
        for candidate in candidates {
            let candidate = normalize(candidate);
            if candidate == target {
                continue;
            }

            let content = match self.fs.read_to_string(&candidate) {
                Ok(content) => content,
                Err(err) => {
                    reports.push(CompileReport {
                        file: candidate,
                        result: Err(err),
                    });
                    continue;
                }
            };

            if !imports::imports_target(&candidate, &content, &target) {
                continue;
            }

            debug!(importer = %candidate.display(), target = %target.display(), "cascading recompile");
            let result = self.compile(&candidate, &content, defaults, boundary);
            reports.push(CompileReport {
                file: candidate,
                result,
            });
        }

        reports
    }

    /// Compile the given files with at most `ceiling` in flight at once.
    /// Every file is attempted; failures are isolated per file.
    pub fn compile_many(
        &self,
        files: &[PathBuf],
        defaults: &CompileOptions,
        boundary: &Path,
        ceiling: usize,
    ) -> Vec<CompileReport> {
        batch::run_bounded(files, ceiling, |file| {
            let result = self
                .fs
                .read_to_string(file)
                .and_then(|content| self.compile(file, &content, defaults, boundary));
            CompileReport {
                file: file.clone(),
                result,
            }
        })
    }

    /// Discover every `.less` file under `boundary` and compile them all
    pub fn compile_project(
        &self,
        boundary: &Path,
        defaults: &CompileOptions,
        ceiling: usize,
    ) -> Vec<CompileReport> {
        let files = workspace::find_less_files(boundary);
        self.compile_many(&files, defaults, boundary, ceiling)
    }
}

fn describe_cycle(chain: &[PathBuf], repeat: &Path) -> String {
    let mut parts: Vec<String> = chain.iter().map(|p| p.display().to_string()).collect();
    parts.push(repeat.display().to_string());
    parts.join(" -> ")
}

fn hooks_for(options: &CompileOptions) -> Vec<RenderHook> {
    let browsers = options.browsers();
    if browsers.is_empty() {
        Vec::new()
    } else {
        vec![RenderHook::Autoprefixer { browsers }]
    }
}

/// Derive the engine's source-map settings and the map file path (when the
/// map is written separately rather than inlined)
fn configure_source_map(
    options: &CompileOptions,
    file: &Path,
    css_path: &Path,
) -> (Option<SourceMapOptions>, Option<PathBuf>) {
    if !options.source_map {
        return (None, None);
    }

    let less_dir = file.parent().unwrap_or(Path::new("")).to_path_buf();
    let css_dir = css_path.parent().unwrap_or(Path::new(""));
    let root_path = relative_to(css_dir, &less_dir);

    if options.source_map_file_inline {
        let map_options = SourceMapOptions {
            base_path: less_dir,
            root_path,
            inline: true,
            url: None,
            output_source_files: false,
        };
        return (Some(map_options), None);
    }

    let mut map_os = css_path.to_path_buf().into_os_string();
    map_os.push(".map");
    let map_path = PathBuf::from(map_os);
    let url = map_path
        .file_name()
        .map(|name| format!("./{}", name.to_string_lossy()));

    let map_options = SourceMapOptions {
        base_path: less_dir,
        root_path,
        inline: false,
        url,
        output_source_files: false,
    };

    (Some(map_options), Some(map_path))
}
