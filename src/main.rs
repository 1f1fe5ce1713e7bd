//! lesskit CLI - compile-on-save orchestration for Less stylesheets
//!
//! Usage: lesskit <COMMAND>
//!
//! Commands:
//!   compile      Compile one .less file (optionally cascading to importers)
//!   compile-all  Compile every .less file in the project
//!   init         Write a starter lesskit.toml

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use lesskit::cli::{Cli, Commands};
use lesskit::compiler::{CompileReport, Compiler};
use lesskit::config::Config;
use lesskit::engine::LesscEngine;
use lesskit::fs::LocalFs;
use lesskit::workspace;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let outcome = match cli.command {
        Commands::Compile { ref file, cascade } => {
            cmd_compile(file, cascade, cli.project_root.as_deref(), cli.json)
        }
        Commands::CompileAll { concurrency } => {
            cmd_compile_all(concurrency, cli.project_root.as_deref(), cli.json)
        }
        Commands::Init => cmd_init(cli.project_root.as_deref(), cli.json),
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbosity: u8) {
    let default = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Resolve the boundary: an explicit override wins, otherwise the nearest
/// marker above `reference`
fn resolve_boundary(explicit: Option<&Path>, reference: &Path) -> Result<PathBuf> {
    match explicit {
        Some(root) => root
            .canonicalize()
            .with_context(|| format!("project root not found: {}", root.display())),
        None => Ok(workspace::find_project_root(reference)),
    }
}

fn new_compiler() -> Compiler<LesscEngine, LocalFs> {
    Compiler::new(LesscEngine::new(), LocalFs::new())
}

fn cmd_compile(
    file: &Path,
    cascade: bool,
    project_root: Option<&Path>,
    json: bool,
) -> Result<bool> {
    let file = file
        .canonicalize()
        .with_context(|| format!("file not found: {}", file.display()))?;
    let boundary = resolve_boundary(project_root, &file)?;
    let config = Config::load(&boundary)?;
    let compiler = new_compiler();

    let content = std::fs::read_to_string(&file)
        .with_context(|| format!("cannot read {}", file.display()))?;
    let written = compiler.compile(&file, &content, &config.compile, &boundary)?;

    let cascade_reports = if cascade {
        let candidates = workspace::find_less_files(&boundary);
        compiler.compile_importers(&file, &candidates, &config.compile, &boundary)
    } else {
        Vec::new()
    };

    let failures = cascade_reports
        .iter()
        .filter(|r| r.result.is_err())
        .count();

    if json {
        let cascade_json: Vec<_> = cascade_reports.iter().map(report_json).collect();
        println!(
            "{}",
            serde_json::json!({
                "event": "compile",
                "file": file,
                "written": written,
                "cascade": cascade_json,
                "errors": failures,
            })
        );
    } else {
        print_written(&file, &written);
        for report in &cascade_reports {
            match &report.result {
                Ok(written) => print_written(&report.file, written),
                Err(err) => eprintln!("  ✗ {}: {err}", report.file.display()),
            }
        }
    }

    Ok(failures == 0)
}

fn cmd_compile_all(
    concurrency: Option<usize>,
    project_root: Option<&Path>,
    json: bool,
) -> Result<bool> {
    let cwd = std::env::current_dir().context("cannot determine working directory")?;
    let boundary = resolve_boundary(project_root, &cwd)?;
    let config = Config::load(&boundary)?;
    let ceiling = concurrency.unwrap_or(config.concurrency);

    let compiler = new_compiler();
    let reports = compiler.compile_project(&boundary, &config.compile, ceiling);
    let failures = reports.iter().filter(|r| r.result.is_err()).count();

    if json {
        let files: Vec<_> = reports.iter().map(report_json).collect();
        println!(
            "{}",
            serde_json::json!({
                "event": "compile-all",
                "root": boundary,
                "compiled": reports.len() - failures,
                "errors": failures,
                "files": files,
            })
        );
    } else {
        for report in &reports {
            match &report.result {
                Ok(written) => print_written(&report.file, written),
                Err(err) => eprintln!("  ✗ {}: {err}", report.file.display()),
            }
        }
        println!(
            "\n{} compiled, {} failed",
            reports.len() - failures,
            failures
        );
    }

    Ok(failures == 0)
}

fn cmd_init(project_root: Option<&Path>, json: bool) -> Result<bool> {
    let cwd = std::env::current_dir().context("cannot determine working directory")?;
    let root = match project_root {
        Some(root) => root.to_path_buf(),
        None => cwd,
    };
    let path = Config::init(&root)?;

    if json {
        println!(
            "{}",
            serde_json::json!({ "event": "init", "config": path })
        );
    } else {
        println!("✓ Wrote {}", path.display());
    }
    Ok(true)
}

fn report_json(report: &CompileReport) -> serde_json::Value {
    match &report.result {
        Ok(written) => serde_json::json!({
            "file": report.file,
            "status": "ok",
            "written": written,
        }),
        Err(err) => serde_json::json!({
            "file": report.file,
            "status": "error",
            "message": err.to_string(),
        }),
    }
}

fn print_written(file: &Path, written: &[PathBuf]) {
    if written.is_empty() {
        println!("  - {} (output suppressed)", file.display());
    } else {
        for output in written {
            println!("  ✓ {} → {}", file.display(), output.display());
        }
    }
}
