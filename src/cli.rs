use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// lesskit - compile-on-save orchestration for Less stylesheets
#[derive(Parser, Debug)]
#[command(name = "lesskit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Machine-readable output for CI
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Project root override (defaults to the nearest lesskit.toml or .git)
    #[arg(long, global = true)]
    pub project_root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile one .less file
    Compile {
        /// The file to compile
        file: PathBuf,

        /// Also recompile every file that imports it
        #[arg(long)]
        cascade: bool,
    },

    /// Compile every .less file in the project
    CompileAll {
        /// Maximum files compiled at once
        #[arg(short, long)]
        concurrency: Option<usize>,
    },

    /// Write a starter lesskit.toml into the project root
    Init,
}
