//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod analyze;
mod render;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::config::ShowKind;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Curtain - Generate particle animations for LED light curtains
#[derive(Parser)]
#[command(name = "curtain")]
#[command(about = "Curtain - Generate particle animations for LED light curtains")]
#[command(version)]
pub struct Cli {
    /// Log debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Simulate a show and write animated GIFs
    Render {
        /// Config file (default: nearest curtain.toml, else built-in defaults)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output path; files are numbered {stem}_000.gif, {stem}_001.gif, ...
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Effect family to launch
        #[arg(long, value_enum)]
        kind: Option<KindArg>,

        /// Number of side-by-side curtain panels
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        panels: Option<u32>,

        /// Random seed for a reproducible show
        #[arg(long)]
        seed: Option<u64>,

        /// Number of accepted files to produce
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        count: Option<u32>,

        /// Keep only files whose complexity lies in [MIN, MAX]
        #[arg(long, num_args = 2, value_names = ["MIN", "MAX"])]
        complexity: Option<Vec<u64>>,
    },

    /// Report the complexity of an existing GIF
    Analyze {
        /// GIF file to analyze
        input: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Show kinds accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Firework,
    Lovework,
    Spritework,
    Ambient,
}

impl From<KindArg> for ShowKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Firework => ShowKind::Firework,
            KindArg::Lovework => ShowKind::Lovework,
            KindArg::Spritework => ShowKind::Spritework,
            KindArg::Ambient => ShowKind::Ambient,
        }
    }
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Render { config, output, kind, panels, seed, count, complexity } => {
            render::run_render(render::RenderArgs {
                config,
                output,
                kind: kind.map(ShowKind::from),
                panels,
                seed,
                count,
                complexity,
            })
        }
        Commands::Analyze { input, json } => analyze::run_analyze(&input, json),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}
