//! Render command implementation

use std::path::PathBuf;
use std::process::ExitCode;

use crate::config::{check_config, load_config, merge_cli_overrides, CliOverrides, ShowKind};
use crate::show::run_show;

use super::{EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Flags of the render command
#[derive(Debug, Default)]
pub struct RenderArgs {
    pub config: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub kind: Option<ShowKind>,
    pub panels: Option<u32>,
    pub seed: Option<u64>,
    pub count: Option<u32>,
    pub complexity: Option<Vec<u64>>,
}

/// Execute the render command
pub fn run_render(args: RenderArgs) -> ExitCode {
    let mut config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let complexity = match args.complexity.as_deref() {
        None => None,
        Some(&[min, max]) => Some([min, max]),
        Some(_) => {
            eprintln!("Error: --complexity takes exactly two values: MIN MAX");
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let overrides = CliOverrides {
        output: args.output,
        panels: args.panels,
        kind: args.kind,
        seed: args.seed,
        count: args.count,
        complexity,
    };
    merge_cli_overrides(&mut config, &overrides);
    if let Err(e) = check_config(&config) {
        eprintln!("Error: {}", e);
        return ExitCode::from(EXIT_INVALID_ARGS);
    }

    let report = match run_show(&config) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    for path in &report.accepted {
        println!("{}", path.display());
    }

    if report.is_complete(config.show.count) {
        ExitCode::from(EXIT_SUCCESS)
    } else {
        eprintln!(
            "Error: only {} of {} files accepted after {} attempts",
            report.accepted.len(),
            config.show.count,
            report.attempts
        );
        ExitCode::from(EXIT_ERROR)
    }
}
