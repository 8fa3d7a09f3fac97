//! Curtain - command-line tool for generating LED curtain animations

use std::process::ExitCode;

use curtainfx::cli;

fn main() -> ExitCode {
    cli::run()
}
