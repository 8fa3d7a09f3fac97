//! Analyze command implementation

use std::path::Path;
use std::process::ExitCode;

use crate::complexity::{analyze_gif, ComplexityReport};

use super::{EXIT_ERROR, EXIT_SUCCESS};

/// Execute the analyze command
pub fn run_analyze(input: &Path, json: bool) -> ExitCode {
    let report = match analyze_gif(input) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {}: {}", input.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
    } else {
        println!("{}", format_report_text(&report));
    }

    ExitCode::from(EXIT_SUCCESS)
}

fn format_report_text(report: &ComplexityReport) -> String {
    format!(
        "{}: {} frames, {}x{}, complexity {}",
        report.path.display(),
        report.frames,
        report.width,
        report.height,
        report.complexity
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_format_report_text() {
        let report = ComplexityReport {
            path: PathBuf::from("show_000.gif"),
            frames: 45,
            width: 20,
            height: 26,
            complexity: 1234,
        };
        assert_eq!(
            format_report_text(&report),
            "show_000.gif: 45 frames, 20x26, complexity 1234"
        );
    }
}
