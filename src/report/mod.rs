use colored::Colorize;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::render::AssessmentResult;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to write report file: {0}")]
    FileWrite(#[from] std::io::Error),
}

/// One finished assessment, as printed by the one-shot mode.
#[derive(Debug)]
pub struct Report {
    pub username: String,
    pub assessment: AssessmentResult,
}

impl Report {
    pub fn new(username: &str, assessment: AssessmentResult) -> Self {
        Self {
            username: username.to_string(),
            assessment,
        }
    }
}

/// Output the report to terminal (default) or to a markdown file.
#[instrument(skip(report), fields(username = %report.username))]
pub fn output(report: &Report, output_path: Option<&Path>) -> Result<(), ReportError> {
    match output_path {
        None => {
            debug!("writing report to terminal");
            print_terminal_report(report);
            Ok(())
        }
        Some(path) => {
            debug!(path = %path.display(), "writing report to file");
            write_markdown_report(report, path)
        }
    }
}

/// ═══ Technical Skill Assessment: octocat ═══
/// <assessment markdown>
fn print_terminal_report(report: &Report) {
    println!();
    println!(
        "{}",
        format!("═══ Technical Skill Assessment: {} ═══", report.username)
            .cyan()
            .bold()
    );
    println!();
    println!("{}", report.assessment.as_str().trim_end());
    println!();
}

fn markdown_report(report: &Report) -> String {
    let mut md = String::new();
    md.push_str(&format!(
        "# Technical Skill Assessment: {}\n\n",
        report.username
    ));
    md.push_str(report.assessment.as_str().trim_end());
    md.push('\n');
    md
}

fn write_markdown_report(report: &Report, path: &Path) -> Result<(), ReportError> {
    std::fs::write(path, markdown_report(report))?;
    Ok(())
}
