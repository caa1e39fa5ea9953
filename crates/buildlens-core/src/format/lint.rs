//! Lint loader output, reprinted per file with disable hints.

use crate::domain::{EnrichedError, ErrorDetail, Level, LintReport};
use crate::format::{Formatter, TextBlock};
use crate::transform::lint::NAME;

/// Printed once after all lint blocks.
pub const DISABLE_HINTS: [&str; 3] = [
    "You may use special comments to disable some warnings.",
    "Use // eslint-disable-next-line to ignore the next line.",
    "Use /* eslint-disable */ to ignore all warnings in a file.",
];

/// Renders `lint` records.
pub struct LintFormatter;

fn report_lines(report: &LintReport, level: Level) -> TextBlock {
    let header = if report.header.trim().is_empty() {
        let kind = match level {
            Level::Error => "Error",
            Level::Warning => "Warning",
        };
        format!("Module {kind} (from {}):", report.loader)
    } else {
        report.header.clone()
    };
    let mut lines = vec![header, String::new()];
    for file in &report.files {
        lines.push(file.path.clone());
        lines.extend(file.violations.iter().cloned());
        lines.push(String::new());
    }
    if let Some(summary) = &report.summary {
        lines.push(summary.clone());
        lines.push(String::new());
    }
    lines
}

impl Formatter for LintFormatter {
    fn name(&self) -> &str {
        NAME
    }

    fn accepts(&self, error: &EnrichedError) -> bool {
        error.name == NAME && matches!(error.detail, ErrorDetail::Lint(_))
    }

    fn render(&self, errors: &[&EnrichedError], level: Level) -> TextBlock {
        let mut lines: TextBlock = errors
            .iter()
            .filter_map(|e| match &e.detail {
                ErrorDetail::Lint(report) => Some(report_lines(report, level)),
                _ => None,
            })
            .flatten()
            .collect();

        if !lines.is_empty() {
            lines.extend(DISABLE_HINTS.iter().map(|s| s.to_string()));
        }
        lines
    }
}
