//! Findings from a lint loader.
//!
//! The loader wraps the linter's stylish output:
//!
//! ```text
//! Module Warning (from ./node_modules/eslint-loader/index.js):
//!
//! /app/src/index.js
//!   3:7  warning  'unused' is assigned a value but never used  no-unused-vars
//!
//! ✖ 1 problem (0 errors, 1 warning)
//! ```

use std::sync::OnceLock;

use regex::Regex;

use crate::domain::{EnrichedError, ErrorDetail, LintFile, LintReport, RawError};
use crate::severity;
use crate::transform::Transformer;

pub const NAME: &str = "lint";

static HEADER: OnceLock<Option<Regex>> = OnceLock::new();
fn header() -> Option<&'static Regex> {
    HEADER
        .get_or_init(|| Regex::new(r"^Module (?:Warning|Error) \(from (.+)\):$").ok())
        .as_ref()
}

static VIOLATION: OnceLock<Option<Regex>> = OnceLock::new();
fn violation() -> Option<&'static Regex> {
    VIOLATION
        .get_or_init(|| Regex::new(r"^\s+\d+:\d+\s+(?:warning|error)\s+\S").ok())
        .as_ref()
}

/// Recognizes lint loader output.
pub struct LintTransformer;

impl Transformer for LintTransformer {
    fn name(&self) -> &str {
        NAME
    }

    fn transform(&self, raw: &RawError) -> Option<EnrichedError> {
        let mut report = parse_report(&raw.message)?;
        if let Some(loader) = raw.loader.as_deref().filter(|l| !l.trim().is_empty()) {
            report.loader = loader.to_string();
        }
        let mut enriched =
            EnrichedError::new(NAME, raw.message.trim_end(), severity::LINT).with_raw_context(raw);
        if enriched.file.is_none() {
            enriched.file = report.files.first().map(|f| f.path.clone());
        }
        Some(enriched.with_detail(ErrorDetail::Lint(report)))
    }
}

/// Recover header, per-file violations and summary. `None` when the message
/// lacks the loader header or carries no `line:col severity` lines. Files
/// without any such line are dropped.
pub fn parse_report(message: &str) -> Option<LintReport> {
    let header_re = header()?;
    let violation_re = violation()?;

    let mut lines = message.lines();
    let header = lines.by_ref().find(|l| !l.trim().is_empty())?.trim();
    let loader = header_re.captures(header)?.get(1)?.as_str().to_string();

    let mut files: Vec<LintFile> = Vec::new();
    let mut summary = None;

    for line in lines {
        let line = line.trim_end();
        let trimmed = line.trim_start();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.starts_with('✖') {
            summary = Some(trimmed.to_string());
            break;
        }
        if line.starts_with(char::is_whitespace) {
            // Indented text before any file path is not stylish output.
            files.last_mut()?.violations.push(line.to_string());
            continue;
        }
        files.push(LintFile {
            path: line.to_string(),
            violations: Vec::new(),
        });
    }

    files.retain(|f| f.violations.iter().any(|v| violation_re.is_match(v)));
    if files.is_empty() {
        return None;
    }

    Some(LintReport {
        header: header.to_string(),
        loader,
        files,
        summary,
    })
}
