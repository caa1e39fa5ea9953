//! Classified diagnostics, ready for rendering.

use serde::{Deserialize, Serialize};

use crate::domain::raw::RawError;
use crate::severity;

/// Which list a diagnostic came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Error,
    Warning,
}

impl Level {
    /// Lowercase label used inside rendered blocks.
    pub fn label(&self) -> &'static str {
        match self {
            Level::Error => "error",
            Level::Warning => "warning",
        }
    }

    /// `1 error`, `3 warnings`.
    pub fn count(&self, n: usize) -> String {
        if n == 1 {
            format!("{} {}", n, self.label())
        } else {
            format!("{} {}s", n, self.label())
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Shape of a missing module specifier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ModuleKind {
    /// Bare specifier resolved from installed packages (`lodash`).
    Package,
    /// Path specifier (`./util`, `../lib/a`).
    Relative,
}

impl ModuleKind {
    /// Classify a specifier by its shape.
    pub fn of(specifier: &str) -> Self {
        if specifier == "."
            || specifier == ".."
            || specifier.starts_with("./")
            || specifier.starts_with("../")
        {
            ModuleKind::Relative
        } else {
            ModuleKind::Package
        }
    }
}

/// One file section of a lint report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LintFile {
    /// Absolute path as printed by the linter.
    pub path: String,

    /// Violation lines, verbatim.
    pub violations: Vec<String>,
}

/// Structure recovered from a lint loader's message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LintReport {
    /// `Module Warning (from ./node_modules/eslint-loader/index.js):`
    pub header: String,

    /// Loader path from the header.
    pub loader: String,

    pub files: Vec<LintFile>,

    /// `✖ 2 problems (0 errors, 2 warnings)`, when present.
    pub summary: Option<String>,
}

impl LintReport {
    /// Total violation lines across all files.
    pub fn violation_count(&self) -> usize {
        self.files.iter().map(|f| f.violations.len()).sum()
    }
}

/// Class-specific fields attached by a transformer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ErrorDetail {
    #[default]
    None,

    ModuleNotFound {
        module: String,
        kind: ModuleKind,
    },

    Lint(LintReport),

    /// Free-form data for caller-defined classes.
    Custom {
        data: serde_json::Value,
    },
}

/// A diagnostic after classification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnrichedError {
    /// Stable class identifier, e.g. `module-not-found`.
    pub name: String,

    /// Possibly cleaned message text.
    pub message: String,

    /// Display path.
    pub file: Option<String>,

    /// Rendered origin trace (see [`crate::domain::raw::OriginTrace::render`]).
    pub origin: Option<String>,

    /// Higher is shown preferentially.
    pub severity: u32,

    #[serde(default)]
    pub detail: ErrorDetail,
}

impl EnrichedError {
    /// Create a record with no file, origin or detail.
    pub fn new(name: impl Into<String>, message: impl Into<String>, severity: u32) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            file: None,
            origin: None,
            severity,
            detail: ErrorDetail::None,
        }
    }

    /// The record every raw error falls back to when no transformer matches.
    pub fn generic(raw: &RawError) -> Self {
        Self::new(severity::GENERIC_NAME, raw.display_message(), severity::GENERIC)
            .with_raw_context(raw)
    }

    /// Copy display file and origin trace from the raw record.
    pub fn with_raw_context(mut self, raw: &RawError) -> Self {
        self.file = raw.display_file();
        self.origin = raw.origin.as_ref().map(|o| o.render());
        self
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn with_detail(mut self, detail: ErrorDetail) -> Self {
        self.detail = detail;
        self
    }

    /// Positive severity and a non-empty class name.
    pub fn is_well_formed(&self) -> bool {
        self.severity > 0 && !self.name.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_count_pluralization() {
        assert_eq!(Level::Error.count(1), "1 error");
        assert_eq!(Level::Error.count(3), "3 errors");
        assert_eq!(Level::Warning.count(0), "0 warnings");
        assert_eq!(Level::Warning.count(1), "1 warning");
    }

    #[test]
    fn test_module_kind_of() {
        assert_eq!(ModuleKind::of("lodash"), ModuleKind::Package);
        assert_eq!(ModuleKind::of("@scope/pkg"), ModuleKind::Package);
        assert_eq!(ModuleKind::of("./util"), ModuleKind::Relative);
        assert_eq!(ModuleKind::of("../non-existing"), ModuleKind::Relative);
        assert_eq!(ModuleKind::of(".."), ModuleKind::Relative);
        assert_eq!(ModuleKind::of(".hidden"), ModuleKind::Package);
    }

    #[test]
    fn test_generic_copies_raw_context() {
        let raw = RawError::new("something broke").with_module_identifier("loader!./a.js");
        let enriched = EnrichedError::generic(&raw);
        assert_eq!(enriched.name, "generic");
        assert_eq!(enriched.message, "something broke");
        assert_eq!(enriched.file.as_deref(), Some("./a.js"));
        assert_eq!(enriched.severity, severity::GENERIC);
        assert_eq!(enriched.detail, ErrorDetail::None);
    }

    #[test]
    fn test_generic_uses_stack_for_blank_message() {
        let mut raw = RawError::new("");
        raw.stack = Some("TypeError: x is not a function\n    at a (/app/a.js:1:1)".to_string());
        assert_eq!(EnrichedError::generic(&raw).message, "TypeError: x is not a function");
    }

    #[test]
    fn test_is_well_formed() {
        assert!(EnrichedError::new("x", "m", 5).is_well_formed());
        assert!(!EnrichedError::new("x", "m", 0).is_well_formed());
        assert!(!EnrichedError::new("  ", "m", 5).is_well_formed());
    }

    #[test]
    fn test_detail_serde_tagged() {
        let detail = ErrorDetail::ModuleNotFound {
            module: "lodash".to_string(),
            kind: ModuleKind::Package,
        };
        let json = serde_json::to_value(&detail).expect("serialize");
        assert_eq!(json["type"], "module_not_found");
        assert_eq!(json["kind"], "package");
    }
}
