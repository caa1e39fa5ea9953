//! Severity ordering and max-severity selection.
//!
//! Severity is an open `u32` order: higher means "show this instead". The
//! built-in classes are spaced out so caller-defined classes can slot in
//! between them without renumbering.
//!
//! Canonical order: `syntax-error > module-not-found > lint > generic`.

use crate::domain::EnrichedError;

/// Parser failures. Everything downstream of one is usually noise.
pub const SYNTAX_ERROR: u32 = 1000;

/// Unresolved imports.
pub const MODULE_NOT_FOUND: u32 = 900;

/// Findings from a lint loader.
pub const LINT: u32 = 600;

/// Anything no transformer recognized.
pub const GENERIC: u32 = 1;

/// Class name given to unrecognized records.
pub const GENERIC_NAME: &str = "generic";

/// Highest severity present, 0 for an empty slice.
pub fn max_severity(records: &[EnrichedError]) -> u32 {
    records.iter().map(|r| r.severity).max().unwrap_or(0)
}

/// Keep only the records at the maximum severity, in their original order.
pub fn select_top(records: Vec<EnrichedError>) -> Vec<EnrichedError> {
    let max = max_severity(&records);
    records.into_iter().filter(|r| r.severity == max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(name: &str, severity: u32) -> EnrichedError {
        EnrichedError::new(name, format!("{name} message"), severity)
    }

    #[test]
    fn test_builtin_order() {
        assert!(SYNTAX_ERROR > MODULE_NOT_FOUND);
        assert!(MODULE_NOT_FOUND > LINT);
        assert!(LINT > GENERIC);
        assert!(GENERIC > 0);
    }

    #[test]
    fn test_select_top_empty() {
        assert_eq!(max_severity(&[]), 0);
        assert!(select_top(Vec::new()).is_empty());
    }

    #[test]
    fn test_select_top_keeps_only_max_in_order() {
        let records = vec![
            rec("a", LINT),
            rec("b", MODULE_NOT_FOUND),
            rec("c", GENERIC),
            rec("d", MODULE_NOT_FOUND),
        ];
        let top = select_top(records);
        let names: Vec<&str> = top.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["b", "d"]);
    }

    #[test]
    fn test_select_top_all_equal() {
        let records = vec![rec("a", LINT), rec("b", LINT)];
        assert_eq!(select_top(records).len(), 2);
    }

    #[test]
    fn test_custom_severity_slots_between_builtins() {
        let records = vec![rec("lint", LINT), rec("custom", 700), rec("generic", GENERIC)];
        let top = select_top(records);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].name, "custom");
    }
}
