//! Removal of repeated diagnostics.
//!
//! Multi-target builds that share a module report the same failure once per
//! target; only the first copy is kept.

use std::collections::HashSet;

use crate::domain::RawError;

/// Drop records whose message was already seen. Stable: first occurrence wins.
pub fn dedupe(records: Vec<RawError>) -> Vec<RawError> {
    dedupe_by(records, |r| r.message.clone())
}

/// Drop records whose key was already seen.
pub fn dedupe_by<T, K, F>(records: Vec<T>, mut key: F) -> Vec<T>
where
    K: Eq + std::hash::Hash,
    F: FnMut(&T) -> K,
{
    let mut seen = HashSet::new();
    records.into_iter().filter(|r| seen.insert(key(r))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(records: &[RawError]) -> Vec<&str> {
        records.iter().map(|r| r.message.as_str()).collect()
    }

    #[test]
    fn test_dedupe_empty() {
        assert!(dedupe(Vec::new()).is_empty());
    }

    #[test]
    fn test_dedupe_keeps_first_occurrence() {
        let records = vec![
            RawError::new("a").with_file("./first.js"),
            RawError::new("b"),
            RawError::new("a").with_file("./second.js"),
            RawError::new("c"),
            RawError::new("b"),
        ];
        let out = dedupe(records);
        assert_eq!(messages(&out), vec!["a", "b", "c"]);
        assert_eq!(out[0].file.as_deref(), Some("./first.js"));
    }

    #[test]
    fn test_dedupe_is_exact_match() {
        let records = vec![
            RawError::new("line one\nline two"),
            RawError::new("line one\nline two "),
            RawError::new("line one\r\nline two"),
            RawError::new("line one\nline two"),
        ];
        assert_eq!(dedupe(records).len(), 3);
    }

    #[test]
    fn test_dedupe_output_is_subsequence_without_repeats() {
        let input: Vec<RawError> = ["x", "y", "x", "z", "y", "x", "w"]
            .iter()
            .map(|m| RawError::new(*m))
            .collect();
        let out = dedupe(input.clone());

        assert!(out.len() <= input.len());
        let mut cursor = input.iter();
        for kept in &out {
            assert!(cursor.any(|r| r == kept), "output must be a subsequence");
        }
        let unique: HashSet<&str> = out.iter().map(|r| r.message.as_str()).collect();
        assert_eq!(unique.len(), out.len());
    }
}
