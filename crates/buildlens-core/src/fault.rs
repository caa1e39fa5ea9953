//! Containment for caller-supplied rules.
//!
//! A transformer or formatter that panics must only cost the record it was
//! handling, never the whole report.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// Run `f`, turning a panic into its message.
pub(crate) fn contain<T>(f: impl FnOnce() -> T) -> Result<T, String> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| describe(payload.as_ref()))
}

fn describe(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contain_ok() {
        assert_eq!(contain(|| 7), Ok(7));
    }

    #[test]
    fn test_contain_panic_str() {
        let result: Result<(), String> = contain(|| panic!("boom"));
        assert_eq!(result, Err("boom".to_string()));
    }

    #[test]
    fn test_contain_panic_string() {
        let result: Result<(), String> = contain(|| panic!("bad index {}", 3));
        assert_eq!(result, Err("bad index 3".to_string()));
    }
}
