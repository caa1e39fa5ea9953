//! Unresolved imports.
//!
//! Recognizes `Module not found: Error: Can't resolve '<request>' in '<dir>'`
//! (and the older `Cannot resolve module '<request>'`), recording the specifier
//! and whether it names a package or a relative path.

use std::sync::OnceLock;

use regex::Regex;

use crate::domain::{EnrichedError, ErrorDetail, ModuleKind, RawError};
use crate::severity;
use crate::transform::Transformer;

pub const NAME: &str = "module-not-found";

static CANT_RESOLVE: OnceLock<Option<Regex>> = OnceLock::new();
fn cant_resolve() -> Option<&'static Regex> {
    CANT_RESOLVE
        .get_or_init(|| Regex::new(r"(?:Can't|Cannot) resolve (?:module )?'([^']+)'").ok())
        .as_ref()
}

/// Recognizes module resolution failures.
pub struct ModuleNotFoundTransformer;

impl ModuleNotFoundTransformer {
    fn matches(raw: &RawError) -> bool {
        raw.is_named("ModuleNotFoundError") || raw.message.trim_start().starts_with("Module not found")
    }

    fn specifier(raw: &RawError) -> Option<String> {
        let from_message = cant_resolve()
            .and_then(|re| re.captures(&raw.message))
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string());

        from_message
            .or_else(|| raw.dependencies.iter().find_map(|d| d.request.clone()))
            .filter(|s| !s.trim().is_empty())
    }
}

impl Transformer for ModuleNotFoundTransformer {
    fn name(&self) -> &str {
        NAME
    }

    fn transform(&self, raw: &RawError) -> Option<EnrichedError> {
        if !Self::matches(raw) {
            return None;
        }
        let module = Self::specifier(raw)?;
        let kind = ModuleKind::of(&module);

        Some(
            EnrichedError::new(NAME, format!("Module not found {module}"), severity::MODULE_NOT_FOUND)
                .with_raw_context(raw)
                .with_detail(ErrorDetail::ModuleNotFound { module, kind }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn not_found(specifier: &str) -> RawError {
        RawError::new(format!(
            "Module not found: Error: Can't resolve '{specifier}' in '/home/dev/app'"
        ))
        .with_name("ModuleNotFoundError")
        .with_file("./index.js")
    }

    #[test]
    fn test_package_specifier() {
        let enriched = ModuleNotFoundTransformer
            .transform(&not_found("not-found"))
            .expect("should match");
        assert_eq!(enriched.name, NAME);
        assert_eq!(enriched.severity, severity::MODULE_NOT_FOUND);
        assert_eq!(enriched.message, "Module not found not-found");
        assert_eq!(enriched.file.as_deref(), Some("./index.js"));
        assert_eq!(
            enriched.detail,
            ErrorDetail::ModuleNotFound {
                module: "not-found".to_string(),
                kind: ModuleKind::Package,
            }
        );
    }

    #[test]
    fn test_relative_specifier() {
        let enriched = ModuleNotFoundTransformer
            .transform(&not_found("../non-existing"))
            .expect("should match");
        assert!(matches!(
            enriched.detail,
            ErrorDetail::ModuleNotFound { kind: ModuleKind::Relative, .. }
        ));
    }

    #[test]
    fn test_legacy_message_shape() {
        let raw = RawError::new("Module not found: Error: Cannot resolve module 'react-dom' in /app");
        let enriched = ModuleNotFoundTransformer.transform(&raw).expect("should match");
        assert_eq!(enriched.message, "Module not found react-dom");
    }

    #[test]
    fn test_falls_back_to_dependency_request() {
        let raw = RawError::new("Module not found: something odd happened")
            .with_dependency("./missing-style.css");
        let enriched = ModuleNotFoundTransformer.transform(&raw).expect("should match");
        assert!(matches!(
            enriched.detail,
            ErrorDetail::ModuleNotFound { ref module, kind: ModuleKind::Relative } if module == "./missing-style.css"
        ));
    }

    #[test]
    fn test_declines_without_specifier() {
        let raw = RawError::new("Module not found: no details").with_name("ModuleNotFoundError");
        assert!(ModuleNotFoundTransformer.transform(&raw).is_none());
    }

    #[test]
    fn test_declines_other_messages() {
        assert!(ModuleNotFoundTransformer
            .transform(&RawError::new("Can't resolve 'x' somewhere else"))
            .is_none());
    }
}
