//! Classification of raw diagnostics.
//!
//! A [`TransformerChain`] tries each [`Transformer`] in order and keeps the
//! first record produced. Built-ins come first (syntax-error,
//! module-not-found, lint); caller additions are appended after them and so
//! only see records no built-in claimed. When every transformer declines the
//! record becomes `generic` at [`crate::severity::GENERIC`].

pub mod lint;
pub mod module_not_found;
pub mod syntax;

pub use lint::LintTransformer;
pub use module_not_found::ModuleNotFoundTransformer;
pub use syntax::SyntaxErrorTransformer;

use crate::domain::{EnrichedError, RawError};
use crate::fault::contain;
use crate::obs;

/// Recognizes one class of raw diagnostic.
///
/// Implementations must decline (`None`) rather than panic on input they
/// cannot parse. They always receive the original [`RawError`].
pub trait Transformer: Send + Sync {
    /// Identifier used in logs.
    fn name(&self) -> &str;

    fn transform(&self, raw: &RawError) -> Option<EnrichedError>;
}

/// A [`Transformer`] backed by a closure.
pub struct FnTransformer<F> {
    name: String,
    f: F,
}

impl<F> FnTransformer<F>
where
    F: Fn(&RawError) -> Option<EnrichedError> + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> Transformer for FnTransformer<F>
where
    F: Fn(&RawError) -> Option<EnrichedError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn transform(&self, raw: &RawError) -> Option<EnrichedError> {
        (self.f)(raw)
    }
}

/// The built-in transformers in match-priority order.
pub fn builtin_transformers() -> Vec<Box<dyn Transformer>> {
    vec![
        Box::new(SyntaxErrorTransformer),
        Box::new(ModuleNotFoundTransformer),
        Box::new(LintTransformer),
    ]
}

/// Ordered, append-only list of transformers.
pub struct TransformerChain {
    transformers: Vec<Box<dyn Transformer>>,
}

impl Default for TransformerChain {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TransformerChain {
    /// Chain with the built-ins only.
    pub fn builtin() -> Self {
        Self {
            transformers: builtin_transformers(),
        }
    }

    /// Chain with no transformers; everything classifies as generic.
    pub fn empty() -> Self {
        Self {
            transformers: Vec::new(),
        }
    }

    /// Append caller transformers after the existing ones.
    pub fn with_additional(
        mut self,
        additional: impl IntoIterator<Item = Box<dyn Transformer>>,
    ) -> Self {
        self.transformers.extend(additional);
        self
    }

    /// Transformer names in match order.
    pub fn names(&self) -> Vec<&str> {
        self.transformers.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.transformers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transformers.is_empty()
    }

    /// Classify one record. Always returns exactly one record.
    ///
    /// A transformer that panics or returns a malformed record (zero
    /// severity, blank name) ends the scan and the record is classified
    /// generic.
    pub fn classify(&self, raw: &RawError) -> EnrichedError {
        for transformer in &self.transformers {
            match contain(|| transformer.transform(raw)) {
                Ok(None) => continue,
                Ok(Some(enriched)) if enriched.is_well_formed() => return enriched,
                Ok(Some(enriched)) => {
                    obs::emit_transformer_fault(
                        transformer.name(),
                        &format!(
                            "malformed record (name={:?}, severity={})",
                            enriched.name, enriched.severity
                        ),
                    );
                    return EnrichedError::generic(raw);
                }
                Err(panic) => {
                    obs::emit_transformer_fault(transformer.name(), &panic);
                    return EnrichedError::generic(raw);
                }
            }
        }
        EnrichedError::generic(raw)
    }

    /// Classify every record, preserving order.
    pub fn classify_all(&self, raws: &[RawError]) -> Vec<EnrichedError> {
        raws.iter().map(|raw| self.classify(raw)).collect()
    }
}
