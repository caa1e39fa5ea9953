//! The diagnostic pipeline: dedupe, classify, select, render.

use crate::config::PackageManager;
use crate::dedupe::dedupe;
use crate::domain::{EnrichedError, Level, RawError};
use crate::format::{Formatter, FormatterChain};
use crate::obs;
use crate::report::Report;
use crate::severity::select_top;
use crate::transform::{Transformer, TransformerChain};

/// Result of running raw diagnostics through the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Processed {
    /// Distinct diagnostics, after deduplication.
    pub total: usize,

    /// The max-severity subset the report is built from.
    pub top: Vec<EnrichedError>,

    pub report: Report,
}

/// Immutable transformer and formatter chains, built once.
pub struct DiagnosticPipeline {
    transformers: TransformerChain,
    formatters: FormatterChain,
}

impl Default for DiagnosticPipeline {
    fn default() -> Self {
        Self::builtin(PackageManager::default())
    }
}

impl DiagnosticPipeline {
    pub fn new(transformers: TransformerChain, formatters: FormatterChain) -> Self {
        Self {
            transformers,
            formatters,
        }
    }

    /// Built-in rules only.
    pub fn builtin(package_manager: PackageManager) -> Self {
        Self::new(
            TransformerChain::builtin(),
            FormatterChain::builtin(package_manager),
        )
    }

    /// Built-ins followed by caller rules.
    pub fn with_additional(
        package_manager: PackageManager,
        transformers: Vec<Box<dyn Transformer>>,
        formatters: Vec<Box<dyn Formatter>>,
    ) -> Self {
        Self::new(
            TransformerChain::builtin().with_additional(transformers),
            FormatterChain::builtin(package_manager).with_additional(formatters),
        )
    }

    pub fn transformers(&self) -> &TransformerChain {
        &self.transformers
    }

    pub fn formatters(&self) -> &FormatterChain {
        &self.formatters
    }

    /// Deduplicate and classify.
    pub fn classify(&self, raw: Vec<RawError>) -> Vec<EnrichedError> {
        let unique = dedupe(raw);
        unique
            .iter()
            .map(|r| {
                let enriched = self.transformers.classify(r);
                obs::emit_classified(&enriched.name, enriched.severity);
                enriched
            })
            .collect()
    }

    /// Full run for one list of diagnostics.
    pub fn process(&self, raw: Vec<RawError>, level: Level) -> Processed {
        let classified = self.classify(raw);
        let total = classified.len();
        let top = select_top(classified);
        let blocks = self.formatters.render(&top, level);
        let report = Report::diagnostics(level, top.len(), blocks);
        Processed { total, top, report }
    }
}
