//! Structured observability hooks for the reporting lifecycle.
//!
//! This module provides:
//! - A report-scoped tracing span via the `ReportSpan` RAII guard
//! - Emission functions for lifecycle transitions, rendered reports and
//!   contained transformer/formatter faults
//!
//! Events go through `tracing`; `telemetry::init_tracing` decides where they
//! end up (stderr, optionally JSON).

use tracing::{debug, info, warn};

/// RAII guard that enters a span for the handling of one done event.
///
/// # Example
///
/// ```ignore
/// let _span = ReportSpan::enter(3);
/// // tracing calls below carry report_seq = 3
/// ```
pub struct ReportSpan {
    _span: tracing::span::EnteredSpan,
}

impl ReportSpan {
    /// Create and enter a span tagged with the report sequence number.
    pub fn enter(report_seq: u64) -> Self {
        let span = tracing::info_span!("buildlens.report", report_seq = report_seq);
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: reporter state changed.
pub fn emit_lifecycle_transition(from: &str, to: &str, trigger: &str) {
    debug!(event = "lifecycle.transition", from = %from, to = %to, trigger = %trigger);
}

/// Emit event: a report was written.
///
/// `shown` is the number of diagnostics after severity selection, `total`
/// the number after deduplication.
pub fn emit_report_rendered(title: &str, shown: usize, total: usize) {
    info!(event = "report.rendered", title = %title, shown = shown, total = total);
}

/// Emit event: a diagnostic was classified.
pub fn emit_classified(class: &str, severity: u32) {
    debug!(event = "diagnostic.classified", class = %class, severity = severity);
}

/// Emit event: a transformer panicked or produced a malformed record.
pub fn emit_transformer_fault(transformer: &str, reason: &str) {
    warn!(event = "transformer.fault", transformer = %transformer, reason = %reason);
}

/// Emit event: a formatter panicked or rendered nothing.
pub fn emit_formatter_fault(formatter: &str, reason: &str) {
    warn!(event = "formatter.fault", formatter = %formatter, reason = %reason);
}
