//! Buildlens Core Library
//!
//! Turns raw compiler error and warning records into a short, prioritized
//! console report: dedupe, classify, keep the most severe class, render.

pub mod clock;
pub mod config;
pub mod dedupe;
pub mod domain;
mod fault;
pub mod format;
pub mod obs;
pub mod output;
pub mod pipeline;
pub mod report;
pub mod reporter;
pub mod severity;
pub mod telemetry;
pub mod transform;

pub use clock::CompileClock;
pub use config::{CompilationSuccessInfo, PackageManager, ReporterConfig, CONFIG_FILE_NAME};
pub use dedupe::dedupe;
pub use domain::{
    BuildOutcome, BuildlensError, CompilationStats, DependencyRef, EnrichedError, ErrorDetail,
    Level, LintFile, LintReport, ModuleKind, OriginTrace, RawError, Result, SourcePos, SourceSpan,
};
pub use obs::{
    emit_classified, emit_formatter_fault, emit_lifecycle_transition, emit_report_rendered,
    emit_transformer_fault, ReportSpan,
};
pub use format::{
    DefaultFormatter, FnFormatter, Formatter, FormatterChain, LintFormatter,
    ModuleNotFoundFormatter, TextBlock,
};
pub use output::{ConsoleSink, MemorySink, OutputSink};
pub use pipeline::{DiagnosticPipeline, Processed};
pub use report::{Report, Title, TitleLevel};
pub use reporter::{
    ErrorCallback, FriendlyReporter, HostEvent, LifecycleState, ReporterBuilder,
};
pub use severity::{max_severity, select_top};
pub use telemetry::init_tracing;
pub use transform::{
    FnTransformer, LintTransformer, ModuleNotFoundTransformer, SyntaxErrorTransformer,
    Transformer, TransformerChain,
};

/// Buildlens version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
