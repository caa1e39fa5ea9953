//! Host-facing reporter: lifecycle state machine plus report emission.
//!
//! The host drives a [`FriendlyReporter`] with three events:
//!
//! ```text
//!            Invalidated            AfterCompile             Done
//!   Idle ───────────────▶ Compiling ─────────────▶ Reporting ─────▶ Idle
//! ```
//!
//! Hosts do not always send every event (the first build has no
//! invalidation), so each event is accepted from any state. All mutable
//! bookkeeping lives in the instance; two reporters never share state.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::clock::CompileClock;
use crate::config::ReporterConfig;
use crate::domain::{BuildOutcome, EnrichedError, Level, RawError, Result};
use crate::format::Formatter;
use crate::obs::{self, ReportSpan};
use crate::output::OutputSink;
use crate::pipeline::{DiagnosticPipeline, Processed};
use crate::report::Report;
use crate::transform::Transformer;

/// Callback receiving the diagnostics that made it into a report.
pub type ErrorCallback = Box<dyn Fn(Level, &[EnrichedError]) + Send + Sync>;

/// Where the reporter is in the host's build cycle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    Idle,
    Compiling,
    Reporting,
}

impl LifecycleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleState::Idle => "idle",
            LifecycleState::Compiling => "compiling",
            LifecycleState::Reporting => "reporting",
        }
    }
}

/// Lifecycle events delivered by the host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HostEvent {
    /// Sources changed; a new compilation is starting.
    Invalidated,

    /// The compilation pass finished; results are being sealed.
    AfterCompile,

    /// Results are available.
    Done { outcome: BuildOutcome },
}

impl HostEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            HostEvent::Invalidated => "invalidated",
            HostEvent::AfterCompile => "after_compile",
            HostEvent::Done { .. } => "done",
        }
    }
}

/// Builder for [`FriendlyReporter`].
pub struct ReporterBuilder {
    config: ReporterConfig,
    project_root: PathBuf,
    transformers: Vec<Box<dyn Transformer>>,
    formatters: Vec<Box<dyn Formatter>>,
    on_errors: Option<ErrorCallback>,
}

impl Default for ReporterBuilder {
    fn default() -> Self {
        Self {
            config: ReporterConfig::default(),
            project_root: PathBuf::from("."),
            transformers: Vec::new(),
            formatters: Vec::new(),
            on_errors: None,
        }
    }
}

impl ReporterBuilder {
    pub fn config(mut self, config: ReporterConfig) -> Self {
        self.config = config;
        self
    }

    /// Directory used to detect the package manager.
    pub fn project_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.project_root = root.into();
        self
    }

    /// Append a transformer after the built-ins.
    pub fn additional_transformer(mut self, transformer: impl Transformer + 'static) -> Self {
        self.transformers.push(Box::new(transformer));
        self
    }

    /// Append a formatter after the built-ins.
    pub fn additional_formatter(mut self, formatter: impl Formatter + 'static) -> Self {
        self.formatters.push(Box::new(formatter));
        self
    }

    pub fn on_errors(
        mut self,
        callback: impl Fn(Level, &[EnrichedError]) + Send + Sync + 'static,
    ) -> Self {
        self.on_errors = Some(Box::new(callback));
        self
    }

    pub fn build<S: OutputSink>(self, sink: S) -> FriendlyReporter<S> {
        let package_manager = self.config.resolved_package_manager(&self.project_root);
        debug!(package_manager = ?package_manager, "building reporter");
        FriendlyReporter {
            pipeline: DiagnosticPipeline::with_additional(
                package_manager,
                self.transformers,
                self.formatters,
            ),
            config: self.config,
            on_errors: self.on_errors,
            sink,
            clock: CompileClock::new(),
            state: LifecycleState::Idle,
            reports: 0,
        }
    }
}

/// Turns host build events into console reports.
pub struct FriendlyReporter<S: OutputSink> {
    config: ReporterConfig,
    pipeline: DiagnosticPipeline,
    on_errors: Option<ErrorCallback>,
    sink: S,
    clock: CompileClock,
    state: LifecycleState,
    reports: u64,
}

impl FriendlyReporter<crate::output::MemorySink> {
    /// Reporter with default config writing to memory.
    pub fn in_memory() -> Self {
        ReporterBuilder::default().build(crate::output::MemorySink::new())
    }
}

impl<S: OutputSink> FriendlyReporter<S> {
    pub fn builder() -> ReporterBuilder {
        ReporterBuilder::default()
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn config(&self) -> &ReporterConfig {
        &self.config
    }

    pub fn pipeline(&self) -> &DiagnosticPipeline {
        &self.pipeline
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    fn transition(&mut self, to: LifecycleState, trigger: &str) {
        obs::emit_lifecycle_transition(self.state.as_str(), to.as_str(), trigger);
        self.state = to;
    }

    fn clear_console(&mut self) -> Result<()> {
        if self.config.clear_console {
            self.sink.clear()?;
        }
        Ok(())
    }

    /// Dispatch a host event. Returns the report written, if any.
    pub fn handle(&mut self, event: HostEvent) -> Result<Option<Report>> {
        match event {
            HostEvent::Invalidated => self.on_invalidated().map(Some),
            HostEvent::AfterCompile => {
                self.on_after_compile();
                Ok(None)
            }
            HostEvent::Done { outcome } => self.on_done(&outcome).map(Some),
        }
    }

    /// Decode one JSON host event and dispatch it.
    pub fn handle_json(&mut self, event: &str) -> Result<Option<Report>> {
        let event: HostEvent = serde_json::from_str(event)?;
        self.handle(event)
    }

    /// Clear and announce a new compilation.
    pub fn on_invalidated(&mut self) -> Result<Report> {
        self.transition(LifecycleState::Compiling, "invalidated");
        self.clear_console()?;
        let report = Report::compiling();
        report.write_to(&mut self.sink)?;
        Ok(report)
    }

    /// Mark the compilation pass finished. Prints nothing.
    pub fn on_after_compile(&mut self) {
        self.transition(LifecycleState::Reporting, "after_compile");
    }

    /// Build and write the report for `outcome`.
    ///
    /// Errors win over warnings; success is reported only when there are
    /// neither.
    pub fn on_done(&mut self, outcome: &BuildOutcome) -> Result<Report> {
        self.reports += 1;
        let _span = ReportSpan::enter(self.reports);
        self.transition(LifecycleState::Reporting, "done");

        let result = self.report(outcome);
        self.transition(LifecycleState::Idle, "report_written");
        result
    }

    fn report(&mut self, outcome: &BuildOutcome) -> Result<Report> {
        self.clear_console()?;
        let elapsed_ms = self.clock.elapsed_ms(outcome);

        let processed = if outcome.has_errors() {
            self.diagnostics(outcome.errors(), Level::Error)
        } else if outcome.has_warnings() {
            self.diagnostics(outcome.warnings(), Level::Warning)
        } else {
            let report =
                Report::success(elapsed_ms, self.config.compilation_success_info.as_ref());
            Processed {
                total: 0,
                top: Vec::new(),
                report,
            }
        };

        processed.report.write_to(&mut self.sink)?;
        obs::emit_report_rendered(
            &processed.report.title.plain(),
            processed.top.len(),
            processed.total,
        );
        Ok(processed.report)
    }

    fn diagnostics(&self, raw: Vec<RawError>, level: Level) -> Processed {
        let processed = self.pipeline.process(raw, level);
        if let Some(callback) = &self.on_errors {
            callback(level, &processed.top);
        }
        processed
    }
}
