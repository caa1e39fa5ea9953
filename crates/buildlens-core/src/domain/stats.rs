//! Compilation results delivered by the host.

use serde::{Deserialize, Serialize};

use crate::domain::raw::RawError;

/// Result of one compilation (one build target).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CompilationStats {
    /// Epoch milliseconds.
    pub start_time: u64,

    /// Epoch milliseconds.
    pub end_time: u64,

    #[serde(default)]
    pub errors: Vec<RawError>,

    #[serde(default)]
    pub warnings: Vec<RawError>,
}

impl CompilationStats {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// `end_time - start_time`, never negative.
    pub fn elapsed_ms(&self) -> u64 {
        self.end_time.saturating_sub(self.start_time)
    }
}

/// What a done event carries: one target or several built together.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum BuildOutcome {
    Multi { stats: Vec<CompilationStats> },
    Single(CompilationStats),
}

impl BuildOutcome {
    /// Child results in host order.
    pub fn children(&self) -> &[CompilationStats] {
        match self {
            BuildOutcome::Multi { stats } => stats,
            BuildOutcome::Single(stats) => std::slice::from_ref(stats),
        }
    }

    pub fn has_errors(&self) -> bool {
        self.children().iter().any(CompilationStats::has_errors)
    }

    pub fn has_warnings(&self) -> bool {
        self.children().iter().any(CompilationStats::has_warnings)
    }

    /// All errors, children flattened in order.
    pub fn errors(&self) -> Vec<RawError> {
        self.children()
            .iter()
            .flat_map(|s| s.errors.iter().cloned())
            .collect()
    }

    /// All warnings, children flattened in order.
    pub fn warnings(&self) -> Vec<RawError> {
        self.children()
            .iter()
            .flat_map(|s| s.warnings.iter().cloned())
            .collect()
    }
}

impl From<CompilationStats> for BuildOutcome {
    fn from(stats: CompilationStats) -> Self {
        BuildOutcome::Single(stats)
    }
}
