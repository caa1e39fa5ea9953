//! Elapsed compile time across one or many build targets.

use std::collections::HashMap;

use crate::domain::BuildOutcome;

/// Per-reporter memory of each target's last end timestamp.
///
/// When only some targets of a multi-target build were rebuilt, the
/// unchanged ones report the same end timestamp as before and contribute 0,
/// so the reported time is the real rebuild time.
#[derive(Debug, Clone, Default)]
pub struct CompileClock {
    previous_end_times: HashMap<usize, u64>,
}

impl CompileClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Elapsed milliseconds for this outcome, recording end timestamps.
    pub fn elapsed_ms(&mut self, outcome: &BuildOutcome) -> u64 {
        match outcome {
            BuildOutcome::Single(stats) => stats.elapsed_ms(),
            BuildOutcome::Multi { stats } => {
                let elapsed = stats
                    .iter()
                    .enumerate()
                    .map(|(index, child)| {
                        let previous = self.previous_end_times.insert(index, child.end_time);
                        if previous == Some(child.end_time) {
                            0
                        } else {
                            child.elapsed_ms()
                        }
                    })
                    .max()
                    .unwrap_or(0);
                // Targets beyond the current count no longer exist.
                self.previous_end_times.retain(|index, _| *index < stats.len());
                elapsed
            }
        }
    }
}
