//! Configuration types for the scheduling engine.

use crate::logging::VERBOSITY_SILENT;

/// Configuration for one schedule computation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduleConfig {
    /// Verbosity level: 0=silent, 1=changes, 2=checks, 3=debug.
    pub verbosity: u8,
    /// Upper bound on the number of tasks accepted (None = unlimited).
    pub max_tasks: Option<usize>,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            verbosity: VERBOSITY_SILENT,
            max_tasks: None,
        }
    }
}

impl ScheduleConfig {
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn with_max_tasks(mut self, max_tasks: usize) -> Self {
        self.max_tasks = Some(max_tasks);
        self
    }
}
