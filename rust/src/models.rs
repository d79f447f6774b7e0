//! Core data types for the scheduling engine.

use rustc_hash::FxHashMap;

/// Abstract time quantity used for both instants and durations.
///
/// The unit is whatever the caller uses consistently (days, milliseconds, ...).
pub type TimeUnits = i64;

/// A task to be scheduled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Task {
    pub id: String,
    pub duration: TimeUnits,
    /// Ids of tasks that must finish before this task may start.
    pub dependencies: Vec<String>,
    /// Earliest allowed start; only consulted when the task has no dependencies.
    pub earliest_start_bound: Option<TimeUnits>,
    /// Deadline; only consulted when no other task depends on this one.
    pub latest_finish_bound: Option<TimeUnits>,
}

impl Task {
    /// Create an unbounded task.
    pub fn new(id: impl Into<String>, duration: TimeUnits, dependencies: Vec<String>) -> Self {
        Self {
            id: id.into(),
            duration,
            dependencies,
            earliest_start_bound: None,
            latest_finish_bound: None,
        }
    }

    pub fn with_earliest_start(mut self, bound: TimeUnits) -> Self {
        self.earliest_start_bound = Some(bound);
        self
    }

    pub fn with_latest_finish(mut self, bound: TimeUnits) -> Self {
        self.latest_finish_bound = Some(bound);
        self
    }
}

/// Project-level start and completion instants.
///
/// Either side may be omitted, in which case it is derived from the task set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProjectWindow {
    pub start: Option<TimeUnits>,
    pub end: Option<TimeUnits>,
}

impl ProjectWindow {
    pub fn new(start: TimeUnits, end: TimeUnits) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn starting_at(start: TimeUnits) -> Self {
        Self {
            start: Some(start),
            end: None,
        }
    }
}

/// Timing results for one task.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduledTask {
    pub task_id: String,
    pub duration: TimeUnits,
    pub earliest_start: TimeUnits,
    pub earliest_finish: TimeUnits,
    pub latest_start: TimeUnits,
    pub latest_finish: TimeUnits,
    /// Total float: `latest_start - earliest_start`.
    pub slack: TimeUnits,
    /// Delay absorbable without moving any dependent's earliest start.
    pub free_slack: TimeUnits,
    pub is_critical: bool,
}

/// Result of one schedule computation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduleReport {
    /// One entry per input task, in input order.
    pub tasks: Vec<ScheduledTask>,
    pub project_start: TimeUnits,
    pub project_end: TimeUnits,
    /// Length of the longest dependency chain (largest earliest finish minus project start).
    pub makespan: TimeUnits,
    /// Sum of all task durations.
    pub total_work: TimeUnits,
    /// Dependency positions per task, aligned with `tasks`; used for chain reconstruction.
    pub(crate) dependencies: Vec<Vec<usize>>,
    pub(crate) positions: FxHashMap<String, usize>,
}

impl ScheduleReport {
    /// Look up a task's timings by id.
    pub fn get(&self, task_id: &str) -> Option<&ScheduledTask> {
        self.positions.get(task_id).map(|&idx| &self.tasks[idx])
    }

    /// Ids of all zero-slack tasks, in input order.
    pub fn critical_tasks(&self) -> Vec<&str> {
        self.tasks
            .iter()
            .filter(|t| t.is_critical)
            .map(|t| t.task_id.as_str())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Per-task timing annotations produced by the forward and backward passes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TaskTiming {
    /// Earliest possible start time (from forward pass).
    pub earliest_start: TimeUnits,
    /// Earliest possible finish time (from forward pass).
    pub earliest_finish: TimeUnits,
    /// Latest allowable start time (from backward pass).
    pub latest_start: TimeUnits,
    /// Latest allowable finish time (from backward pass).
    pub latest_finish: TimeUnits,
}

impl TaskTiming {
    /// Slack = latest_start - earliest_start, or `None` if it does not fit in `TimeUnits`.
    pub fn slack(&self) -> Option<TimeUnits> {
        self.latest_start.checked_sub(self.earliest_start)
    }

    pub fn is_critical(&self) -> bool {
        self.slack() == Some(0)
    }
}
