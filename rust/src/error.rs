//! Error taxonomy for schedule computation.

use thiserror::Error;

use crate::models::TimeUnits;

/// Errors that can occur while scheduling a task set.
///
/// Every variant is an input-validation or infeasibility condition. The engine
/// never returns partially computed timings alongside an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Task {task_id:?} depends on unknown task {missing_id:?}")]
    UnknownDependency { task_id: String, missing_id: String },

    /// Tasks on one cycle; each entry is a dependency of the next, and the last
    /// is a dependency of the first.
    #[error("Circular dependency detected: {}", format_cycle(.0))]
    CyclicDependency(Vec<String>),

    #[error("Project deadline {deadline} precedes earliest possible finish {earliest_finish}")]
    InfeasibleDeadline {
        deadline: TimeUnits,
        earliest_finish: TimeUnits,
    },

    #[error("Negative slack on task {0:?}: deadline bounds are inconsistent")]
    NegativeSlack(String),

    #[error("Task {0:?} has a negative duration")]
    NegativeDuration(String),

    #[error("Duplicate task id {0:?}")]
    DuplicateTask(String),

    #[error("Task set of {count} exceeds the configured limit of {limit}")]
    TooManyTasks { count: usize, limit: usize },

    #[error("Time arithmetic overflowed while scheduling task {0:?}")]
    TimeOverflow(String),

    #[error("No project start date given and no task carries a start bound")]
    MissingProjectStart,
}

fn format_cycle(cycle: &[String]) -> String {
    let mut parts: Vec<&str> = cycle.iter().map(String::as_str).collect();
    if let Some(first) = cycle.first() {
        parts.push(first);
    }
    parts.join(" -> ")
}
