//! Forward pass: earliest start and finish times.

use crate::error::ScheduleError;
use crate::graph::TaskGraph;
use crate::models::{ProjectWindow, TaskTiming, TimeUnits};
use crate::{log_changes, log_checks, log_debug};

/// Resolve the project start instant `T0`.
///
/// Uses the explicit window start when given, otherwise the smallest start
/// bound carried by a root task, otherwise zero.
pub fn resolve_project_start(graph: &TaskGraph, window: &ProjectWindow) -> TimeUnits {
    if let Some(start) = window.start {
        return start;
    }
    (0..graph.len())
        .filter(|&idx| graph.is_root(idx))
        .filter_map(|idx| graph.start_bounds[idx])
        .min()
        .unwrap_or(0)
}

/// Compute earliest start/finish for every task, in topological order.
///
/// Returned timings are indexed by task position; latest times are left at
/// zero for the backward pass to fill in.
///
/// # Errors
/// * `TimeOverflow` if a finish instant does not fit in `TimeUnits`
pub fn forward_pass(
    graph: &TaskGraph,
    project_start: TimeUnits,
    verbosity: u8,
) -> Result<Vec<TaskTiming>, ScheduleError> {
    let mut timings = vec![TaskTiming::default(); graph.len()];

    for &idx in graph.topo_order() {
        let earliest_start = if graph.is_root(idx) {
            let start = match graph.start_bounds[idx] {
                Some(bound) => project_start.max(bound),
                None => project_start,
            };
            log_checks!(
                verbosity,
                "  Root {} anchored at {}",
                graph.task_id(idx),
                start
            );
            start
        } else {
            // Every dependency precedes idx in topological order, so its finish is final
            let mut start = TimeUnits::MIN;
            for &dep in graph.dependencies(idx) {
                let dep_finish = timings[dep].earliest_finish;
                log_debug!(
                    verbosity,
                    "    {} <- {} finishes at {}",
                    graph.task_id(idx),
                    graph.task_id(dep),
                    dep_finish
                );
                start = start.max(dep_finish);
            }
            start
        };

        let earliest_finish = earliest_start
            .checked_add(graph.durations[idx])
            .ok_or_else(|| ScheduleError::TimeOverflow(graph.task_id(idx).to_string()))?;

        timings[idx] = TaskTiming {
            earliest_start,
            earliest_finish,
            latest_start: 0,  // Will be filled in backward pass
            latest_finish: 0, // Will be filled in backward pass
        };
    }

    log_changes!(
        verbosity,
        "Forward pass complete: latest earliest finish {:?}",
        timings.iter().map(|t| t.earliest_finish).max()
    );

    Ok(timings)
}
