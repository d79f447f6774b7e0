//! Backward pass: latest start and finish times.

use crate::error::ScheduleError;
use crate::graph::TaskGraph;
use crate::models::{ProjectWindow, TaskTiming, TimeUnits};
use crate::{log_changes, log_checks, log_debug};

/// Resolve the project completion instant `Tend`.
///
/// An explicit window end must not precede the largest earliest finish. When
/// omitted, the end is the later of the largest earliest finish and the
/// largest deadline carried by a leaf task.
///
/// # Errors
/// * `InfeasibleDeadline` if the explicit end is earlier than the largest earliest finish
pub fn resolve_project_end(
    graph: &TaskGraph,
    window: &ProjectWindow,
    project_start: TimeUnits,
    timings: &[TaskTiming],
) -> Result<TimeUnits, ScheduleError> {
    let Some(earliest_finish) = timings.iter().map(|t| t.earliest_finish).max() else {
        return Ok(window.end.unwrap_or(project_start));
    };

    match window.end {
        Some(deadline) if deadline < earliest_finish => Err(ScheduleError::InfeasibleDeadline {
            deadline,
            earliest_finish,
        }),
        Some(deadline) => Ok(deadline),
        None => Ok((0..graph.len())
            .filter(|&idx| graph.is_leaf(idx))
            .filter_map(|idx| graph.finish_bounds[idx])
            .fold(earliest_finish, TimeUnits::max)),
    }
}

/// Fill in latest start/finish for every task, in reverse topological order.
///
/// `timings` must come from the forward pass over the same graph.
///
/// # Errors
/// * `TimeOverflow` if a start instant does not fit in `TimeUnits`
pub fn backward_pass(
    graph: &TaskGraph,
    timings: &mut [TaskTiming],
    project_end: TimeUnits,
    verbosity: u8,
) -> Result<(), ScheduleError> {
    for &idx in graph.topo_order().iter().rev() {
        let latest_finish = if graph.is_leaf(idx) {
            let finish = match graph.finish_bounds[idx] {
                Some(bound) => project_end.min(bound),
                None => project_end,
            };
            log_checks!(
                verbosity,
                "  Leaf {} must finish by {}",
                graph.task_id(idx),
                finish
            );
            finish
        } else {
            // Every dependent follows idx in topological order, so its start is final
            let mut finish = TimeUnits::MAX;
            for &dependent in graph.dependents(idx) {
                let required_finish = timings[dependent].latest_start;
                log_debug!(
                    verbosity,
                    "    {} -> {} must start by {}",
                    graph.task_id(idx),
                    graph.task_id(dependent),
                    required_finish
                );
                finish = finish.min(required_finish);
            }
            finish
        };

        let latest_start = latest_finish
            .checked_sub(graph.durations[idx])
            .ok_or_else(|| ScheduleError::TimeOverflow(graph.task_id(idx).to_string()))?;

        let timing = &mut timings[idx];
        timing.latest_finish = latest_finish;
        timing.latest_start = latest_start;
    }

    log_changes!(
        verbosity,
        "Backward pass complete: anchored at project end {}",
        project_end
    );

    Ok(())
}
