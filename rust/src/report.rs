//! Schedule report assembly and the end-to-end scheduling pipeline.

use crate::backward_pass::{backward_pass, resolve_project_end};
use crate::config::ScheduleConfig;
use crate::critical_path::{critical_chain, extract_slack, TaskSlack};
use crate::error::ScheduleError;
use crate::forward_pass::{forward_pass, resolve_project_start};
use crate::graph::TaskGraph;
use crate::log_changes;
use crate::models::{ProjectWindow, ScheduleReport, ScheduledTask, Task, TaskTiming, TimeUnits};

/// Run the full critical path computation over one project's task set.
///
/// This algorithm:
/// 1. Validates the task set and builds the dependency graph
/// 2. Computes earliest times in topological order
/// 3. Computes latest times in reverse topological order
/// 4. Derives slack and criticality per task
///
/// # Arguments
/// * `tasks` - Tasks to schedule; ids must be unique
/// * `window` - Project start/end instants; omitted sides are derived from the tasks
/// * `config` - Engine configuration
///
/// # Returns
/// * `Ok(ScheduleReport)` with one entry per input task, in input order
/// * `Err(ScheduleError)` on invalid input or an infeasible deadline
pub fn schedule(
    tasks: &[Task],
    window: &ProjectWindow,
    config: &ScheduleConfig,
) -> Result<ScheduleReport, ScheduleError> {
    let verbosity = config.verbosity;

    let graph = TaskGraph::build(tasks, config)?;
    let project_start = resolve_project_start(&graph, window);
    let mut timings = forward_pass(&graph, project_start, verbosity)?;
    let project_end = resolve_project_end(&graph, window, project_start, &timings)?;
    backward_pass(&graph, &mut timings, project_end, verbosity)?;
    let slack = extract_slack(&graph, &timings, verbosity)?;

    let report = assemble_report(graph, &timings, &slack, project_start, project_end)?;
    log_changes!(
        verbosity,
        "Schedule complete: {} tasks, makespan {}, window [{}, {}]",
        report.tasks.len(),
        report.makespan,
        report.project_start,
        report.project_end
    );
    Ok(report)
}

/// Assemble the report, consuming the graph.
///
/// # Errors
/// * `TimeOverflow("project")` if the makespan or total work does not fit in `TimeUnits`
fn assemble_report(
    graph: TaskGraph,
    timings: &[TaskTiming],
    slack: &[TaskSlack],
    project_start: TimeUnits,
    project_end: TimeUnits,
) -> Result<ScheduleReport, ScheduleError> {
    let overflow = || ScheduleError::TimeOverflow("project".to_string());

    let scheduled: Vec<ScheduledTask> = timings
        .iter()
        .zip(slack)
        .enumerate()
        .map(|(idx, (timing, slack))| ScheduledTask {
            task_id: graph.task_id(idx).to_string(),
            duration: graph.durations[idx],
            earliest_start: timing.earliest_start,
            earliest_finish: timing.earliest_finish,
            latest_start: timing.latest_start,
            latest_finish: timing.latest_finish,
            slack: slack.slack,
            free_slack: slack.free_slack,
            is_critical: slack.is_critical,
        })
        .collect();

    let makespan = match timings.iter().map(|t| t.earliest_finish).max() {
        Some(finish) => finish.checked_sub(project_start).ok_or_else(overflow)?,
        None => 0,
    };
    let total_work = graph
        .durations
        .iter()
        .try_fold(0, |total: TimeUnits, &duration| total.checked_add(duration))
        .ok_or_else(overflow)?;

    let TaskGraph { index, deps, .. } = graph;

    Ok(ScheduleReport {
        tasks: scheduled,
        project_start,
        project_end,
        makespan,
        total_work,
        dependencies: deps,
        positions: index.into_positions(),
    })
}

impl ScheduleReport {
    /// One ordered critical path, root first.
    ///
    /// The dependency graph may fork and rejoin, so several chains can be
    /// critical; this returns the one reaching the latest finish.
    pub fn critical_chain(&self) -> Vec<&str> {
        critical_chain(&self.tasks, &self.dependencies)
            .into_iter()
            .map(|idx| self.tasks[idx].task_id.as_str())
            .collect()
    }
}
