//! Slack computation and critical path extraction.

use crate::error::ScheduleError;
use crate::graph::TaskGraph;
use crate::interner::TaskIdx;
use crate::models::{ScheduledTask, TaskTiming, TimeUnits};
use crate::{log_changes, log_checks};

/// Slack figures for one task.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TaskSlack {
    /// Total float: latest_start - earliest_start.
    pub slack: TimeUnits,
    /// Free float: earliest dependent start (or own latest finish for leaves) - earliest_finish.
    pub free_slack: TimeUnits,
    pub is_critical: bool,
}

/// Derive slack for every task from completed forward and backward passes.
///
/// # Errors
/// * `NegativeSlack` if any task's latest start precedes its earliest start
pub fn extract_slack(
    graph: &TaskGraph,
    timings: &[TaskTiming],
    verbosity: u8,
) -> Result<Vec<TaskSlack>, ScheduleError> {
    let mut result = Vec::with_capacity(timings.len());
    let mut critical_count = 0usize;

    for (idx, timing) in timings.iter().enumerate() {
        let overflow = || ScheduleError::TimeOverflow(graph.task_id(idx).to_string());
        let slack = timing.slack().ok_or_else(overflow)?;
        if slack < 0 {
            return Err(ScheduleError::NegativeSlack(graph.task_id(idx).to_string()));
        }

        let free_slack = graph
            .dependents(idx)
            .iter()
            .map(|&dependent| timings[dependent].earliest_start)
            .min()
            .unwrap_or(timing.latest_finish)
            .checked_sub(timing.earliest_finish)
            .ok_or_else(overflow)?;

        let is_critical = timing.is_critical();
        if is_critical {
            critical_count += 1;
        }
        log_checks!(
            verbosity,
            "  {}: slack={} free_slack={} critical={}",
            graph.task_id(idx),
            slack,
            free_slack,
            is_critical
        );

        result.push(TaskSlack {
            slack,
            free_slack,
            is_critical,
        });
    }

    log_changes!(
        verbosity,
        "Critical path: {} of {} tasks have zero slack",
        critical_count,
        timings.len()
    );

    Ok(result)
}

/// Reconstruct one ordered critical chain.
///
/// Starts from the critical leaf with the latest earliest finish (first in
/// presentation order on ties) and follows tight dependency edges
/// (`dependency.earliest_finish == task.earliest_start`) through critical
/// dependencies back to a root. Returned root first.
pub fn critical_chain(tasks: &[ScheduledTask], dependencies: &[Vec<TaskIdx>]) -> Vec<TaskIdx> {
    let mut has_dependents = vec![false; tasks.len()];
    for deps in dependencies {
        for &dep in deps {
            has_dependents[dep] = true;
        }
    }

    let mut best: Option<TaskIdx> = None;
    for (idx, task) in tasks.iter().enumerate() {
        if !task.is_critical || has_dependents[idx] {
            continue;
        }
        match best {
            Some(current) if tasks[current].earliest_finish >= task.earliest_finish => {}
            _ => best = Some(idx),
        }
    }

    let mut chain = Vec::new();
    let mut next = best;
    while let Some(idx) = next {
        chain.push(idx);
        let start = tasks[idx].earliest_start;
        next = dependencies[idx]
            .iter()
            .copied()
            .find(|&dep| tasks[dep].is_critical && tasks[dep].earliest_finish == start);
    }

    chain.reverse();
    chain
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backward_pass::{backward_pass, resolve_project_end};
    use crate::config::ScheduleConfig;
    use crate::forward_pass::forward_pass;
    use crate::models::{ProjectWindow, Task};

    fn make_task(id: &str, duration: TimeUnits, deps: Vec<&str>) -> Task {
        Task::new(id, duration, deps.into_iter().map(str::to_string).collect())
    }

    fn run(tasks: &[Task], window: ProjectWindow) -> Result<Vec<TaskSlack>, ScheduleError> {
        let graph = TaskGraph::build(tasks, &ScheduleConfig::default())?;
        let start = window.start.unwrap_or(0);
        let mut timings = forward_pass(&graph, start, 0)?;
        let end = resolve_project_end(&graph, &window, start, &timings)?;
        backward_pass(&graph, &mut timings, end, 0)?;
        extract_slack(&graph, &timings, 0)
    }

    fn scheduled(id: &str, es: TimeUnits, ef: TimeUnits, critical: bool) -> ScheduledTask {
        ScheduledTask {
            task_id: id.to_string(),
            duration: ef - es,
            earliest_start: es,
            earliest_finish: ef,
            latest_start: es,
            latest_finish: ef,
            slack: 0,
            free_slack: 0,
            is_critical: critical,
        }
    }

    #[test]
    fn test_parallel_branches_slack() {
        let tasks = vec![
            make_task("a", 5, vec![]),
            make_task("b", 2, vec!["a"]),
            make_task("c", 6, vec!["a"]),
            make_task("d", 1, vec!["b", "c"]),
        ];
        let slack = run(&tasks, ProjectWindow::starting_at(0)).unwrap();
        assert!(slack[0].is_critical);
        assert_eq!(slack[1].slack, 4);
        assert_eq!(slack[1].free_slack, 4);
        assert!(!slack[1].is_critical);
        assert!(slack[2].is_critical);
        assert!(slack[3].is_critical);
    }

    #[test]
    fn test_free_slack_smaller_than_total_slack() {
        // b and x feed c beside the long task a; b already gates c, x can slip 1
        // before c moves, and the b -> c chain together can slip 5
        let tasks = vec![
            make_task("a", 10, vec![]),
            make_task("b", 2, vec![]),
            make_task("x", 1, vec![]),
            make_task("c", 3, vec!["b", "x"]),
        ];
        let slack = run(&tasks, ProjectWindow::starting_at(0)).unwrap();
        assert_eq!(slack[1].slack, 5);
        assert_eq!(slack[1].free_slack, 0);
        assert_eq!(slack[2].slack, 6);
        assert_eq!(slack[2].free_slack, 1);
        assert_eq!(slack[3].free_slack, 5);
    }

    #[test]
    fn test_negative_slack_from_leaf_bound() {
        let tasks = vec![
            make_task("a", 2, vec![]),
            make_task("b", 3, vec!["a"]).with_latest_finish(4),
        ];
        assert_eq!(
            run(&tasks, ProjectWindow::new(0, 10)).unwrap_err(),
            ScheduleError::NegativeSlack("a".to_string())
        );
    }

    #[test]
    fn test_critical_chain_follows_tight_edges() {
        // a -> c -> d critical; b beside c has slack
        let tasks = vec![
            scheduled("a", 0, 5, true),
            scheduled("b", 5, 7, false),
            scheduled("c", 5, 11, true),
            scheduled("d", 11, 12, true),
        ];
        let deps = vec![vec![], vec![0], vec![0], vec![1, 2]];
        assert_eq!(critical_chain(&tasks, &deps), vec![0, 2, 3]);
    }

    #[test]
    fn test_critical_chain_prefers_latest_finish() {
        // Two disjoint critical chains; the longer one wins
        let tasks = vec![
            scheduled("p", 0, 3, true),
            scheduled("q", 0, 2, true),
            scheduled("r", 2, 8, true),
        ];
        let deps = vec![vec![], vec![], vec![1]];
        assert_eq!(critical_chain(&tasks, &deps), vec![1, 2]);
    }

    #[test]
    fn test_critical_chain_ends_at_milestone_leaf() {
        // done is a zero-length milestone finishing together with a
        let tasks = vec![scheduled("a", 0, 3, true), scheduled("done", 3, 3, true)];
        let deps = vec![vec![], vec![0]];
        assert_eq!(critical_chain(&tasks, &deps), vec![0, 1]);
    }

    #[test]
    fn test_slack_overflow_is_reported() {
        let tasks = vec![
            make_task("a", 0, vec![]).with_earliest_start(TimeUnits::MIN),
            make_task("b", 10, vec![]).with_earliest_start(0),
        ];
        assert_eq!(
            run(&tasks, ProjectWindow::starting_at(TimeUnits::MIN)).unwrap_err(),
            ScheduleError::TimeOverflow("a".to_string())
        );
    }

    #[test]
    fn test_critical_chain_empty_without_critical_tasks() {
        let tasks = vec![scheduled("a", 0, 1, false)];
        assert!(critical_chain(&tasks, &[vec![]]).is_empty());
    }
}
