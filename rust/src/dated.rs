//! Calendar-date front end for the scheduling engine.
//!
//! Maps `NaiveDate` instants onto whole-day offsets from a reference date, runs
//! the engine, and maps results back. No working-day calendar is applied:
//! every day counts.

use chrono::{Days, NaiveDate};

use crate::config::ScheduleConfig;
use crate::error::ScheduleError;
use crate::models::{ProjectWindow, Task, TimeUnits};
use crate::report::schedule;

/// A task whose bounds are calendar dates and whose duration is in days.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatedTask {
    pub id: String,
    pub duration_days: i64,
    pub dependencies: Vec<String>,
    /// Earliest allowed start; only consulted when the task has no dependencies.
    pub start_after: Option<NaiveDate>,
    /// Deadline; only consulted when no other task depends on this one.
    pub end_before: Option<NaiveDate>,
}

/// A task scheduled onto calendar dates.
///
/// Finish dates are exclusive: a one-day task starting on the 3rd finishes on
/// the 4th, and a dependent may start on the 4th.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatedScheduledTask {
    pub task_id: String,
    pub earliest_start: NaiveDate,
    pub earliest_finish: NaiveDate,
    pub latest_start: NaiveDate,
    pub latest_finish: NaiveDate,
    pub slack_days: i64,
    pub free_slack_days: i64,
    pub is_critical: bool,
}

/// Result of a dated schedule computation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatedScheduleReport {
    pub tasks: Vec<DatedScheduledTask>,
    pub project_start: NaiveDate,
    pub project_end: NaiveDate,
    pub makespan_days: i64,
    /// One ordered critical path, root first.
    pub critical_chain: Vec<String>,
}

fn to_offset(reference: NaiveDate, date: NaiveDate) -> TimeUnits {
    (date - reference).num_days()
}

fn to_date(
    reference: NaiveDate,
    offset: TimeUnits,
    task_id: &str,
) -> Result<NaiveDate, ScheduleError> {
    let overflow = || ScheduleError::TimeOverflow(task_id.to_string());
    let days = Days::new(offset.unsigned_abs());
    if offset >= 0 {
        reference.checked_add_days(days).ok_or_else(overflow)
    } else {
        reference.checked_sub_days(days).ok_or_else(overflow)
    }
}

/// Schedule dated tasks.
///
/// The reference date is `project_start` when given, otherwise the earliest
/// `start_after` carried by a task with no dependencies.
///
/// # Errors
/// * `MissingProjectStart` if there is no project start and no root task carries `start_after`
/// * Any error from [`schedule`]
pub fn schedule_dated(
    tasks: &[DatedTask],
    project_start: Option<NaiveDate>,
    project_end: Option<NaiveDate>,
    config: &ScheduleConfig,
) -> Result<DatedScheduleReport, ScheduleError> {
    let reference = project_start
        .or_else(|| {
            tasks
                .iter()
                .filter(|t| t.dependencies.is_empty())
                .filter_map(|t| t.start_after)
                .min()
        })
        .ok_or(ScheduleError::MissingProjectStart)?;

    let engine_tasks: Vec<Task> = tasks
        .iter()
        .map(|t| Task {
            id: t.id.clone(),
            duration: t.duration_days,
            dependencies: t.dependencies.clone(),
            earliest_start_bound: t.start_after.map(|d| to_offset(reference, d)),
            latest_finish_bound: t.end_before.map(|d| to_offset(reference, d)),
        })
        .collect();

    let window = ProjectWindow {
        start: project_start.map(|d| to_offset(reference, d)),
        end: project_end.map(|d| to_offset(reference, d)),
    };

    let report = schedule(&engine_tasks, &window, config)?;

    let dated_tasks = report
        .tasks
        .iter()
        .map(|t| {
            let id = t.task_id.as_str();
            Ok(DatedScheduledTask {
                task_id: t.task_id.clone(),
                earliest_start: to_date(reference, t.earliest_start, id)?,
                earliest_finish: to_date(reference, t.earliest_finish, id)?,
                latest_start: to_date(reference, t.latest_start, id)?,
                latest_finish: to_date(reference, t.latest_finish, id)?,
                slack_days: t.slack,
                free_slack_days: t.free_slack,
                is_critical: t.is_critical,
            })
        })
        .collect::<Result<Vec<_>, ScheduleError>>()?;

    Ok(DatedScheduleReport {
        tasks: dated_tasks,
        project_start: to_date(reference, report.project_start, "project")?,
        project_end: to_date(reference, report.project_end, "project")?,
        makespan_days: report.makespan,
        critical_chain: report
            .critical_chain()
            .into_iter()
            .map(str::to_string)
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn make_task(id: &str, duration: i64, deps: Vec<&str>) -> DatedTask {
        DatedTask {
            id: id.to_string(),
            duration_days: duration,
            dependencies: deps.into_iter().map(str::to_string).collect(),
            start_after: None,
            end_before: None,
        }
    }

    #[test]
    fn test_linear_chain_on_dates() {
        let tasks = vec![
            make_task("a", 2, vec![]),
            make_task("b", 3, vec!["a"]),
            make_task("c", 1, vec!["b"]),
        ];
        let report = schedule_dated(
            &tasks,
            Some(date(2025, 1, 1)),
            Some(date(2025, 1, 7)),
            &ScheduleConfig::default(),
        )
        .unwrap();

        assert_eq!(report.tasks[0].earliest_start, date(2025, 1, 1));
        assert_eq!(report.tasks[0].earliest_finish, date(2025, 1, 3));
        assert_eq!(report.tasks[1].earliest_start, date(2025, 1, 3));
        assert_eq!(report.tasks[2].earliest_start, date(2025, 1, 6));
        assert_eq!(report.tasks[2].latest_finish, date(2025, 1, 7));
        assert!(report.tasks.iter().all(|t| t.is_critical));
        assert_eq!(report.makespan_days, 6);
        assert_eq!(report.critical_chain, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_reference_falls_back_to_earliest_start_after() {
        let mut a = make_task("a", 4, vec![]);
        a.start_after = Some(date(2025, 3, 10));
        let mut b = make_task("b", 2, vec![]);
        b.start_after = Some(date(2025, 3, 12));
        let report = schedule_dated(&[a, b], None, None, &ScheduleConfig::default()).unwrap();

        assert_eq!(report.project_start, date(2025, 3, 10));
        assert_eq!(report.project_end, date(2025, 3, 14));
        assert_eq!(report.tasks[1].earliest_start, date(2025, 3, 12));
        assert_eq!(report.tasks[1].slack_days, 0);
    }

    #[test]
    fn test_reference_ignores_start_after_on_dependent_task() {
        let mut a = make_task("a", 2, vec![]);
        a.start_after = Some(date(2025, 3, 10));
        let mut b = make_task("b", 1, vec!["a"]);
        b.start_after = Some(date(2025, 3, 1));
        let report = schedule_dated(&[a, b], None, None, &ScheduleConfig::default()).unwrap();

        assert_eq!(report.project_start, date(2025, 3, 10));
        assert_eq!(report.tasks[1].earliest_start, date(2025, 3, 12));
        assert_eq!(report.makespan_days, 3);
    }

    #[test]
    fn test_end_before_deadline() {
        let mut a = make_task("a", 2, vec![]);
        a.end_before = Some(date(2025, 2, 5));
        let b = make_task("b", 10, vec![]);
        let report = schedule_dated(
            &[a, b],
            Some(date(2025, 2, 1)),
            None,
            &ScheduleConfig::default(),
        )
        .unwrap();

        assert_eq!(report.tasks[0].latest_finish, date(2025, 2, 5));
        assert_eq!(report.tasks[0].latest_start, date(2025, 2, 3));
        assert_eq!(report.tasks[0].slack_days, 2);
    }

    #[test]
    fn test_start_after_before_project_start_is_clamped() {
        let mut a = make_task("a", 1, vec![]);
        a.start_after = Some(date(2024, 12, 20));
        let report = schedule_dated(
            &[a],
            Some(date(2025, 1, 1)),
            None,
            &ScheduleConfig::default(),
        )
        .unwrap();
        assert_eq!(report.tasks[0].earliest_start, date(2025, 1, 1));
    }

    #[test]
    fn test_missing_project_start() {
        let tasks = vec![make_task("a", 1, vec![])];
        assert_eq!(
            schedule_dated(&tasks, None, None, &ScheduleConfig::default()).unwrap_err(),
            ScheduleError::MissingProjectStart
        );
    }

    #[test]
    fn test_infeasible_project_end_date() {
        let tasks = vec![make_task("a", 5, vec![])];
        assert_eq!(
            schedule_dated(
                &tasks,
                Some(date(2025, 1, 1)),
                Some(date(2025, 1, 3)),
                &ScheduleConfig::default(),
            )
            .unwrap_err(),
            ScheduleError::InfeasibleDeadline {
                deadline: 2,
                earliest_finish: 5,
            }
        );
    }
}
