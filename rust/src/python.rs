//! PyO3 bindings over the dated scheduling API.

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use chrono::NaiveDate;
use pyo3::prelude::*;

use crate::config::ScheduleConfig;
use crate::dated::{schedule_dated, DatedScheduledTask, DatedTask};

/// A task to be scheduled (PyO3 wrapper).
#[pyclass(name = "Task")]
#[derive(Clone, Debug)]
pub struct PyTask {
    #[pyo3(get, set)]
    pub id: String,
    #[pyo3(get, set)]
    pub duration_days: i64,
    #[pyo3(get, set)]
    pub dependencies: Vec<String>,
    #[pyo3(get, set)]
    pub start_after: Option<NaiveDate>,
    #[pyo3(get, set)]
    pub end_before: Option<NaiveDate>,
}

#[pymethods]
impl PyTask {
    #[new]
    #[pyo3(signature = (id, duration_days, dependencies=Vec::new(), start_after=None, end_before=None))]
    fn new(
        id: String,
        duration_days: i64,
        dependencies: Vec<String>,
        start_after: Option<NaiveDate>,
        end_before: Option<NaiveDate>,
    ) -> Self {
        Self {
            id,
            duration_days,
            dependencies,
            start_after,
            end_before,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "Task(id={:?}, duration_days={}, deps={})",
            self.id,
            self.duration_days,
            self.dependencies.len()
        )
    }
}

impl From<PyTask> for DatedTask {
    fn from(task: PyTask) -> Self {
        Self {
            id: task.id,
            duration_days: task.duration_days,
            dependencies: task.dependencies,
            start_after: task.start_after,
            end_before: task.end_before,
        }
    }
}

/// A scheduled task (PyO3 wrapper).
#[pyclass(name = "ScheduledTask")]
#[derive(Clone, Debug)]
pub struct PyScheduledTask {
    #[pyo3(get)]
    pub task_id: String,
    #[pyo3(get)]
    pub earliest_start: NaiveDate,
    #[pyo3(get)]
    pub earliest_finish: NaiveDate,
    #[pyo3(get)]
    pub latest_start: NaiveDate,
    #[pyo3(get)]
    pub latest_finish: NaiveDate,
    #[pyo3(get)]
    pub slack_days: i64,
    #[pyo3(get)]
    pub free_slack_days: i64,
    #[pyo3(get)]
    pub is_critical: bool,
}

#[pymethods]
impl PyScheduledTask {
    fn __repr__(&self) -> String {
        format!(
            "ScheduledTask(task_id={:?}, earliest_start={}, slack_days={}, critical={})",
            self.task_id, self.earliest_start, self.slack_days, self.is_critical
        )
    }
}

impl From<DatedScheduledTask> for PyScheduledTask {
    fn from(task: DatedScheduledTask) -> Self {
        Self {
            task_id: task.task_id,
            earliest_start: task.earliest_start,
            earliest_finish: task.earliest_finish,
            latest_start: task.latest_start,
            latest_finish: task.latest_finish,
            slack_days: task.slack_days,
            free_slack_days: task.free_slack_days,
            is_critical: task.is_critical,
        }
    }
}

/// Compute critical path timings for one project's tasks.
///
/// # Arguments
/// * `tasks` - List of tasks; ids must be unique
/// * `project_start` - Project start date (defaults to the earliest start_after)
/// * `project_end` - Project completion date (defaults to the computed finish)
/// * `max_tasks` - Optional upper bound on the task count
/// * `verbosity` - 0=silent, 1=changes, 2=checks, 3=debug
///
/// # Returns
/// * (scheduled tasks in input order, critical chain task ids)
///
/// # Raises
/// * ValueError on unknown or cyclic dependencies, or an infeasible deadline
#[pyfunction]
#[pyo3(signature = (tasks, project_start=None, project_end=None, max_tasks=None, verbosity=0))]
fn schedule_project(
    tasks: Vec<PyTask>,
    project_start: Option<NaiveDate>,
    project_end: Option<NaiveDate>,
    max_tasks: Option<usize>,
    verbosity: u8,
) -> PyResult<(Vec<PyScheduledTask>, Vec<String>)> {
    let config = ScheduleConfig {
        verbosity,
        max_tasks,
    };
    let tasks: Vec<DatedTask> = tasks.into_iter().map(DatedTask::from).collect();

    match schedule_dated(&tasks, project_start, project_end, &config) {
        Ok(report) => Ok((
            report.tasks.into_iter().map(PyScheduledTask::from).collect(),
            report.critical_chain,
        )),
        Err(e) => Err(pyo3::exceptions::PyValueError::new_err(e.to_string())),
    }
}

/// The cpm_rust Python module.
#[pymodule]
fn cpm_rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyTask>()?;
    m.add_class::<PyScheduledTask>()?;
    m.add_function(wrap_pyfunction!(schedule_project, m)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_task_conversion_keeps_fields() {
        let task = PyTask::new(
            "build".to_string(),
            3,
            vec!["plan".to_string()],
            Some(date(2025, 1, 6)),
            Some(date(2025, 2, 1)),
        );
        let dated = DatedTask::from(task);

        assert_eq!(dated.id, "build");
        assert_eq!(dated.duration_days, 3);
        assert_eq!(dated.dependencies, vec!["plan"]);
        assert_eq!(dated.start_after, Some(date(2025, 1, 6)));
        assert_eq!(dated.end_before, Some(date(2025, 2, 1)));
    }

    #[test]
    fn test_scheduled_task_conversion_keeps_fields() {
        let scheduled = DatedScheduledTask {
            task_id: "build".to_string(),
            earliest_start: date(2025, 1, 6),
            earliest_finish: date(2025, 1, 9),
            latest_start: date(2025, 1, 8),
            latest_finish: date(2025, 1, 11),
            slack_days: 2,
            free_slack_days: 1,
            is_critical: false,
        };
        let wrapped = PyScheduledTask::from(scheduled);

        assert_eq!(wrapped.task_id, "build");
        assert_eq!(wrapped.earliest_start, date(2025, 1, 6));
        assert_eq!(wrapped.earliest_finish, date(2025, 1, 9));
        assert_eq!(wrapped.latest_start, date(2025, 1, 8));
        assert_eq!(wrapped.latest_finish, date(2025, 1, 11));
        assert_eq!(wrapped.slack_days, 2);
        assert_eq!(wrapped.free_slack_days, 1);
        assert!(!wrapped.is_critical);
    }
}
