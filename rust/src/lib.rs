//! Critical Path Method scheduling engine.
//!
//! Computes earliest/latest start and finish times, slack, and the critical
//! task set for one project's finish-to-start dependency graph. The engine is
//! a pure function of its input: it holds no global state and performs no I/O.
//!
//! ```
//! use cpm_rust::{schedule, ProjectWindow, ScheduleConfig, Task};
//!
//! let tasks = vec![
//!     Task::new("a", 2, vec![]),
//!     Task::new("b", 3, vec!["a".to_string()]),
//! ];
//! let report = schedule(&tasks, &ProjectWindow::new(0, 5), &ScheduleConfig::default()).unwrap();
//! assert_eq!(report.critical_chain(), vec!["a", "b"]);
//! ```

pub mod backward_pass;
mod config;
pub mod critical_path;
pub mod dated;
mod error;
pub mod forward_pass;
pub mod graph;
mod interner;
pub mod logging;
mod models;
#[cfg(feature = "python")]
mod python;
mod report;

pub use config::ScheduleConfig;
pub use dated::{schedule_dated, DatedScheduleReport, DatedScheduledTask, DatedTask};
pub use error::ScheduleError;
pub use graph::TaskGraph;
pub use models::{ProjectWindow, ScheduleReport, ScheduledTask, Task, TaskTiming, TimeUnits};
pub use report::schedule;
