//! Task graph construction and validation.
//!
//! Builds the in-memory DAG for one computation: interns task ids, resolves
//! dependency edges, derives the reverse adjacency, and computes a topological
//! order once for both passes to share.

use std::collections::VecDeque;

use crate::config::ScheduleConfig;
use crate::error::ScheduleError;
use crate::interner::{TaskIdInterner, TaskIdx};
use crate::models::{Task, TimeUnits};
use crate::{log_changes, log_debug};

/// Validated dependency graph for one schedule computation.
///
/// All per-task data is indexed by `TaskIdx`, which follows caller
/// presentation order.
#[derive(Debug, Clone)]
pub struct TaskGraph {
    pub(crate) index: TaskIdInterner,
    pub(crate) durations: Vec<TimeUnits>,
    pub(crate) start_bounds: Vec<Option<TimeUnits>>,
    pub(crate) finish_bounds: Vec<Option<TimeUnits>>,
    /// Dependencies (predecessors), deduplicated.
    pub(crate) deps: Vec<Vec<TaskIdx>>,
    /// Dependents (successors), derived once from `deps`.
    pub(crate) dependents: Vec<Vec<TaskIdx>>,
    /// Dependencies before dependents.
    pub(crate) topo_order: Vec<TaskIdx>,
}

impl TaskGraph {
    /// Validate the task set and build the graph.
    ///
    /// # Errors
    /// * `TooManyTasks` if `config.max_tasks` is exceeded
    /// * `DuplicateTask` if two tasks share an id
    /// * `NegativeDuration` if a task has a duration below zero
    /// * `UnknownDependency` if a dependency id is not in the task set
    /// * `CyclicDependency` if no topological order exists
    pub fn build(tasks: &[Task], config: &ScheduleConfig) -> Result<Self, ScheduleError> {
        let verbosity = config.verbosity;
        let n = tasks.len();

        if let Some(limit) = config.max_tasks {
            if n > limit {
                return Err(ScheduleError::TooManyTasks { count: n, limit });
            }
        }

        let mut index = TaskIdInterner::with_capacity(n);
        let mut durations = Vec::with_capacity(n);
        let mut start_bounds = Vec::with_capacity(n);
        let mut finish_bounds = Vec::with_capacity(n);

        for task in tasks {
            if index.intern_new(&task.id).is_none() {
                return Err(ScheduleError::DuplicateTask(task.id.clone()));
            }
            if task.duration < 0 {
                return Err(ScheduleError::NegativeDuration(task.id.clone()));
            }
            durations.push(task.duration);
            start_bounds.push(task.earliest_start_bound);
            finish_bounds.push(task.latest_finish_bound);
        }

        let mut deps: Vec<Vec<TaskIdx>> = vec![Vec::new(); n];
        let mut dependents: Vec<Vec<TaskIdx>> = vec![Vec::new(); n];
        // last_seen[d] == idx means d is already recorded as a dependency of idx
        let mut last_seen: Vec<usize> = vec![usize::MAX; n];
        let mut edge_count = 0usize;

        for (idx, task) in tasks.iter().enumerate() {
            for dep_id in &task.dependencies {
                let dep_idx = index.get(dep_id).ok_or_else(|| ScheduleError::UnknownDependency {
                    task_id: task.id.clone(),
                    missing_id: dep_id.clone(),
                })?;
                if last_seen[dep_idx] == idx {
                    continue;
                }
                last_seen[dep_idx] = idx;
                deps[idx].push(dep_idx);
                dependents[dep_idx].push(idx);
                edge_count += 1;
            }
        }

        let topo_order = topological_sort(&index, &deps, &dependents)?;

        log_changes!(
            verbosity,
            "Built task graph: {} tasks, {} dependency edges",
            n,
            edge_count
        );
        log_debug!(verbosity, "  Topological order: {:?}", topo_order);

        Ok(Self {
            index,
            durations,
            start_bounds,
            finish_bounds,
            deps,
            dependents,
            topo_order,
        })
    }

    /// Number of tasks.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Task id for a position.
    pub fn task_id(&self, idx: TaskIdx) -> &str {
        self.index.resolve(idx).unwrap_or_default()
    }

    /// Topological order (dependencies before dependents).
    pub fn topo_order(&self) -> &[TaskIdx] {
        &self.topo_order
    }

    pub fn dependencies(&self, idx: TaskIdx) -> &[TaskIdx] {
        &self.deps[idx]
    }

    pub fn dependents(&self, idx: TaskIdx) -> &[TaskIdx] {
        &self.dependents[idx]
    }

    pub fn is_root(&self, idx: TaskIdx) -> bool {
        self.deps[idx].is_empty()
    }

    pub fn is_leaf(&self, idx: TaskIdx) -> bool {
        self.dependents[idx].is_empty()
    }
}

/// Kahn's algorithm over dense positions.
///
/// The queue is seeded and drained in position order, so the result is
/// deterministic for a given input presentation.
fn topological_sort(
    index: &TaskIdInterner,
    deps: &[Vec<TaskIdx>],
    dependents: &[Vec<TaskIdx>],
) -> Result<Vec<TaskIdx>, ScheduleError> {
    let n = deps.len();
    let mut in_degree: Vec<usize> = deps.iter().map(Vec::len).collect();
    let mut queue: VecDeque<TaskIdx> = (0..n).filter(|&idx| in_degree[idx] == 0).collect();
    let mut order: Vec<TaskIdx> = Vec::with_capacity(n);
    let mut sorted = vec![false; n];

    while let Some(idx) = queue.pop_front() {
        order.push(idx);
        sorted[idx] = true;

        for &dependent in &dependents[idx] {
            in_degree[dependent] -= 1;
            if in_degree[dependent] == 0 {
                queue.push_back(dependent);
            }
        }
    }

    if order.len() != n {
        let cycle = find_cycle(deps, &sorted);
        return Err(ScheduleError::CyclicDependency(
            cycle
                .into_iter()
                .filter_map(|idx| index.resolve(idx))
                .map(str::to_string)
                .collect(),
        ));
    }

    Ok(order)
}

/// Extract one concrete cycle from the tasks Kahn's algorithm could not sort.
///
/// Every unsorted task has at least one unsorted dependency, so walking
/// unsorted dependency edges from any unsorted task must revisit a task.
/// Returned in dependency order (each entry is a dependency of the next),
/// rotated to start at the lowest position.
fn find_cycle(deps: &[Vec<TaskIdx>], sorted: &[bool]) -> Vec<TaskIdx> {
    let Some(start) = sorted.iter().position(|&done| !done) else {
        return Vec::new();
    };

    let mut path_pos: Vec<Option<usize>> = vec![None; deps.len()];
    let mut path: Vec<TaskIdx> = Vec::new();
    let mut current = start;

    loop {
        if let Some(pos) = path_pos[current] {
            let mut cycle: Vec<TaskIdx> = path.split_off(pos);
            // path follows dependency edges backwards; flip to dependency order
            cycle.reverse();
            if let Some(min_pos) = cycle
                .iter()
                .enumerate()
                .min_by_key(|&(_, &idx)| idx)
                .map(|(pos, _)| pos)
            {
                cycle.rotate_left(min_pos);
            }
            return cycle;
        }
        path_pos[current] = Some(path.len());
        path.push(current);

        match deps[current].iter().copied().find(|&dep| !sorted[dep]) {
            Some(next) => current = next,
            None => {
                // Unreachable for a consistent Kahn's result; report what is unsorted
                return (0..sorted.len()).filter(|&idx| !sorted[idx]).collect();
            }
        }
    }
}
