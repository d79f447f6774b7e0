//! Task id interning.
//!
//! Maps caller-supplied string ids to dense integer positions so the passes can
//! address tasks by direct array indexing.

use rustc_hash::FxHashMap;

/// Dense position of a task in the current computation.
pub type TaskIdx = usize;

/// Bidirectional mapping between task id strings and dense positions.
#[derive(Debug, Clone)]
pub struct TaskIdInterner {
    to_idx: FxHashMap<String, TaskIdx>,
    from_idx: Vec<String>,
}

impl TaskIdInterner {
    /// Create a new interner with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            to_idx: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            from_idx: Vec::with_capacity(capacity),
        }
    }

    /// Intern a string, returning its position.
    ///
    /// Returns `None` (and leaves the interner untouched) if the string was
    /// already interned.
    pub fn intern_new(&mut self, s: &str) -> Option<TaskIdx> {
        if self.to_idx.contains_key(s) {
            return None;
        }
        let idx = self.from_idx.len();
        self.from_idx.push(s.to_string());
        self.to_idx.insert(s.to_string(), idx);
        Some(idx)
    }

    /// Get the position for a string, if it exists.
    #[inline]
    pub fn get(&self, s: &str) -> Option<TaskIdx> {
        self.to_idx.get(s).copied()
    }

    /// Get the string for a position.
    #[inline]
    pub fn resolve(&self, idx: TaskIdx) -> Option<&str> {
        self.from_idx.get(idx).map(|s| s.as_str())
    }

    /// Number of interned strings.
    pub fn len(&self) -> usize {
        self.from_idx.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.from_idx.is_empty()
    }

    /// Consume the interner, yielding the id -> position map.
    pub fn into_positions(self) -> FxHashMap<String, TaskIdx> {
        self.to_idx
    }
}

impl Default for TaskIdInterner {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}
