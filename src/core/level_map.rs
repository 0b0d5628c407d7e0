use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::task::{ComparisonLevel, TaskId};
use crate::error::{GanttError, GanttResult};

/// Two-level map `comparison level -> task id -> V`.
///
/// Every derived structure is keyed by level first so independent task
/// forests never share entries. Insertion order is preserved for stable
/// snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelMap<V> {
    levels: IndexMap<ComparisonLevel, IndexMap<TaskId, V>>,
}

impl<V> Default for LevelMap<V> {
    fn default() -> Self {
        Self {
            levels: IndexMap::new(),
        }
    }
}

impl<V> LevelMap<V> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Strict level access: an absent level means the caller mixed up
    /// comparison levels upstream.
    pub fn level(&self, level: ComparisonLevel) -> GanttResult<&IndexMap<TaskId, V>> {
        self.levels
            .get(&level)
            .ok_or(GanttError::UnknownComparisonLevel(level))
    }

    /// Lenient lookup; absent level or id both yield `None`.
    #[must_use]
    pub fn get(&self, level: ComparisonLevel, id: &TaskId) -> Option<&V> {
        self.levels.get(&level).and_then(|entries| entries.get(id))
    }

    /// Strict lookup distinguishing an unknown level from an unknown id.
    pub fn try_get(&self, level: ComparisonLevel, id: &TaskId) -> GanttResult<&V> {
        self.level(level)?
            .get(id)
            .ok_or_else(|| GanttError::TaskNotFound {
                level,
                id: id.to_string(),
            })
    }

    pub fn insert(&mut self, level: ComparisonLevel, id: TaskId, value: V) -> Option<V> {
        self.levels.entry(level).or_default().insert(id, value)
    }

    pub fn get_or_insert_with(
        &mut self,
        level: ComparisonLevel,
        id: TaskId,
        make: impl FnOnce() -> V,
    ) -> &mut V {
        self.levels
            .entry(level)
            .or_default()
            .entry(id)
            .or_insert_with(make)
    }

    /// Registers a level without entries so strict lookups succeed.
    pub fn ensure_level(&mut self, level: ComparisonLevel) {
        self.levels.entry(level).or_default();
    }

    #[must_use]
    pub fn contains_level(&self, level: ComparisonLevel) -> bool {
        self.levels.contains_key(&level)
    }

    #[must_use]
    pub fn contains(&self, level: ComparisonLevel, id: &TaskId) -> bool {
        self.get(level, id).is_some()
    }

    pub fn levels(&self) -> impl Iterator<Item = ComparisonLevel> + '_ {
        self.levels.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ComparisonLevel, &TaskId, &V)> + '_ {
        self.levels
            .iter()
            .flat_map(|(level, entries)| entries.iter().map(move |(id, value)| (*level, id, value)))
    }

    /// Total number of entries across all levels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.values().map(IndexMap::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
