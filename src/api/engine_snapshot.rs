use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::core::ViewMode;
use crate::core::aggregates::{ChildOutOfParentWarnings, CriticalPaths};
use crate::core::coordinates::CoordinatesMap;
use crate::core::dependency::EdgeDeltaMap;
use crate::core::level_map::LevelMap;
use crate::core::task::TaskKey;
use crate::interaction::{InteractionMode, ScrollState};

/// Serializable deterministic state snapshot used by regression tests and
/// debugging tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub view_mode: ViewMode,
    pub grid_start: NaiveDateTime,
    pub unit_count: i64,
    pub dates: Vec<NaiveDateTime>,
    pub column_width: f64,
    pub content_width: f64,
    pub rows: LevelMap<usize>,
    pub coordinates: CoordinatesMap,
    pub critical_paths: CriticalPaths,
    pub dependency_warnings: EdgeDeltaMap,
    pub child_out_of_parent_warnings: ChildOutOfParentWarnings,
    pub scroll: ScrollState,
    pub interaction_mode: InteractionMode,
    pub selected: Vec<TaskKey>,
}
