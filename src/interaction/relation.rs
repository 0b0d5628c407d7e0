use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::coordinates::CoordinatesMap;
use crate::core::task::{ComparisonLevel, RelationTarget, Task, TaskId};

/// One end of a relation: a task edge at a comparison level.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelationHandle {
    pub level: ComparisonLevel,
    pub task_id: TaskId,
    pub target: RelationTarget,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum RelationState {
    #[default]
    Idle,
    Drawing {
        from: RelationHandle,
        start: (f64, f64),
        /// Rubber-band endpoint; visual only.
        end: (f64, f64),
    },
}

impl RelationState {
    #[must_use]
    pub fn is_drawing(&self) -> bool {
        matches!(self, Self::Drawing { .. })
    }
}

/// Clickable circle around a task's relation handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationHotspot {
    pub handle: RelationHandle,
    pub x: f64,
    pub y: f64,
}

/// Geometry of the relation handles drawn beside each bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RelationHandleGeometry {
    /// Horizontal distance of the circle center outside the bar edge.
    pub offset: f64,
    pub radius: f64,
    pub task_height: f64,
    pub rtl: bool,
}

/// Handle centers for every laid-out task. The start handle sits outside
/// the start edge, the end handle outside the end edge.
#[must_use]
pub fn relation_hotspots(
    coordinates: &CoordinatesMap,
    geometry: RelationHandleGeometry,
) -> Vec<RelationHotspot> {
    let mut hotspots = Vec::with_capacity(coordinates.len() * 2);
    for (level, task_id, coords) in coordinates.iter() {
        let y = coords.y + geometry.task_height / 2.0;
        let left = coords.x1 - geometry.offset;
        let right = coords.x2 + geometry.offset;
        let (start_x, end_x) = if geometry.rtl {
            (right, left)
        } else {
            (left, right)
        };
        for (target, x) in [
            (RelationTarget::StartOfTask, start_x),
            (RelationTarget::EndOfTask, end_x),
        ] {
            hotspots.push(RelationHotspot {
                handle: RelationHandle {
                    level,
                    task_id: task_id.clone(),
                    target,
                },
                x,
                y,
            });
        }
    }
    hotspots
}

/// Nearest hotspot whose circle contains `(x, y)`.
#[must_use]
pub fn hit_test_relation(
    hotspots: &[RelationHotspot],
    x: f64,
    y: f64,
    radius: f64,
) -> Option<&RelationHotspot> {
    // Circles rarely overlap; two inline slots cover the adjacent-bar case.
    let candidates: SmallVec<[(OrderedFloat<f64>, &RelationHotspot); 2]> = hotspots
        .iter()
        .map(|spot| (OrderedFloat((spot.x - x).hypot(spot.y - y)), spot))
        .filter(|(distance, _)| distance.0 <= radius)
        .collect();
    candidates
        .into_iter()
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, spot)| spot)
}

/// New dependency proposed to the host after a successful drop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationProposal {
    pub from: (Task, RelationTarget),
    pub to: (Task, RelationTarget),
    /// The two tasks are ancestor and descendant of each other.
    pub is_ancestor_descendant_pair: bool,
}
