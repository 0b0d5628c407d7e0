use tracing::debug;

use crate::core::aggregates::check_is_descendant;
use crate::core::task::{ComparisonLevel, TaskId, TaskKey, TaskOrEmpty};
use crate::error::{GanttError, GanttResult};
use crate::interaction::{
    RelationHandle, RelationHandleGeometry, RelationHotspot, RelationProposal, RelationState,
    hit_test_relation, relation_hotspots,
};

use super::{GanttEngine, GanttHandler, PluginEvent, PointerUpOutcome};

impl<H: GanttHandler> GanttEngine<H> {
    pub(super) fn relation_handle_geometry(&self) -> RelationHandleGeometry {
        RelationHandleGeometry {
            offset: self.config.relation_circle_offset,
            radius: self.config.relation_circle_radius,
            task_height: self.config.task_height,
            rtl: self.config.rtl,
        }
    }

    /// Relation handle centers of every laid-out task, in content space.
    #[must_use]
    pub fn relation_hotspots(&self) -> Vec<RelationHotspot> {
        relation_hotspots(&self.layout.coordinates, self.relation_handle_geometry())
    }

    /// Starts drawing a relation from `handle`.
    pub fn pointer_down_on_relation_handle(
        &mut self,
        handle: RelationHandle,
        viewport_x: f64,
        viewport_y: f64,
    ) -> GanttResult<bool> {
        if self.interaction.is_busy() {
            return Ok(false);
        }
        let task = self.task(&TaskKey::new(handle.level, handle.task_id.clone()))?;
        if task.is_disabled {
            return Ok(false);
        }
        let start = self.to_content(viewport_x, viewport_y);
        Ok(self.interaction.begin_relation(handle, start))
    }

    /// Rubber-band line of the relation being drawn, in content space.
    #[must_use]
    pub fn relation_rubber_band(&self) -> Option<((f64, f64), (f64, f64))> {
        match self.interaction.relation() {
            RelationState::Drawing { start, end, .. } => Some((*start, *end)),
            RelationState::Idle => None,
        }
    }

    pub(super) fn finish_relation(&mut self, viewport_x: f64, viewport_y: f64) -> PointerUpOutcome {
        let RelationState::Drawing { from, .. } = self.interaction.take_relation() else {
            return PointerUpOutcome::Idle;
        };
        let (x, y) = self.to_content(viewport_x, viewport_y);
        let hotspots = self.relation_hotspots();
        let Some(hit) = hit_test_relation(&hotspots, x, y, self.config.relation_circle_radius)
        else {
            return PointerUpOutcome::Discarded;
        };
        let to = hit.handle.clone();
        if to.level != from.level || to.task_id == from.task_id {
            return PointerUpOutcome::Discarded;
        }

        let (Ok(from_task), Ok(to_task)) = (
            self.task(&TaskKey::new(from.level, from.task_id.clone())),
            self.task(&TaskKey::new(to.level, to.task_id.clone())),
        ) else {
            return PointerUpOutcome::Discarded;
        };
        let from_row = TaskOrEmpty::Task(from_task.clone());
        let to_row = TaskOrEmpty::Task(to_task.clone());
        let is_pair = check_is_descendant(&from_row, &to_row, &self.index.task_map)
            || check_is_descendant(&to_row, &from_row, &self.index.task_map);
        if is_pair && !self.config.allow_hierarchy_relations {
            return PointerUpOutcome::Discarded;
        }

        let proposal = RelationProposal {
            from: (from_task.clone(), from.target),
            to: (to_task.clone(), to.target),
            is_ancestor_descendant_pair: is_pair,
        };
        self.handler.on_relation_change(&proposal);
        debug!(
            level = from.level,
            source_id = %from.task_id,
            task_id = %to.task_id,
            is_pair,
            "relation proposed"
        );
        self.emit_plugin_event(&PluginEvent::RelationProposed { from, to });
        PointerUpOutcome::RelationProposed(proposal)
    }

    /// Forwards a double click on the arrow `source -> dependent`.
    pub fn arrow_double_click(
        &mut self,
        level: ComparisonLevel,
        source_id: &TaskId,
        dependent_id: &TaskId,
    ) -> GanttResult<()> {
        let dependent = self.task(&TaskKey::new(level, dependent_id.clone()))?;
        let edge = self
            .layout
            .graph
            .dependencies_of(dependent)
            .iter()
            .find(|edge| edge.source.id == *source_id)
            .ok_or_else(|| {
                GanttError::InvalidData(format!(
                    "no dependency `{source_id}` -> `{dependent_id}` at level {level}"
                ))
            })?;
        let (from, to) = (edge.source.clone(), dependent.clone());
        self.handler.on_arrow_double_click(&from, &to);
        Ok(())
    }
}
