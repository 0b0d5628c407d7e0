use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::ViewMode;
use crate::core::change_metadata::BarMoveAction;
use crate::core::coordinates::required_coordinates;
use crate::core::primitives::{add_millis, millis_between};
use crate::core::task::{Task, TaskKey};
use crate::core::working_dates::adjust_to_working_dates;
use crate::error::GanttResult;
use crate::interaction::{
    ChangeInProgress, DragGeometry, RelationProposal, ScrollState, clamp_scroll,
    handle_task_by_x, resolve_auto_scroll_delta,
};

use super::{GanttEngine, GanttHandler, PluginEvent};

/// What a pointer release did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PointerUpOutcome {
    /// No gesture was active.
    Idle,
    /// A gesture ended without a net change or a valid drop target.
    Discarded,
    DateChanged {
        action: BarMoveAction,
        changed: Task,
        original: Task,
    },
    ProgressChanged(Task),
    RelationProposed(RelationProposal),
}

impl<H: GanttHandler> GanttEngine<H> {
    pub(super) fn drag_geometry(&self) -> DragGeometry {
        DragGeometry {
            x_step: self.layout.space.x_step(self.config.time_step_ms),
            time_step_ms: self.config.time_step_ms,
            handle_width: self.config.handle_width,
            rtl: self.config.rtl,
        }
    }

    /// Starts a bar gesture with the pointer at `viewport_x`.
    ///
    /// Returns `Ok(false)` when the gesture is refused: another gesture is
    /// active, the task is disabled, or a milestone is resized. Fails when
    /// the task is unknown or has no layout (collapsed away).
    pub fn pointer_down_on_task(
        &mut self,
        key: &TaskKey,
        action: BarMoveAction,
        viewport_x: f64,
    ) -> GanttResult<bool> {
        if self.interaction.is_busy() {
            return Ok(false);
        }
        let task = self.task(key)?.clone();
        if task.is_disabled || (task.is_milestone() && action != BarMoveAction::Move) {
            return Ok(false);
        }
        let coordinates = required_coordinates(&self.layout.coordinates, key.level, &key.id)?;
        let content_x = viewport_x + self.interaction.scroll().x;

        let change = ChangeInProgress::begin(action, task, coordinates, content_x, viewport_x);
        if !self.interaction.begin_gesture(change) {
            return Ok(false);
        }
        debug!(level = key.level, task_id = %key.id, ?action, "bar gesture started");
        self.emit_plugin_event(&PluginEvent::GestureStarted {
            level: key.level,
            task_id: key.id.clone(),
            action,
        });
        Ok(true)
    }

    /// Feeds a pointer move to the active gesture or relation rubber band.
    pub fn pointer_move(&mut self, viewport_x: f64, viewport_y: f64) {
        if self.interaction.gesture().is_some() {
            self.drag_to(viewport_x);
        } else if self.interaction.relation().is_drawing() {
            let point = self.to_content(viewport_x, viewport_y);
            self.interaction.update_relation_end(point);
        }
    }

    /// Ends the active gesture. Bar gestures commit only on a net change.
    pub fn pointer_up(&mut self, viewport_x: f64, viewport_y: f64) -> PointerUpOutcome {
        if self.interaction.gesture().is_some() {
            self.drag_to(viewport_x);
            return self.finish_gesture();
        }
        if self.interaction.relation().is_drawing() {
            return self.finish_relation(viewport_x, viewport_y);
        }
        PointerUpOutcome::Idle
    }

    /// Host-level abort: clears any gesture without a callback.
    pub fn cancel_gesture(&mut self) -> bool {
        if !self.interaction.cancel() {
            return false;
        }
        self.emit_plugin_event(&PluginEvent::GestureCancelled);
        true
    }

    /// One auto-scroll timer tick. Reads the live gesture, scrolls when the
    /// pointer is near a viewport edge and re-applies the pointer so the
    /// dragged edge keeps tracking it. Returns the new scroll x.
    pub fn auto_scroll_tick(&mut self) -> Option<f64> {
        let viewport_x = self.interaction.gesture()?.viewport_x;
        let delta = resolve_auto_scroll_delta(
            viewport_x,
            self.config.viewport_width,
            self.config.auto_scroll,
        )?;
        let scroll = self.interaction.scroll();
        let next = clamp_scroll(
            scroll.x,
            delta,
            self.layout.content_width(),
            self.config.viewport_width,
        );
        if next == scroll.x {
            return None;
        }
        self.interaction.set_scroll(ScrollState { x: next, ..scroll });
        trace!(scroll_x = next, "auto-scrolled during drag");
        self.emit_plugin_event(&PluginEvent::AutoScrolled { scroll_x: next });
        self.drag_to(viewport_x);
        Some(next)
    }

    fn drag_to(&mut self, viewport_x: f64) -> bool {
        let geometry = self.drag_geometry();
        let content_x = viewport_x + self.interaction.scroll().x;
        let Some(change) = self.interaction.gesture_mut() else {
            return false;
        };
        change.viewport_x = viewport_x;
        let Some(step) = handle_task_by_x(content_x, change, geometry) else {
            return false;
        };
        change.changed_task = step.task;
        change.coordinates = step.coordinates;

        let event = PluginEvent::GestureUpdated {
            level: change.changed_task.comparison_level,
            task_id: change.changed_task.id.clone(),
            action: change.action,
        };
        trace!(
            content_x,
            start = %change.changed_task.start,
            end = %change.changed_task.end,
            progress = change.changed_task.progress,
            "bar gesture updated"
        );
        self.emit_plugin_event(&event);
        true
    }

    fn finish_gesture(&mut self) -> PointerUpOutcome {
        let Some(change) = self.interaction.take_gesture() else {
            return PointerUpOutcome::Idle;
        };
        if !change.is_changed() {
            self.emit_plugin_event(&PluginEvent::GestureCancelled);
            return PointerUpOutcome::Discarded;
        }

        let ChangeInProgress {
            action,
            original_task: original,
            changed_task,
            ..
        } = change;

        if action == BarMoveAction::Progress {
            self.handler.on_progress_change(&changed_task);
            self.announce_commit(action, &changed_task);
            return PointerUpOutcome::ProgressChanged(changed_task);
        }

        let changed = self.finalize_dates(action, changed_task, &original);
        if changed.start == original.start && changed.end == original.end {
            self.emit_plugin_event(&PluginEvent::GestureCancelled);
            return PointerUpOutcome::Discarded;
        }
        self.handler.on_date_change(action, &changed, &original);
        self.announce_commit(action, &changed);
        PointerUpOutcome::DateChanged {
            action,
            changed,
            original,
        }
    }

    fn announce_commit(&mut self, action: BarMoveAction, task: &Task) {
        debug!(
            level = task.comparison_level,
            task_id = %task.id,
            ?action,
            start = %task.start,
            end = %task.end,
            progress = task.progress,
            "bar gesture committed"
        );
        self.emit_plugin_event(&PluginEvent::GestureCommitted {
            level: task.comparison_level,
            task_id: task.id.clone(),
            action,
        });
    }

    fn finalize_dates(&self, action: BarMoveAction, changed: Task, original: &Task) -> Task {
        let view_mode = self.config.view_mode;
        let mut changed = if self.config.round_dates {
            round_task_dates(action, changed, view_mode)
        } else {
            changed
        };
        if self.config.working_dates_only {
            changed = adjust_to_working_dates(
                action,
                &changed,
                original,
                self.calendar.as_ref(),
                view_mode,
            );
        }
        changed
    }

    pub(super) fn to_content(&self, viewport_x: f64, viewport_y: f64) -> (f64, f64) {
        let scroll = self.interaction.scroll();
        (viewport_x + scroll.x, viewport_y + scroll.y)
    }
}

/// Snaps the edited edge to the nearest view-mode boundary. A move snaps
/// the start and carries the end by the same amount.
fn round_task_dates(action: BarMoveAction, mut task: Task, view_mode: ViewMode) -> Task {
    match action {
        BarMoveAction::Start => task.start = view_mode.round_to_nearest_unit(task.start),
        BarMoveAction::End => task.end = view_mode.round_to_nearest_unit(task.end),
        BarMoveAction::Move => {
            let rounded = view_mode.round_to_nearest_unit(task.start);
            let shift = millis_between(task.start, rounded);
            task.start = rounded;
            task.end = if task.is_milestone() {
                rounded
            } else {
                add_millis(task.end, shift)
            };
        }
        BarMoveAction::Progress => {}
    }
    task
}
