use crate::core::change_metadata::BarMoveAction;
use crate::core::task::Task;
use crate::interaction::RelationProposal;

/// Host callbacks fired by committed gestures.
///
/// The engine never writes back into its task list: hosts apply the edit
/// and call [`super::GanttEngine::set_tasks`] with the result.
pub trait GanttHandler {
    /// Committed move or resize.
    fn on_date_change(&mut self, action: BarMoveAction, changed: &Task, original: &Task) {
        let _ = (action, changed, original);
    }

    fn on_progress_change(&mut self, task: &Task) {
        let _ = task;
    }

    fn on_relation_change(&mut self, proposal: &RelationProposal) {
        let _ = proposal;
    }

    fn on_arrow_double_click(&mut self, from: &Task, to: &Task) {
        let _ = (from, to);
    }
}

/// No-op handler used by tests and headless engine usage.
#[derive(Debug, Default)]
pub struct NullHandler;

impl GanttHandler for NullHandler {}
