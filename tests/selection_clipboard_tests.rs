use chrono::{NaiveDate, NaiveDateTime};
use gantt_rs::api::{GanttEngine, GanttEngineConfig, NullHandler};
use gantt_rs::core::{ChangeAction, Task, TaskId, TaskKey, TaskKind, TaskOrEmpty, ViewMode};
use gantt_rs::interaction::ClipboardMode;

fn dt(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .expect("valid datetime")
}

/// p(07-01..07-05) -> (c1, c2); q(07-10..07-12) is a root.
fn tasks() -> Vec<TaskOrEmpty> {
    vec![
        Task::new("p", TaskKind::Project, dt(2020, 7, 1), dt(2020, 7, 5)).into(),
        Task::new("c1", TaskKind::Task, dt(2020, 7, 1), dt(2020, 7, 3))
            .with_parent("p")
            .into(),
        Task::new("c2", TaskKind::Task, dt(2020, 7, 3), dt(2020, 7, 5))
            .with_parent("p")
            .into(),
        Task::new("q", TaskKind::Task, dt(2020, 7, 10), dt(2020, 7, 12)).into(),
    ]
}

fn engine() -> GanttEngine<NullHandler> {
    GanttEngine::new(NullHandler, GanttEngineConfig::new(ViewMode::Day), tasks())
        .expect("engine init")
}

fn key(id: &str) -> TaskKey {
    TaskKey::new(1, id)
}

fn selected_ids(engine: &GanttEngine<NullHandler>) -> Vec<String> {
    engine
        .selection()
        .selected()
        .iter()
        .map(|key| key.id.to_string())
        .collect()
}

fn ids(rows: &[TaskOrEmpty]) -> Vec<&str> {
    rows.iter().map(|row| row.id().as_str()).collect()
}

fn copy_suffix(id: &TaskId) -> TaskId {
    TaskId::new(format!("{id}-copy"))
}

#[test]
fn range_selection_follows_visible_row_order() {
    let mut engine = engine();
    engine.select_task(key("c1"));
    engine.select_task_range(key("q"));
    assert_eq!(selected_ids(&engine), vec!["c1", "c2", "q"]);

    engine.toggle_task_selection(key("c2"));
    assert_eq!(selected_ids(&engine), vec!["c1", "q"]);

    engine.clear_selection();
    assert!(engine.selection().is_empty());
}

#[test]
fn copy_keeps_only_top_most_rows_as_roots() {
    let mut engine = engine();
    assert!(!engine.copy_selection());

    engine.select_task(key("p"));
    engine.toggle_task_selection(key("c1"));
    assert!(engine.copy_selection());

    let clipboard = engine.clipboard().expect("clipboard filled");
    assert_eq!(clipboard.mode, ClipboardMode::Copy);
    assert_eq!(ids(&clipboard.roots), vec!["p"]);
    assert_eq!(ids(&clipboard.tasks), vec!["p", "c1", "c2"]);
}

#[test]
fn pasting_a_copy_renames_the_subtree() {
    let mut engine = engine();
    engine.select_task(key("p"));
    engine.copy_selection();

    let (action, metadata) = engine
        .paste_into(&key("q"), copy_suffix)
        .expect("q exists")
        .expect("paste allowed");

    let ChangeAction::AddChildren {
        parent,
        descendants,
    } = action
    else {
        panic!("copy pastes as AddChildren");
    };
    assert_eq!(parent.id().as_str(), "q");
    assert_eq!(ids(&descendants), vec!["p-copy", "c1-copy", "c2-copy"]);
    let parents: Vec<Option<&str>> = descendants
        .iter()
        .map(|row| row.parent().map(TaskId::as_str))
        .collect();
    assert_eq!(parents, vec![Some("q"), Some("p-copy"), Some("p-copy")]);

    let q = metadata
        .suggestions
        .iter()
        .find(|suggestion| suggestion.task.id.as_str() == "q")
        .expect("q grows to hold the pasted rows");
    assert_eq!((q.start, q.end), (dt(2020, 7, 1), dt(2020, 7, 5)));

    // A copy survives the paste.
    assert!(engine.clipboard().is_some());
}

#[test]
fn pasting_a_cut_moves_rows_and_consumes_the_clipboard() {
    let mut engine = engine();
    engine.select_task(key("c2"));
    assert!(engine.cut_selection());

    let (action, metadata) = engine
        .paste_into(&key("q"), copy_suffix)
        .expect("q exists")
        .expect("paste allowed");
    let ChangeAction::MoveInside { parent, children } = action else {
        panic!("cut pastes as MoveInside");
    };
    assert_eq!(parent.id().as_str(), "q");
    assert_eq!(ids(&children), vec!["c2"]);
    assert!(engine.clipboard().is_none());

    let p = metadata
        .suggestions
        .iter()
        .find(|suggestion| suggestion.task.id.as_str() == "p")
        .expect("old parent shrinks");
    assert_eq!((p.start, p.end), (dt(2020, 7, 1), dt(2020, 7, 3)));
}

#[test]
fn cut_cannot_be_pasted_into_its_own_subtree() {
    let mut engine = engine();
    engine.select_task(key("p"));
    engine.cut_selection();

    assert!(
        engine
            .paste_into(&key("c1"), copy_suffix)
            .expect("c1 exists")
            .is_none()
    );
    assert!(engine.clipboard().is_some());
    assert!(engine.paste_into(&key("ghost"), copy_suffix).is_err());
}

#[test]
fn replacing_tasks_drops_stale_selection() {
    let mut engine = engine();
    engine.select_task(key("c1"));
    engine.toggle_task_selection(key("q"));

    let remaining: Vec<TaskOrEmpty> = tasks()
        .into_iter()
        .filter(|row| row.id().as_str() != "q")
        .collect();
    engine.set_tasks(remaining);
    assert_eq!(selected_ids(&engine), vec!["c1"]);
}
