use chrono::{NaiveDate, NaiveDateTime};
use gantt_rs::api::{GanttEngine, GanttEngineConfig, GanttHandler, PointerUpOutcome};
use gantt_rs::core::{BarMoveAction, Task, TaskKey, TaskKind, TaskOrEmpty, ViewMode};
use gantt_rs::interaction::InteractionMode;

const DAY_MS: i64 = 86_400_000;

#[derive(Debug, Default)]
struct RecordingHandler {
    date_changes: Vec<(BarMoveAction, Task, Task)>,
    progress_changes: Vec<Task>,
}

impl GanttHandler for RecordingHandler {
    fn on_date_change(&mut self, action: BarMoveAction, changed: &Task, original: &Task) {
        self.date_changes
            .push((action, changed.clone(), original.clone()));
    }

    fn on_progress_change(&mut self, task: &Task) {
        self.progress_changes.push(task.clone());
    }
}

fn dt(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|day| day.and_hms_opt(h, 0, 0))
        .expect("valid datetime")
}

fn tasks() -> Vec<TaskOrEmpty> {
    let mut locked = Task::new("locked", TaskKind::Task, dt(2020, 7, 1, 0), dt(2020, 7, 2, 0));
    locked.is_disabled = true;
    vec![
        Task::new("a", TaskKind::Task, dt(2020, 7, 1, 0), dt(2020, 7, 3, 0)).into(),
        Task::milestone("m", dt(2020, 7, 6, 0)).into(),
        locked.into(),
    ]
}

/// Day view with a one-day drag quantum: 60 px per step. Bar `a` spans
/// x 60..180.
fn engine_with(config: GanttEngineConfig) -> GanttEngine<RecordingHandler> {
    GanttEngine::new(RecordingHandler::default(), config, tasks())
        .expect("engine init")
        .with_reference_now(dt(2020, 7, 1, 0))
}

fn day_config() -> GanttEngineConfig {
    GanttEngineConfig::new(ViewMode::Day).with_time_step_ms(DAY_MS)
}

fn key(id: &str) -> TaskKey {
    TaskKey::new(1, id)
}

#[test]
fn move_commits_whole_steps() {
    let mut engine = engine_with(day_config());
    assert!(
        engine
            .pointer_down_on_task(&key("a"), BarMoveAction::Move, 100.0)
            .expect("gesture")
    );
    assert_eq!(engine.interaction().mode(), InteractionMode::Moving);

    engine.pointer_move(125.0, 20.0);
    let outcome = engine.pointer_up(160.0, 20.0);

    let PointerUpOutcome::DateChanged {
        action,
        changed,
        original,
    } = outcome
    else {
        panic!("expected a committed move, got {outcome:?}");
    };
    assert_eq!(action, BarMoveAction::Move);
    assert_eq!(changed.start, dt(2020, 7, 2, 0));
    assert_eq!(changed.end, dt(2020, 7, 4, 0));
    assert_eq!(original.start, dt(2020, 7, 1, 0));
    assert_eq!(engine.handler().date_changes.len(), 1);
    assert_eq!(engine.interaction().mode(), InteractionMode::Idle);
}

#[test]
fn sub_step_jitter_never_commits() {
    let mut engine = engine_with(day_config());
    engine
        .pointer_down_on_task(&key("a"), BarMoveAction::Move, 100.0)
        .expect("gesture");
    engine.pointer_move(120.0, 20.0);
    engine.pointer_move(85.0, 20.0);

    assert_eq!(engine.pointer_up(110.0, 20.0), PointerUpOutcome::Discarded);
    assert!(engine.handler().date_changes.is_empty());
}

#[test]
fn drag_back_to_origin_is_not_a_change() {
    let mut engine = engine_with(day_config());
    engine
        .pointer_down_on_task(&key("a"), BarMoveAction::Move, 100.0)
        .expect("gesture");
    engine.pointer_move(220.0, 20.0);
    assert_eq!(
        engine.interaction().gesture().map(|g| g.changed_task.start),
        Some(dt(2020, 7, 3, 0))
    );

    assert_eq!(engine.pointer_up(100.0, 20.0), PointerUpOutcome::Discarded);
    assert!(engine.handler().date_changes.is_empty());
}

#[test]
fn end_resize_is_clamped_before_the_start_edge() {
    let mut engine = engine_with(day_config());
    engine
        .pointer_down_on_task(&key("a"), BarMoveAction::End, 180.0)
        .expect("gesture");
    let outcome = engine.pointer_up(0.0, 20.0);

    let PointerUpOutcome::DateChanged { changed, .. } = outcome else {
        panic!("expected a committed resize, got {outcome:?}");
    };
    assert_eq!(changed.start, dt(2020, 7, 1, 0));
    assert!(changed.end > changed.start);
    assert!(changed.end < dt(2020, 7, 3, 0));
}

#[test]
fn start_resize_moves_only_the_start() {
    let mut engine = engine_with(day_config());
    engine
        .pointer_down_on_task(&key("a"), BarMoveAction::Start, 60.0)
        .expect("gesture");
    let outcome = engine.pointer_up(0.0, 20.0);

    let PointerUpOutcome::DateChanged { changed, .. } = outcome else {
        panic!("expected a committed resize, got {outcome:?}");
    };
    assert_eq!(changed.start, dt(2020, 6, 30, 0));
    assert_eq!(changed.end, dt(2020, 7, 3, 0));
}

#[test]
fn rtl_start_handle_edits_the_right_edge() {
    let mut engine = engine_with(day_config().with_rtl(true));
    let coords = engine
        .layout()
        .coordinates
        .get(1, &"a".into())
        .copied()
        .expect("a is laid out");

    engine
        .pointer_down_on_task(&key("a"), BarMoveAction::Start, coords.x2)
        .expect("gesture");
    let outcome = engine.pointer_up(coords.x2 + 60.0, 20.0);

    let PointerUpOutcome::DateChanged { changed, .. } = outcome else {
        panic!("expected a committed resize, got {outcome:?}");
    };
    assert_eq!(changed.start, dt(2020, 6, 30, 0));
    assert_eq!(changed.end, dt(2020, 7, 3, 0));
}

#[test]
fn progress_uses_its_own_callback() {
    let mut engine = engine_with(day_config());
    engine
        .pointer_down_on_task(&key("a"), BarMoveAction::Progress, 60.0)
        .expect("gesture");
    assert_eq!(
        engine.interaction().mode(),
        InteractionMode::AdjustingProgress
    );
    engine.pointer_move(120.0, 20.0);
    let outcome = engine.pointer_up(120.0, 20.0);

    let PointerUpOutcome::ProgressChanged(task) = outcome else {
        panic!("expected a progress commit, got {outcome:?}");
    };
    assert_eq!(task.progress, 50);
    assert_eq!(task.start, dt(2020, 7, 1, 0));
    assert_eq!(engine.handler().progress_changes.len(), 1);
    assert!(engine.handler().date_changes.is_empty());
}

#[test]
fn refused_gestures_leave_the_engine_idle() {
    let mut engine = engine_with(day_config());
    assert!(
        !engine
            .pointer_down_on_task(&key("m"), BarMoveAction::End, 300.0)
            .expect("milestone is known")
    );
    assert!(
        !engine
            .pointer_down_on_task(&key("locked"), BarMoveAction::Move, 70.0)
            .expect("locked is known")
    );
    assert!(
        engine
            .pointer_down_on_task(&TaskKey::new(1, "ghost"), BarMoveAction::Move, 0.0)
            .is_err()
    );
    assert_eq!(engine.interaction().mode(), InteractionMode::Idle);
}

#[test]
fn second_gesture_is_refused_while_one_is_active() {
    let mut engine = engine_with(day_config());
    assert!(
        engine
            .pointer_down_on_task(&key("a"), BarMoveAction::Move, 100.0)
            .expect("gesture")
    );
    assert!(
        !engine
            .pointer_down_on_task(&key("m"), BarMoveAction::Move, 300.0)
            .expect("refused, not failed")
    );
    assert_eq!(
        engine.interaction().gesture().map(|g| g.original_task.id.to_string()),
        Some("a".to_owned())
    );
}

#[test]
fn milestones_move_as_a_point() {
    let mut engine = engine_with(day_config());
    engine
        .pointer_down_on_task(&key("m"), BarMoveAction::Move, 360.0)
        .expect("gesture");
    let outcome = engine.pointer_up(480.0, 70.0);

    let PointerUpOutcome::DateChanged { changed, .. } = outcome else {
        panic!("expected a committed move, got {outcome:?}");
    };
    assert_eq!(changed.start, dt(2020, 7, 8, 0));
    assert_eq!(changed.end, changed.start);
}

#[test]
fn cancel_clears_the_gesture_without_callbacks() {
    let mut engine = engine_with(day_config());
    engine
        .pointer_down_on_task(&key("a"), BarMoveAction::Move, 100.0)
        .expect("gesture");
    engine.pointer_move(220.0, 20.0);

    assert!(engine.cancel_gesture());
    assert!(!engine.cancel_gesture());
    assert_eq!(engine.pointer_up(220.0, 20.0), PointerUpOutcome::Idle);
    assert!(engine.handler().date_changes.is_empty());
}

#[test]
fn release_rounds_to_the_nearest_unit_when_enabled() {
    let config = GanttEngineConfig::new(ViewMode::Day)
        .with_time_step_ms(3_600_000)
        .with_round_dates(true);
    let mut engine = engine_with(config);
    engine
        .pointer_down_on_task(&key("a"), BarMoveAction::Move, 100.0)
        .expect("gesture");
    // 30 px at 2.5 px per hour is a twelve hour shift, which rounds up.
    let outcome = engine.pointer_up(130.0, 20.0);

    let PointerUpOutcome::DateChanged { changed, .. } = outcome else {
        panic!("expected a committed move, got {outcome:?}");
    };
    assert_eq!(changed.start, dt(2020, 7, 2, 0));
    assert_eq!(changed.end, dt(2020, 7, 4, 0));
}

#[test]
fn release_skips_weekends_when_working_dates_are_enforced() {
    let mut engine = engine_with(day_config().with_working_dates_only(true));
    engine
        .pointer_down_on_task(&key("a"), BarMoveAction::Move, 100.0)
        .expect("gesture");
    // Three days later lands on Saturday 2020-07-04.
    let outcome = engine.pointer_up(280.0, 20.0);

    let PointerUpOutcome::DateChanged { changed, .. } = outcome else {
        panic!("expected a committed move, got {outcome:?}");
    };
    assert_eq!(changed.start, dt(2020, 7, 6, 0));
    assert_eq!(changed.end, dt(2020, 7, 8, 0));
}

#[test]
fn auto_scroll_reads_the_live_pointer() {
    let mut engine = engine_with(day_config());
    assert_eq!(engine.auto_scroll_tick(), None);

    engine
        .pointer_down_on_task(&key("a"), BarMoveAction::Move, 500.0)
        .expect("gesture");
    assert_eq!(engine.auto_scroll_tick(), None);

    engine.pointer_move(990.0, 20.0);
    assert_eq!(engine.auto_scroll_tick(), Some(10.0));
    assert_eq!(engine.auto_scroll_tick(), Some(20.0));
    assert_eq!(engine.scroll().x, 20.0);

    engine.pointer_move(500.0, 20.0);
    assert_eq!(engine.auto_scroll_tick(), None);
}

#[test]
fn auto_scroll_stops_at_the_content_edge() {
    let mut engine = engine_with(day_config());
    engine.set_scroll(10_000.0, 0.0);
    let max_scroll = engine.layout().content_width() - engine.config().viewport_width;
    assert_eq!(engine.scroll().x, max_scroll);

    engine
        .pointer_down_on_task(&key("a"), BarMoveAction::Move, 995.0)
        .expect("gesture");
    assert_eq!(engine.auto_scroll_tick(), None);
}
