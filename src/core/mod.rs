pub mod aggregates;
pub mod calendar_labels;
pub mod change_metadata;
pub mod coordinates;
pub mod dependency;
pub mod hierarchy;
pub mod level_map;
pub mod primitives;
pub mod task;
pub mod time_grid;
pub mod view_mode;
pub mod working_dates;

pub use aggregates::{
    ChildOutOfParentWarning, ChildOutOfParentWarnings, CriticalPath, CriticalPaths,
    check_is_descendant, collect_parents, get_all_descendants, get_child_out_of_parent_warnings,
    get_critical_path,
};
pub use calendar_labels::{CalendarHeader, HeaderLabel, calendar_header};
pub use change_metadata::{
    BarMoveAction, ChangeAction, ChangeMetadata, ChangeOptions, ChangeSuggestion, TaskIndexEntry,
    resolve_change_metadata, suggest_dependency_fix, suggest_parent_fit,
};
pub use coordinates::{
    ArrowAnchors, CoordinateSpace, CoordinatesMap, RowGeometry, TaskCoordinates,
    build_coordinates, count_task_coordinates, date_by_x, dependency_arrow_anchors,
    progress_with_by_params,
};
pub use dependency::{
    DependencyGraph, ExpandedDependency, ExpandedDependent, build_dependency_and_dependent_maps,
};
pub use hierarchy::{
    ChildMap, CollapsedSet, NestedIndex, RowIndexMap, TaskIndex, TaskMap,
    build_nested_index_map, build_visible_row_index_map, sort_tasks, visible_tasks,
};
pub use level_map::LevelMap;
pub use task::{
    ComparisonLevel, DEFAULT_COMPARISON_LEVEL, Dependency, EmptyTask, RelationTarget, Task,
    TaskId, TaskKey, TaskKind, TaskOrEmpty,
};
pub use time_grid::{TimeGrid, seed_dates};
pub use view_mode::{ViewMode, week_number_iso8601};
pub use working_dates::{
    HolidayCalendar, WeekendCalendar, WorkingCalendar, adjust_to_working_dates,
    count_working_units,
};
