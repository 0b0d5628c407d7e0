use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{GanttError, GanttResult};

pub type ComparisonLevel = u32;

pub const DEFAULT_COMPARISON_LEVEL: ComparisonLevel = 1;

const fn default_comparison_level() -> ComparisonLevel {
    DEFAULT_COMPARISON_LEVEL
}

/// Task identifier, unique within one comparison level.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Full identity of a task row: `(comparison level, id)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskKey {
    pub level: ComparisonLevel,
    pub id: TaskId,
}

impl TaskKey {
    #[must_use]
    pub fn new(level: ComparisonLevel, id: impl Into<TaskId>) -> Self {
        Self {
            level,
            id: id.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    Task,
    Project,
    Milestone,
}

/// Task edge a dependency is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationTarget {
    StartOfTask,
    EndOfTask,
}

impl RelationTarget {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            RelationTarget::StartOfTask => "startOfTask",
            RelationTarget::EndOfTask => "endOfTask",
        }
    }
}

impl FromStr for RelationTarget {
    type Err = GanttError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "startOfTask" | "start_of_task" => Ok(RelationTarget::StartOfTask),
            "endOfTask" | "end_of_task" => Ok(RelationTarget::EndOfTask),
            _ => Err(GanttError::UnknownRelationTarget(value.to_owned())),
        }
    }
}

/// "The `own_target` edge of this task is constrained by the
/// `source_target` edge of `source_id`."
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dependency {
    pub source_id: TaskId,
    pub source_target: RelationTarget,
    pub own_target: RelationTarget,
}

impl Dependency {
    #[must_use]
    pub fn new(
        source_id: impl Into<TaskId>,
        source_target: RelationTarget,
        own_target: RelationTarget,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            source_target,
            own_target,
        }
    }

    /// Classic finish-to-start edge.
    #[must_use]
    pub fn finish_to_start(source_id: impl Into<TaskId>) -> Self {
        Self::new(
            source_id,
            RelationTarget::EndOfTask,
            RelationTarget::StartOfTask,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    #[serde(rename = "type")]
    pub kind: TaskKind,
    #[serde(default)]
    pub name: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Completion percentage, `0..=100`.
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub parent: Option<TaskId>,
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
    #[serde(default)]
    pub hide_children: bool,
    #[serde(default)]
    pub display_order: Option<i64>,
    #[serde(default = "default_comparison_level")]
    pub comparison_level: ComparisonLevel,
    /// Disabled tasks never start a gesture.
    #[serde(default)]
    pub is_disabled: bool,
}

impl Task {
    #[must_use]
    pub fn new(
        id: impl Into<TaskId>,
        kind: TaskKind,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Self {
        let id = id.into();
        Self {
            name: id.as_str().to_owned(),
            id,
            kind,
            start,
            end,
            progress: 0,
            parent: None,
            dependencies: Vec::new(),
            hide_children: false,
            display_order: None,
            comparison_level: DEFAULT_COMPARISON_LEVEL,
            is_disabled: false,
        }
    }

    #[must_use]
    pub fn milestone(id: impl Into<TaskId>, at: NaiveDateTime) -> Self {
        Self::new(id, TaskKind::Milestone, at, at)
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<TaskId>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    #[must_use]
    pub fn with_progress(mut self, progress: u8) -> Self {
        self.progress = progress.min(100);
        self
    }

    #[must_use]
    pub fn with_dependency(mut self, dependency: Dependency) -> Self {
        self.dependencies.push(dependency);
        self
    }

    #[must_use]
    pub fn with_comparison_level(mut self, level: ComparisonLevel) -> Self {
        self.comparison_level = level;
        self
    }

    #[must_use]
    pub fn with_display_order(mut self, order: i64) -> Self {
        self.display_order = Some(order);
        self
    }

    #[must_use]
    pub fn with_hidden_children(mut self, hide: bool) -> Self {
        self.hide_children = hide;
        self
    }

    #[must_use]
    pub fn key(&self) -> TaskKey {
        TaskKey::new(self.comparison_level, self.id.clone())
    }

    #[must_use]
    pub fn is_milestone(&self) -> bool {
        self.kind == TaskKind::Milestone
    }

    /// Instant the given edge of this task sits at.
    #[must_use]
    pub fn anchor(&self, target: RelationTarget) -> NaiveDateTime {
        match target {
            RelationTarget::StartOfTask => self.start,
            RelationTarget::EndOfTask => self.end,
        }
    }
}

/// Placeholder row without dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmptyTask {
    pub id: TaskId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub parent: Option<TaskId>,
    #[serde(default)]
    pub display_order: Option<i64>,
    #[serde(default = "default_comparison_level")]
    pub comparison_level: ComparisonLevel,
}

impl EmptyTask {
    #[must_use]
    pub fn new(id: impl Into<TaskId>) -> Self {
        let id = id.into();
        Self {
            name: id.as_str().to_owned(),
            id,
            parent: None,
            display_order: None,
            comparison_level: DEFAULT_COMPARISON_LEVEL,
        }
    }

    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<TaskId>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    #[must_use]
    pub fn with_comparison_level(mut self, level: ComparisonLevel) -> Self {
        self.comparison_level = level;
        self
    }
}

/// One input row: a dated task or an empty placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "row", rename_all = "snake_case")]
pub enum TaskOrEmpty {
    Task(Task),
    Empty(EmptyTask),
}

impl TaskOrEmpty {
    #[must_use]
    pub fn id(&self) -> &TaskId {
        match self {
            TaskOrEmpty::Task(task) => &task.id,
            TaskOrEmpty::Empty(empty) => &empty.id,
        }
    }

    #[must_use]
    pub fn parent(&self) -> Option<&TaskId> {
        match self {
            TaskOrEmpty::Task(task) => task.parent.as_ref(),
            TaskOrEmpty::Empty(empty) => empty.parent.as_ref(),
        }
    }

    #[must_use]
    pub fn comparison_level(&self) -> ComparisonLevel {
        match self {
            TaskOrEmpty::Task(task) => task.comparison_level,
            TaskOrEmpty::Empty(empty) => empty.comparison_level,
        }
    }

    #[must_use]
    pub fn display_order(&self) -> Option<i64> {
        match self {
            TaskOrEmpty::Task(task) => task.display_order,
            TaskOrEmpty::Empty(empty) => empty.display_order,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            TaskOrEmpty::Task(task) => &task.name,
            TaskOrEmpty::Empty(empty) => &empty.name,
        }
    }

    #[must_use]
    pub fn key(&self) -> TaskKey {
        TaskKey::new(self.comparison_level(), self.id().clone())
    }

    #[must_use]
    pub fn as_task(&self) -> Option<&Task> {
        match self {
            TaskOrEmpty::Task(task) => Some(task),
            TaskOrEmpty::Empty(_) => None,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, TaskOrEmpty::Empty(_))
    }

    /// Parent rewired to `parent`, keeping the variant.
    #[must_use]
    pub fn with_parent(self, parent: Option<TaskId>) -> Self {
        match self {
            TaskOrEmpty::Task(mut task) => {
                task.parent = parent;
                TaskOrEmpty::Task(task)
            }
            TaskOrEmpty::Empty(mut empty) => {
                empty.parent = parent;
                TaskOrEmpty::Empty(empty)
            }
        }
    }
}

impl From<Task> for TaskOrEmpty {
    fn from(task: Task) -> Self {
        TaskOrEmpty::Task(task)
    }
}

impl From<EmptyTask> for TaskOrEmpty {
    fn from(empty: EmptyTask) -> Self {
        TaskOrEmpty::Empty(empty)
    }
}

/// Parses a JSON array of rows.
pub fn tasks_from_json_str(input: &str) -> GanttResult<Vec<TaskOrEmpty>> {
    serde_json::from_str(input)
        .map_err(|e| GanttError::InvalidData(format!("failed to parse task list json: {e}")))
}

pub fn tasks_to_json_pretty(tasks: &[TaskOrEmpty]) -> GanttResult<String> {
    serde_json::to_string_pretty(tasks)
        .map_err(|e| GanttError::InvalidData(format!("failed to serialize task list json: {e}")))
}
