use thiserror::Error;

pub type GanttResult<T> = Result<T, GanttError>;

#[derive(Debug, Error)]
pub enum GanttError {
    #[error("unknown view mode: `{0}`")]
    UnknownViewMode(String),

    #[error("unknown relation target: `{0}`")]
    UnknownRelationTarget(String),

    #[error("comparison level {0} is not present in the task index")]
    UnknownComparisonLevel(u32),

    #[error("task `{id}` at comparison level {level} has no row index")]
    MissingRowIndex { level: u32, id: String },

    #[error("task `{id}` at comparison level {level} was not found")]
    TaskNotFound { level: u32, id: String },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("invalid data: {0}")]
    InvalidData(String),
}
