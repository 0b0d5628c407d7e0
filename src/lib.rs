//! gantt-rs: renderer-agnostic Gantt chart engine.
//!
//! Turns a multi-level task list into row layout, screen coordinates,
//! dependency adjacency and hierarchy aggregates, and drives the bar
//! drag/resize/relation gestures that edit it. Rendering stays with the
//! host; the engine exposes plain data and callbacks.

pub mod api;
pub mod core;
pub mod error;
pub mod extensions;
pub mod interaction;
pub mod telemetry;

pub use api::{GanttEngine, GanttEngineConfig, GanttHandler, NullHandler};
pub use error::{GanttError, GanttResult};
