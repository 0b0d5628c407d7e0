mod data_controller;
mod drag_controller;
mod engine;
mod engine_config;
mod engine_init;
mod engine_snapshot;
mod handler;
mod json_contract;
mod layout;
mod plugin_dispatch;
mod relation_controller;
mod scroll_controller;
mod selection_controller;
mod snapshot_controller;
mod validation;

pub use crate::extensions::{GanttPlugin, PluginContext, PluginEvent};
pub use drag_controller::PointerUpOutcome;
pub use engine::GanttEngine;
pub use engine_config::GanttEngineConfig;
pub use engine_snapshot::EngineSnapshot;
pub use handler::{GanttHandler, NullHandler};
pub use json_contract::{ENGINE_SNAPSHOT_JSON_SCHEMA_V1, EngineSnapshotJsonContractV1};
pub use layout::GanttLayout;
