use crate::error::{GanttError, GanttResult};
use crate::interaction::AutoScrollConfig;

use super::GanttEngineConfig;

pub(super) fn validate_config(config: &GanttEngineConfig) -> GanttResult<()> {
    for (name, value) in [
        ("column_width", config.column_width),
        ("row_height", config.row_height),
        ("task_height", config.task_height),
        ("viewport_width", config.viewport_width),
        ("viewport_height", config.viewport_height),
    ] {
        if !value.is_finite() || value <= 0.0 {
            return Err(GanttError::InvalidConfig(format!(
                "{name} must be finite and > 0"
            )));
        }
    }
    for (name, value) in [
        ("handle_width", config.handle_width),
        ("relation_circle_offset", config.relation_circle_offset),
        ("relation_circle_radius", config.relation_circle_radius),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(GanttError::InvalidConfig(format!(
                "{name} must be finite and >= 0"
            )));
        }
    }
    if config.task_height > config.row_height {
        return Err(GanttError::InvalidConfig(
            "task_height must not exceed row_height".to_owned(),
        ));
    }
    if config.comparison_levels == 0 {
        return Err(GanttError::InvalidConfig(
            "comparison_levels must be >= 1".to_owned(),
        ));
    }
    if config.time_step_ms <= 0 {
        return Err(GanttError::InvalidConfig(
            "time_step_ms must be > 0".to_owned(),
        ));
    }
    validate_auto_scroll_config(config.auto_scroll)
}

fn validate_auto_scroll_config(config: AutoScrollConfig) -> GanttResult<()> {
    if config.interval_ms == 0 {
        return Err(GanttError::InvalidConfig(
            "auto_scroll.interval_ms must be > 0".to_owned(),
        ));
    }
    if !config.edge_margin_px.is_finite() || config.edge_margin_px < 0.0 {
        return Err(GanttError::InvalidConfig(
            "auto_scroll.edge_margin_px must be finite and >= 0".to_owned(),
        ));
    }
    if !config.step_px.is_finite() || config.step_px <= 0.0 {
        return Err(GanttError::InvalidConfig(
            "auto_scroll.step_px must be finite and > 0".to_owned(),
        ));
    }
    Ok(())
}
