use serde::{Deserialize, Serialize};

/// Edge auto-scroll tuning while a bar is dragged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AutoScrollConfig {
    /// Host timer period between ticks.
    pub interval_ms: u64,
    /// Distance from a viewport edge that triggers scrolling.
    pub edge_margin_px: f64,
    /// Scroll distance applied per tick.
    pub step_px: f64,
}

impl Default for AutoScrollConfig {
    fn default() -> Self {
        Self {
            interval_ms: 25,
            edge_margin_px: 70.0,
            step_px: 10.0,
        }
    }
}

/// Signed scroll delta for a pointer at `viewport_x`, or `None` when the
/// pointer is away from both edges.
#[must_use]
pub fn resolve_auto_scroll_delta(
    viewport_x: f64,
    viewport_width: f64,
    config: AutoScrollConfig,
) -> Option<f64> {
    if !viewport_x.is_finite() || viewport_width <= 0.0 {
        return None;
    }
    if viewport_x <= config.edge_margin_px {
        Some(-config.step_px)
    } else if viewport_x >= viewport_width - config.edge_margin_px {
        Some(config.step_px)
    } else {
        None
    }
}

/// Scroll offset after applying `delta`, kept inside the scrollable range.
#[must_use]
pub fn clamp_scroll(scroll_x: f64, delta: f64, content_width: f64, viewport_width: f64) -> f64 {
    let max_scroll = (content_width - viewport_width).max(0.0);
    (scroll_x + delta).clamp(0.0, max_scroll)
}
