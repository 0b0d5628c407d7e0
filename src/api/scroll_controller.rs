use chrono::NaiveDateTime;

use crate::interaction::{ScrollState, clamp_scroll};

use super::{GanttEngine, GanttHandler, PluginEvent};

impl<H: GanttHandler> GanttEngine<H> {
    #[must_use]
    pub fn scroll(&self) -> ScrollState {
        self.interaction.scroll()
    }

    /// Sets the viewport scroll, clamped to the content size.
    pub fn set_scroll(&mut self, x: f64, y: f64) {
        let next = ScrollState {
            x: clamp_scroll(
                0.0,
                x,
                self.layout.content_width(),
                self.config.viewport_width,
            ),
            y: clamp_scroll(
                0.0,
                y,
                self.layout.content_height(),
                self.config.viewport_height,
            ),
        };
        if next == self.interaction.scroll() {
            return;
        }
        self.interaction.set_scroll(next);
        self.emit_plugin_event(&PluginEvent::ScrollChanged {
            x: next.x,
            y: next.y,
        });
    }

    /// Content x of `date`, for scrolling a date into view.
    #[must_use]
    pub fn date_to_x(&self, date: NaiveDateTime) -> f64 {
        self.layout.space.date_to_x(date)
    }
}
