use crate::error::{GanttError, GanttResult};
use crate::extensions::{GanttPlugin, PluginContext};

use super::{GanttEngine, GanttHandler, PluginEvent};

impl<H: GanttHandler> GanttEngine<H> {
    /// Attaches an observer. Ids must be non-empty and unique per engine.
    pub fn register_plugin(&mut self, plugin: Box<dyn GanttPlugin>) -> GanttResult<()> {
        if plugin.id().is_empty() {
            return Err(GanttError::InvalidData("plugin id must not be empty".to_owned()));
        }
        if self.plugin_ids().any(|id| id == plugin.id()) {
            return Err(GanttError::InvalidData(format!(
                "plugin `{}` is already attached",
                plugin.id()
            )));
        }
        self.plugins.push(plugin);
        Ok(())
    }

    /// Detaches and hands back the plugin with `plugin_id`, if attached.
    pub fn unregister_plugin(&mut self, plugin_id: &str) -> Option<Box<dyn GanttPlugin>> {
        let position = self.plugins.iter().position(|plugin| plugin.id() == plugin_id)?;
        Some(self.plugins.remove(position))
    }

    pub(super) fn plugin_context(&self) -> PluginContext {
        PluginContext {
            view_mode: self.config.view_mode,
            column_width: self.config.column_width,
            content_width: self.layout.content_width(),
            task_count: self.index.tasks.len(),
            row_count: self.layout.rows.row_count(),
            interaction_mode: self.interaction.mode(),
            scroll: self.interaction.scroll(),
            selected_count: self.interaction.selection().selected().len(),
        }
    }

    pub(super) fn emit_plugin_event(&mut self, event: &PluginEvent) {
        if self.plugins.is_empty() {
            return;
        }
        let context = self.plugin_context();
        for plugin in &mut self.plugins {
            plugin.on_event(event, context);
        }
    }
}
