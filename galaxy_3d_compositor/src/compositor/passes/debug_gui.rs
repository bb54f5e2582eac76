/// Debug GUI pass - lets the application record its debug GUI.

use std::sync::Arc;
use crate::compositor::PassExecutionContext;
use crate::graphics_device::{CommandBuffer, RenderTarget};

#[derive(Debug, Clone, Default)]
pub struct DebugGuiPass;

impl DebugGuiPass {
    pub fn new() -> Self {
        Self
    }

    #[cfg(feature = "debug-gui")]
    pub(crate) fn fill(&self, render_target: &Arc<dyn RenderTarget>, ctx: &PassExecutionContext<'_>, cmd: &mut CommandBuffer) {
        if let Some(debug_gui) = &ctx.context.debug_gui {
            debug_gui.fill_command_buffer(render_target, cmd);
        }
    }

    /// # Panics
    ///
    /// Always: the graph needs the debug GUI but it is not compiled in.
    #[cfg(not(feature = "debug-gui"))]
    pub(crate) fn fill(&self, _render_target: &Arc<dyn RenderTarget>, _ctx: &PassExecutionContext<'_>, _cmd: &mut CommandBuffer) {
        panic!("Debug GUI compositor pass used but the `debug-gui` feature is disabled");
    }
}
