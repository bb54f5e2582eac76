/// Scene pass - draws the visible renderables of one render-queue-index range.

use crate::compositor::PassExecutionContext;
use crate::compositor::ScenePassDesc;
use crate::engine_error;
use crate::error::Result;
use crate::graphics_device::CommandBuffer;
use crate::render_queue::{RenderQueue, RenderQueueIndexRanges};

pub struct ScenePass {
    desc: ScenePassDesc,
    /// Position of the pass range in the workspace table, cached once loaded
    range_index: Option<usize>,
    render_queue: RenderQueue,
}

impl ScenePass {
    pub fn new(desc: ScenePassDesc) -> Self {
        let render_queue = RenderQueue::new(
            desc.minimum_render_queue_index,
            desc.maximum_render_queue_index,
            desc.position_only,
            desc.transparent,
            desc.do_sort,
        );
        Self { desc, range_index: None, render_queue }
    }

    pub fn desc(&self) -> &ScenePassDesc {
        &self.desc
    }

    pub fn render_queue(&self) -> &RenderQueue {
        &self.render_queue
    }

    /// Index of the cached render-queue-index range
    pub fn range_index(&self) -> Option<usize> {
        self.range_index
    }

    pub(crate) fn on_workspace_loading_finished(&mut self, ranges: &RenderQueueIndexRanges) {
        self.range_index = ranges.range_index(
            self.desc.minimum_render_queue_index,
            self.desc.maximum_render_queue_index,
        );
        if self.range_index.is_none() {
            engine_error!(
                "galaxy3d::ScenePass",
                "No render queue index range [{}, {}] registered",
                self.desc.minimum_render_queue_index, self.desc.maximum_render_queue_index
            );
        }
    }

    /// Feed the managers culled into the pass range to the render queue.
    /// Returns the number of queued renderables.
    pub(crate) fn queue_visible_renderables(&mut self, ctx: &PassExecutionContext<'_>) -> usize {
        let Some(range) = self.range_index.and_then(|index| ctx.ranges.get(index)) else {
            return 0;
        };
        for &key in &range.managers {
            if let Some(manager) = ctx.scene.renderable_manager(key) {
                self.render_queue.add_renderables_from_renderable_manager(
                    manager,
                    self.desc.technique,
                    ctx.context,
                    ctx.materials,
                    self.desc.cast_shadows,
                    self.desc.use_lod0,
                );
            }
        }
        self.render_queue.number_of_queued_renderables()
    }

    /// Record the queued draws
    pub(crate) fn record(&mut self, ctx: &mut PassExecutionContext<'_>, cmd: &mut CommandBuffer) -> Result<usize> {
        if self.render_queue.number_of_queued_renderables() == 0 {
            return Ok(0);
        }
        self.render_queue.fill_graphics_command_buffer(ctx.context, ctx.instance_buffers, cmd)
    }

    pub(crate) fn fill(&mut self, ctx: &mut PassExecutionContext<'_>, cmd: &mut CommandBuffer) -> Result<usize> {
        self.queue_visible_renderables(ctx);
        self.record(ctx, cmd)
    }

    pub(crate) fn on_post_command_buffer_execution(&mut self) {
        self.render_queue.clear();
    }
}
