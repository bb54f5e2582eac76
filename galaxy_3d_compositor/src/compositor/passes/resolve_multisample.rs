/// Resolve multisample pass - resolves a multisample framebuffer into the
/// current render target.

use std::sync::Arc;
use crate::compositor::PassExecutionContext;
use crate::error::{Error, Result};
use crate::graphics_device::{Command, CommandBuffer, RenderTarget};

#[derive(Debug, Clone)]
pub struct ResolveMultisamplePass {
    source_framebuffer: String,
}

impl ResolveMultisamplePass {
    pub fn new(source_framebuffer: &str) -> Self {
        Self { source_framebuffer: source_framebuffer.to_string() }
    }

    pub fn source_framebuffer(&self) -> &str {
        &self.source_framebuffer
    }

    pub(crate) fn fill(
        &self,
        render_target: &Arc<dyn RenderTarget>,
        ctx: &PassExecutionContext<'_>,
        cmd: &mut CommandBuffer,
    ) -> Result<()> {
        let source = ctx.render_targets.framebuffer(&self.source_framebuffer).cloned().ok_or_else(|| {
            Error::InvalidResource(format!("Resolve source framebuffer '{}' not found", self.source_framebuffer))
        })?;
        cmd.push(Command::ResolveMultisampleFramebuffer {
            destination: render_target.clone(),
            source,
        });
        Ok(())
    }
}
