/// Copy pass - copies one named texture into another.

use crate::compositor::PassExecutionContext;
use crate::error::{Error, Result};
use crate::graphics_device::{Command, CommandBuffer};

#[derive(Debug, Clone)]
pub struct CopyPass {
    destination_texture: String,
    source_texture: String,
}

impl CopyPass {
    pub fn new(destination_texture: &str, source_texture: &str) -> Self {
        Self {
            destination_texture: destination_texture.to_string(),
            source_texture: source_texture.to_string(),
        }
    }

    pub fn destination_texture(&self) -> &str {
        &self.destination_texture
    }

    pub fn source_texture(&self) -> &str {
        &self.source_texture
    }

    pub(crate) fn fill(&self, ctx: &PassExecutionContext<'_>, cmd: &mut CommandBuffer) -> Result<()> {
        let lookup = |name: &str| {
            ctx.render_targets
                .texture(name)
                .cloned()
                .ok_or_else(|| Error::InvalidResource(format!("Copy pass texture '{}' not found", name)))
        };
        let destination = lookup(&self.destination_texture)?;
        let source = lookup(&self.source_texture)?;
        cmd.push(Command::CopyResource { destination, source });
        Ok(())
    }
}
