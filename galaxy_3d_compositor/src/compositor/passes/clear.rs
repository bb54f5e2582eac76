/// Clear pass - clears the current render target.

use crate::graphics_device::{ClearFlags, Command, CommandBuffer};

#[derive(Debug, Clone)]
pub struct ClearPass {
    flags: ClearFlags,
    color: [f32; 4],
    depth: f32,
    stencil: u32,
}

impl ClearPass {
    pub fn new(flags: ClearFlags, color: [f32; 4], depth: f32, stencil: u32) -> Self {
        Self { flags, color, depth, stencil }
    }

    pub fn flags(&self) -> ClearFlags {
        self.flags
    }

    pub fn color(&self) -> [f32; 4] {
        self.color
    }

    pub(crate) fn fill(&self, cmd: &mut CommandBuffer) {
        cmd.push(Command::ClearGraphics {
            flags: self.flags,
            color: self.color,
            depth: self.depth,
            stencil: self.stencil,
        });
    }
}
