/// Command buffer - ordered list of device commands recorded by the compositor
///
/// The compositor records the whole frame into one `CommandBuffer` and
/// submits it once. The recorded commands stay readable after submission so
/// that profiling collaborators can gather statistics.

use std::fmt;
use std::sync::Arc;
use bitflags::bitflags;
use crate::graphics_device::{
    BindingGroup, Buffer, ComputePipeline, GraphicsPipeline, IndirectBuffer,
    RenderTarget, RootSignature, Texture, VertexArray,
};

// ===== VIEWPORT / SCISSOR =====

/// Viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub min_depth: f32,
    pub max_depth: f32,
}

impl Viewport {
    /// Full-surface viewport with the given depth range
    pub fn full(width: u32, height: u32, min_depth: f32, max_depth: f32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: width as f32,
            height: height as f32,
            min_depth,
            max_depth,
        }
    }
}

/// Scissor rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect2D {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

// ===== CLEAR FLAGS =====

bitflags! {
    /// Which aspects of the current render target a clear touches
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ClearFlags: u32 {
        const COLOR = 1 << 0;
        const DEPTH = 1 << 1;
        const STENCIL = 1 << 2;
        const COLOR_DEPTH = Self::COLOR.bits() | Self::DEPTH.bits();
    }
}

// ===== COMMANDS =====

/// One recorded device command
#[derive(Clone)]
pub enum Command {
    SetGraphicsRenderTarget(Arc<dyn RenderTarget>),
    SetGraphicsViewportAndScissorRectangle {
        viewport: Viewport,
        scissor: Rect2D,
    },
    ClearGraphics {
        flags: ClearFlags,
        color: [f32; 4],
        depth: f32,
        stencil: u32,
    },
    SetGraphicsRootSignature(Arc<dyn RootSignature>),
    SetGraphicsPipelineState(Arc<dyn GraphicsPipeline>),
    SetGraphicsResourceGroup {
        root_parameter_index: u32,
        resource_group: Arc<dyn BindingGroup>,
    },
    SetGraphicsVertexArray(Arc<dyn VertexArray>),
    /// Per-draw instance data (world matrices) for the following draw
    SetInstanceData {
        buffer: Arc<dyn Buffer>,
        offset: u64,
    },
    Draw {
        vertex_count_per_instance: u32,
        instance_count: u32,
        start_vertex: u32,
    },
    DrawIndexed {
        index_count_per_instance: u32,
        instance_count: u32,
        start_index: u32,
        base_vertex: i32,
    },
    DrawIndirect {
        indirect_buffer: Arc<dyn IndirectBuffer>,
        indirect_buffer_offset: u32,
        number_of_draws: u32,
        indexed: bool,
    },
    SetComputeRootSignature(Arc<dyn RootSignature>),
    SetComputePipelineState(Arc<dyn ComputePipeline>),
    SetComputeResourceGroup {
        root_parameter_index: u32,
        resource_group: Arc<dyn BindingGroup>,
    },
    DispatchCompute {
        group_count_x: u32,
        group_count_y: u32,
        group_count_z: u32,
    },
    CopyResource {
        destination: Arc<dyn Texture>,
        source: Arc<dyn Texture>,
    },
    GenerateMipmaps(Arc<dyn Texture>),
    ResolveMultisampleFramebuffer {
        destination: Arc<dyn RenderTarget>,
        source: Arc<dyn RenderTarget>,
    },
    /// Restrict sampling of `texture` to the mip range `[minimum, maximum]`
    SetTextureMinimumMaximumMipmapIndex {
        texture: Arc<dyn Texture>,
        minimum: u32,
        maximum: u32,
    },
    BeginDebugEvent(String),
    EndDebugEvent,
}

/// Payload-free mirror of `Command`, used for statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    SetGraphicsRenderTarget,
    SetGraphicsViewportAndScissorRectangle,
    ClearGraphics,
    SetGraphicsRootSignature,
    SetGraphicsPipelineState,
    SetGraphicsResourceGroup,
    SetGraphicsVertexArray,
    SetInstanceData,
    Draw,
    DrawIndexed,
    DrawIndirect,
    SetComputeRootSignature,
    SetComputePipelineState,
    SetComputeResourceGroup,
    DispatchCompute,
    CopyResource,
    GenerateMipmaps,
    ResolveMultisampleFramebuffer,
    SetTextureMinimumMaximumMipmapIndex,
    BeginDebugEvent,
    EndDebugEvent,
}

impl Command {
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::SetGraphicsRenderTarget(_) => CommandKind::SetGraphicsRenderTarget,
            Command::SetGraphicsViewportAndScissorRectangle { .. } => CommandKind::SetGraphicsViewportAndScissorRectangle,
            Command::ClearGraphics { .. } => CommandKind::ClearGraphics,
            Command::SetGraphicsRootSignature(_) => CommandKind::SetGraphicsRootSignature,
            Command::SetGraphicsPipelineState(_) => CommandKind::SetGraphicsPipelineState,
            Command::SetGraphicsResourceGroup { .. } => CommandKind::SetGraphicsResourceGroup,
            Command::SetGraphicsVertexArray(_) => CommandKind::SetGraphicsVertexArray,
            Command::SetInstanceData { .. } => CommandKind::SetInstanceData,
            Command::Draw { .. } => CommandKind::Draw,
            Command::DrawIndexed { .. } => CommandKind::DrawIndexed,
            Command::DrawIndirect { .. } => CommandKind::DrawIndirect,
            Command::SetComputeRootSignature(_) => CommandKind::SetComputeRootSignature,
            Command::SetComputePipelineState(_) => CommandKind::SetComputePipelineState,
            Command::SetComputeResourceGroup { .. } => CommandKind::SetComputeResourceGroup,
            Command::DispatchCompute { .. } => CommandKind::DispatchCompute,
            Command::CopyResource { .. } => CommandKind::CopyResource,
            Command::GenerateMipmaps(_) => CommandKind::GenerateMipmaps,
            Command::ResolveMultisampleFramebuffer { .. } => CommandKind::ResolveMultisampleFramebuffer,
            Command::SetTextureMinimumMaximumMipmapIndex { .. } => CommandKind::SetTextureMinimumMaximumMipmapIndex,
            Command::BeginDebugEvent(_) => CommandKind::BeginDebugEvent,
            Command::EndDebugEvent => CommandKind::EndDebugEvent,
        }
    }

    /// Whether this command issues a draw
    pub fn is_draw(&self) -> bool {
        matches!(
            self.kind(),
            CommandKind::Draw | CommandKind::DrawIndexed | CommandKind::DrawIndirect
        )
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::SetGraphicsRenderTarget(target) => {
                write!(f, "SetGraphicsRenderTarget({})", target.name())
            }
            Command::SetGraphicsViewportAndScissorRectangle { viewport, .. } => write!(
                f,
                "SetGraphicsViewportAndScissorRectangle({}x{}, depth {}..{})",
                viewport.width, viewport.height, viewport.min_depth, viewport.max_depth
            ),
            Command::ClearGraphics { flags, .. } => write!(f, "ClearGraphics({:?})", flags),
            Command::SetGraphicsPipelineState(pipeline) => {
                write!(f, "SetGraphicsPipelineState({})", pipeline.name())
            }
            Command::SetComputePipelineState(pipeline) => {
                write!(f, "SetComputePipelineState({})", pipeline.name())
            }
            Command::Draw { vertex_count_per_instance, instance_count, .. } => {
                write!(f, "Draw({} x {})", vertex_count_per_instance, instance_count)
            }
            Command::DrawIndexed { index_count_per_instance, instance_count, .. } => {
                write!(f, "DrawIndexed({} x {})", index_count_per_instance, instance_count)
            }
            Command::DispatchCompute { group_count_x, group_count_y, group_count_z } => {
                write!(f, "DispatchCompute({}, {}, {})", group_count_x, group_count_y, group_count_z)
            }
            Command::SetTextureMinimumMaximumMipmapIndex { texture, minimum, maximum } => write!(
                f,
                "SetTextureMinimumMaximumMipmapIndex({}, {}..={})",
                texture.name(), minimum, maximum
            ),
            Command::BeginDebugEvent(name) => write!(f, "BeginDebugEvent({})", name),
            other => write!(f, "{:?}", other.kind()),
        }
    }
}

// ===== COMMAND BUFFER =====

/// Ordered list of recorded commands
#[derive(Default, Clone)]
pub struct CommandBuffer {
    commands: Vec<Command>,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self { commands: Vec::new() }
    }

    /// Record a command
    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    /// Open a named debug scope
    pub fn begin_debug_event(&mut self, name: &str) {
        self.commands.push(Command::BeginDebugEvent(name.to_string()));
    }

    /// Close the innermost debug scope
    pub fn end_debug_event(&mut self) {
        self.commands.push(Command::EndDebugEvent);
    }

    /// Recorded commands, in submission order
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Number of recorded commands of the given kind
    pub fn count(&self, kind: CommandKind) -> usize {
        self.commands.iter().filter(|command| command.kind() == kind).count()
    }

    /// Number of draw, indexed draw and indirect draw commands
    pub fn number_of_draw_calls(&self) -> usize {
        self.commands.iter().filter(|command| command.is_draw()).count()
    }

    /// Drop every recorded command, keeping the allocation
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl fmt::Debug for CommandBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.commands.iter()).finish()
    }
}

#[cfg(test)]
#[path = "command_buffer_tests.rs"]
mod tests;
