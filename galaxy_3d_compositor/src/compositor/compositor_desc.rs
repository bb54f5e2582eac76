/// Declarative compositor graph, as produced by the asset loader.
///
/// These descriptions are immutable; `CompositorWorkspaceInstance` turns
/// them into runtime node and pass instances.

use crate::graphics_device::{ClearFlags, TextureFormat};
use crate::utils::StringId;
use super::ShadowMapSettings;

// ===== RESOURCES =====

/// Size of a render texture
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextureSize {
    /// Main render target size times `scale` times the resolution scale
    RelativeToMain { scale: f32 },
    /// Fixed size in pixels
    Fixed { width: u32, height: u32 },
}

/// Render texture declared by a workspace
#[derive(Debug, Clone)]
pub struct RenderTextureDesc {
    pub name: String,
    pub size: TextureSize,
    pub format: TextureFormat,
    /// 0 = full mipmap chain
    pub number_of_mipmaps: u32,
    /// Use the workspace multisample count (otherwise always 1)
    pub allow_multisample: bool,
}

impl RenderTextureDesc {
    /// Main-sized, single-mip texture
    pub fn main_sized(name: &str, format: TextureFormat) -> Self {
        Self {
            name: name.to_string(),
            size: TextureSize::RelativeToMain { scale: 1.0 },
            format,
            number_of_mipmaps: 1,
            allow_multisample: false,
        }
    }
}

/// Framebuffer declared by a workspace, attachments referenced by name
#[derive(Debug, Clone)]
pub struct FramebufferDeclDesc {
    pub name: String,
    pub color_textures: Vec<String>,
    pub depth_stencil_texture: Option<String>,
}

// ===== GRAPH =====

/// Target of a group of passes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetRef {
    /// No render target (copies, compute dispatches)
    None,
    /// The render target handed to `execute`
    Main,
    /// A framebuffer declared by the workspace
    Framebuffer(String),
}

/// Scene pass parameters
#[derive(Debug, Clone, PartialEq)]
pub struct ScenePassDesc {
    pub minimum_render_queue_index: u8,
    pub maximum_render_queue_index: u8,
    pub technique: StringId,
    pub transparent: bool,
    pub position_only: bool,
    /// Only queue shadow casters
    pub cast_shadows: bool,
    /// Always draw the most detailed LOD
    pub use_lod0: bool,
    pub do_sort: bool,
}

impl ScenePassDesc {
    pub fn new(minimum_render_queue_index: u8, maximum_render_queue_index: u8, technique: StringId) -> Self {
        Self {
            minimum_render_queue_index,
            maximum_render_queue_index,
            technique,
            transparent: false,
            position_only: false,
            cast_shadows: false,
            use_lod0: false,
            do_sort: true,
        }
    }
}

/// Compute pass parameters
#[derive(Debug, Clone, PartialEq)]
pub struct ComputePassDesc {
    /// Material cloned privately by the pass
    pub material: String,
    pub technique: StringId,
}

/// Pass-type specific parameters
#[derive(Debug, Clone)]
pub enum PassKindDesc {
    Clear {
        flags: ClearFlags,
        color: [f32; 4],
        depth: f32,
        stencil: u32,
    },
    Scene(ScenePassDesc),
    ShadowMap {
        scene: ScenePassDesc,
        settings: ShadowMapSettings,
    },
    Compute(ComputePassDesc),
    Copy {
        destination_texture: String,
        source_texture: String,
    },
    GenerateMipmaps {
        texture: String,
        /// Custom downsampling material; `None` uses the device's mipmap generation
        material: Option<ComputePassDesc>,
    },
    ResolveMultisample {
        source_framebuffer: String,
    },
    DebugGui,
    VrHiddenAreaMesh {
        material: String,
        technique: StringId,
    },
}

/// One pass of a compositor target
#[derive(Debug, Clone)]
pub struct CompositorPassDesc {
    pub name: String,
    pub minimum_depth: f32,
    pub maximum_depth: f32,
    pub skip_first_execution: bool,
    /// Maximum number of executions, `None` = every frame
    pub number_of_executions: Option<u32>,
    pub kind: PassKindDesc,
}

impl CompositorPassDesc {
    /// Pass executed every frame over the full depth range
    pub fn new(name: &str, kind: PassKindDesc) -> Self {
        Self {
            name: name.to_string(),
            minimum_depth: 0.0,
            maximum_depth: 1.0,
            skip_first_execution: false,
            number_of_executions: None,
            kind,
        }
    }
}

/// Passes sharing one target
#[derive(Debug, Clone)]
pub struct CompositorTargetDesc {
    pub target: TargetRef,
    pub passes: Vec<CompositorPassDesc>,
}

/// Node of the graph
#[derive(Debug, Clone)]
pub struct CompositorNodeDesc {
    pub name: String,
    pub targets: Vec<CompositorTargetDesc>,
}

/// Whole workspace: resources and nodes, executed in order
#[derive(Debug, Clone)]
pub struct CompositorWorkspaceDesc {
    pub name: String,
    pub textures: Vec<RenderTextureDesc>,
    pub framebuffers: Vec<FramebufferDeclDesc>,
    pub nodes: Vec<CompositorNodeDesc>,
}
