//! Compositor - the node/pass graph that records a frame.
//!
//! A `CompositorWorkspaceDesc` describes textures, framebuffers and an
//! ordered list of nodes, each an ordered list of typed passes. A
//! `CompositorWorkspaceInstance` realises it and, once per frame, culls the
//! scene, records every pass into one command buffer and submits it.

mod context;
mod config;
mod compositor_desc;
mod render_target_manager;
mod instance_pass;
mod passes;
mod node_instance;
mod workspace_instance;

pub use context::CompositorContext;
#[cfg(feature = "debug-gui")]
pub use context::DebugGuiRenderer;
#[cfg(feature = "vr")]
pub use context::VrHiddenAreaMesh;
pub use config::{is_valid_multisample_count, ShadowMapSettings, WorkspaceConfig};
pub use compositor_desc::{
    CompositorNodeDesc, CompositorPassDesc, CompositorTargetDesc, CompositorWorkspaceDesc,
    ComputePassDesc, FramebufferDeclDesc, PassKindDesc, RenderTextureDesc, ScenePassDesc,
    TargetRef, TextureSize,
};
pub use render_target_manager::RenderTargetManager;
pub use instance_pass::{InstancePass, PassExecutionContext, PassKind, PassType};
pub use passes::{
    ClearPass, ComputePass, CopyPass, DebugGuiPass, GenerateMipmapsPass, ResolveMultisamplePass,
    ScenePass, ShadowMapPass, ShadowPassData, VrHiddenAreaMeshPass,
};
pub use node_instance::{NodeInstance, TargetInstance};
pub use workspace_instance::{CompositorWorkspaceInstance, WorkspaceState};
