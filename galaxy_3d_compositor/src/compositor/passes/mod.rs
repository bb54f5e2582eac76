//! Compositor pass variants.
//!
//! Each variant holds the runtime state of one pass type; `InstancePass`
//! dispatches to them with a single match.

mod clear;
mod scene_pass;
mod shadow_map;
mod compute;
mod copy;
mod generate_mipmaps;
mod resolve_multisample;
mod debug_gui;
mod vr_hidden_area_mesh;

pub use clear::ClearPass;
pub use scene_pass::ScenePass;
pub use shadow_map::{ShadowMapPass, ShadowPassData};
pub use compute::ComputePass;
pub use copy::CopyPass;
pub use generate_mipmaps::GenerateMipmapsPass;
pub use resolve_multisample::ResolveMultisamplePass;
pub use debug_gui::DebugGuiPass;
pub use vr_hidden_area_mesh::VrHiddenAreaMeshPass;

use std::sync::Arc;
use crate::engine_error;
use crate::graphics_device::RenderTarget;

/// The render target of a pass that needs one.
///
/// Asserts in debug builds; release builds log and skip the pass.
pub(crate) fn require_render_target<'t>(
    pass: &str,
    render_target: Option<&'t Arc<dyn RenderTarget>>,
) -> Option<&'t Arc<dyn RenderTarget>> {
    debug_assert!(render_target.is_some(), "Compositor pass '{}' requires a render target", pass);
    if render_target.is_none() {
        engine_error!("galaxy3d::CompositorPass", "Pass '{}' requires a render target, skipped", pass);
    }
    render_target
}

/// Check that a pass working outside of render targets got none.
pub(crate) fn require_no_render_target(pass: &str, render_target: Option<&Arc<dyn RenderTarget>>) -> bool {
    debug_assert!(render_target.is_none(), "Compositor pass '{}' must not have a render target", pass);
    if let Some(render_target) = render_target {
        engine_error!(
            "galaxy3d::CompositorPass",
            "Pass '{}' must not have a render target (got '{}'), skipped",
            pass, render_target.name()
        );
        return false;
    }
    true
}
