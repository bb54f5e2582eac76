/// Instance pass - runtime object of one compositor pass.
///
/// The set of pass types is closed; `PassKind` holds the type-specific
/// state and every hook dispatches with one match.

use std::sync::Arc;
use crate::error::Result;
use crate::graphics_device::{CommandBuffer, GraphicsDevice, RenderTarget};
use crate::material::MaterialManager;
use crate::render_queue::{InstanceBufferPool, RenderQueueIndexRanges};
use crate::scene::Scene;
use super::passes::{
    require_no_render_target, require_render_target, ClearPass, ComputePass, CopyPass,
    DebugGuiPass, GenerateMipmapsPass, ResolveMultisamplePass, ScenePass, ShadowMapPass,
    VrHiddenAreaMeshPass,
};
use super::{CompositorContext, CompositorPassDesc, PassKindDesc, RenderTargetManager};

/// Everything a pass may read or record into during one execution
pub struct PassExecutionContext<'a> {
    pub device: &'a mut dyn GraphicsDevice,
    pub render_targets: &'a RenderTargetManager,
    pub scene: &'a Scene,
    pub materials: &'a MaterialManager,
    /// Filled by culling this frame
    pub ranges: &'a RenderQueueIndexRanges,
    pub instance_buffers: &'a mut InstanceBufferPool,
    pub context: &'a CompositorContext,
}

/// Pass type, used to look passes up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PassType {
    Clear,
    Scene,
    ShadowMap,
    Compute,
    Copy,
    GenerateMipmaps,
    ResolveMultisample,
    DebugGui,
    VrHiddenAreaMesh,
}

/// Type-specific pass state
pub enum PassKind {
    Clear(ClearPass),
    Scene(ScenePass),
    ShadowMap(ShadowMapPass),
    Compute(ComputePass),
    Copy(CopyPass),
    GenerateMipmaps(GenerateMipmapsPass),
    ResolveMultisample(ResolveMultisamplePass),
    DebugGui(DebugGuiPass),
    VrHiddenAreaMesh(VrHiddenAreaMeshPass),
}

impl PassKind {
    pub fn pass_type(&self) -> PassType {
        match self {
            PassKind::Clear(_) => PassType::Clear,
            PassKind::Scene(_) => PassType::Scene,
            PassKind::ShadowMap(_) => PassType::ShadowMap,
            PassKind::Compute(_) => PassType::Compute,
            PassKind::Copy(_) => PassType::Copy,
            PassKind::GenerateMipmaps(_) => PassType::GenerateMipmaps,
            PassKind::ResolveMultisample(_) => PassType::ResolveMultisample,
            PassKind::DebugGui(_) => PassType::DebugGui,
            PassKind::VrHiddenAreaMesh(_) => PassType::VrHiddenAreaMesh,
        }
    }
}

pub struct InstancePass {
    name: String,
    minimum_depth: f32,
    maximum_depth: f32,
    skip_first_execution: bool,
    first_execution_skipped: bool,
    maximum_executions: Option<u32>,
    number_of_executions: u32,
    kind: PassKind,
}

impl InstancePass {
    pub fn new(desc: &CompositorPassDesc) -> Self {
        let kind = match &desc.kind {
            PassKindDesc::Clear { flags, color, depth, stencil } => {
                PassKind::Clear(ClearPass::new(*flags, *color, *depth, *stencil))
            }
            PassKindDesc::Scene(scene) => PassKind::Scene(ScenePass::new(scene.clone())),
            PassKindDesc::ShadowMap { scene, settings } => {
                PassKind::ShadowMap(ShadowMapPass::new(&desc.name, scene.clone(), settings.clone()))
            }
            PassKindDesc::Compute(compute) => PassKind::Compute(ComputePass::new(&desc.name, compute.clone())),
            PassKindDesc::Copy { destination_texture, source_texture } => {
                PassKind::Copy(CopyPass::new(destination_texture, source_texture))
            }
            PassKindDesc::GenerateMipmaps { texture, material } => {
                PassKind::GenerateMipmaps(GenerateMipmapsPass::new(&desc.name, texture, material.clone()))
            }
            PassKindDesc::ResolveMultisample { source_framebuffer } => {
                PassKind::ResolveMultisample(ResolveMultisamplePass::new(source_framebuffer))
            }
            PassKindDesc::DebugGui => PassKind::DebugGui(DebugGuiPass::new()),
            PassKindDesc::VrHiddenAreaMesh { material, technique } => {
                PassKind::VrHiddenAreaMesh(VrHiddenAreaMeshPass::new(material, *technique))
            }
        };

        Self {
            name: desc.name.clone(),
            minimum_depth: desc.minimum_depth,
            maximum_depth: desc.maximum_depth,
            skip_first_execution: desc.skip_first_execution,
            first_execution_skipped: false,
            maximum_executions: desc.number_of_executions,
            number_of_executions: 0,
            kind,
        }
    }

    // ===== ACCESSORS =====

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pass_type(&self) -> PassType {
        self.kind.pass_type()
    }

    pub fn kind(&self) -> &PassKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut PassKind {
        &mut self.kind
    }

    pub fn minimum_depth(&self) -> f32 {
        self.minimum_depth
    }

    pub fn maximum_depth(&self) -> f32 {
        self.maximum_depth
    }

    /// Times the pass was executed (saturating)
    pub fn number_of_executions(&self) -> u32 {
        self.number_of_executions
    }

    pub fn as_shadow_map(&self) -> Option<&ShadowMapPass> {
        match &self.kind {
            PassKind::ShadowMap(pass) => Some(pass),
            _ => None,
        }
    }

    pub fn as_shadow_map_mut(&mut self) -> Option<&mut ShadowMapPass> {
        match &mut self.kind {
            PassKind::ShadowMap(pass) => Some(pass),
            _ => None,
        }
    }

    pub fn as_scene(&self) -> Option<&ScenePass> {
        match &self.kind {
            PassKind::Scene(pass) => Some(pass),
            _ => None,
        }
    }

    pub fn as_compute(&self) -> Option<&ComputePass> {
        match &self.kind {
            PassKind::Compute(pass) => Some(pass),
            _ => None,
        }
    }

    // ===== EXECUTION =====

    /// Apply the skip rules and count the execution.
    ///
    /// The first time a pass with `skip_first_execution` is reached it is
    /// only marked; a pass that reached its maximum execution count stays
    /// skipped.
    pub(crate) fn begin_execution(&mut self) -> bool {
        if self.skip_first_execution && !self.first_execution_skipped {
            self.first_execution_skipped = true;
            return false;
        }
        if self.maximum_executions.is_some_and(|maximum| self.number_of_executions >= maximum) {
            return false;
        }
        self.number_of_executions = self.number_of_executions.saturating_add(1);
        true
    }

    /// Whether the pass binds render targets itself; the node then no longer
    /// knows which target is bound.
    pub(crate) fn binds_own_render_targets(&self) -> bool {
        match &self.kind {
            PassKind::ShadowMap(_) => true,
            PassKind::GenerateMipmaps(pass) => pass.binds_own_render_targets(),
            _ => false,
        }
    }

    /// Record the work of the pass, inside a debug event named after it
    pub fn on_fill_command_buffer(
        &mut self,
        render_target: Option<&Arc<dyn RenderTarget>>,
        ctx: &mut PassExecutionContext<'_>,
        cmd: &mut CommandBuffer,
    ) -> Result<()> {
        cmd.begin_debug_event(&self.name);
        let result = self.fill(render_target, ctx, cmd);
        cmd.end_debug_event();
        result
    }

    fn fill(
        &mut self,
        render_target: Option<&Arc<dyn RenderTarget>>,
        ctx: &mut PassExecutionContext<'_>,
        cmd: &mut CommandBuffer,
    ) -> Result<()> {
        let name = self.name.as_str();
        match &mut self.kind {
            PassKind::Clear(pass) => {
                if require_render_target(name, render_target).is_some() {
                    pass.fill(cmd);
                }
            }
            PassKind::Scene(pass) => {
                if require_render_target(name, render_target).is_some() {
                    pass.fill(ctx, cmd)?;
                }
            }
            PassKind::ShadowMap(pass) => {
                pass.fill(ctx, cmd)?;
            }
            PassKind::Compute(pass) => {
                pass.fill(render_target, ctx, cmd)?;
            }
            PassKind::Copy(pass) => {
                if require_no_render_target(name, render_target) {
                    pass.fill(ctx, cmd)?;
                }
            }
            PassKind::GenerateMipmaps(pass) => {
                pass.fill(ctx, cmd)?;
            }
            PassKind::ResolveMultisample(pass) => {
                if let Some(render_target) = require_render_target(name, render_target) {
                    pass.fill(render_target, ctx, cmd)?;
                }
            }
            PassKind::DebugGui(pass) => {
                if let Some(render_target) = require_render_target(name, render_target) {
                    pass.fill(render_target, ctx, cmd);
                }
            }
            PassKind::VrHiddenAreaMesh(pass) => {
                if let Some(render_target) = require_render_target(name, render_target) {
                    pass.fill(render_target, ctx, cmd)?;
                }
            }
        }
        Ok(())
    }

    /// Per-frame cleanup once the command buffer was submitted
    pub fn on_post_command_buffer_execution(&mut self) {
        match &mut self.kind {
            PassKind::Scene(pass) => pass.on_post_command_buffer_execution(),
            PassKind::ShadowMap(pass) => pass.on_post_command_buffer_execution(),
            _ => {}
        }
    }

    /// One-time lookups once the whole workspace graph is loaded
    pub fn on_workspace_loading_finished(
        &mut self,
        ranges: &RenderQueueIndexRanges,
        materials: &mut MaterialManager,
    ) -> Result<()> {
        match &mut self.kind {
            PassKind::Scene(pass) => pass.on_workspace_loading_finished(ranges),
            PassKind::ShadowMap(pass) => pass.on_workspace_loading_finished(ranges),
            PassKind::Compute(pass) => pass.on_workspace_loading_finished(materials)?,
            PassKind::GenerateMipmaps(pass) => pass.on_workspace_loading_finished(materials)?,
            PassKind::VrHiddenAreaMesh(pass) => pass.on_workspace_loading_finished(materials),
            _ => {}
        }
        Ok(())
    }

    /// Release what the pass created in the material manager
    pub fn on_workspace_unload(&mut self, materials: &mut MaterialManager) {
        match &mut self.kind {
            PassKind::Compute(pass) => pass.on_workspace_unload(materials),
            PassKind::GenerateMipmaps(pass) => pass.on_workspace_unload(materials),
            _ => {}
        }
    }
}

#[cfg(test)]
#[path = "instance_pass_tests.rs"]
mod tests;
