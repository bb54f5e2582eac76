/// Compute pass - runs one material either as a compute dispatch or as an
/// attribute-less full-screen draw.
///
/// The pass owns a private clone of the material and a renderable manager
/// holding a single vertex-less renderable. Whether the material is run as
/// a compute shader is decided once, the first time its blueprint is
/// resolved: compute shaders run without a render target, graphics
/// blueprints need one.

use std::sync::Arc;
use crate::compositor::{ComputePassDesc, PassExecutionContext};
use crate::error::{Error, Result};
use crate::graphics_device::{CommandBuffer, RenderTarget};
use crate::material::{MaterialManager, MaterialResourceId};
use crate::render_queue::RenderQueue;
use crate::scene::{DrawConfig, Renderable, RenderableManager, RenderableManagerKey, RenderableRef};
use crate::{engine_debug, engine_error};
use super::{require_no_render_target, require_render_target};

pub struct ComputePass {
    name: String,
    desc: ComputePassDesc,
    material: Option<MaterialResourceId>,
    renderable_manager: Option<RenderableManager>,
    /// `Some(true)` for a compute shader, decided once
    is_compute: Option<bool>,
    render_queue: RenderQueue,
}

impl ComputePass {
    pub fn new(name: &str, desc: ComputePassDesc) -> Self {
        Self {
            name: name.to_string(),
            desc,
            material: None,
            renderable_manager: None,
            is_compute: None,
            render_queue: RenderQueue::new(u8::MIN, u8::MAX, false, false, false),
        }
    }

    pub fn desc(&self) -> &ComputePassDesc {
        &self.desc
    }

    /// Private material clone, created when the workspace finished loading
    pub fn material(&self) -> Option<MaterialResourceId> {
        self.material
    }

    /// Whether the material runs as a compute shader (`None` until known)
    pub fn is_compute(&self) -> Option<bool> {
        self.is_compute
    }

    pub fn number_of_draw_calls(&self) -> usize {
        self.render_queue.number_of_draw_calls()
    }

    /// Clone the material and build the throwaway renderable
    pub(crate) fn on_workspace_loading_finished(&mut self, materials: &mut MaterialManager) -> Result<()> {
        let Some(source) = materials.find_material_by_name(&self.desc.material) else {
            engine_error!(
                "galaxy3d::ComputePass",
                "Pass '{}' references unknown material '{}'", self.name, self.desc.material
            );
            return Err(Error::InvalidResource(format!("Material '{}' not found", self.desc.material)));
        };
        let material = materials.clone_material(source, &format!("{}#{}", self.desc.material, self.name))?;

        // Full-screen triangle generated in the vertex shader
        let renderable = Renderable::new(None, DrawConfig::NonIndexed { start_vertex: 0, number_of_vertices: 3 });
        let mut manager = RenderableManager::new(vec![renderable], 1, None)?;
        if let Some(renderable) = manager.renderable_mut(0) {
            let self_ref = RenderableRef { manager: RenderableManagerKey::default(), index: 0 };
            renderable.set_material_resource_id(self_ref, materials, Some(material));
        }
        manager.update_cached_renderables_data();

        self.material = Some(material);
        self.renderable_manager = Some(manager);
        self.is_compute = None;
        self.decide_mode(materials);
        Ok(())
    }

    /// Release the material clone
    pub(crate) fn on_workspace_unload(&mut self, materials: &mut MaterialManager) {
        if let Some(mut manager) = self.renderable_manager.take() {
            for renderable in manager.renderables_mut() {
                renderable.release_material(materials);
            }
        }
        if let Some(material) = self.material.take() {
            materials.destroy_material(material);
        }
        self.is_compute = None;
        self.render_queue.clear();
    }

    /// Decide the execution mode once the blueprint is resolved
    pub(crate) fn decide_mode(&mut self, materials: &MaterialManager) -> Option<bool> {
        if self.is_compute.is_none() {
            let material = self.material?;
            materials.resolve(material, self.desc.technique)?;
            let is_compute = materials.blueprint_has_compute_shader(material, self.desc.technique);
            engine_debug!(
                "galaxy3d::ComputePass",
                "Pass '{}' runs as {}", self.name, if is_compute { "compute shader" } else { "full-screen draw" }
            );
            self.is_compute = Some(is_compute);
        }
        self.is_compute
    }

    /// Record the dispatch (or draw). Nothing is recorded while the
    /// material is not resolved.
    pub(crate) fn fill(
        &mut self,
        render_target: Option<&Arc<dyn RenderTarget>>,
        ctx: &mut PassExecutionContext<'_>,
        cmd: &mut CommandBuffer,
    ) -> Result<usize> {
        let Some(is_compute) = self.decide_mode(ctx.materials) else {
            return Ok(0);
        };
        if is_compute {
            if !require_no_render_target(&self.name, render_target) {
                return Ok(0);
            }
        } else if require_render_target(&self.name, render_target).is_none() {
            return Ok(0);
        }
        let Some(manager) = &self.renderable_manager else {
            return Ok(0);
        };

        self.render_queue.clear();
        self.render_queue.add_renderables_from_renderable_manager(
            manager,
            self.desc.technique,
            ctx.context,
            ctx.materials,
            false,
            true,
        );
        if is_compute {
            Ok(self.render_queue.fill_compute_command_buffer(ctx.context, cmd))
        } else {
            self.render_queue.fill_graphics_command_buffer(ctx.context, ctx.instance_buffers, cmd)
        }
    }
}
