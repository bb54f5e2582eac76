/// VR hidden area mesh pass - masks the parts of each eye's render target
/// hidden by the headset lenses, so later passes can skip them.

use std::sync::Arc;
use crate::compositor::PassExecutionContext;
use crate::error::Result;
use crate::graphics_device::{CommandBuffer, RenderTarget};
use crate::material::{MaterialManager, MaterialResourceId};
use crate::utils::StringId;
#[cfg(feature = "vr")]
use crate::graphics_device::Command;
#[cfg(feature = "vr")]
use crate::material::BlueprintPipeline;

#[derive(Debug, Clone)]
pub struct VrHiddenAreaMeshPass {
    material_name: String,
    technique: StringId,
    material: Option<MaterialResourceId>,
}

impl VrHiddenAreaMeshPass {
    pub fn new(material_name: &str, technique: StringId) -> Self {
        Self {
            material_name: material_name.to_string(),
            technique,
            material: None,
        }
    }

    pub fn material(&self) -> Option<MaterialResourceId> {
        self.material
    }

    pub(crate) fn on_workspace_loading_finished(&mut self, materials: &MaterialManager) {
        self.material = materials.find_material_by_name(&self.material_name);
    }

    /// Draw the hidden area mesh of the headset into the depth buffer.
    /// Nothing is drawn while the material streams or without a mesh.
    #[cfg(feature = "vr")]
    pub(crate) fn fill(
        &self,
        _render_target: &Arc<dyn RenderTarget>,
        ctx: &PassExecutionContext<'_>,
        cmd: &mut CommandBuffer,
    ) -> Result<usize> {
        let Some(mesh) = &ctx.context.vr_hidden_area_mesh else {
            return Ok(0);
        };
        let Some(resolved) = self.material.and_then(|material| ctx.materials.resolve(material, self.technique)) else {
            return Ok(0);
        };
        let BlueprintPipeline::Graphics(pipeline) = &resolved.pipeline else {
            return Ok(0);
        };

        cmd.push(Command::SetGraphicsRootSignature(resolved.root_signature.clone()));
        cmd.push(Command::SetGraphicsPipelineState(pipeline.clone()));
        if let Some(group) = &resolved.pass_resource_group {
            cmd.push(Command::SetGraphicsResourceGroup { root_parameter_index: 0, resource_group: group.clone() });
        }
        if let Some(group) = &resolved.material_resource_group {
            cmd.push(Command::SetGraphicsResourceGroup { root_parameter_index: 1, resource_group: group.clone() });
        }
        cmd.push(Command::SetGraphicsVertexArray(mesh.vertex_array.clone()));
        cmd.push(Command::Draw {
            vertex_count_per_instance: mesh.number_of_vertices,
            instance_count: if ctx.context.single_pass_stereo { 2 } else { 1 },
            start_vertex: 0,
        });
        Ok(1)
    }

    /// # Panics
    ///
    /// Always: the graph needs VR support but it is not compiled in.
    #[cfg(not(feature = "vr"))]
    pub(crate) fn fill(
        &self,
        _render_target: &Arc<dyn RenderTarget>,
        _ctx: &PassExecutionContext<'_>,
        _cmd: &mut CommandBuffer,
    ) -> Result<usize> {
        panic!("VR hidden area mesh compositor pass used but the `vr` feature is disabled");
    }
}
