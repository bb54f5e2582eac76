/// Renderable - the atomic drawable unit of a renderable manager.

use std::sync::Arc;
use crate::graphics_device::{IndirectBuffer, VertexArray};
use crate::material::{MaterialManager, MaterialResourceId};
use crate::utils::AttachmentHandle;
use super::RenderableManagerKey;

/// Back-reference from a material to a renderable: owning manager and
/// position of the renderable inside it.
///
/// Renderables that do not live in a scene manager (compositor compute
/// passes) use the null manager key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderableRef {
    pub manager: RenderableManagerKey,
    pub index: u32,
}

/// Opaque id of a skeleton resource owned by the animation collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SkeletonResourceId(pub u32);

/// How a renderable is drawn
#[derive(Clone)]
pub enum DrawConfig {
    NonIndexed {
        start_vertex: u32,
        number_of_vertices: u32,
    },
    Indexed {
        start_index: u32,
        number_of_indices: u32,
        base_vertex: i32,
    },
    /// Draw arguments read from a GPU buffer
    Indirect {
        buffer: Arc<dyn IndirectBuffer>,
        offset: u32,
        number_of_draws: u32,
        indexed: bool,
    },
}

/// Drawable sub-mesh
pub struct Renderable {
    vertex_array: Option<Arc<dyn VertexArray>>,
    position_only_vertex_array: Option<Arc<dyn VertexArray>>,
    draw: DrawConfig,
    instance_count: u32,
    material: Option<MaterialResourceId>,
    attachment: Option<AttachmentHandle>,
    skeleton: Option<SkeletonResourceId>,
    // Cached material properties
    render_queue_index: u8,
    cast_shadows: bool,
    use_alpha_map: bool,
}

impl Renderable {
    /// Create a renderable without material.
    ///
    /// `vertex_array` may be `None` for attribute-less draws (full-screen
    /// triangles generated in the vertex shader).
    pub fn new(vertex_array: Option<Arc<dyn VertexArray>>, draw: DrawConfig) -> Self {
        Self {
            vertex_array,
            position_only_vertex_array: None,
            draw,
            instance_count: 1,
            material: None,
            attachment: None,
            skeleton: None,
            render_queue_index: 0,
            cast_shadows: false,
            use_alpha_map: false,
        }
    }

    /// Alternate vertex array used by depth-only and shadow passes
    pub fn with_position_only_vertex_array(mut self, vertex_array: Arc<dyn VertexArray>) -> Self {
        self.position_only_vertex_array = Some(vertex_array);
        self
    }

    pub fn with_instance_count(mut self, instance_count: u32) -> Self {
        self.instance_count = instance_count;
        self
    }

    pub fn with_skeleton(mut self, skeleton: SkeletonResourceId) -> Self {
        self.skeleton = Some(skeleton);
        self
    }

    // ===== GETTERS =====

    pub fn vertex_array(&self) -> Option<&Arc<dyn VertexArray>> {
        self.vertex_array.as_ref()
    }

    pub fn position_only_vertex_array(&self) -> Option<&Arc<dyn VertexArray>> {
        self.position_only_vertex_array.as_ref()
    }

    /// Vertex array to bind, preferring the position-only one when asked
    pub fn vertex_array_for(&self, position_only: bool) -> Option<&Arc<dyn VertexArray>> {
        if position_only {
            self.position_only_vertex_array.as_ref().or(self.vertex_array.as_ref())
        } else {
            self.vertex_array.as_ref()
        }
    }

    pub fn draw_config(&self) -> &DrawConfig {
        &self.draw
    }

    pub fn instance_count(&self) -> u32 {
        self.instance_count
    }

    pub fn material_resource_id(&self) -> Option<MaterialResourceId> {
        self.material
    }

    /// Handle of this renderable in its material's attached list
    pub fn attachment(&self) -> Option<AttachmentHandle> {
        self.attachment
    }

    pub fn skeleton(&self) -> Option<SkeletonResourceId> {
        self.skeleton
    }

    pub fn render_queue_index(&self) -> u8 {
        self.render_queue_index
    }

    pub fn cast_shadows(&self) -> bool {
        self.cast_shadows
    }

    pub fn use_alpha_map(&self) -> bool {
        self.use_alpha_map
    }

    // ===== SETTERS =====

    pub fn set_instance_count(&mut self, instance_count: u32) {
        self.instance_count = instance_count;
    }

    pub(crate) fn set_vertex_array(&mut self, vertex_array: Arc<dyn VertexArray>) {
        self.vertex_array = Some(vertex_array);
    }

    /// Switch to another material (or none).
    ///
    /// Detaches from the previous material's attached list, attaches to the
    /// new one and refreshes the cached material properties. `self_ref` is
    /// the back-reference registered in the material.
    pub fn set_material_resource_id(
        &mut self,
        self_ref: RenderableRef,
        materials: &mut MaterialManager,
        material: Option<MaterialResourceId>,
    ) {
        if self.material == material && (material.is_none() || self.attachment.is_some()) {
            return;
        }

        if let (Some(previous), Some(handle)) = (self.material, self.attachment.take()) {
            materials.detach_renderable(previous, handle);
        }

        self.material = material;
        self.attachment = material.and_then(|id| materials.attach_renderable(id, self_ref));
        self.update_cached_material_properties(materials);
    }

    /// Copy the properties of the current material into the cache
    pub fn update_cached_material_properties(&mut self, materials: &MaterialManager) {
        match self.material.and_then(|id| materials.material(id)) {
            Some(material) => {
                self.render_queue_index = material.render_queue_index();
                self.cast_shadows = material.cast_shadows();
                self.use_alpha_map = material.use_alpha_map();
            }
            None => {
                self.render_queue_index = 0;
                self.cast_shadows = false;
                self.use_alpha_map = false;
            }
        }
    }

    /// Detach from the current material without attaching a new one
    pub(crate) fn release_material(&mut self, materials: &mut MaterialManager) {
        if let (Some(material), Some(handle)) = (self.material.take(), self.attachment.take()) {
            materials.detach_renderable(material, handle);
        }
    }

    /// Number of vertices or indices of a direct draw (0 for indirect)
    pub fn element_count(&self) -> u32 {
        match &self.draw {
            DrawConfig::NonIndexed { number_of_vertices, .. } => *number_of_vertices,
            DrawConfig::Indexed { number_of_indices, .. } => *number_of_indices,
            DrawConfig::Indirect { .. } => 0,
        }
    }
}
