//! Fixtures shared by the unit tests: mock device, a camera at the origin
//! looking down -Z, compiled blueprints and loaded materials.

use std::sync::{Arc, Mutex};
use glam::{Mat4, Vec3};
use crate::camera::Camera;
use crate::compositor::{CompositorContext, PassExecutionContext, RenderTargetManager};
use crate::graphics_device::mock_graphics_device::{
    MockBindingGroup, MockComputePipeline, MockGraphicsDevice, MockGraphicsPipeline,
    MockRootSignature, MockVertexArray,
};
use crate::graphics_device::GraphicsDevice;
use crate::material::{
    BlueprintPipeline, LoadingState, MaterialBlueprintId, MaterialManager,
    MaterialProperties, MaterialResourceId,
};
use crate::render_queue::{InstanceBufferPool, RenderQueueIndexRanges};
use crate::scene::{
    DrawConfig, Renderable, RenderableManagerKey, Scene, SceneItemDesc, SceneItemKey,
    SceneItemKind, Transform, AABB,
};
use crate::utils::StringId;

pub const FORWARD: StringId = StringId::new("Forward");

/// Mock device, once as the concrete type and once as the shared trait object
pub fn shared_device() -> (Arc<Mutex<MockGraphicsDevice>>, Arc<Mutex<dyn GraphicsDevice>>) {
    let device = MockGraphicsDevice::shared();
    let shared: Arc<Mutex<dyn GraphicsDevice>> = device.clone();
    (device, shared)
}

/// 60 degree perspective camera at the origin looking down -Z, near 0.1, far 100
pub fn camera() -> Camera {
    let view = Mat4::look_at_rh(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y);
    Camera::perspective(view, 60f32.to_radians(), 4.0 / 3.0, 0.1, 100.0)
}

pub fn context() -> CompositorContext {
    CompositorContext::new(camera())
}

pub fn graphics_blueprint(materials: &mut MaterialManager, name: &str) -> MaterialBlueprintId {
    let id = materials.create_blueprint(name).unwrap();
    materials.set_blueprint_pipeline(
        id,
        MockRootSignature::shared(name),
        BlueprintPipeline::Graphics(MockGraphicsPipeline::shared(name)),
        Some(MockBindingGroup::shared("PassData", 0)),
    );
    id
}

pub fn compute_blueprint(materials: &mut MaterialManager, name: &str) -> MaterialBlueprintId {
    let id = materials.create_blueprint(name).unwrap();
    materials.set_blueprint_pipeline(
        id,
        MockRootSignature::shared(name),
        BlueprintPipeline::Compute {
            pipeline: MockComputePipeline::shared(name),
            thread_groups: [8, 8, 1],
        },
        None,
    );
    id
}

/// Loaded material using `blueprint` for the forward technique
pub fn loaded_material(
    materials: &mut MaterialManager,
    name: &str,
    blueprint: MaterialBlueprintId,
    render_queue_index: u8,
) -> MaterialResourceId {
    let properties = MaterialProperties { render_queue_index, ..MaterialProperties::default() };
    let id = materials.create_material(name, properties).unwrap();
    materials.set_material_technique(id, FORWARD, blueprint);
    materials.set_material_resource_group(id, Some(MockBindingGroup::shared(name, 1)));
    materials.set_material_loading_state(id, LoadingState::Loaded);
    id
}

pub fn triangle_renderable() -> Renderable {
    Renderable::new(
        Some(MockVertexArray::shared("Triangle")),
        DrawConfig::NonIndexed { start_vertex: 0, number_of_vertices: 3 },
    )
}

/// Mesh item with unit bounds at `position`, its renderable using `material`
pub fn mesh_item(
    scene: &mut Scene,
    materials: &mut MaterialManager,
    position: Vec3,
    material: Option<MaterialResourceId>,
) -> (SceneItemKey, RenderableManagerKey) {
    let node = scene.create_node(Transform::from_position(position), None);
    let desc = SceneItemDesc::new(SceneItemKind::Mesh, node, vec![triangle_renderable()])
        .with_bounds(AABB::new(Vec3::splat(-0.5), Vec3::splat(0.5)));
    let item = scene.create_scene_item(desc).unwrap();
    let manager = scene.scene_item(item).unwrap().renderable_manager();
    if material.is_some() {
        scene.set_renderable_material(manager, 0, materials, material);
    }
    scene.update_transforms();
    (item, manager)
}

/// Owns everything a pass execution borrows
pub struct PassHarness {
    pub device: MockGraphicsDevice,
    pub render_targets: RenderTargetManager,
    pub scene: Scene,
    pub materials: MaterialManager,
    pub ranges: RenderQueueIndexRanges,
    pub instance_buffers: InstanceBufferPool,
    pub context: CompositorContext,
}

impl PassHarness {
    pub fn new() -> Self {
        let mut device = MockGraphicsDevice::new();
        let mut instance_buffers = InstanceBufferPool::new(&mut device, 1, 64 * 1024).unwrap();
        instance_buffers.begin_frame();
        Self {
            device,
            render_targets: RenderTargetManager::new(),
            scene: Scene::new(shared_device().1).unwrap(),
            materials: MaterialManager::new(),
            ranges: RenderQueueIndexRanges::new(),
            instance_buffers,
            context: context(),
        }
    }

    /// Cull the scene into the registered ranges
    pub fn cull(&mut self) {
        let camera = self.context.camera.clone();
        self.scene.cull(&camera, &mut self.ranges, &mut Vec::new());
    }

    pub fn execution_context(&mut self) -> PassExecutionContext<'_> {
        PassExecutionContext {
            device: &mut self.device,
            render_targets: &self.render_targets,
            scene: &self.scene,
            materials: &self.materials,
            ranges: &self.ranges,
            instance_buffers: &mut self.instance_buffers,
            context: &self.context,
        }
    }
}
