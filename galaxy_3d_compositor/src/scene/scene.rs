/// Scene - scene graph, scene items and their renderable managers.
///
/// Every container is a SlotMap with stable keys; cross references between
/// them (item → node, item → manager, manager → node, material →
/// renderable) are keys resolved through the owning map.

use std::sync::{Arc, Mutex};
use glam::Mat4;
use rustc_hash::FxHashSet;
use slotmap::SlotMap;
use crate::camera::Camera;
use crate::error::{Error, Result};
use crate::graphics_device::{lock_device, GraphicsDevice};
use crate::material::{MaterialManager, MaterialResourceId};
use crate::render_queue::RenderQueueIndexRanges;
use crate::{engine_debug, engine_warn_once};
use super::{
    RenderableManager, RenderableManagerKey, RenderableRef, SceneCullingManager,
    SceneItem, SceneItemDesc, SceneItemKey, SceneItemKind, SceneNode, SceneNodeKey,
    SharedGeometryKind, SharedGeometryRegistry, Transform,
};

pub struct Scene {
    graphics_device: Arc<Mutex<dyn GraphicsDevice>>,
    /// Device supports structured buffers (read once at creation)
    structured_buffers: bool,
    nodes: SlotMap<SceneNodeKey, SceneNode>,
    items: SlotMap<SceneItemKey, SceneItem>,
    managers: SlotMap<RenderableManagerKey, RenderableManager>,
    culling: SceneCullingManager,
    shared_geometry: SharedGeometryRegistry,
}

impl Scene {
    /// Create an empty scene
    pub fn new(graphics_device: Arc<Mutex<dyn GraphicsDevice>>) -> Result<Self> {
        let structured_buffers = lock_device(&graphics_device)?.capabilities().structured_buffers;
        Ok(Self {
            graphics_device,
            structured_buffers,
            nodes: SlotMap::with_key(),
            items: SlotMap::with_key(),
            managers: SlotMap::with_key(),
            culling: SceneCullingManager::new(),
            shared_geometry: SharedGeometryRegistry::new(),
        })
    }

    // ===== NODES =====

    /// Create a scene node; the global matrix is valid after `update_transforms`
    pub fn create_node(&mut self, local: Transform, parent: Option<SceneNodeKey>) -> SceneNodeKey {
        let parent = parent.filter(|key| self.nodes.contains_key(*key));
        self.nodes.insert(SceneNode::new(local, parent))
    }

    /// Remove a node; its children become roots
    pub fn destroy_node(&mut self, key: SceneNodeKey) -> bool {
        if self.nodes.remove(key).is_none() {
            return false;
        }
        for node in self.nodes.values_mut() {
            if node.parent == Some(key) {
                node.parent = None;
            }
        }
        true
    }

    pub fn node(&self, key: SceneNodeKey) -> Option<&SceneNode> {
        self.nodes.get(key)
    }

    pub fn set_node_transform(&mut self, key: SceneNodeKey, local: Transform) -> bool {
        match self.nodes.get_mut(key) {
            Some(node) => {
                node.local = local;
                true
            }
            None => false,
        }
    }

    /// Recompute global matrices parent-first, then refresh the manager
    /// world matrices and the culling bounds.
    pub fn update_transforms(&mut self) {
        let mut order: Vec<(usize, SceneNodeKey)> = self
            .nodes
            .iter()
            .map(|(key, _)| (self.node_depth(key), key))
            .collect();
        order.sort_unstable_by_key(|(depth, _)| *depth);

        for (_, key) in order {
            let Some(node) = self.nodes.get(key) else { continue };
            let local = node.local.to_matrix();
            let parent_matrix = node
                .parent
                .and_then(|parent| self.nodes.get(parent))
                .map(|parent| parent.global_matrix);
            let global = parent_matrix.map_or(local, |parent| parent * local);
            if let Some(node) = self.nodes.get_mut(key) {
                node.global_matrix = global;
            }
        }

        for item in self.items.values() {
            let world = self.node_matrix(item.node);
            if let Some(manager) = self.managers.get_mut(item.renderable_manager) {
                manager.set_world_matrix(world);
            }
            if item.kind.is_cullable() {
                let bounds = item.local_bounds.map(|aabb| aabb.transformed(&world));
                self.culling.cullable_items_mut().set_bounds(item.culling_index, bounds);
            }
        }
    }

    fn node_depth(&self, key: SceneNodeKey) -> usize {
        let mut depth = 0;
        let mut current = self.nodes.get(key).and_then(|node| node.parent);
        while let Some(parent) = current {
            depth += 1;
            if depth > self.nodes.len() {
                break;
            }
            current = self.nodes.get(parent).and_then(|node| node.parent);
        }
        depth
    }

    fn node_matrix(&self, key: SceneNodeKey) -> Mat4 {
        self.nodes.get(key).map_or(Mat4::IDENTITY, |node| node.global_matrix)
    }

    // ===== SCENE ITEMS =====

    /// Create a scene item and its renderable manager.
    ///
    /// Particles and grass on a device without structured buffers are kept
    /// but draw nothing. Sky and volume items share one vertex array per
    /// kind, assigned to renderables created without one.
    pub fn create_scene_item(&mut self, desc: SceneItemDesc) -> Result<SceneItemKey> {
        let SceneItemDesc { kind, node, mut renderables, number_of_lods, local_bounds, hook } = desc;
        if !self.nodes.contains_key(node) {
            return Err(Error::InvalidResource("Scene item attached to an unknown scene node".to_string()));
        }

        if kind.requires_structured_buffers() && !self.structured_buffers {
            engine_warn_once!(
                "galaxy3d::Scene",
                "Device lacks structured buffers, {:?} items are disabled", kind
            );
            for renderable in &mut renderables {
                renderable.set_instance_count(0);
            }
        }

        let shared_geometry = match kind {
            SceneItemKind::Sky | SceneItemKind::Volume => {
                let geometry_kind = if kind == SceneItemKind::Sky {
                    SharedGeometryKind::Sky
                } else {
                    SharedGeometryKind::Volume
                };
                let mut device = lock_device(&self.graphics_device)?;
                let handle = self.shared_geometry.acquire(geometry_kind, &mut *device)?;
                for renderable in renderables.iter_mut().filter(|r| r.vertex_array().is_none()) {
                    renderable.set_vertex_array(handle.vertex_array().clone());
                }
                Some(handle)
            }
            _ => None,
        };

        let mut manager = RenderableManager::new(renderables, number_of_lods, Some(node))?;
        let world = self.node_matrix(node);
        manager.set_world_matrix(world);
        let manager_key = self.managers.insert(manager);

        let item_key = self.items.insert(SceneItem {
            kind,
            node,
            renderable_manager: manager_key,
            local_bounds,
            hook,
            shared_geometry,
            culling_index: 0,
        });
        let culling_index = if kind.is_cullable() {
            let bounds = local_bounds.map(|aabb| aabb.transformed(&world));
            self.culling.add_cullable(item_key, manager_key, bounds)
        } else {
            self.culling.add_uncullable(item_key, manager_key)
        };
        if let Some(item) = self.items.get_mut(item_key) {
            item.culling_index = culling_index;
        }

        engine_debug!("galaxy3d::Scene", "Created {:?} scene item", kind);
        Ok(item_key)
    }

    /// Destroy a scene item, its manager and its material attachments
    pub fn destroy_scene_item(&mut self, key: SceneItemKey, materials: &mut MaterialManager) -> bool {
        let Some(item) = self.items.remove(key) else {
            return false;
        };

        if let Some(mut manager) = self.managers.remove(item.renderable_manager) {
            for renderable in manager.renderables_mut() {
                renderable.release_material(materials);
            }
        }

        let moved = if item.kind.is_cullable() {
            self.culling.remove_cullable(item.culling_index)
        } else {
            self.culling.remove_uncullable(item.culling_index)
        };
        if let Some(moved_item) = moved.and_then(|moved| self.items.get_mut(moved)) {
            moved_item.culling_index = item.culling_index;
        }
        true
    }

    pub fn scene_item(&self, key: SceneItemKey) -> Option<&SceneItem> {
        self.items.get(key)
    }

    pub fn scene_item_count(&self) -> usize {
        self.items.len()
    }

    // ===== RENDERABLE MANAGERS =====

    pub fn renderable_manager(&self, key: RenderableManagerKey) -> Option<&RenderableManager> {
        self.managers.get(key)
    }

    pub fn renderable_managers(&self) -> &SlotMap<RenderableManagerKey, RenderableManager> {
        &self.managers
    }

    pub fn set_renderable_manager_visible(&mut self, key: RenderableManagerKey, visible: bool) -> bool {
        match self.managers.get_mut(key) {
            Some(manager) => {
                manager.set_visible(visible);
                true
            }
            None => false,
        }
    }

    pub fn set_lod_distances(&mut self, key: RenderableManagerKey, distances: Vec<f32>) -> bool {
        match self.managers.get_mut(key) {
            Some(manager) => {
                manager.set_lod_distances(distances);
                true
            }
            None => false,
        }
    }

    /// Assign a material to one renderable of a manager
    pub fn set_renderable_material(
        &mut self,
        manager_key: RenderableManagerKey,
        index: usize,
        materials: &mut MaterialManager,
        material: Option<MaterialResourceId>,
    ) -> bool {
        let Some(manager) = self.managers.get_mut(manager_key) else {
            return false;
        };
        let Some(renderable) = manager.renderable_mut(index) else {
            return false;
        };
        let self_ref = RenderableRef { manager: manager_key, index: index as u32 };
        renderable.set_material_resource_id(self_ref, materials, material);
        manager.update_cached_renderables_data();
        true
    }

    /// Resource-listener callback: a material changed its properties.
    ///
    /// Re-caches the properties on every attached renderable and refreshes
    /// the cached interval of their managers.
    pub fn on_material_properties_changed(&mut self, materials: &MaterialManager, material: MaterialResourceId) {
        let Some(resource) = materials.material(material) else {
            return;
        };
        let mut touched: FxHashSet<RenderableManagerKey> = FxHashSet::default();
        for renderable_ref in resource.attached_renderables().iter() {
            let Some(manager) = self.managers.get_mut(renderable_ref.manager) else {
                continue;
            };
            if let Some(renderable) = manager.renderable_mut(renderable_ref.index as usize) {
                renderable.update_cached_material_properties(materials);
                touched.insert(renderable_ref.manager);
            }
        }
        for key in touched {
            if let Some(manager) = self.managers.get_mut(key) {
                manager.update_cached_renderables_data();
            }
        }
    }

    // ===== CULLING =====

    /// Frustum-cull the scene into the render-queue-index ranges.
    ///
    /// Returns the number of visible renderable managers; hook-carrying
    /// visible items are written to `callback_items`.
    pub fn cull(
        &mut self,
        camera: &Camera,
        ranges: &mut RenderQueueIndexRanges,
        callback_items: &mut Vec<SceneItemKey>,
    ) -> usize {
        self.culling.gather(camera, &self.items, &mut self.managers, ranges, callback_items)
    }

    pub fn culling_manager(&self) -> &SceneCullingManager {
        &self.culling
    }

    pub fn shared_geometry(&self) -> &SharedGeometryRegistry {
        &self.shared_geometry
    }

    pub fn supports_structured_buffers(&self) -> bool {
        self.structured_buffers
    }
}

#[cfg(test)]
#[path = "scene_tests.rs"]
mod tests;
