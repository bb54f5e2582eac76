/// Scene culling - frustum tests feeding the render-queue-index ranges.
///
/// Bounding volumes of cullable items are kept in a structure of arrays
/// (`SceneItemSet`) so the per-frame test walks contiguous memory. Items
/// that can't be culled (sky, volumes, particles) sit in a plain list and
/// are accepted every frame.

use glam::Vec3;
use slotmap::SlotMap;
use crate::camera::Camera;
use crate::render_queue::RenderQueueIndexRanges;
use super::{AABB, RenderableManager, RenderableManagerKey, SceneItem, SceneItemKey};

// ===== SCENE ITEM SET =====

/// World-space bounding volumes of the cullable items, one column per field
#[derive(Default)]
pub struct SceneItemSet {
    items: Vec<SceneItemKey>,
    managers: Vec<RenderableManagerKey>,
    minimum_corners: Vec<Vec3>,
    maximum_corners: Vec<Vec3>,
    sphere_centers: Vec<Vec3>,
    negative_radii: Vec<f32>,
    has_bounds: Vec<bool>,
}

impl SceneItemSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item, returning its index
    pub fn push(&mut self, item: SceneItemKey, manager: RenderableManagerKey, bounds: Option<AABB>) -> usize {
        self.items.push(item);
        self.managers.push(manager);
        self.minimum_corners.push(Vec3::ZERO);
        self.maximum_corners.push(Vec3::ZERO);
        self.sphere_centers.push(Vec3::ZERO);
        self.negative_radii.push(0.0);
        self.has_bounds.push(false);
        let index = self.items.len() - 1;
        self.set_bounds(index, bounds);
        index
    }

    /// Swap-remove an item; returns the item moved into `index`, if any
    pub fn swap_remove(&mut self, index: usize) -> Option<SceneItemKey> {
        self.items.swap_remove(index);
        self.managers.swap_remove(index);
        self.minimum_corners.swap_remove(index);
        self.maximum_corners.swap_remove(index);
        self.sphere_centers.swap_remove(index);
        self.negative_radii.swap_remove(index);
        self.has_bounds.swap_remove(index);
        self.items.get(index).copied()
    }

    /// Update the world bounds of an item (`None` = uninitialized)
    pub fn set_bounds(&mut self, index: usize, bounds: Option<AABB>) {
        match bounds {
            Some(aabb) => {
                self.minimum_corners[index] = aabb.min;
                self.maximum_corners[index] = aabb.max;
                self.sphere_centers[index] = aabb.center();
                self.negative_radii[index] = -aabb.bounding_sphere_radius();
                self.has_bounds[index] = true;
            }
            None => self.has_bounds[index] = false,
        }
    }

    /// World bounds of an item, if initialized
    pub fn bounds(&self, index: usize) -> Option<AABB> {
        self.has_bounds[index].then(|| AABB::new(self.minimum_corners[index], self.maximum_corners[index]))
    }

    pub fn item(&self, index: usize) -> SceneItemKey {
        self.items[index]
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// ===== SCENE CULLING MANAGER =====

/// Per-scene culling state
#[derive(Default)]
pub struct SceneCullingManager {
    cullable: SceneItemSet,
    uncullable: Vec<(SceneItemKey, RenderableManagerKey)>,
}

impl SceneCullingManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cullable_items(&self) -> &SceneItemSet {
        &self.cullable
    }

    pub(crate) fn cullable_items_mut(&mut self) -> &mut SceneItemSet {
        &mut self.cullable
    }

    pub fn number_of_uncullable_items(&self) -> usize {
        self.uncullable.len()
    }

    pub(crate) fn add_cullable(&mut self, item: SceneItemKey, manager: RenderableManagerKey, bounds: Option<AABB>) -> usize {
        self.cullable.push(item, manager, bounds)
    }

    pub(crate) fn add_uncullable(&mut self, item: SceneItemKey, manager: RenderableManagerKey) -> usize {
        self.uncullable.push((item, manager));
        self.uncullable.len() - 1
    }

    pub(crate) fn remove_cullable(&mut self, index: usize) -> Option<SceneItemKey> {
        self.cullable.swap_remove(index)
    }

    pub(crate) fn remove_uncullable(&mut self, index: usize) -> Option<SceneItemKey> {
        self.uncullable.swap_remove(index);
        self.uncullable.get(index).map(|(item, _)| *item)
    }

    /// Cull the scene for one camera.
    ///
    /// Clears every range, then appends each accepted visible manager to
    /// every range overlapping its render-queue-index interval. Accepted
    /// items carrying a hook are pushed to `callback_items`. Returns the
    /// number of accepted managers.
    pub fn gather(
        &self,
        camera: &Camera,
        items: &SlotMap<SceneItemKey, SceneItem>,
        managers: &mut SlotMap<RenderableManagerKey, RenderableManager>,
        ranges: &mut RenderQueueIndexRanges,
        callback_items: &mut Vec<SceneItemKey>,
    ) -> usize {
        ranges.clear_managers();
        callback_items.clear();

        let frustum = camera.frustum();
        let camera_position = camera.position();
        let mut accepted = 0;

        let set = &self.cullable;
        for index in 0..set.len() {
            let has_bounds = set.has_bounds[index];
            if has_bounds {
                if !frustum.intersects_sphere(set.sphere_centers[index], -set.negative_radii[index]) {
                    continue;
                }
                let aabb = AABB::new(set.minimum_corners[index], set.maximum_corners[index]);
                if !frustum.intersects_aabb(&aabb) {
                    continue;
                }
            }

            let distance_origin = if has_bounds { Some(set.sphere_centers[index]) } else { None };
            if self.accept(set.items[index], set.managers[index], distance_origin, camera_position, items, managers, ranges, callback_items) {
                accepted += 1;
            }
        }

        for &(item, manager) in &self.uncullable {
            if self.accept(item, manager, None, camera_position, items, managers, ranges, callback_items) {
                accepted += 1;
            }
        }

        accepted
    }

    #[allow(clippy::too_many_arguments)]
    fn accept(
        &self,
        item: SceneItemKey,
        manager_key: RenderableManagerKey,
        distance_origin: Option<Vec3>,
        camera_position: Vec3,
        items: &SlotMap<SceneItemKey, SceneItem>,
        managers: &mut SlotMap<RenderableManagerKey, RenderableManager>,
        ranges: &mut RenderQueueIndexRanges,
        callback_items: &mut Vec<SceneItemKey>,
    ) -> bool {
        let Some(manager) = managers.get_mut(manager_key) else {
            return false;
        };
        if !manager.is_visible() {
            return false;
        }

        let origin = distance_origin.unwrap_or_else(|| manager.world_matrix().w_axis.truncate());
        manager.set_cached_distance(origin.distance(camera_position));

        for range in ranges.iter_mut() {
            if manager.overlaps_render_queue_indices(range.minimum, range.maximum) {
                range.managers.push(manager_key);
            }
        }

        if items.get(item).is_some_and(|item| item.hook.is_some()) {
            callback_items.push(item);
        }
        true
    }
}

#[cfg(test)]
#[path = "scene_culling_tests.rs"]
mod tests;
