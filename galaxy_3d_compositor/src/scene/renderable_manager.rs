/// RenderableManager - renderables sharing one transform and visibility flag.
///
/// All LOD levels are stored back to back in one vector, one block of
/// equal length per LOD.

use glam::Mat4;
use slotmap::new_key_type;
use crate::engine_error;
use crate::error::{Error, Result};
use crate::material::MaterialManager;
use super::{Renderable, SceneNodeKey};

new_key_type! {
    /// Stable key for a renderable manager in the `Scene`
    pub struct RenderableManagerKey;
}

pub struct RenderableManager {
    renderables: Vec<Renderable>,
    number_of_lods: u8,
    transform: Option<SceneNodeKey>,
    visible: bool,
    /// LOD n+1 is used from `lod_distances[n]` on
    lod_distances: Vec<f32>,
    // Cached data
    minimum_render_queue_index: u8,
    maximum_render_queue_index: u8,
    cast_shadows: bool,
    cached_distance: f32,
    world_matrix: Mat4,
}

impl RenderableManager {
    /// Group renderables under one transform.
    ///
    /// Fails when `number_of_lods` is zero or does not divide the number of
    /// renderables.
    pub fn new(
        renderables: Vec<Renderable>,
        number_of_lods: u8,
        transform: Option<SceneNodeKey>,
    ) -> Result<Self> {
        if number_of_lods == 0 || renderables.len() % number_of_lods as usize != 0 {
            engine_error!(
                "galaxy3d::RenderableManager",
                "{} renderables cannot be split into {} LODs",
                renderables.len(), number_of_lods
            );
            return Err(Error::InvalidConfiguration(format!(
                "{} renderables for {} LODs", renderables.len(), number_of_lods
            )));
        }

        let mut manager = Self {
            renderables,
            number_of_lods,
            transform,
            visible: true,
            lod_distances: Vec::new(),
            minimum_render_queue_index: 0,
            maximum_render_queue_index: 0,
            cast_shadows: false,
            cached_distance: 0.0,
            world_matrix: Mat4::IDENTITY,
        };
        manager.update_cached_renderables_data();
        Ok(manager)
    }

    // ===== RENDERABLES / LODS =====

    pub fn renderables(&self) -> &[Renderable] {
        &self.renderables
    }

    pub(crate) fn renderable_mut(&mut self, index: usize) -> Option<&mut Renderable> {
        self.renderables.get_mut(index)
    }

    pub fn number_of_lods(&self) -> u8 {
        self.number_of_lods
    }

    pub fn renderables_per_lod(&self) -> usize {
        self.renderables.len() / self.number_of_lods as usize
    }

    /// Renderables of one LOD level (clamped to the last level)
    pub fn lod_renderables(&self, lod: u8) -> &[Renderable] {
        let per_lod = self.renderables_per_lod();
        let lod = lod.min(self.number_of_lods - 1) as usize;
        &self.renderables[lod * per_lod..(lod + 1) * per_lod]
    }

    /// Set the camera distances at which each further LOD kicks in
    pub fn set_lod_distances(&mut self, distances: Vec<f32>) {
        debug_assert!(
            distances.windows(2).all(|pair| pair[0] <= pair[1]),
            "LOD distances must be ascending"
        );
        self.lod_distances = distances;
    }

    /// LOD level for a camera distance
    pub fn lod_index_for_distance(&self, distance: f32) -> u8 {
        let lod = self.lod_distances.iter().take_while(|&&switch| distance >= switch).count();
        lod.min(self.number_of_lods as usize - 1) as u8
    }

    /// Refresh the cached render-queue-index interval and shadow flag
    pub fn update_cached_renderables_data(&mut self) {
        let mut minimum = u8::MAX;
        let mut maximum = u8::MIN;
        let mut cast_shadows = false;
        for renderable in &self.renderables {
            minimum = minimum.min(renderable.render_queue_index());
            maximum = maximum.max(renderable.render_queue_index());
            cast_shadows |= renderable.cast_shadows();
        }
        if self.renderables.is_empty() {
            minimum = 0;
        }
        self.minimum_render_queue_index = minimum;
        self.maximum_render_queue_index = maximum;
        self.cast_shadows = cast_shadows;
    }

    /// Refresh the cached material properties of every renderable
    pub fn update_cached_material_properties(&mut self, materials: &MaterialManager) {
        for renderable in &mut self.renderables {
            renderable.update_cached_material_properties(materials);
        }
        self.update_cached_renderables_data();
    }

    pub(crate) fn renderables_mut(&mut self) -> &mut [Renderable] {
        &mut self.renderables
    }

    // ===== CACHED STATE =====

    pub fn minimum_render_queue_index(&self) -> u8 {
        self.minimum_render_queue_index
    }

    pub fn maximum_render_queue_index(&self) -> u8 {
        self.maximum_render_queue_index
    }

    /// Whether the cached interval overlaps `[minimum, maximum]`
    pub fn overlaps_render_queue_indices(&self, minimum: u8, maximum: u8) -> bool {
        !self.renderables.is_empty()
            && self.minimum_render_queue_index <= maximum
            && self.maximum_render_queue_index >= minimum
    }

    pub fn cast_shadows(&self) -> bool {
        self.cast_shadows
    }

    pub fn cached_distance(&self) -> f32 {
        self.cached_distance
    }

    pub(crate) fn set_cached_distance(&mut self, distance: f32) {
        self.cached_distance = distance;
    }

    pub fn world_matrix(&self) -> &Mat4 {
        &self.world_matrix
    }

    pub(crate) fn set_world_matrix(&mut self, matrix: Mat4) {
        self.world_matrix = matrix;
    }

    pub fn transform(&self) -> Option<SceneNodeKey> {
        self.transform
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

#[cfg(test)]
#[path = "renderable_manager_tests.rs"]
mod tests;
