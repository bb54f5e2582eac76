/// Scene items - what is attached to scene nodes.

use std::sync::Arc;
use slotmap::new_key_type;
use crate::compositor::CompositorContext;
use crate::graphics_device::{CommandBuffer, RenderTarget};
use super::{AABB, RenderableManagerKey, Renderable, SceneNodeKey, SharedGeometryHandle};

new_key_type! {
    /// Stable key for a scene item in the `Scene`
    pub struct SceneItemKey;
}

/// Kind of scene item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneItemKind {
    Mesh,
    Sky,
    Volume,
    Particles,
    Grass,
}

impl SceneItemKind {
    /// Whether frustum culling applies; other kinds are always drawn
    pub fn is_cullable(&self) -> bool {
        matches!(self, SceneItemKind::Mesh | SceneItemKind::Grass)
    }

    /// Whether the item needs structured buffer support from the device
    pub fn requires_structured_buffers(&self) -> bool {
        matches!(self, SceneItemKind::Particles | SceneItemKind::Grass)
    }
}

/// Custom per-frame logic of a scene item, run after culling and before
/// the compositor nodes record their passes.
pub trait SceneItemHook: Send + Sync {
    fn on_execute_on_rendering(
        &self,
        render_target: &Arc<dyn RenderTarget>,
        context: &CompositorContext,
        cmd: &mut CommandBuffer,
    );
}

/// Parameters of `Scene::create_scene_item`
pub struct SceneItemDesc {
    pub kind: SceneItemKind,
    /// Node providing the transform
    pub node: SceneNodeKey,
    /// Renderables, LOD blocks concatenated
    pub renderables: Vec<Renderable>,
    pub number_of_lods: u8,
    /// Local-space bounds; `None` keeps the item always visible
    pub local_bounds: Option<AABB>,
    pub hook: Option<Arc<dyn SceneItemHook>>,
}

impl SceneItemDesc {
    /// Single-LOD item without bounds or hook
    pub fn new(kind: SceneItemKind, node: SceneNodeKey, renderables: Vec<Renderable>) -> Self {
        Self {
            kind,
            node,
            renderables,
            number_of_lods: 1,
            local_bounds: None,
            hook: None,
        }
    }

    pub fn with_bounds(mut self, bounds: AABB) -> Self {
        self.local_bounds = Some(bounds);
        self
    }

    pub fn with_hook(mut self, hook: Arc<dyn SceneItemHook>) -> Self {
        self.hook = Some(hook);
        self
    }

    pub fn with_lods(mut self, number_of_lods: u8) -> Self {
        self.number_of_lods = number_of_lods;
        self
    }
}

/// Scene item
pub struct SceneItem {
    pub(crate) kind: SceneItemKind,
    pub(crate) node: SceneNodeKey,
    pub(crate) renderable_manager: RenderableManagerKey,
    pub(crate) local_bounds: Option<AABB>,
    pub(crate) hook: Option<Arc<dyn SceneItemHook>>,
    pub(crate) shared_geometry: Option<SharedGeometryHandle>,
    /// Position in the culling set (cullable) or uncullable list
    pub(crate) culling_index: usize,
}

impl SceneItem {
    pub fn kind(&self) -> SceneItemKind {
        self.kind
    }

    pub fn node(&self) -> SceneNodeKey {
        self.node
    }

    pub fn renderable_manager(&self) -> RenderableManagerKey {
        self.renderable_manager
    }

    pub fn local_bounds(&self) -> Option<&AABB> {
        self.local_bounds.as_ref()
    }

    pub fn hook(&self) -> Option<&Arc<dyn SceneItemHook>> {
        self.hook.as_ref()
    }

    pub fn shared_geometry(&self) -> Option<&SharedGeometryHandle> {
        self.shared_geometry.as_ref()
    }
}
