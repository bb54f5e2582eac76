/// Material resource - per-material properties, techniques and bindings.

use std::sync::Arc;
use rustc_hash::FxHashMap;
use slotmap::new_key_type;
use crate::graphics_device::BindingGroup;
use crate::scene::RenderableRef;
use crate::utils::{AttachmentList, StringId};
use super::{LoadingState, MaterialBlueprintId};

new_key_type! {
    /// Stable key for a material in the `MaterialManager`
    pub struct MaterialResourceId;
}

/// Properties cached by every renderable using the material
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaterialProperties {
    /// Coarse draw phase (0-255)
    pub render_queue_index: u8,
    pub cast_shadows: bool,
    pub use_alpha_map: bool,
}

impl Default for MaterialProperties {
    fn default() -> Self {
        Self {
            render_queue_index: 0,
            cast_shadows: true,
            use_alpha_map: false,
        }
    }
}

/// Material resource
///
/// Renderables using the material register in `attached_renderables`; the
/// material never owns them.
pub struct MaterialResource {
    pub(crate) name: String,
    pub(crate) loading_state: LoadingState,
    pub(crate) material_index: u32,
    pub(crate) properties: MaterialProperties,
    pub(crate) techniques: FxHashMap<StringId, MaterialBlueprintId>,
    pub(crate) resource_group: Option<Arc<dyn BindingGroup>>,
    pub(crate) attached_renderables: AttachmentList<RenderableRef>,
    /// Material this one was cloned from; it follows the source's streaming
    pub(crate) clone_source: Option<MaterialResourceId>,
}

impl MaterialResource {
    pub(crate) fn new(name: &str, material_index: u32, properties: MaterialProperties) -> Self {
        Self {
            name: name.to_string(),
            loading_state: LoadingState::Unloaded,
            material_index,
            properties,
            techniques: FxHashMap::default(),
            resource_group: None,
            attached_renderables: AttachmentList::new(),
            clone_source: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn loading_state(&self) -> LoadingState {
        self.loading_state
    }

    /// Compact id used by sort keys
    pub fn material_index(&self) -> u32 {
        self.material_index
    }

    pub fn properties(&self) -> MaterialProperties {
        self.properties
    }

    pub fn render_queue_index(&self) -> u8 {
        self.properties.render_queue_index
    }

    pub fn cast_shadows(&self) -> bool {
        self.properties.cast_shadows
    }

    pub fn use_alpha_map(&self) -> bool {
        self.properties.use_alpha_map
    }

    /// Blueprint used for a technique
    pub fn technique(&self, technique_id: StringId) -> Option<MaterialBlueprintId> {
        self.techniques.get(&technique_id).copied()
    }

    /// Per-material resource group (bound at root parameter 1)
    pub fn resource_group(&self) -> Option<&Arc<dyn BindingGroup>> {
        self.resource_group.as_ref()
    }

    /// Source material when this is a clone
    pub fn clone_source(&self) -> Option<MaterialResourceId> {
        self.clone_source
    }

    /// Renderables currently using this material
    pub fn attached_renderables(&self) -> &AttachmentList<RenderableRef> {
        &self.attached_renderables
    }
}
