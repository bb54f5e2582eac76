/// Material manager - owns blueprints and materials and resolves techniques.

use std::sync::Arc;
use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use crate::engine_error;
use crate::error::{Error, Result};
use crate::graphics_device::{BindingGroup, RootSignature};
use crate::render_queue::{MATERIAL_INDEX_BITS, PIPELINE_ID_BITS};
use crate::scene::RenderableRef;
use crate::utils::{AttachmentHandle, SlotAllocator, StringId};
use super::{
    BlueprintPipeline, LoadingState, MaterialBlueprint, MaterialBlueprintId,
    MaterialProperties, MaterialResource, MaterialResourceId,
};

/// Everything needed to record draws for one (material, technique) pair
#[derive(Clone)]
pub struct ResolvedMaterialTechnique {
    pub material: MaterialResourceId,
    pub blueprint: MaterialBlueprintId,
    /// Compact material id (sort key)
    pub material_index: u32,
    /// Compact pipeline id (sort key)
    pub pipeline_id: u32,
    pub root_signature: Arc<dyn RootSignature>,
    pub pipeline: BlueprintPipeline,
    /// Bound at root parameter 0
    pub pass_resource_group: Option<Arc<dyn BindingGroup>>,
    /// Bound at root parameter 1
    pub material_resource_group: Option<Arc<dyn BindingGroup>>,
}

/// Owner of every blueprint and material of a rendering context
pub struct MaterialManager {
    blueprints: SlotMap<MaterialBlueprintId, MaterialBlueprint>,
    materials: SlotMap<MaterialResourceId, MaterialResource>,
    blueprints_by_name: FxHashMap<StringId, MaterialBlueprintId>,
    materials_by_name: FxHashMap<StringId, MaterialResourceId>,
    pipeline_ids: SlotAllocator,
    material_indices: SlotAllocator,
}

impl MaterialManager {
    pub fn new() -> Self {
        Self {
            blueprints: SlotMap::with_key(),
            materials: SlotMap::with_key(),
            blueprints_by_name: FxHashMap::default(),
            materials_by_name: FxHashMap::default(),
            pipeline_ids: SlotAllocator::with_limit(1 << PIPELINE_ID_BITS),
            material_indices: SlotAllocator::with_limit(1 << MATERIAL_INDEX_BITS),
        }
    }

    // ===== BLUEPRINTS =====

    /// Register a blueprint (unloaded, no pipeline yet)
    pub fn create_blueprint(&mut self, name: &str) -> Result<MaterialBlueprintId> {
        let Some(pipeline_id) = self.pipeline_ids.alloc() else {
            engine_error!("galaxy3d::MaterialManager", "Too many material blueprints, cannot create '{}'", name);
            return Err(Error::InvalidConfiguration(format!(
                "Material blueprint limit ({}) reached", self.pipeline_ids.limit()
            )));
        };
        let id = self.blueprints.insert(MaterialBlueprint::new(name, pipeline_id));
        self.blueprints_by_name.insert(StringId::new(name), id);
        Ok(id)
    }

    /// Remove a blueprint; materials referencing it stop resolving
    pub fn destroy_blueprint(&mut self, id: MaterialBlueprintId) -> bool {
        let Some(blueprint) = self.blueprints.remove(id) else {
            return false;
        };
        self.pipeline_ids.free(blueprint.pipeline_id);
        self.blueprints_by_name.remove(&StringId::new(&blueprint.name));
        true
    }

    pub fn blueprint(&self, id: MaterialBlueprintId) -> Option<&MaterialBlueprint> {
        self.blueprints.get(id)
    }

    pub fn find_blueprint_by_name(&self, name: &str) -> Option<MaterialBlueprintId> {
        self.blueprints_by_name.get(&StringId::new(name)).copied()
    }

    pub fn set_blueprint_loading_state(&mut self, id: MaterialBlueprintId, state: LoadingState) -> bool {
        match self.blueprints.get_mut(id) {
            Some(blueprint) => {
                blueprint.loading_state = state;
                true
            }
            None => false,
        }
    }

    /// Deliver the compiled pipeline of a blueprint and mark it loaded
    pub fn set_blueprint_pipeline(
        &mut self,
        id: MaterialBlueprintId,
        root_signature: Arc<dyn RootSignature>,
        pipeline: BlueprintPipeline,
        pass_resource_group: Option<Arc<dyn BindingGroup>>,
    ) -> bool {
        match self.blueprints.get_mut(id) {
            Some(blueprint) => {
                blueprint.root_signature = Some(root_signature);
                blueprint.pipeline = Some(pipeline);
                blueprint.pass_resource_group = pass_resource_group;
                blueprint.loading_state = LoadingState::Loaded;
                true
            }
            None => false,
        }
    }

    // ===== MATERIALS =====

    /// Register a material (unloaded, no techniques yet)
    pub fn create_material(&mut self, name: &str, properties: MaterialProperties) -> Result<MaterialResourceId> {
        let Some(material_index) = self.material_indices.alloc() else {
            engine_error!("galaxy3d::MaterialManager", "Too many materials, cannot create '{}'", name);
            return Err(Error::InvalidConfiguration(format!(
                "Material limit ({}) reached", self.material_indices.limit()
            )));
        };
        let id = self.materials.insert(MaterialResource::new(name, material_index, properties));
        self.materials_by_name.insert(StringId::new(name), id);
        Ok(id)
    }

    /// Remove a material, returning the renderables that were attached to it
    pub fn destroy_material(&mut self, id: MaterialResourceId) -> Option<Vec<RenderableRef>> {
        let material = self.materials.remove(id)?;
        self.material_indices.free(material.material_index);
        if self.materials_by_name.get(&StringId::new(&material.name)) == Some(&id) {
            self.materials_by_name.remove(&StringId::new(&material.name));
        }
        Some(material.attached_renderables.iter().copied().collect())
    }

    pub fn material(&self, id: MaterialResourceId) -> Option<&MaterialResource> {
        self.materials.get(id)
    }

    pub fn find_material_by_name(&self, name: &str) -> Option<MaterialResourceId> {
        self.materials_by_name.get(&StringId::new(name)).copied()
    }

    /// Change the loading state of a material and of its clones
    pub fn set_material_loading_state(&mut self, id: MaterialResourceId, state: LoadingState) -> bool {
        self.update_material_and_clones(id, |material| material.loading_state = state)
    }

    /// Use `blueprint` when the material is drawn with `technique_id`
    pub fn set_material_technique(
        &mut self,
        id: MaterialResourceId,
        technique_id: StringId,
        blueprint: MaterialBlueprintId,
    ) -> bool {
        self.update_material_and_clones(id, |material| {
            material.techniques.insert(technique_id, blueprint);
        })
    }

    pub fn set_material_resource_group(
        &mut self,
        id: MaterialResourceId,
        resource_group: Option<Arc<dyn BindingGroup>>,
    ) -> bool {
        self.update_material_and_clones(id, |material| material.resource_group = resource_group.clone())
    }

    /// Change the cached properties of a material.
    ///
    /// Renderables keep their own copy; the scene refreshes them through
    /// `Scene::on_material_properties_changed`.
    pub fn set_material_properties(&mut self, id: MaterialResourceId, properties: MaterialProperties) -> bool {
        match self.materials.get_mut(id) {
            Some(material) => {
                material.properties = properties;
                true
            }
            None => false,
        }
    }

    /// Duplicate a material under a new name.
    ///
    /// The clone shares techniques, properties and resource group with the
    /// source but starts without attached renderables. Later loading state,
    /// technique and resource group changes of the source reach the clone,
    /// so a clone taken while the source streams resolves once it loaded.
    pub fn clone_material(&mut self, source: MaterialResourceId, name: &str) -> Result<MaterialResourceId> {
        let (properties, techniques, resource_group, loading_state, root) = {
            let material = self.materials.get(source).ok_or_else(|| {
                Error::InvalidResource(format!("Cannot clone unknown material into '{}'", name))
            })?;
            (
                material.properties,
                material.techniques.clone(),
                material.resource_group.clone(),
                material.loading_state,
                material.clone_source.unwrap_or(source),
            )
        };

        let id = self.create_material(name, properties)?;
        if let Some(clone) = self.materials.get_mut(id) {
            clone.techniques = techniques;
            clone.resource_group = resource_group;
            clone.loading_state = loading_state;
            clone.clone_source = Some(root);
        }
        Ok(id)
    }

    fn update_material_and_clones(&mut self, id: MaterialResourceId, mut update: impl FnMut(&mut MaterialResource)) -> bool {
        if !self.materials.contains_key(id) {
            return false;
        }
        for (key, material) in self.materials.iter_mut() {
            if key == id || material.clone_source == Some(id) {
                update(material);
            }
        }
        true
    }

    // ===== ATTACHMENTS =====

    /// Register a renderable as user of a material
    pub fn attach_renderable(&mut self, id: MaterialResourceId, renderable: RenderableRef) -> Option<AttachmentHandle> {
        self.materials
            .get_mut(id)
            .map(|material| material.attached_renderables.insert(renderable))
    }

    /// Unregister a renderable; the last attached renderable takes its slot
    pub fn detach_renderable(&mut self, id: MaterialResourceId, handle: AttachmentHandle) -> Option<RenderableRef> {
        self.materials
            .get_mut(id)
            .and_then(|material| material.attached_renderables.remove(handle))
    }

    // ===== RESOLUTION =====

    /// Resolve a technique of a material into bindable objects.
    ///
    /// Returns `None` while the material or its blueprint is streaming, when
    /// the technique is missing, or when the pipeline is not compiled yet.
    pub fn resolve(&self, id: MaterialResourceId, technique_id: StringId) -> Option<ResolvedMaterialTechnique> {
        let material = self.materials.get(id)?;
        if material.loading_state != LoadingState::Loaded {
            return None;
        }
        let blueprint_id = material.technique(technique_id)?;
        let blueprint = self.blueprints.get(blueprint_id)?;
        if !blueprint.is_resolved() {
            return None;
        }

        Some(ResolvedMaterialTechnique {
            material: id,
            blueprint: blueprint_id,
            material_index: material.material_index,
            pipeline_id: blueprint.pipeline_id,
            root_signature: blueprint.root_signature.clone()?,
            pipeline: blueprint.pipeline.clone()?,
            pass_resource_group: blueprint.pass_resource_group.clone(),
            material_resource_group: material.resource_group.clone(),
        })
    }

    /// Whether the blueprint used by a material technique is a compute shader
    pub fn blueprint_has_compute_shader(&self, id: MaterialResourceId, technique_id: StringId) -> bool {
        self.materials
            .get(id)
            .and_then(|material| material.technique(technique_id))
            .and_then(|blueprint| self.blueprints.get(blueprint))
            .is_some_and(MaterialBlueprint::has_compute_shader)
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    pub fn blueprint_count(&self) -> usize {
        self.blueprints.len()
    }
}

impl Default for MaterialManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "material_manager_tests.rs"]
mod tests;
