/// Material blueprint - compiled pipeline state shared by many materials.

use std::sync::Arc;
use slotmap::new_key_type;
use crate::graphics_device::{BindingGroup, ComputePipeline, GraphicsPipeline, RootSignature};
use super::LoadingState;

new_key_type! {
    /// Stable key for a blueprint in the `MaterialManager`
    pub struct MaterialBlueprintId;
}

/// Pipeline produced by the blueprint compiler
#[derive(Clone)]
pub enum BlueprintPipeline {
    /// Rasterization pipeline
    Graphics(Arc<dyn GraphicsPipeline>),
    /// Compute pipeline with its dispatch size
    Compute {
        pipeline: Arc<dyn ComputePipeline>,
        thread_groups: [u32; 3],
    },
}

impl BlueprintPipeline {
    pub fn is_compute(&self) -> bool {
        matches!(self, BlueprintPipeline::Compute { .. })
    }
}

/// Material blueprint
///
/// `pipeline_id` is a compact id (fits the sort-key pipeline field) that is
/// unique among live blueprints.
pub struct MaterialBlueprint {
    pub(crate) name: String,
    pub(crate) loading_state: LoadingState,
    pub(crate) pipeline_id: u32,
    pub(crate) root_signature: Option<Arc<dyn RootSignature>>,
    pub(crate) pipeline: Option<BlueprintPipeline>,
    pub(crate) pass_resource_group: Option<Arc<dyn BindingGroup>>,
}

impl MaterialBlueprint {
    pub(crate) fn new(name: &str, pipeline_id: u32) -> Self {
        Self {
            name: name.to_string(),
            loading_state: LoadingState::Unloaded,
            pipeline_id,
            root_signature: None,
            pipeline: None,
            pass_resource_group: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn loading_state(&self) -> LoadingState {
        self.loading_state
    }

    pub fn pipeline_id(&self) -> u32 {
        self.pipeline_id
    }

    /// Compiled pipeline, `None` until the compiler delivered it
    pub fn pipeline(&self) -> Option<&BlueprintPipeline> {
        self.pipeline.as_ref()
    }

    pub fn root_signature(&self) -> Option<&Arc<dyn RootSignature>> {
        self.root_signature.as_ref()
    }

    /// Per-pass resource group (bound at root parameter 0)
    pub fn pass_resource_group(&self) -> Option<&Arc<dyn BindingGroup>> {
        self.pass_resource_group.as_ref()
    }

    /// Whether the compiled pipeline is a compute shader
    pub fn has_compute_shader(&self) -> bool {
        self.pipeline.as_ref().is_some_and(BlueprintPipeline::is_compute)
    }

    /// Whether draws can be recorded with this blueprint
    pub fn is_resolved(&self) -> bool {
        self.loading_state == LoadingState::Loaded
            && self.pipeline.is_some()
            && self.root_signature.is_some()
    }
}
