//! Material resolution - blueprints, material resources and their manager.
//!
//! Blueprints and materials are produced by the asset pipeline (outside of
//! this crate) and may still be streaming. The compositor only asks the
//! manager to resolve a (material, technique) pair into bindable objects;
//! an unresolved pair is skipped for the frame, never an error.

mod material_blueprint;
mod material_resource;
mod material_manager;

pub use material_blueprint::{BlueprintPipeline, MaterialBlueprint, MaterialBlueprintId};
pub use material_resource::{MaterialProperties, MaterialResource, MaterialResourceId};
pub use material_manager::{MaterialManager, ResolvedMaterialTechnique};

/// Streaming state of a blueprint or material
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadingState {
    /// Not requested yet
    Unloaded,
    /// Streaming or compiling in flight
    Loading,
    /// Fully usable
    Loaded,
    /// Loading failed; treated as never resolving
    Failed,
}
