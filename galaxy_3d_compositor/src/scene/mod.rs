//! Scene module - scene graph, renderables and culling.
//!
//! The scene is the visibility side of the compositor: each frame the
//! workspace culls it into the render-queue-index ranges, and scene passes
//! feed the resulting renderable managers to their render queues.

mod bounds;
mod renderable;
mod renderable_manager;
mod scene;
mod scene_culling;
mod scene_item;
mod scene_node;
mod shared_geometry;

pub use bounds::AABB;
pub use renderable::{DrawConfig, Renderable, RenderableRef, SkeletonResourceId};
pub use renderable_manager::{RenderableManager, RenderableManagerKey};
pub use scene::Scene;
pub use scene_culling::{SceneCullingManager, SceneItemSet};
pub use scene_item::{SceneItem, SceneItemDesc, SceneItemHook, SceneItemKey, SceneItemKind};
pub use scene_node::{SceneNode, SceneNodeKey, Transform};
pub use shared_geometry::{SharedGeometryHandle, SharedGeometryKind, SharedGeometryRegistry};
