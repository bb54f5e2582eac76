//! Camera module - view/projection data and the frustum used for culling.
//!
//! Cameras are owned and driven by the caller; the compositor only reads
//! them through the `CompositorContext` of each workspace execution.

mod camera;
mod frustum;

pub use camera::Camera;
pub use frustum::{
    Frustum,
    PLANE_LEFT, PLANE_RIGHT, PLANE_BOTTOM, PLANE_TOP, PLANE_NEAR, PLANE_FAR,
};
