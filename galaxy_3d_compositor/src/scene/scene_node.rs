/// Scene nodes - hierarchical transforms.

use glam::{Mat4, Quat, Vec3};
use slotmap::new_key_type;

new_key_type! {
    /// Stable key for a scene node in the `Scene`
    pub struct SceneNodeKey;
}

/// Local transform (scale, then rotation, then translation)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self { position, ..Self::default() }
    }

    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

/// Node of the scene graph
pub struct SceneNode {
    pub(crate) local: Transform,
    pub(crate) parent: Option<SceneNodeKey>,
    pub(crate) global_matrix: Mat4,
}

impl SceneNode {
    pub(crate) fn new(local: Transform, parent: Option<SceneNodeKey>) -> Self {
        Self {
            local,
            parent,
            global_matrix: local.to_matrix(),
        }
    }

    pub fn local_transform(&self) -> &Transform {
        &self.local
    }

    pub fn parent(&self) -> Option<SceneNodeKey> {
        self.parent
    }

    /// World matrix as of the last `Scene::update_transforms`
    pub fn global_matrix(&self) -> &Mat4 {
        &self.global_matrix
    }
}
