/// Camera - view and projection of the viewer of a workspace execution.
///
/// The frustum is derived from the view-projection matrix whenever one of
/// the two matrices changes, so culling never sees a stale frustum.

use glam::{Mat4, Vec3, Vec4};
use super::frustum::Frustum;

/// Viewer camera
#[derive(Debug, Clone)]
pub struct Camera {
    view_matrix: Mat4,
    projection_matrix: Mat4,
    near: f32,
    far: f32,
    frustum: Frustum,
}

impl Camera {
    /// Create a camera from explicit matrices.
    ///
    /// `near` and `far` are the view-space distances of the clip planes of
    /// `projection` (used for LOD distances and shadow cascade splits).
    pub fn new(view: Mat4, projection: Mat4, near: f32, far: f32) -> Self {
        Self {
            view_matrix: view,
            projection_matrix: projection,
            near,
            far,
            frustum: Frustum::from_view_projection(&(projection * view)),
        }
    }

    /// Right-handed perspective camera with a [0, 1] depth range.
    pub fn perspective(view: Mat4, fov_y_radians: f32, aspect_ratio: f32, near: f32, far: f32) -> Self {
        let projection = Mat4::perspective_rh(fov_y_radians, aspect_ratio, near, far);
        Self::new(view, projection, near, far)
    }

    // ===== GETTERS =====

    pub fn view_matrix(&self) -> &Mat4 {
        &self.view_matrix
    }

    pub fn projection_matrix(&self) -> &Mat4 {
        &self.projection_matrix
    }

    /// Combined view-projection matrix (projection * view).
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix * self.view_matrix
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    /// Frustum planes for culling.
    pub fn frustum(&self) -> &Frustum {
        &self.frustum
    }

    /// World-space camera position (translation of the inverse view).
    pub fn position(&self) -> Vec3 {
        self.view_matrix.inverse().w_axis.truncate()
    }

    /// World-space corners of the frustum slice between two view distances.
    ///
    /// Returned as 4 near corners followed by 4 far corners. Distances are
    /// clamped to `[near, far]`.
    pub fn frustum_slice_corners(&self, near_distance: f32, far_distance: f32) -> [Vec3; 8] {
        let inverse = self.view_projection_matrix().inverse();
        let unproject = |x: f32, y: f32, z: f32| {
            let p = inverse * Vec4::new(x, y, z, 1.0);
            p.truncate() / p.w
        };

        let depth = (self.far - self.near).max(f32::EPSILON);
        let t0 = ((near_distance - self.near) / depth).clamp(0.0, 1.0);
        let t1 = ((far_distance - self.near) / depth).clamp(0.0, 1.0);

        let mut corners = [Vec3::ZERO; 8];
        for (i, (x, y)) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)].into_iter().enumerate() {
            let near_corner = unproject(x, y, 0.0);
            let far_corner = unproject(x, y, 1.0);
            corners[i] = near_corner.lerp(far_corner, t0);
            corners[i + 4] = near_corner.lerp(far_corner, t1);
        }
        corners
    }

    // ===== SETTERS =====

    pub fn set_view(&mut self, matrix: Mat4) {
        self.view_matrix = matrix;
        self.update_frustum();
    }

    pub fn set_projection(&mut self, matrix: Mat4, near: f32, far: f32) {
        self.projection_matrix = matrix;
        self.near = near;
        self.far = far;
        self.update_frustum();
    }

    fn update_frustum(&mut self) {
        self.frustum = Frustum::from_view_projection(&self.view_projection_matrix());
    }
}

#[cfg(test)]
#[path = "camera_tests.rs"]
mod tests;
