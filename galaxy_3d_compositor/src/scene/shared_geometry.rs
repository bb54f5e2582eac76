/// Shared geometry registry - one vertex array per kind, shared by every
/// sky and volume item of a scene.
///
/// Handles keep the geometry alive; the registry only holds weak
/// references, so the vertex array is released with the last handle.

use std::sync::{Arc, Weak};
use crate::error::Result;
use crate::engine_debug;
use crate::graphics_device::{GraphicsDevice, VertexArray, VertexArrayDesc};

/// Kind of shared geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SharedGeometryKind {
    /// Cube rendered around the camera
    Sky,
    /// Unit cube bounding a volume
    Volume,
}

impl SharedGeometryKind {
    fn slot(&self) -> usize {
        match self {
            SharedGeometryKind::Sky => 0,
            SharedGeometryKind::Volume => 1,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            SharedGeometryKind::Sky => "SharedSkyGeometry",
            SharedGeometryKind::Volume => "SharedVolumeGeometry",
        }
    }
}

struct SharedGeometry {
    kind: SharedGeometryKind,
    vertex_array: Arc<dyn VertexArray>,
}

/// Scoped access to a shared geometry
#[derive(Clone)]
pub struct SharedGeometryHandle(Arc<SharedGeometry>);

impl SharedGeometryHandle {
    pub fn kind(&self) -> SharedGeometryKind {
        self.0.kind
    }

    pub fn vertex_array(&self) -> &Arc<dyn VertexArray> {
        &self.0.vertex_array
    }
}

/// Registry owned by a scene
#[derive(Default)]
pub struct SharedGeometryRegistry {
    entries: [Weak<SharedGeometry>; 2],
}

impl SharedGeometryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a handle on the geometry of `kind`, creating it if no handle is alive
    pub fn acquire(&mut self, kind: SharedGeometryKind, device: &mut dyn GraphicsDevice) -> Result<SharedGeometryHandle> {
        if let Some(geometry) = self.entries[kind.slot()].upgrade() {
            return Ok(SharedGeometryHandle(geometry));
        }

        let vertex_array = device.create_vertex_array(cube_vertex_array_desc(kind.name()))?;
        engine_debug!("galaxy3d::SharedGeometryRegistry", "Created '{}'", kind.name());
        let geometry = Arc::new(SharedGeometry { kind, vertex_array });
        self.entries[kind.slot()] = Arc::downgrade(&geometry);
        Ok(SharedGeometryHandle(geometry))
    }

    /// Whether a handle on the geometry of `kind` is alive
    pub fn is_alive(&self, kind: SharedGeometryKind) -> bool {
        self.entries[kind.slot()].strong_count() > 0
    }

    /// Number of live handles on the geometry of `kind`
    pub fn handle_count(&self, kind: SharedGeometryKind) -> usize {
        self.entries[kind.slot()].strong_count()
    }
}

/// Unit cube centered on the origin, 8 corners and 36 indices
fn cube_vertex_array_desc(name: &str) -> VertexArrayDesc {
    let mut positions = Vec::with_capacity(8);
    for i in 0..8 {
        positions.push([
            if i & 1 == 0 { -1.0 } else { 1.0 },
            if i & 2 == 0 { -1.0 } else { 1.0 },
            if i & 4 == 0 { -1.0 } else { 1.0 },
        ]);
    }
    let indices = vec![
        0, 2, 1, 1, 2, 3, // -z
        4, 5, 6, 5, 7, 6, // +z
        0, 1, 4, 1, 5, 4, // -y
        2, 6, 3, 3, 6, 7, // +y
        0, 4, 2, 2, 4, 6, // -x
        1, 3, 5, 3, 7, 5, // +x
    ];
    VertexArrayDesc {
        name: name.to_string(),
        positions,
        indices: Some(indices),
    }
}

#[cfg(test)]
#[path = "shared_geometry_tests.rs"]
mod tests;
