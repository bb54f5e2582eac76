/// Per-execution inputs of a compositor workspace.

#[cfg(any(feature = "debug-gui", feature = "vr"))]
use std::sync::Arc;
use glam::Vec3;
use crate::camera::Camera;
#[cfg(feature = "vr")]
use crate::graphics_device::VertexArray;
#[cfg(feature = "debug-gui")]
use crate::graphics_device::{CommandBuffer, RenderTarget};

/// Records the debug GUI of the application into a command buffer
#[cfg(feature = "debug-gui")]
pub trait DebugGuiRenderer: Send + Sync {
    fn fill_command_buffer(&self, render_target: &Arc<dyn RenderTarget>, cmd: &mut CommandBuffer);
}

/// Hidden-area mesh of the current VR headset (non-visible lens regions)
#[cfg(feature = "vr")]
#[derive(Clone)]
pub struct VrHiddenAreaMesh {
    pub vertex_array: Arc<dyn VertexArray>,
    pub number_of_vertices: u32,
}

/// Camera and frame-wide parameters of one workspace execution
#[derive(Clone)]
pub struct CompositorContext {
    pub camera: Camera,
    /// Normalized world-space direction the main light shines towards
    pub light_direction: Vec3,
    /// Render both eyes with one draw (instance count doubled)
    pub single_pass_stereo: bool,
    #[cfg(feature = "debug-gui")]
    pub debug_gui: Option<Arc<dyn DebugGuiRenderer>>,
    #[cfg(feature = "vr")]
    pub vr_hidden_area_mesh: Option<VrHiddenAreaMesh>,
}

impl CompositorContext {
    pub fn new(camera: Camera) -> Self {
        Self {
            camera,
            light_direction: Vec3::new(0.5, -1.0, 0.5).normalize(),
            single_pass_stereo: false,
            #[cfg(feature = "debug-gui")]
            debug_gui: None,
            #[cfg(feature = "vr")]
            vr_hidden_area_mesh: None,
        }
    }

    pub fn with_light_direction(mut self, direction: Vec3) -> Self {
        self.light_direction = direction.normalize_or_zero();
        self
    }

    pub fn with_single_pass_stereo(mut self, enabled: bool) -> Self {
        self.single_pass_stereo = enabled;
        self
    }
}
