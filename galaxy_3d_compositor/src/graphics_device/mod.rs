/// Graphics device module - the abstract device the compositor records for
///
/// Concrete backends (Vulkan, Direct3D, OpenGL, null) implement these
/// traits outside of this crate. The compositor only creates a handful of
/// objects (render textures, framebuffers, scratch buffers, shared vertex
/// arrays) and submits one recorded command buffer per workspace execution.

pub mod graphics_device;
pub mod buffer;
pub mod texture;
pub mod render_target;
pub mod pipeline;
pub mod vertex_array;
pub mod command_buffer;

pub use graphics_device::*;
pub use buffer::*;
pub use texture::*;
pub use render_target::*;
pub use pipeline::*;
pub use vertex_array::*;
pub use command_buffer::*;

// Mock graphics device for tests (no GPU required)
#[cfg(test)]
pub mod mock_graphics_device;
