/// GraphicsDevice trait - factory and submission interface of a backend

use std::sync::{Arc, Mutex, MutexGuard};
use crate::error::{Error, Result};
use crate::graphics_device::{
    Buffer, BufferDesc, CommandBuffer, FramebufferDesc, RenderTarget,
    Texture, TextureDesc, VertexArray, VertexArrayDesc,
};

/// Capabilities reported by a device
///
/// Optional features are gated on these once, when the object depending
/// on them is created.
#[derive(Debug, Clone)]
pub struct DeviceCapabilities {
    /// The backend records command buffers from several threads natively
    pub native_multithreading: bool,
    /// Structured buffers are available (required by grass and particles)
    pub structured_buffers: bool,
    /// Highest supported multisample count (1, 2, 4 or 8)
    pub max_number_of_multisamples: u8,
    /// Maximum uniform buffer size in bytes
    pub max_uniform_buffer_size: u64,
    /// Maximum indirect buffer size in bytes
    pub max_indirect_buffer_size: u64,
}

impl Default for DeviceCapabilities {
    fn default() -> Self {
        Self {
            native_multithreading: false,
            structured_buffers: true,
            max_number_of_multisamples: 8,
            max_uniform_buffer_size: 64 * 1024,
            max_indirect_buffer_size: 128 * 1024,
        }
    }
}

/// Backend device
///
/// Shared by the workspace and the scene as `Arc<Mutex<dyn GraphicsDevice>>`.
pub trait GraphicsDevice: Send + Sync {
    /// Device capabilities
    fn capabilities(&self) -> &DeviceCapabilities;

    /// Create a texture (render texture, depth buffer, shadow map)
    fn create_texture(&mut self, desc: TextureDesc) -> Result<Arc<dyn Texture>>;

    /// Create a framebuffer from texture attachments
    ///
    /// The framebuffer size is the size of the attached mipmap level.
    fn create_framebuffer(&mut self, desc: FramebufferDesc) -> Result<Arc<dyn RenderTarget>>;

    /// Create a buffer
    fn create_buffer(&mut self, desc: BufferDesc) -> Result<Arc<dyn Buffer>>;

    /// Create a vertex array
    fn create_vertex_array(&mut self, desc: VertexArrayDesc) -> Result<Arc<dyn VertexArray>>;

    /// Execute a recorded command buffer
    fn submit_command_buffer(&mut self, command_buffer: &CommandBuffer) -> Result<()>;
}

/// Whether two shared device objects are the same object
///
/// Compares data addresses only, so two `Arc<dyn Trait>` created from the
/// same allocation through different vtables still compare equal.
pub fn same_object<T: ?Sized>(a: &Arc<T>, b: &Arc<T>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

/// Lock a shared device, turning a poisoned mutex into a backend error
pub fn lock_device(device: &Mutex<dyn GraphicsDevice>) -> Result<MutexGuard<'_, dyn GraphicsDevice + 'static>> {
    device
        .lock()
        .map_err(|_| Error::BackendError("Graphics device mutex poisoned".to_string()))
}

#[cfg(test)]
#[path = "graphics_device_tests.rs"]
mod tests;
