/// Mock graphics device for unit tests (no GPU required)
///
/// Records every created object and keeps a copy of each submitted command
/// buffer so tests can inspect what the compositor emitted.

use std::sync::{Arc, Mutex};
use crate::error::{Error, Result};
use crate::graphics_device::{
    BindingGroup, Buffer, BufferDesc, CommandBuffer, ComputePipeline,
    DeviceCapabilities, FramebufferDesc, GraphicsDevice, GraphicsPipeline,
    IndirectBuffer, RenderTarget, RootSignature, Texture, TextureDesc,
    TextureFormat, VertexArray, VertexArrayDesc,
};

// ============================================================================
// Mock Render Target
// ============================================================================

#[derive(Debug)]
pub struct MockRenderTarget {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub number_of_multisamples: u8,
}

impl MockRenderTarget {
    pub fn new(name: &str, width: u32, height: u32) -> Self {
        Self { name: name.to_string(), width, height, number_of_multisamples: 1 }
    }

    /// Shared render target, ready to hand to the compositor
    pub fn shared(name: &str, width: u32, height: u32) -> Arc<dyn RenderTarget> {
        Arc::new(Self::new(name, width, height))
    }
}

impl RenderTarget for MockRenderTarget {
    fn name(&self) -> &str { &self.name }
    fn width(&self) -> u32 { self.width }
    fn height(&self) -> u32 { self.height }
    fn number_of_multisamples(&self) -> u8 { self.number_of_multisamples }
}

// ============================================================================
// Mock Texture
// ============================================================================

#[derive(Debug)]
pub struct MockTexture {
    pub desc: TextureDesc,
}

impl MockTexture {
    pub fn new(name: &str, width: u32, height: u32, number_of_mipmaps: u32) -> Self {
        Self {
            desc: TextureDesc {
                name: name.to_string(),
                width,
                height,
                format: TextureFormat::R8G8B8A8_UNORM,
                number_of_mipmaps,
                number_of_layers: 1,
                number_of_multisamples: 1,
            },
        }
    }
}

impl Texture for MockTexture {
    fn name(&self) -> &str { &self.desc.name }
    fn width(&self) -> u32 { self.desc.width }
    fn height(&self) -> u32 { self.desc.height }
    fn format(&self) -> TextureFormat { self.desc.format }
    fn number_of_mipmaps(&self) -> u32 { self.desc.number_of_mipmaps }
    fn number_of_multisamples(&self) -> u8 { self.desc.number_of_multisamples }
}

// ============================================================================
// Mock Buffer
// ============================================================================

#[derive(Debug)]
pub struct MockBuffer {
    pub name: String,
    pub size: u64,
    /// (offset, length) of every update, in call order
    pub writes: Mutex<Vec<(u64, usize)>>,
}

impl MockBuffer {
    pub fn new(name: &str, size: u64) -> Self {
        Self { name: name.to_string(), size, writes: Mutex::new(Vec::new()) }
    }
}

impl Buffer for MockBuffer {
    fn size(&self) -> u64 { self.size }

    fn update(&self, offset: u64, data: &[u8]) -> Result<()> {
        if offset + data.len() as u64 > self.size {
            return Err(Error::InvalidResource(format!(
                "Write of {} bytes at {} overflows buffer '{}'", data.len(), offset, self.name
            )));
        }
        if let Ok(mut writes) = self.writes.lock() {
            writes.push((offset, data.len()));
        }
        Ok(())
    }
}

// ============================================================================
// Mock Vertex Array / Indirect Buffer
// ============================================================================

#[derive(Debug)]
pub struct MockVertexArray {
    pub name: String,
}

impl MockVertexArray {
    pub fn shared(name: &str) -> Arc<dyn VertexArray> {
        Arc::new(Self { name: name.to_string() })
    }
}

impl VertexArray for MockVertexArray {
    fn name(&self) -> &str { &self.name }
}

#[derive(Debug)]
pub struct MockIndirectBuffer {
    pub name: String,
    pub size: u64,
}

impl MockIndirectBuffer {
    pub fn shared(name: &str, size: u64) -> Arc<dyn IndirectBuffer> {
        Arc::new(Self { name: name.to_string(), size })
    }
}

impl IndirectBuffer for MockIndirectBuffer {
    fn name(&self) -> &str { &self.name }
    fn size(&self) -> u64 { self.size }
}

// ============================================================================
// Mock Pipeline Objects
// ============================================================================

#[derive(Debug)]
pub struct MockRootSignature {
    pub name: String,
}

impl MockRootSignature {
    pub fn shared(name: &str) -> Arc<dyn RootSignature> {
        Arc::new(Self { name: name.to_string() })
    }
}

impl RootSignature for MockRootSignature {
    fn name(&self) -> &str { &self.name }
}

#[derive(Debug)]
pub struct MockGraphicsPipeline {
    pub name: String,
}

impl MockGraphicsPipeline {
    pub fn shared(name: &str) -> Arc<dyn GraphicsPipeline> {
        Arc::new(Self { name: name.to_string() })
    }
}

impl GraphicsPipeline for MockGraphicsPipeline {
    fn name(&self) -> &str { &self.name }
}

#[derive(Debug)]
pub struct MockComputePipeline {
    pub name: String,
}

impl MockComputePipeline {
    pub fn shared(name: &str) -> Arc<dyn ComputePipeline> {
        Arc::new(Self { name: name.to_string() })
    }
}

impl ComputePipeline for MockComputePipeline {
    fn name(&self) -> &str { &self.name }
}

#[derive(Debug)]
pub struct MockBindingGroup {
    pub name: String,
    pub set_index: u32,
}

impl MockBindingGroup {
    pub fn shared(name: &str, set_index: u32) -> Arc<dyn BindingGroup> {
        Arc::new(Self { name: name.to_string(), set_index })
    }
}

impl BindingGroup for MockBindingGroup {
    fn set_index(&self) -> u32 { self.set_index }
}

// ============================================================================
// Mock Graphics Device
// ============================================================================

pub struct MockGraphicsDevice {
    pub capabilities: DeviceCapabilities,
    pub created_textures: Vec<String>,
    pub created_framebuffers: Vec<String>,
    pub created_buffers: Vec<String>,
    pub created_vertex_arrays: Vec<String>,
    pub submitted: Vec<CommandBuffer>,
    /// When set, the next submission fails with a backend error
    pub fail_next_submission: bool,
}

impl MockGraphicsDevice {
    pub fn new() -> Self {
        Self::with_capabilities(DeviceCapabilities::default())
    }

    pub fn with_capabilities(capabilities: DeviceCapabilities) -> Self {
        Self {
            capabilities,
            created_textures: Vec::new(),
            created_framebuffers: Vec::new(),
            created_buffers: Vec::new(),
            created_vertex_arrays: Vec::new(),
            submitted: Vec::new(),
            fail_next_submission: false,
        }
    }

    /// Mock device wrapped the way the compositor shares it
    pub fn shared() -> Arc<Mutex<MockGraphicsDevice>> {
        Arc::new(Mutex::new(Self::new()))
    }

    /// Last submitted command buffer
    pub fn last_submission(&self) -> Option<&CommandBuffer> {
        self.submitted.last()
    }
}

impl GraphicsDevice for MockGraphicsDevice {
    fn capabilities(&self) -> &DeviceCapabilities {
        &self.capabilities
    }

    fn create_texture(&mut self, desc: TextureDesc) -> Result<Arc<dyn Texture>> {
        self.created_textures.push(desc.name.clone());
        Ok(Arc::new(MockTexture { desc }))
    }

    fn create_framebuffer(&mut self, desc: FramebufferDesc) -> Result<Arc<dyn RenderTarget>> {
        let (width, height) = desc.size();
        self.created_framebuffers.push(desc.name.clone());
        Ok(Arc::new(MockRenderTarget {
            name: desc.name.clone(),
            width,
            height,
            number_of_multisamples: desc.number_of_multisamples(),
        }))
    }

    fn create_buffer(&mut self, desc: BufferDesc) -> Result<Arc<dyn Buffer>> {
        self.created_buffers.push(desc.name.clone());
        Ok(Arc::new(MockBuffer::new(&desc.name, desc.size)))
    }

    fn create_vertex_array(&mut self, desc: VertexArrayDesc) -> Result<Arc<dyn VertexArray>> {
        self.created_vertex_arrays.push(desc.name.clone());
        Ok(MockVertexArray::shared(&desc.name))
    }

    fn submit_command_buffer(&mut self, command_buffer: &CommandBuffer) -> Result<()> {
        if self.fail_next_submission {
            self.fail_next_submission = false;
            return Err(Error::BackendError("Mock submission failure".to_string()));
        }
        self.submitted.push(command_buffer.clone());
        Ok(())
    }
}
