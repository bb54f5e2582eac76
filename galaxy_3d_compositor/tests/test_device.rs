#![allow(dead_code)]
//! Recording graphics device shared by the integration tests
//!
//! Implements the public device traits on plain host objects and keeps a
//! copy of every submitted command buffer.

use std::sync::{Arc, Mutex};
use galaxy_3d_compositor::galaxy3d::device::{
    BindingGroup, Buffer, BufferDesc, CommandBuffer, ComputePipeline, DeviceCapabilities,
    FramebufferDesc, GraphicsDevice, GraphicsPipeline, RenderTarget, RootSignature, Texture,
    TextureDesc, TextureFormat, VertexArray, VertexArrayDesc,
};
use galaxy_3d_compositor::galaxy3d::{Error, Result};

pub struct Named(pub String);

impl RootSignature for Named {
    fn name(&self) -> &str { &self.0 }
}

impl GraphicsPipeline for Named {
    fn name(&self) -> &str { &self.0 }
}

impl ComputePipeline for Named {
    fn name(&self) -> &str { &self.0 }
}

impl VertexArray for Named {
    fn name(&self) -> &str { &self.0 }
}

pub struct Group(pub u32);

impl BindingGroup for Group {
    fn set_index(&self) -> u32 { self.0 }
}

struct RecordedTexture(TextureDesc);

impl Texture for RecordedTexture {
    fn name(&self) -> &str { &self.0.name }
    fn width(&self) -> u32 { self.0.width }
    fn height(&self) -> u32 { self.0.height }
    fn format(&self) -> TextureFormat { self.0.format }
    fn number_of_mipmaps(&self) -> u32 { self.0.number_of_mipmaps }
    fn number_of_multisamples(&self) -> u8 { self.0.number_of_multisamples }
}

pub struct Surface {
    pub name: String,
    pub width: u32,
    pub height: u32,
}

impl Surface {
    pub fn shared(name: &str, width: u32, height: u32) -> Arc<dyn RenderTarget> {
        Arc::new(Self { name: name.to_string(), width, height })
    }
}

impl RenderTarget for Surface {
    fn name(&self) -> &str { &self.name }
    fn width(&self) -> u32 { self.width }
    fn height(&self) -> u32 { self.height }
}

struct HostBuffer {
    data: Mutex<Vec<u8>>,
}

impl Buffer for HostBuffer {
    fn size(&self) -> u64 {
        self.data.lock().map(|data| data.len() as u64).unwrap_or(0)
    }

    fn update(&self, offset: u64, bytes: &[u8]) -> Result<()> {
        let mut data = self.data.lock().map_err(|_| Error::BackendError("Buffer poisoned".to_string()))?;
        let start = offset as usize;
        let end = start + bytes.len();
        if end > data.len() {
            return Err(Error::OutOfMemory);
        }
        data[start..end].copy_from_slice(bytes);
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingDevice {
    pub capabilities: DeviceCapabilities,
    pub framebuffers: Vec<String>,
    pub textures: Vec<String>,
    pub submitted: Vec<CommandBuffer>,
    pub fail_submission: bool,
}

impl RecordingDevice {
    /// Device once as the concrete type and once as the shared trait object
    pub fn shared() -> (Arc<Mutex<RecordingDevice>>, Arc<Mutex<dyn GraphicsDevice>>) {
        let device = Arc::new(Mutex::new(RecordingDevice::default()));
        let shared: Arc<Mutex<dyn GraphicsDevice>> = device.clone();
        (device, shared)
    }
}

impl GraphicsDevice for RecordingDevice {
    fn capabilities(&self) -> &DeviceCapabilities {
        &self.capabilities
    }

    fn create_texture(&mut self, desc: TextureDesc) -> Result<Arc<dyn Texture>> {
        self.textures.push(desc.name.clone());
        Ok(Arc::new(RecordedTexture(desc)))
    }

    fn create_framebuffer(&mut self, desc: FramebufferDesc) -> Result<Arc<dyn RenderTarget>> {
        let (width, height) = desc.size();
        self.framebuffers.push(desc.name.clone());
        Ok(Arc::new(Surface { name: desc.name, width, height }))
    }

    fn create_buffer(&mut self, desc: BufferDesc) -> Result<Arc<dyn Buffer>> {
        Ok(Arc::new(HostBuffer { data: Mutex::new(vec![0; desc.size as usize]) }))
    }

    fn create_vertex_array(&mut self, desc: VertexArrayDesc) -> Result<Arc<dyn VertexArray>> {
        Ok(Arc::new(Named(desc.name)))
    }

    fn submit_command_buffer(&mut self, command_buffer: &CommandBuffer) -> Result<()> {
        if self.fail_submission {
            return Err(Error::BackendError("Device lost".to_string()));
        }
        self.submitted.push(command_buffer.clone());
        Ok(())
    }
}
