/// RenderTarget trait - a surface draws can be recorded into
///
/// Both swap chains and framebuffers are render targets; the compositor
/// never needs to tell them apart.

use std::sync::Arc;
use crate::graphics_device::Texture;

/// Render target (swap chain or framebuffer)
pub trait RenderTarget: Send + Sync {
    /// Debug name
    fn name(&self) -> &str;

    /// Width in pixels
    fn width(&self) -> u32;

    /// Height in pixels
    fn height(&self) -> u32;

    /// Number of multisamples
    fn number_of_multisamples(&self) -> u8 {
        1
    }
}

/// One texture attachment of a framebuffer
#[derive(Clone)]
pub struct FramebufferAttachment {
    /// Attached texture
    pub texture: Arc<dyn Texture>,
    /// Attached mipmap level
    pub mipmap_index: u32,
    /// Attached array layer
    pub layer_index: u32,
}

impl FramebufferAttachment {
    /// Attach mip 0, layer 0 of a texture
    pub fn new(texture: Arc<dyn Texture>) -> Self {
        Self { texture, mipmap_index: 0, layer_index: 0 }
    }

    /// Width of the attached mipmap level
    pub fn width(&self) -> u32 {
        (self.texture.width() >> self.mipmap_index).max(1)
    }

    /// Height of the attached mipmap level
    pub fn height(&self) -> u32 {
        (self.texture.height() >> self.mipmap_index).max(1)
    }
}

/// Descriptor for creating a framebuffer
#[derive(Clone)]
pub struct FramebufferDesc {
    /// Name used to look the framebuffer up from compositor targets
    pub name: String,
    /// Color attachments
    pub color_attachments: Vec<FramebufferAttachment>,
    /// Optional depth/stencil attachment
    pub depth_stencil_attachment: Option<FramebufferAttachment>,
}

impl FramebufferDesc {
    /// Size of the framebuffer (first attachment)
    pub fn size(&self) -> (u32, u32) {
        self.color_attachments
            .first()
            .or(self.depth_stencil_attachment.as_ref())
            .map(|attachment| (attachment.width(), attachment.height()))
            .unwrap_or((1, 1))
    }

    /// Multisample count of the framebuffer (first attachment)
    pub fn number_of_multisamples(&self) -> u8 {
        self.color_attachments
            .first()
            .or(self.depth_stencil_attachment.as_ref())
            .map(|attachment| attachment.texture.number_of_multisamples())
            .unwrap_or(1)
    }
}
