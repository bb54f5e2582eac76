/// Render target manager - realises the textures and framebuffers a
/// workspace declares.
///
/// Sizes depend on the main render target, the multisample count and the
/// resolution scale; when any of them changes every resource is rebuilt
/// and the generation counter is bumped so that passes caching
/// framebuffers of their own rebuild them as well.

use std::sync::Arc;
use rustc_hash::FxHashMap;
use crate::engine_info;
use crate::error::{Error, Result};
use crate::graphics_device::{
    full_mipmap_count, FramebufferAttachment, FramebufferDesc, GraphicsDevice,
    RenderTarget, Texture, TextureDesc,
};
use crate::utils::StringId;
use super::{FramebufferDeclDesc, RenderTextureDesc, TextureSize};

/// Parameters the realised resources were built for
#[derive(Debug, Clone, Copy, PartialEq)]
struct BuildKey {
    width: u32,
    height: u32,
    number_of_multisamples: u8,
    resolution_scale: f32,
}

pub struct RenderTargetManager {
    texture_descs: Vec<RenderTextureDesc>,
    framebuffer_descs: Vec<FramebufferDeclDesc>,
    textures: FxHashMap<StringId, Arc<dyn Texture>>,
    framebuffers: FxHashMap<StringId, Arc<dyn RenderTarget>>,
    built_for: Option<BuildKey>,
    generation: u64,
}

impl RenderTargetManager {
    pub fn new() -> Self {
        Self {
            texture_descs: Vec::new(),
            framebuffer_descs: Vec::new(),
            textures: FxHashMap::default(),
            framebuffers: FxHashMap::default(),
            built_for: None,
            generation: 0,
        }
    }

    /// Replace the declarations; resources are built by the next `ensure`
    pub fn set_declarations(&mut self, textures: Vec<RenderTextureDesc>, framebuffers: Vec<FramebufferDeclDesc>) {
        self.texture_descs = textures;
        self.framebuffer_descs = framebuffers;
        self.invalidate();
    }

    /// Drop every declaration and resource
    pub fn clear(&mut self) {
        self.texture_descs.clear();
        self.framebuffer_descs.clear();
        self.invalidate();
    }

    fn invalidate(&mut self) {
        self.textures.clear();
        self.framebuffers.clear();
        self.built_for = None;
        self.generation += 1;
    }

    /// Build the resources for the given main size and settings unless they
    /// were already built for them. Returns whether a rebuild happened.
    pub fn ensure(
        &mut self,
        device: &mut dyn GraphicsDevice,
        main_width: u32,
        main_height: u32,
        number_of_multisamples: u8,
        resolution_scale: f32,
    ) -> Result<bool> {
        let key = BuildKey {
            width: main_width,
            height: main_height,
            number_of_multisamples,
            resolution_scale,
        };
        if self.built_for == Some(key) {
            return Ok(false);
        }

        self.textures.clear();
        self.framebuffers.clear();
        self.built_for = None;
        self.generation += 1;

        for desc in &self.texture_descs {
            let (width, height) = match desc.size {
                TextureSize::RelativeToMain { scale } => (
                    scaled(main_width, scale * resolution_scale),
                    scaled(main_height, scale * resolution_scale),
                ),
                TextureSize::Fixed { width, height } => (width.max(1), height.max(1)),
            };
            let number_of_mipmaps = if desc.number_of_mipmaps == 0 {
                full_mipmap_count(width, height)
            } else {
                desc.number_of_mipmaps
            };
            let texture = device.create_texture(TextureDesc {
                name: desc.name.clone(),
                width,
                height,
                format: desc.format,
                number_of_mipmaps,
                number_of_layers: 1,
                number_of_multisamples: if desc.allow_multisample { number_of_multisamples } else { 1 },
            })?;
            self.textures.insert(StringId::new(&desc.name), texture);
        }

        for desc in &self.framebuffer_descs {
            let color_attachments = desc
                .color_textures
                .iter()
                .map(|name| self.required_texture(name, &desc.name).map(FramebufferAttachment::new))
                .collect::<Result<Vec<_>>>()?;
            let depth_stencil_attachment = desc
                .depth_stencil_texture
                .as_deref()
                .map(|name| self.required_texture(name, &desc.name).map(FramebufferAttachment::new))
                .transpose()?;
            let framebuffer = device.create_framebuffer(FramebufferDesc {
                name: desc.name.clone(),
                color_attachments,
                depth_stencil_attachment,
            })?;
            self.framebuffers.insert(StringId::new(&desc.name), framebuffer);
        }

        self.built_for = Some(key);
        engine_info!(
            "galaxy3d::RenderTargetManager",
            "Built {} textures and {} framebuffers for {}x{} (x{} MSAA, scale {})",
            self.textures.len(), self.framebuffers.len(),
            main_width, main_height, number_of_multisamples, resolution_scale
        );
        Ok(true)
    }

    fn required_texture(&self, name: &str, framebuffer: &str) -> Result<Arc<dyn Texture>> {
        self.textures.get(&StringId::new(name)).cloned().ok_or_else(|| {
            Error::InvalidResource(format!(
                "Framebuffer '{}' references unknown texture '{}'", framebuffer, name
            ))
        })
    }

    pub fn texture(&self, name: &str) -> Option<&Arc<dyn Texture>> {
        self.textures.get(&StringId::new(name))
    }

    pub fn framebuffer(&self, name: &str) -> Option<&Arc<dyn RenderTarget>> {
        self.framebuffers.get(&StringId::new(name))
    }

    /// Bumped on every rebuild
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn number_of_textures(&self) -> usize {
        self.textures.len()
    }

    pub fn number_of_framebuffers(&self) -> usize {
        self.framebuffers.len()
    }
}

impl Default for RenderTargetManager {
    fn default() -> Self {
        Self::new()
    }
}

fn scaled(size: u32, scale: f32) -> u32 {
    ((size as f32 * scale).round() as u32).max(1)
}

#[cfg(test)]
#[path = "render_target_manager_tests.rs"]
mod tests;
