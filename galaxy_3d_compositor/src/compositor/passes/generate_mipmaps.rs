/// Generate mipmaps pass - fills the mip chain of a render texture.
///
/// Without a material the device generates the chain. With one, each level
/// k is rendered by an embedded compute pass that may only sample level
/// k - 1; the per-level framebuffers are cached by render target
/// generation.

use std::sync::Arc;
use crate::compositor::{ComputePassDesc, PassExecutionContext};
use crate::error::{Error, Result};
use crate::graphics_device::{
    Command, CommandBuffer, FramebufferAttachment, FramebufferDesc, GraphicsDevice,
    Rect2D, RenderTarget, Texture, Viewport,
};
use crate::material::MaterialManager;
use crate::utils::GenerationCache;
use super::ComputePass;

pub struct GenerateMipmapsPass {
    texture: String,
    compute: Option<ComputePass>,
    /// One framebuffer per mip level, index 0 = level 1
    mip_framebuffers: GenerationCache<Vec<Arc<dyn RenderTarget>>>,
}

impl GenerateMipmapsPass {
    pub fn new(name: &str, texture: &str, material: Option<ComputePassDesc>) -> Self {
        Self {
            texture: texture.to_string(),
            compute: material.map(|desc| ComputePass::new(name, desc)),
            mip_framebuffers: GenerationCache::new(),
        }
    }

    pub fn texture(&self) -> &str {
        &self.texture
    }

    /// Embedded downsampling pass, `None` for device mipmap generation
    pub fn compute_pass(&self) -> Option<&ComputePass> {
        self.compute.as_ref()
    }

    pub(crate) fn binds_own_render_targets(&self) -> bool {
        self.compute.is_some()
    }

    pub(crate) fn on_workspace_loading_finished(&mut self, materials: &mut MaterialManager) -> Result<()> {
        match &mut self.compute {
            Some(compute) => compute.on_workspace_loading_finished(materials),
            None => Ok(()),
        }
    }

    pub(crate) fn on_workspace_unload(&mut self, materials: &mut MaterialManager) {
        if let Some(compute) = &mut self.compute {
            compute.on_workspace_unload(materials);
        }
        self.mip_framebuffers.invalidate();
    }

    fn build_mip_framebuffers(texture: &Arc<dyn Texture>, device: &mut dyn GraphicsDevice) -> Result<Vec<Arc<dyn RenderTarget>>> {
        (1..texture.number_of_mipmaps())
            .map(|mipmap_index| {
                device.create_framebuffer(FramebufferDesc {
                    name: format!("{}Mip{}", texture.name(), mipmap_index),
                    color_attachments: vec![FramebufferAttachment {
                        texture: texture.clone(),
                        mipmap_index,
                        layer_index: 0,
                    }],
                    depth_stencil_attachment: None,
                })
            })
            .collect()
    }

    pub(crate) fn fill(&mut self, ctx: &mut PassExecutionContext<'_>, cmd: &mut CommandBuffer) -> Result<()> {
        let texture = ctx
            .render_targets
            .texture(&self.texture)
            .cloned()
            .ok_or_else(|| Error::InvalidResource(format!("Mipmap texture '{}' not found", self.texture)))?;

        let Some(compute) = &mut self.compute else {
            cmd.push(Command::GenerateMipmaps(texture));
            return Ok(());
        };

        let number_of_mipmaps = texture.number_of_mipmaps();
        if number_of_mipmaps < 2 {
            return Ok(());
        }
        let Some(is_compute) = compute.decide_mode(ctx.materials) else {
            // Material still streaming
            return Ok(());
        };

        let framebuffers = if is_compute {
            Vec::new()
        } else {
            let device = &mut *ctx.device;
            self.mip_framebuffers
                .get_or_rebuild(ctx.render_targets.generation(), || Self::build_mip_framebuffers(&texture, device))?
                .clone()
        };

        for mipmap_index in 1..number_of_mipmaps {
            cmd.push(Command::SetTextureMinimumMaximumMipmapIndex {
                texture: texture.clone(),
                minimum: mipmap_index - 1,
                maximum: mipmap_index - 1,
            });
            let framebuffer = framebuffers.get(mipmap_index as usize - 1);
            if let Some(framebuffer) = framebuffer {
                let (width, height) = (framebuffer.width(), framebuffer.height());
                cmd.push(Command::SetGraphicsRenderTarget(framebuffer.clone()));
                cmd.push(Command::SetGraphicsViewportAndScissorRectangle {
                    viewport: Viewport::full(width, height, 0.0, 1.0),
                    scissor: Rect2D { x: 0, y: 0, width, height },
                });
            }
            compute.fill(framebuffer, ctx, cmd)?;
        }

        cmd.push(Command::SetTextureMinimumMaximumMipmapIndex {
            texture,
            minimum: 0,
            maximum: number_of_mipmaps - 1,
        });
        Ok(())
    }
}
