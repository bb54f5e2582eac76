/// Shadow map pass - cascaded shadow maps for the main directional light.
///
/// Renders the shadow casters visible this frame once per cascade into one
/// layer of a depth texture array. The texture and the per-cascade
/// framebuffers are built lazily and only rebuilt when the settings
/// generation changes.

use std::sync::Arc;
use glam::{Mat4, Vec3, Vec4};
use crate::camera::Camera;
use crate::compositor::{PassExecutionContext, ScenePassDesc, ShadowMapSettings};
use crate::engine_debug;
use crate::error::Result;
use crate::graphics_device::{
    ClearFlags, Command, CommandBuffer, FramebufferAttachment, FramebufferDesc,
    GraphicsDevice, Rect2D, RenderTarget, Texture, TextureDesc, TextureFormat, Viewport,
};
use crate::render_queue::RenderQueueIndexRanges;
use crate::utils::GenerationCache;
use super::ScenePass;

const MAXIMUM_CASCADES: usize = ShadowMapSettings::MAXIMUM_NUMBER_OF_CASCADES as usize;

/// Cascade data consumed by lighting shaders and tooling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowPassData {
    /// View-space far distance of each cascade
    pub split_distances: [f32; MAXIMUM_CASCADES],
    /// World to light clip space, per cascade
    pub light_view_projections: [Mat4; MAXIMUM_CASCADES],
    pub number_of_cascades: u8,
    pub shadow_map_size: u32,
    pub filter_size: f32,
}

impl Default for ShadowPassData {
    fn default() -> Self {
        Self {
            split_distances: [0.0; MAXIMUM_CASCADES],
            light_view_projections: [Mat4::IDENTITY; MAXIMUM_CASCADES],
            number_of_cascades: 0,
            shadow_map_size: 0,
            filter_size: 0.0,
        }
    }
}

/// Device objects built for one settings generation
struct ShadowResources {
    texture: Arc<dyn Texture>,
    cascade_framebuffers: Vec<Arc<dyn RenderTarget>>,
}

pub struct ShadowMapPass {
    name: String,
    scene: ScenePass,
    settings: ShadowMapSettings,
    settings_generation: u64,
    resources: GenerationCache<ShadowResources>,
    data: ShadowPassData,
}

impl ShadowMapPass {
    /// Only shadow casters are queued, whatever `scene.cast_shadows` says.
    ///
    /// # Panics
    ///
    /// On invalid settings.
    pub fn new(name: &str, scene: ScenePassDesc, settings: ShadowMapSettings) -> Self {
        settings.validate();
        Self {
            name: name.to_string(),
            scene: ScenePass::new(ScenePassDesc { cast_shadows: true, ..scene }),
            settings,
            settings_generation: 0,
            resources: GenerationCache::new(),
            data: ShadowPassData::default(),
        }
    }

    pub fn settings(&self) -> &ShadowMapSettings {
        &self.settings
    }

    /// Change the settings; resources are rebuilt on the next execution
    ///
    /// # Panics
    ///
    /// On invalid settings.
    pub fn set_settings(&mut self, settings: ShadowMapSettings) {
        settings.validate();
        if settings != self.settings {
            self.settings = settings;
            self.settings_generation += 1;
        }
    }

    pub fn settings_generation(&self) -> u64 {
        self.settings_generation
    }

    /// Cascade data of the last execution
    pub fn shadow_pass_data(&self) -> &ShadowPassData {
        &self.data
    }

    /// Depth texture array, one layer per cascade (built on first execution)
    pub fn shadow_texture(&self) -> Option<&Arc<dyn Texture>> {
        self.resources.get().map(|resources| &resources.texture)
    }

    pub fn scene_pass(&self) -> &ScenePass {
        &self.scene
    }

    pub(crate) fn on_workspace_loading_finished(&mut self, ranges: &RenderQueueIndexRanges) {
        self.scene.on_workspace_loading_finished(ranges);
    }

    pub(crate) fn on_post_command_buffer_execution(&mut self) {
        self.scene.on_post_command_buffer_execution();
    }

    fn build_resources(name: &str, settings: &ShadowMapSettings, device: &mut dyn GraphicsDevice) -> Result<ShadowResources> {
        let texture = device.create_texture(TextureDesc {
            name: name.to_string(),
            width: settings.shadow_map_size,
            height: settings.shadow_map_size,
            format: TextureFormat::D32_FLOAT,
            number_of_mipmaps: 1,
            number_of_layers: settings.number_of_cascades as u32,
            number_of_multisamples: settings.number_of_multisamples,
        })?;
        let cascade_framebuffers = (0..settings.number_of_cascades as u32)
            .map(|layer_index| {
                device.create_framebuffer(FramebufferDesc {
                    name: format!("{}Cascade{}", name, layer_index),
                    color_attachments: Vec::new(),
                    depth_stencil_attachment: Some(FramebufferAttachment {
                        texture: texture.clone(),
                        mipmap_index: 0,
                        layer_index,
                    }),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        engine_debug!(
            "galaxy3d::ShadowMapPass",
            "Built {} shadow cascades of {}x{}",
            settings.number_of_cascades, settings.shadow_map_size, settings.shadow_map_size
        );
        Ok(ShadowResources { texture, cascade_framebuffers })
    }

    pub(crate) fn fill(&mut self, ctx: &mut PassExecutionContext<'_>, cmd: &mut CommandBuffer) -> Result<usize> {
        let name = self.name.as_str();
        let settings = &self.settings;
        let device = &mut *ctx.device;
        let framebuffers = self
            .resources
            .get_or_rebuild(self.settings_generation, || Self::build_resources(name, settings, device))?
            .cascade_framebuffers
            .clone();

        self.data = compute_cascades(&ctx.context.camera, ctx.context.light_direction, &self.settings);

        self.scene.queue_visible_renderables(ctx);
        let size = self.settings.shadow_map_size;
        let mut draws = 0;
        for (index, framebuffer) in framebuffers.iter().enumerate() {
            cmd.begin_debug_event(&format!("Cascade {}", index));
            cmd.push(Command::SetGraphicsRenderTarget(framebuffer.clone()));
            cmd.push(Command::SetGraphicsViewportAndScissorRectangle {
                viewport: Viewport::full(size, size, 0.0, 1.0),
                scissor: Rect2D { x: 0, y: 0, width: size, height: size },
            });
            cmd.push(Command::ClearGraphics {
                flags: ClearFlags::DEPTH,
                color: [0.0; 4],
                depth: 1.0,
                stencil: 0,
            });
            draws += self.scene.record(ctx, cmd)?;
            cmd.end_debug_event();
        }
        Ok(draws)
    }
}

/// View-space distances splitting `[near, far]` into cascades.
///
/// Blends the logarithmic and the uniform split schemes with `lambda`
/// (1 = fully logarithmic).
pub(crate) fn cascade_split_distances(near: f32, far: f32, number_of_cascades: u8, lambda: f32) -> [f32; MAXIMUM_CASCADES] {
    let mut splits = [far; MAXIMUM_CASCADES];
    let count = number_of_cascades.clamp(1, MAXIMUM_CASCADES as u8) as usize;
    for (index, split) in splits.iter_mut().enumerate().take(count) {
        let p = (index + 1) as f32 / count as f32;
        let logarithmic = near * (far / near).powf(p);
        let uniform = near + (far - near) * p;
        *split = lambda * logarithmic + (1.0 - lambda) * uniform;
    }
    splits
}

pub(crate) fn compute_cascades(camera: &Camera, light_direction: Vec3, settings: &ShadowMapSettings) -> ShadowPassData {
    let direction = light_direction.try_normalize().unwrap_or(Vec3::NEG_Y);
    let up = if direction.y.abs() > 0.99 { Vec3::Z } else { Vec3::Y };
    let splits = cascade_split_distances(camera.near(), camera.far(), settings.number_of_cascades, settings.cascade_split_lambda);

    let mut data = ShadowPassData {
        split_distances: splits,
        number_of_cascades: settings.number_of_cascades,
        shadow_map_size: settings.shadow_map_size,
        filter_size: settings.filter_size,
        ..ShadowPassData::default()
    };

    let mut slice_near = camera.near();
    for index in 0..settings.number_of_cascades as usize {
        let corners = camera.frustum_slice_corners(slice_near, splits[index]);
        let center = corners.iter().copied().sum::<Vec3>() / corners.len() as f32;

        data.light_view_projections[index] = if settings.stabilize_cascades {
            // Rotation and translation invariant bounds, snapped to texels
            let radius = corners.iter().map(|corner| corner.distance(center)).fold(0.0_f32, f32::max);
            let radius = (radius * 16.0).ceil() / 16.0;
            let view = Mat4::look_at_rh(center - direction * radius, center, up);
            let mut projection = Mat4::orthographic_rh(-radius, radius, -radius, radius, 0.0, 2.0 * radius);
            let half_size = settings.shadow_map_size as f32 * 0.5;
            let origin = (projection * view) * Vec4::W * half_size;
            let offset = (origin.round() - origin) / half_size;
            projection.w_axis.x += offset.x;
            projection.w_axis.y += offset.y;
            projection * view
        } else {
            let extent = corners.iter().map(|corner| corner.distance(center)).fold(0.0_f32, f32::max);
            let view = Mat4::look_at_rh(center - direction * extent, center, up);
            let mut minimum = Vec3::splat(f32::MAX);
            let mut maximum = Vec3::splat(f32::MIN);
            for corner in corners {
                let light_space = view.transform_point3(corner);
                minimum = minimum.min(light_space);
                maximum = maximum.max(light_space);
            }
            // Right-handed view space looks down -Z
            Mat4::orthographic_rh(minimum.x, maximum.x, minimum.y, maximum.y, -maximum.z, -minimum.z) * view
        };
        slice_near = splits[index];
    }
    data
}

#[cfg(test)]
#[path = "shadow_map_tests.rs"]
mod tests;
