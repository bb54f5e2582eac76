/// Workspace instance - top-level per-frame orchestrator of the compositor.
///
/// Owns the node instances, the render-queue-index range table and the
/// frame command buffer. One `execute` call culls the scene, records every
/// node into the command buffer and submits it once.

use std::sync::{Arc, Mutex};
use crate::error::{Error, Result};
use crate::graphics_device::{lock_device, CommandBuffer, GraphicsDevice, RenderTarget};
use crate::material::MaterialManager;
use crate::render_queue::{InstanceBufferPool, RenderQueueIndexRanges};
use crate::scene::{Scene, SceneItemKey};
use crate::{engine_debug, engine_error, engine_info, engine_warn};
use super::{
    CompositorContext, CompositorWorkspaceDesc, InstancePass, NodeInstance,
    PassExecutionContext, PassKindDesc, PassType, RenderTargetManager, TargetRef,
    WorkspaceConfig,
};

/// Lifecycle of a workspace instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkspaceState {
    Unloaded,
    /// Assets referenced by the graph are streaming
    Loading,
    Ready,
    /// Inside `execute`
    Executing,
}

pub struct CompositorWorkspaceInstance {
    graphics_device: Arc<Mutex<dyn GraphicsDevice>>,
    config: WorkspaceConfig,
    state: WorkspaceState,
    name: String,
    nodes: Vec<NodeInstance>,
    ranges: RenderQueueIndexRanges,
    render_targets: RenderTargetManager,
    instance_buffers: InstanceBufferPool,
    command_buffer: CommandBuffer,
    callback_items: Vec<SceneItemKey>,
}

impl CompositorWorkspaceInstance {
    /// Create an unloaded workspace instance.
    ///
    /// # Panics
    ///
    /// When `config` is not supported by the device.
    pub fn new(graphics_device: Arc<Mutex<dyn GraphicsDevice>>, config: WorkspaceConfig) -> Result<Self> {
        let instance_buffers = {
            let mut device = lock_device(&graphics_device)?;
            config.validate(device.capabilities());
            InstanceBufferPool::new(&mut *device, config.number_of_instance_buffers, config.instance_buffer_size)?
        };

        Ok(Self {
            graphics_device,
            config,
            state: WorkspaceState::Unloaded,
            name: String::new(),
            nodes: Vec::new(),
            ranges: RenderQueueIndexRanges::new(),
            render_targets: RenderTargetManager::new(),
            instance_buffers,
            command_buffer: CommandBuffer::new(),
            callback_items: Vec::new(),
        })
    }

    // ===== LIFECYCLE =====

    /// Enter the loading state while the assets of the graph stream in
    pub fn begin_loading(&mut self) {
        debug_assert_eq!(self.state, WorkspaceState::Unloaded, "Workspace loading started twice");
        if self.state == WorkspaceState::Unloaded {
            self.state = WorkspaceState::Loading;
        }
    }

    /// Build the runtime graph and fire the loading-finished hooks.
    ///
    /// A graph targeting undeclared framebuffers is rejected. On failure the
    /// workspace is unloaded again.
    pub fn finish_loading(&mut self, desc: &CompositorWorkspaceDesc, materials: &mut MaterialManager) -> Result<()> {
        if self.state != WorkspaceState::Loading {
            return Err(Error::InitializationFailed(format!(
                "Workspace '{}' is not loading (state {:?})", desc.name, self.state
            )));
        }

        let result = self.build(desc, materials);
        match result {
            Ok(()) => {
                self.state = WorkspaceState::Ready;
                engine_info!(
                    "galaxy3d::CompositorWorkspace",
                    "Workspace '{}' ready: {} nodes, {} render queue index ranges",
                    self.name, self.nodes.len(), self.ranges.len()
                );
                Ok(())
            }
            Err(error) => {
                engine_error!("galaxy3d::CompositorWorkspace", "Loading workspace '{}' failed: {}", desc.name, error);
                self.unload(materials);
                Err(error)
            }
        }
    }

    /// `begin_loading` followed by `finish_loading`
    pub fn load(&mut self, desc: &CompositorWorkspaceDesc, materials: &mut MaterialManager) -> Result<()> {
        self.begin_loading();
        self.finish_loading(desc, materials)
    }

    fn build(&mut self, desc: &CompositorWorkspaceDesc, materials: &mut MaterialManager) -> Result<()> {
        self.name = desc.name.clone();

        for node in &desc.nodes {
            for target in &node.targets {
                if let TargetRef::Framebuffer(name) = &target.target {
                    if !desc.framebuffers.iter().any(|framebuffer| &framebuffer.name == name) {
                        return Err(Error::InvalidConfiguration(format!(
                            "Node '{}' targets undeclared framebuffer '{}'", node.name, name
                        )));
                    }
                }
                for pass in &target.passes {
                    match &pass.kind {
                        PassKindDesc::Scene(scene) | PassKindDesc::ShadowMap { scene, .. } => {
                            self.ranges.add_range(scene.minimum_render_queue_index, scene.maximum_render_queue_index);
                        }
                        _ => {}
                    }
                }
            }
        }

        self.render_targets.set_declarations(desc.textures.clone(), desc.framebuffers.clone());
        self.nodes = desc.nodes.iter().map(NodeInstance::new).collect();

        for node in &mut self.nodes {
            for pass in node.passes_mut() {
                pass.on_workspace_loading_finished(&self.ranges, materials)?;
            }
        }
        Ok(())
    }

    /// Destroy the runtime graph
    pub fn unload(&mut self, materials: &mut MaterialManager) {
        for node in &mut self.nodes {
            for pass in node.passes_mut() {
                pass.on_workspace_unload(materials);
            }
        }
        self.nodes.clear();
        self.ranges.clear();
        self.render_targets.clear();
        self.callback_items.clear();
        self.command_buffer.clear();
        self.state = WorkspaceState::Unloaded;
        engine_debug!("galaxy3d::CompositorWorkspace", "Workspace '{}' unloaded", self.name);
    }

    // ===== EXECUTION =====

    /// Render one frame into `render_target`.
    ///
    /// Does nothing unless the workspace is ready. Pass failures are logged
    /// and do not abort the frame; device failures are returned.
    pub fn execute(
        &mut self,
        render_target: &Arc<dyn RenderTarget>,
        context: &CompositorContext,
        scene: &mut Scene,
        materials: &MaterialManager,
    ) -> Result<()> {
        if self.state != WorkspaceState::Ready {
            engine_warn!(
                "galaxy3d::CompositorWorkspace",
                "Workspace '{}' executed while {:?}, frame skipped", self.name, self.state
            );
            return Ok(());
        }

        self.state = WorkspaceState::Executing;
        let result = self.execute_frame(render_target, context, scene, materials);
        self.state = WorkspaceState::Ready;
        result
    }

    fn execute_frame(
        &mut self,
        render_target: &Arc<dyn RenderTarget>,
        context: &CompositorContext,
        scene: &mut Scene,
        materials: &MaterialManager,
    ) -> Result<()> {
        let graphics_device = self.graphics_device.clone();
        let mut device = lock_device(&graphics_device)?;

        // Render targets follow the main size and the settings lazily
        self.render_targets.ensure(
            &mut *device,
            render_target.width(),
            render_target.height(),
            self.config.number_of_multisamples,
            self.config.resolution_scale,
        )?;

        scene.cull(&context.camera, &mut self.ranges, &mut self.callback_items);

        self.command_buffer.clear();
        self.command_buffer.begin_debug_event(&self.name);

        for &item_key in &self.callback_items {
            if let Some(hook) = scene.scene_item(item_key).and_then(|item| item.hook()) {
                hook.on_execute_on_rendering(render_target, context, &mut self.command_buffer);
            }
        }

        self.instance_buffers.begin_frame();
        {
            let mut ctx = PassExecutionContext {
                device: &mut *device,
                render_targets: &self.render_targets,
                scene: &*scene,
                materials,
                ranges: &self.ranges,
                instance_buffers: &mut self.instance_buffers,
                context,
            };
            let mut bound = None;
            for node in &mut self.nodes {
                node.execute(render_target, &mut bound, &mut ctx, &mut self.command_buffer);
            }
        }
        self.command_buffer.end_debug_event();

        let submitted = device.submit_command_buffer(&self.command_buffer);
        drop(device);

        for node in &mut self.nodes {
            node.on_post_command_buffer_execution();
        }
        submitted
    }

    // ===== SETTINGS =====

    pub fn config(&self) -> &WorkspaceConfig {
        &self.config
    }

    /// Change the multisample count; render targets are rebuilt on the
    /// next execution.
    ///
    /// # Panics
    ///
    /// On a count the device does not support.
    pub fn set_number_of_multisamples(&mut self, number_of_multisamples: u8) -> Result<()> {
        let config = WorkspaceConfig { number_of_multisamples, ..self.config.clone() };
        config.validate(lock_device(&self.graphics_device)?.capabilities());
        self.config = config;
        Ok(())
    }

    /// Change the resolution scale; render targets are rebuilt on the next
    /// execution.
    ///
    /// # Panics
    ///
    /// On a non-positive scale.
    pub fn set_resolution_scale(&mut self, resolution_scale: f32) {
        assert!(resolution_scale > 0.0, "Resolution scale must be positive");
        self.config.resolution_scale = resolution_scale;
    }

    // ===== ACCESSORS =====

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> WorkspaceState {
        self.state
    }

    pub fn nodes(&self) -> &[NodeInstance] {
        &self.nodes
    }

    pub fn render_queue_index_ranges(&self) -> &RenderQueueIndexRanges {
        &self.ranges
    }

    pub fn render_targets(&self) -> &RenderTargetManager {
        &self.render_targets
    }

    /// First pass of the given type, in execution order
    pub fn first_instance_pass(&self, pass_type: PassType) -> Option<&InstancePass> {
        self.nodes.iter().find_map(|node| node.first_instance_pass(pass_type))
    }

    pub fn first_instance_pass_mut(&mut self, pass_type: PassType) -> Option<&mut InstancePass> {
        self.nodes
            .iter_mut()
            .flat_map(|node| node.passes_mut())
            .find(|pass| pass.pass_type() == pass_type)
    }

    /// Command buffer of the last frame (statistics)
    pub fn command_buffer(&self) -> &CommandBuffer {
        &self.command_buffer
    }

    /// Scene items whose hook ran during the last frame
    pub fn callback_items(&self) -> &[SceneItemKey] {
        &self.callback_items
    }
}

#[cfg(test)]
#[path = "workspace_instance_tests.rs"]
mod tests;
