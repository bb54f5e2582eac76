/// Node instance - ordered passes grouped by render target.

use std::sync::Arc;
use crate::graphics_device::{same_object, Command, CommandBuffer, Rect2D, RenderTarget, Viewport};
use crate::{engine_error, engine_trace};
use super::{CompositorNodeDesc, InstancePass, PassExecutionContext, PassType, TargetRef};

/// Passes sharing one target
pub struct TargetInstance {
    target: TargetRef,
    passes: Vec<InstancePass>,
}

impl TargetInstance {
    pub fn target(&self) -> &TargetRef {
        &self.target
    }

    pub fn passes(&self) -> &[InstancePass] {
        &self.passes
    }
}

pub struct NodeInstance {
    name: String,
    targets: Vec<TargetInstance>,
}

impl NodeInstance {
    pub fn new(desc: &CompositorNodeDesc) -> Self {
        let targets = desc
            .targets
            .iter()
            .map(|target| TargetInstance {
                target: target.target.clone(),
                passes: target.passes.iter().map(InstancePass::new).collect(),
            })
            .collect();
        Self { name: desc.name.clone(), targets }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn targets(&self) -> &[TargetInstance] {
        &self.targets
    }

    pub fn passes(&self) -> impl Iterator<Item = &InstancePass> {
        self.targets.iter().flat_map(|target| target.passes.iter())
    }

    pub fn passes_mut(&mut self) -> impl Iterator<Item = &mut InstancePass> {
        self.targets.iter_mut().flat_map(|target| target.passes.iter_mut())
    }

    pub fn first_instance_pass(&self, pass_type: PassType) -> Option<&InstancePass> {
        self.passes().find(|pass| pass.pass_type() == pass_type)
    }

    /// Record every pass of the node.
    ///
    /// `bound` is the render target bound by the previous pass (possibly of
    /// an earlier node); a target is only rebound when it changes. Pass
    /// errors are logged and the remaining passes still run. The node must
    /// leave a render target bound: asserts in debug builds, logs in release
    /// builds.
    pub fn execute(
        &mut self,
        main_render_target: &Arc<dyn RenderTarget>,
        bound: &mut Option<Arc<dyn RenderTarget>>,
        ctx: &mut PassExecutionContext<'_>,
        cmd: &mut CommandBuffer,
    ) {
        for target in &mut self.targets {
            let render_target = match &target.target {
                TargetRef::None => None,
                TargetRef::Main => Some(main_render_target.clone()),
                TargetRef::Framebuffer(name) => match ctx.render_targets.framebuffer(name) {
                    Some(framebuffer) => Some(framebuffer.clone()),
                    None => {
                        engine_error!(
                            "galaxy3d::CompositorNode",
                            "Node '{}' targets unknown framebuffer '{}'", self.name, name
                        );
                        continue;
                    }
                },
            };

            for pass in &mut target.passes {
                if !pass.begin_execution() {
                    engine_trace!("galaxy3d::CompositorNode", "Pass '{}' skipped", pass.name());
                    continue;
                }

                if let Some(render_target) = &render_target {
                    if bound.as_ref().map_or(true, |bound| !same_object(bound, render_target)) {
                        cmd.push(Command::SetGraphicsRenderTarget(render_target.clone()));
                        *bound = Some(render_target.clone());
                    }
                    let (width, height) = (render_target.width(), render_target.height());
                    cmd.push(Command::SetGraphicsViewportAndScissorRectangle {
                        viewport: Viewport::full(width, height, pass.minimum_depth(), pass.maximum_depth()),
                        scissor: Rect2D { x: 0, y: 0, width, height },
                    });
                }

                if let Err(error) = pass.on_fill_command_buffer(render_target.as_ref(), ctx, cmd) {
                    engine_error!("galaxy3d::CompositorNode", "Pass '{}' failed: {}", pass.name(), error);
                }
                if pass.binds_own_render_targets() {
                    *bound = None;
                }
            }
        }

        debug_assert!(bound.is_some(), "Compositor node '{}' has no current render target", self.name);
        if bound.is_none() {
            engine_error!("galaxy3d::CompositorNode", "Node '{}' left no current render target", self.name);
        }
    }

    pub fn on_post_command_buffer_execution(&mut self) {
        for pass in self.passes_mut() {
            pass.on_post_command_buffer_execution();
        }
    }
}
