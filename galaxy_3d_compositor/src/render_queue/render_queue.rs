/// Render queue - resolves, sorts and records the draws of one scene pass.

use std::sync::Arc;
use glam::Mat4;
use rdst::{RadixKey, RadixSort};
use crate::compositor::CompositorContext;
use crate::error::Result;
use crate::graphics_device::{
    same_object, BindingGroup, Command, CommandBuffer, ComputePipeline,
    GraphicsPipeline, RootSignature, VertexArray,
};
use crate::material::{BlueprintPipeline, MaterialManager, ResolvedMaterialTechnique};
use crate::scene::{DrawConfig, RenderableManager};
use crate::utils::StringId;
use super::{InstanceBufferPool, SortKey};

/// Renderable snapshot taken when it is queued
pub struct QueuedRenderable {
    pub vertex_array: Option<Arc<dyn VertexArray>>,
    pub draw: DrawConfig,
    pub instance_count: u32,
    pub world_matrix: Mat4,
    pub resolved: ResolvedMaterialTechnique,
    pub sort_key: SortKey,
}

/// (key, position in `queued`) pair sorted by the radix sort
#[derive(Debug, Clone, Copy)]
struct SortEntry {
    key: u64,
    index: u32,
}

impl RadixKey for SortEntry {
    const LEVELS: usize = 8;

    #[inline]
    fn get_level(&self, level: usize) -> u8 {
        (self.key >> (level * 8)) as u8
    }
}

/// Queued renderables of one render-queue index
#[derive(Default)]
struct Bucket {
    queued: Vec<QueuedRenderable>,
    order: Vec<SortEntry>,
    sorted: bool,
}

impl Bucket {
    fn clear(&mut self) {
        self.queued.clear();
        self.order.clear();
        self.sorted = false;
    }
}

/// State bound by the previous draw or dispatch
#[derive(Default)]
struct BoundState {
    root_signature: Option<Arc<dyn RootSignature>>,
    graphics_pipeline: Option<Arc<dyn GraphicsPipeline>>,
    compute_pipeline: Option<Arc<dyn ComputePipeline>>,
    pass_resource_group: Option<Arc<dyn BindingGroup>>,
    material_resource_group: Option<Arc<dyn BindingGroup>>,
    vertex_array: Option<Arc<dyn VertexArray>>,
}

fn differs<T: ?Sized>(bound: &Option<Arc<T>>, wanted: &Arc<T>) -> bool {
    bound.as_ref().map_or(true, |bound| !same_object(bound, wanted))
}

fn differs_optional<T: ?Sized>(bound: &Option<Arc<T>>, wanted: &Option<Arc<T>>) -> bool {
    match (bound, wanted) {
        (Some(bound), Some(wanted)) => !same_object(bound, wanted),
        (None, None) => false,
        _ => true,
    }
}

/// Render queue of one scene or compute pass
pub struct RenderQueue {
    minimum_render_queue_index: u8,
    maximum_render_queue_index: u8,
    position_only: bool,
    transparent: bool,
    do_sort: bool,
    buckets: Vec<Bucket>,
    number_of_draw_calls: usize,
    number_of_sorts: usize,
}

impl RenderQueue {
    /// Create a queue accepting render-queue indices in `[minimum, maximum]`.
    ///
    /// * `position_only` - bind the position-only vertex array when present
    /// * `transparent` - sort back to front instead of by state
    /// * `do_sort` - sort at all (otherwise draw in queue order)
    pub fn new(minimum: u8, maximum: u8, position_only: bool, transparent: bool, do_sort: bool) -> Self {
        assert!(minimum <= maximum, "Invalid render queue index range [{}, {}]", minimum, maximum);
        let buckets = (minimum..=maximum).map(|_| Bucket::default()).collect();
        Self {
            minimum_render_queue_index: minimum,
            maximum_render_queue_index: maximum,
            position_only,
            transparent,
            do_sort,
            buckets,
            number_of_draw_calls: 0,
            number_of_sorts: 0,
        }
    }

    pub fn minimum_render_queue_index(&self) -> u8 {
        self.minimum_render_queue_index
    }

    pub fn maximum_render_queue_index(&self) -> u8 {
        self.maximum_render_queue_index
    }

    /// Forget every queued renderable
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.number_of_draw_calls = 0;
    }

    /// Queue the renderables of a manager.
    ///
    /// Uses LOD 0 when `use_lod0` is set, otherwise the LOD matching the
    /// manager's cached camera distance. With `cast_shadows` set only
    /// shadow casters are queued. Renderables without instances, outside
    /// of the queue's index range or whose material technique does not
    /// resolve yet are skipped. Returns the number of queued renderables.
    pub fn add_renderables_from_renderable_manager(
        &mut self,
        manager: &RenderableManager,
        technique_id: StringId,
        context: &CompositorContext,
        materials: &MaterialManager,
        cast_shadows: bool,
        use_lod0: bool,
    ) -> usize {
        let lod = if use_lod0 {
            0
        } else {
            manager.lod_index_for_distance(manager.cached_distance())
        };
        let depth = SortKey::normalized_depth(manager.cached_distance(), context.camera.far());

        let mut added = 0;
        for renderable in manager.lod_renderables(lod) {
            if renderable.instance_count() == 0 || (cast_shadows && !renderable.cast_shadows()) {
                continue;
            }
            let render_queue_index = renderable.render_queue_index();
            if render_queue_index < self.minimum_render_queue_index
                || render_queue_index > self.maximum_render_queue_index
            {
                continue;
            }
            let Some(resolved) = renderable
                .material_resource_id()
                .and_then(|material| materials.resolve(material, technique_id))
            else {
                continue;
            };

            let sort_key = if self.transparent {
                SortKey::transparent(resolved.pipeline_id, resolved.material_index, depth)
            } else {
                SortKey::opaque(resolved.pipeline_id, resolved.material_index, depth)
            };

            let bucket = &mut self.buckets[(render_queue_index - self.minimum_render_queue_index) as usize];
            bucket.order.push(SortEntry { key: sort_key.value(), index: bucket.queued.len() as u32 });
            bucket.queued.push(QueuedRenderable {
                vertex_array: renderable.vertex_array_for(self.position_only).cloned(),
                draw: renderable.draw_config().clone(),
                instance_count: renderable.instance_count(),
                world_matrix: *manager.world_matrix(),
                resolved,
                sort_key,
            });
            bucket.sorted = false;
            added += 1;
        }
        added
    }

    /// Sort every bucket not sorted since its last change
    fn sort_buckets(&mut self) {
        if !self.do_sort {
            return;
        }
        for bucket in &mut self.buckets {
            if !bucket.sorted && !bucket.order.is_empty() {
                bucket.order.radix_sort_unstable();
                self.number_of_sorts += 1;
            }
            bucket.sorted = true;
        }
    }

    /// Record the draws of every queued graphics renderable.
    ///
    /// Returns the number of draw calls recorded.
    pub fn fill_graphics_command_buffer(
        &mut self,
        context: &CompositorContext,
        instance_buffers: &mut InstanceBufferPool,
        cmd: &mut CommandBuffer,
    ) -> Result<usize> {
        self.sort_buckets();

        let mut bound = BoundState::default();
        let mut draws = 0;
        for bucket in &self.buckets {
            for entry in &bucket.order {
                let queued = &bucket.queued[entry.index as usize];
                let BlueprintPipeline::Graphics(pipeline) = &queued.resolved.pipeline else {
                    continue;
                };

                if differs(&bound.root_signature, &queued.resolved.root_signature) {
                    cmd.push(Command::SetGraphicsRootSignature(queued.resolved.root_signature.clone()));
                    bound.root_signature = Some(queued.resolved.root_signature.clone());
                    bound.pass_resource_group = None;
                    bound.material_resource_group = None;
                }
                if differs(&bound.graphics_pipeline, pipeline) {
                    cmd.push(Command::SetGraphicsPipelineState(pipeline.clone()));
                    bound.graphics_pipeline = Some(pipeline.clone());
                }
                if differs_optional(&bound.pass_resource_group, &queued.resolved.pass_resource_group) {
                    if let Some(group) = &queued.resolved.pass_resource_group {
                        cmd.push(Command::SetGraphicsResourceGroup {
                            root_parameter_index: 0,
                            resource_group: group.clone(),
                        });
                    }
                    bound.pass_resource_group = queued.resolved.pass_resource_group.clone();
                }
                if differs_optional(&bound.material_resource_group, &queued.resolved.material_resource_group) {
                    if let Some(group) = &queued.resolved.material_resource_group {
                        cmd.push(Command::SetGraphicsResourceGroup {
                            root_parameter_index: 1,
                            resource_group: group.clone(),
                        });
                    }
                    bound.material_resource_group = queued.resolved.material_resource_group.clone();
                }
                if let Some(vertex_array) = &queued.vertex_array {
                    if differs(&bound.vertex_array, vertex_array) {
                        cmd.push(Command::SetGraphicsVertexArray(vertex_array.clone()));
                        bound.vertex_array = Some(vertex_array.clone());
                    }
                }
                if let Some((buffer, offset)) = instance_buffers.write(&queued.world_matrix)? {
                    cmd.push(Command::SetInstanceData { buffer, offset });
                }

                let instance_count = if context.single_pass_stereo {
                    queued.instance_count.saturating_mul(2)
                } else {
                    queued.instance_count
                };
                cmd.push(match &queued.draw {
                    DrawConfig::NonIndexed { start_vertex, number_of_vertices } => Command::Draw {
                        vertex_count_per_instance: *number_of_vertices,
                        instance_count,
                        start_vertex: *start_vertex,
                    },
                    DrawConfig::Indexed { start_index, number_of_indices, base_vertex } => Command::DrawIndexed {
                        index_count_per_instance: *number_of_indices,
                        instance_count,
                        start_index: *start_index,
                        base_vertex: *base_vertex,
                    },
                    DrawConfig::Indirect { buffer, offset, number_of_draws, indexed } => Command::DrawIndirect {
                        indirect_buffer: buffer.clone(),
                        indirect_buffer_offset: *offset,
                        number_of_draws: *number_of_draws,
                        indexed: *indexed,
                    },
                });
                draws += 1;
            }
        }

        self.number_of_draw_calls = draws;
        Ok(draws)
    }

    /// Record a dispatch for every queued compute renderable.
    ///
    /// No vertex arrays are bound; each renderable dispatches the thread
    /// groups of its blueprint. Returns the number of dispatches recorded.
    pub fn fill_compute_command_buffer(&mut self, _context: &CompositorContext, cmd: &mut CommandBuffer) -> usize {
        self.sort_buckets();

        let mut bound = BoundState::default();
        let mut dispatches = 0;
        for bucket in &self.buckets {
            for entry in &bucket.order {
                let queued = &bucket.queued[entry.index as usize];
                let BlueprintPipeline::Compute { pipeline, thread_groups } = &queued.resolved.pipeline else {
                    continue;
                };

                if differs(&bound.root_signature, &queued.resolved.root_signature) {
                    cmd.push(Command::SetComputeRootSignature(queued.resolved.root_signature.clone()));
                    bound.root_signature = Some(queued.resolved.root_signature.clone());
                    bound.pass_resource_group = None;
                    bound.material_resource_group = None;
                }
                if differs(&bound.compute_pipeline, pipeline) {
                    cmd.push(Command::SetComputePipelineState(pipeline.clone()));
                    bound.compute_pipeline = Some(pipeline.clone());
                }
                if differs_optional(&bound.pass_resource_group, &queued.resolved.pass_resource_group) {
                    if let Some(group) = &queued.resolved.pass_resource_group {
                        cmd.push(Command::SetComputeResourceGroup {
                            root_parameter_index: 0,
                            resource_group: group.clone(),
                        });
                    }
                    bound.pass_resource_group = queued.resolved.pass_resource_group.clone();
                }
                if differs_optional(&bound.material_resource_group, &queued.resolved.material_resource_group) {
                    if let Some(group) = &queued.resolved.material_resource_group {
                        cmd.push(Command::SetComputeResourceGroup {
                            root_parameter_index: 1,
                            resource_group: group.clone(),
                        });
                    }
                    bound.material_resource_group = queued.resolved.material_resource_group.clone();
                }

                cmd.push(Command::DispatchCompute {
                    group_count_x: thread_groups[0],
                    group_count_y: thread_groups[1],
                    group_count_z: thread_groups[2],
                });
                dispatches += 1;
            }
        }

        self.number_of_draw_calls = dispatches;
        dispatches
    }

    /// Draws (or dispatches) recorded by the last fill
    pub fn number_of_draw_calls(&self) -> usize {
        self.number_of_draw_calls
    }

    /// Renderables queued since the last `clear`
    pub fn number_of_queued_renderables(&self) -> usize {
        self.buckets.iter().map(|bucket| bucket.queued.len()).sum()
    }

    /// Number of bucket sorts performed so far (statistics)
    pub fn number_of_sorts(&self) -> usize {
        self.number_of_sorts
    }
}

#[cfg(test)]
#[path = "render_queue_tests.rs"]
mod tests;
