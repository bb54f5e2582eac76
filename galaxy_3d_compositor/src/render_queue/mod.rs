//! Render queue module - batching and sorting of visible renderables.
//!
//! Culling fills the render-queue-index ranges with visible renderable
//! managers; each scene pass feeds the managers of its range to its own
//! `RenderQueue`, which resolves materials, sorts by `SortKey` and records
//! the draws.

mod render_queue_index_range;
mod sort_key;
mod render_queue;
mod instance_buffer_pool;

pub use render_queue_index_range::{RenderQueueIndexRange, RenderQueueIndexRanges};
pub use sort_key::{SortKey, MATERIAL_INDEX_BITS, PIPELINE_ID_BITS};
pub use render_queue::{QueuedRenderable, RenderQueue};
pub use instance_buffer_pool::{InstanceBufferPool, INSTANCE_DATA_SIZE};
