//! Small containers and identifiers shared by the compositor modules.

mod attachment_list;
mod generation_cache;
mod slot_allocator;
mod string_id;

pub use attachment_list::{AttachmentHandle, AttachmentList};
pub use generation_cache::GenerationCache;
pub use slot_allocator::SlotAllocator;
pub use string_id::StringId;
