/// Allocates and recycles compact `u32` ids below a fixed limit.
///
/// Sort keys pack pipeline and material ids into a few bits each, so the
/// ids handed out to blueprints and materials must stay small and dense.
/// Freed ids are recycled before the high-water mark grows.
///
/// # Example
///
/// ```
/// use galaxy_3d_compositor::galaxy3d::SlotAllocator;
///
/// let mut ids = SlotAllocator::with_limit(4);
/// let a = ids.alloc().unwrap();   // 0
/// let _b = ids.alloc().unwrap();  // 1
/// ids.free(a);
/// assert_eq!(ids.alloc(), Some(0));
/// ```
pub struct SlotAllocator {
    free_list: Vec<u32>,
    next_id: u32,
    len: u32,
    limit: u32,
}

impl SlotAllocator {
    /// Allocator covering the whole `u32` range
    pub fn new() -> Self {
        Self::with_limit(u32::MAX)
    }

    /// Allocator handing out ids in `0..limit`
    pub fn with_limit(limit: u32) -> Self {
        Self {
            free_list: Vec::new(),
            next_id: 0,
            len: 0,
            limit,
        }
    }

    /// Allocate the next available id, `None` once `limit` ids are live
    pub fn alloc(&mut self) -> Option<u32> {
        let id = match self.free_list.pop() {
            Some(id) => id,
            None if self.next_id < self.limit => {
                self.next_id += 1;
                self.next_id - 1
            }
            None => return None,
        };
        self.len += 1;
        Some(id)
    }

    /// Return an id to the pool for reuse
    pub fn free(&mut self, id: u32) {
        debug_assert!(id < self.next_id, "freeing an unallocated slot: {}", id);
        self.len -= 1;
        self.free_list.push(id);
    }

    /// Highest id ever allocated + 1
    pub fn high_water_mark(&self) -> u32 {
        self.next_id
    }

    /// Exclusive upper bound of the ids
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of live ids
    pub fn len(&self) -> u32 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for SlotAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "slot_allocator_tests.rs"]
mod tests;
