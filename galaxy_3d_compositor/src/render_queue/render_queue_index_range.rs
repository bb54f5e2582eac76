/// Render-queue-index ranges - the hand-off between culling and scene passes.

use crate::scene::RenderableManagerKey;

/// Inclusive interval of render-queue indices and the managers visible in it
/// this frame.
#[derive(Debug, Clone)]
pub struct RenderQueueIndexRange {
    pub minimum: u8,
    pub maximum: u8,
    /// Repopulated by culling every frame
    pub managers: Vec<RenderableManagerKey>,
}

impl RenderQueueIndexRange {
    pub fn new(minimum: u8, maximum: u8) -> Self {
        debug_assert!(minimum <= maximum, "Invalid render queue index range [{}, {}]", minimum, maximum);
        Self { minimum, maximum, managers: Vec::new() }
    }

    pub fn contains(&self, render_queue_index: u8) -> bool {
        (self.minimum..=self.maximum).contains(&render_queue_index)
    }
}

/// Table of unique ranges, built once from the compositor graph
#[derive(Debug, Clone, Default)]
pub struct RenderQueueIndexRanges {
    ranges: Vec<RenderQueueIndexRange>,
}

impl RenderQueueIndexRanges {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a range, returning the index of the existing one if the
    /// same interval is already present
    pub fn add_range(&mut self, minimum: u8, maximum: u8) -> usize {
        if let Some(index) = self.range_index(minimum, maximum) {
            return index;
        }
        self.ranges.push(RenderQueueIndexRange::new(minimum, maximum));
        self.ranges.len() - 1
    }

    /// Index of the range with exactly this interval
    pub fn range_index(&self, minimum: u8, maximum: u8) -> Option<usize> {
        self.ranges
            .iter()
            .position(|range| range.minimum == minimum && range.maximum == maximum)
    }

    pub fn get(&self, index: usize) -> Option<&RenderQueueIndexRange> {
        self.ranges.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RenderQueueIndexRange> {
        self.ranges.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut RenderQueueIndexRange> {
        self.ranges.iter_mut()
    }

    /// Forget the managers of the previous frame
    pub fn clear_managers(&mut self) {
        for range in &mut self.ranges {
            range.managers.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Drop every range (workspace unload)
    pub fn clear(&mut self) {
        self.ranges.clear();
    }
}
