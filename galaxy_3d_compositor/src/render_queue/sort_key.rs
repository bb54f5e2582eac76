/// Sort keys of queued renderables.
///
/// Opaque layout (ascending = fewest state changes, then front to back):
///
/// ```text
/// | pipeline id (16) | material index (20) | depth (28) |
/// ```
///
/// Transparent layout (ascending = back to front):
///
/// ```text
/// | inverted depth (32) | pipeline id (16) | material index, low 16 bits |
/// ```
///
/// The render-queue index is not part of the key; it selects the bucket.

/// Width of the pipeline id field
pub const PIPELINE_ID_BITS: u32 = 16;
/// Width of the material index field of opaque keys
pub const MATERIAL_INDEX_BITS: u32 = 20;

const OPAQUE_DEPTH_BITS: u32 = 64 - PIPELINE_ID_BITS - MATERIAL_INDEX_BITS;
const TRANSPARENT_DEPTH_BITS: u32 = 32;

fn mask(bits: u32) -> u64 {
    (1u64 << bits) - 1
}

fn quantize(normalized_depth: f32, bits: u32) -> u64 {
    (normalized_depth.clamp(0.0, 1.0) as f64 * mask(bits) as f64) as u64
}

/// 64-bit sort key, sorted ascending
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SortKey(pub u64);

impl SortKey {
    /// Key for opaque draws: state first, then front to back
    pub fn opaque(pipeline_id: u32, material_index: u32, normalized_depth: f32) -> Self {
        let pipeline = pipeline_id as u64 & mask(PIPELINE_ID_BITS);
        let material = material_index as u64 & mask(MATERIAL_INDEX_BITS);
        let depth = quantize(normalized_depth, OPAQUE_DEPTH_BITS);
        Self(
            pipeline << (MATERIAL_INDEX_BITS + OPAQUE_DEPTH_BITS)
                | material << OPAQUE_DEPTH_BITS
                | depth,
        )
    }

    /// Key for transparent draws: back to front, then state
    pub fn transparent(pipeline_id: u32, material_index: u32, normalized_depth: f32) -> Self {
        let inverted_depth = mask(TRANSPARENT_DEPTH_BITS) - quantize(normalized_depth, TRANSPARENT_DEPTH_BITS);
        let pipeline = pipeline_id as u64 & mask(PIPELINE_ID_BITS);
        let material = material_index as u64 & mask(16);
        Self(inverted_depth << 32 | pipeline << 16 | material)
    }

    /// Camera distance mapped to [0, 1] over the far plane distance
    pub fn normalized_depth(distance: f32, far: f32) -> f32 {
        if far > 0.0 {
            (distance / far).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

#[cfg(test)]
#[path = "sort_key_tests.rs"]
mod tests;
