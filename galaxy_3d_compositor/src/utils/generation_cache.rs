/// Lazily rebuilt resources keyed by a generation counter.
///
/// Shadow map framebuffers and mipmap framebuffers are built once and
/// reused until the settings (or render target size) they were built for
/// change. The owner bumps a generation counter on every change; the cache
/// compares it with the generation its value was built for.

use crate::error::Result;

/// A cached value together with the generation it was built for
pub struct GenerationCache<T> {
    generation: Option<u64>,
    value: Option<T>,
}

impl<T> GenerationCache<T> {
    /// Create an empty cache
    pub fn new() -> Self {
        Self { generation: None, value: None }
    }

    /// Return the cached value, rebuilding it first if it was built for
    /// another generation (or never built)
    ///
    /// A failing builder leaves the cache empty.
    pub fn get_or_rebuild<F>(&mut self, generation: u64, build: F) -> Result<&T>
    where
        F: FnOnce() -> Result<T>,
    {
        if !self.is_valid_for(generation) {
            self.value = None;
            self.generation = None;
            let value = build()?;
            self.generation = Some(generation);
            return Ok(self.value.insert(value));
        }
        match self.value.as_ref() {
            Some(value) => Ok(value),
            None => Err(crate::error::Error::InvalidResource(
                "generation cache holds no value".to_string(),
            )),
        }
    }

    /// Whether the cached value was built for `generation`
    pub fn is_valid_for(&self, generation: u64) -> bool {
        self.value.is_some() && self.generation == Some(generation)
    }

    /// Cached value regardless of generation
    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Generation the cached value was built for
    pub fn cached_generation(&self) -> Option<u64> {
        self.generation
    }

    /// Drop the cached value; the next access rebuilds
    pub fn invalidate(&mut self) {
        self.value = None;
        self.generation = None;
    }
}

impl<T> Default for GenerationCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "generation_cache_tests.rs"]
mod tests;
