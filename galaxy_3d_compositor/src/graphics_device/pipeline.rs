/// Pipeline-state and resource-binding traits
///
/// These objects are built by the material blueprint compiler (outside of
/// this crate) and only bound by the compositor. Identity is what matters
/// here: two draws sharing the same object do not rebind it.

/// Root signature (pipeline layout)
pub trait RootSignature: Send + Sync {
    /// Debug name
    fn name(&self) -> &str;
}

/// Graphics pipeline state object
pub trait GraphicsPipeline: Send + Sync {
    /// Debug name
    fn name(&self) -> &str;
}

/// Compute pipeline state object
pub trait ComputePipeline: Send + Sync {
    /// Debug name
    fn name(&self) -> &str;
}

/// An immutable set of GPU resource bindings (textures, buffers, samplers)
/// bound as a unit at a root parameter index.
pub trait BindingGroup: Send + Sync {
    /// Root parameter index the group was created for
    fn set_index(&self) -> u32;
}
