/// Vertex array and indirect buffer traits

/// Vertex array: vertex buffers, optional index buffer and input layout
pub trait VertexArray: Send + Sync {
    /// Debug name
    fn name(&self) -> &str;
}

/// Descriptor for creating a vertex array
#[derive(Debug, Clone)]
pub struct VertexArrayDesc {
    /// Debug name
    pub name: String,
    /// Vertex data (tightly packed positions)
    pub positions: Vec<[f32; 3]>,
    /// Optional 16-bit index data
    pub indices: Option<Vec<u16>>,
}

/// GPU buffer holding draw arguments for indirect draws
pub trait IndirectBuffer: Send + Sync {
    /// Debug name
    fn name(&self) -> &str;

    /// Size in bytes
    fn size(&self) -> u64;
}
