/// Instance buffer pool - ring of per-frame scratch buffers for world matrices.
///
/// Frame N writes into buffer N % count, so a frame never overwrites data
/// the GPU may still read for the previous frame(s).

use std::sync::Arc;
use glam::Mat4;
use crate::error::Result;
use crate::engine_warn_once;
use crate::graphics_device::{Buffer, BufferDesc, BufferUsage, GraphicsDevice};

/// Bytes written per draw (one column-major 4x4 float matrix)
pub const INSTANCE_DATA_SIZE: u64 = std::mem::size_of::<Mat4>() as u64;

pub struct InstanceBufferPool {
    buffers: Vec<Arc<dyn Buffer>>,
    current: usize,
    offset: u64,
    buffer_size: u64,
}

impl InstanceBufferPool {
    /// Create `number_of_buffers` buffers of `buffer_size` bytes each
    pub fn new(device: &mut dyn GraphicsDevice, number_of_buffers: usize, buffer_size: u64) -> Result<Self> {
        assert!(number_of_buffers > 0, "Instance buffer pool needs at least one buffer");
        let buffers = (0..number_of_buffers)
            .map(|index| {
                device.create_buffer(BufferDesc {
                    name: format!("InstanceBuffer{}", index),
                    size: buffer_size,
                    usage: BufferUsage::Storage,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            buffers,
            // First begin_frame moves to buffer 0
            current: number_of_buffers - 1,
            offset: 0,
            buffer_size,
        })
    }

    /// Move to the next buffer of the ring and rewind it
    pub fn begin_frame(&mut self) {
        self.current = (self.current + 1) % self.buffers.len();
        self.offset = 0;
    }

    /// Append the instance data of one draw.
    ///
    /// Returns the buffer and offset to bind, or `None` when the current
    /// buffer is full (the draw then goes without instance data).
    pub fn write(&mut self, world_matrix: &Mat4) -> Result<Option<(Arc<dyn Buffer>, u64)>> {
        if self.offset + INSTANCE_DATA_SIZE > self.buffer_size {
            engine_warn_once!(
                "galaxy3d::InstanceBufferPool",
                "Instance buffer full ({} bytes), further draws have no instance data", self.buffer_size
            );
            return Ok(None);
        }

        let buffer = &self.buffers[self.current];
        buffer.update(self.offset, bytemuck::bytes_of(world_matrix))?;
        let offset = self.offset;
        self.offset += INSTANCE_DATA_SIZE;
        Ok(Some((buffer.clone(), offset)))
    }

    /// Index of the buffer written this frame
    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_buffer(&self) -> &Arc<dyn Buffer> {
        &self.buffers[self.current]
    }

    /// Bytes written into the current buffer this frame
    pub fn used_bytes(&self) -> u64 {
        self.offset
    }

    pub fn number_of_buffers(&self) -> usize {
        self.buffers.len()
    }
}

#[cfg(test)]
#[path = "instance_buffer_pool_tests.rs"]
mod tests;
