/*!
# Galaxy 3D Compositor

Frame compositor of the Galaxy 3D engine.

A compositor workspace describes a frame as an ordered graph of nodes; each
node groups passes by render target (clear, scene, shadow map, compute,
copy, mipmap generation, multisample resolve, debug GUI, VR hidden area
mesh). Every frame the workspace culls the scene into render-queue-index
ranges, lets each pass record into one command buffer and submits it once.

## Architecture

- **GraphicsDevice**: backend trait creating textures, framebuffers and buffers, and
  executing command buffers
- **Scene**: scene nodes, scene items and their renderable managers, frustum culling
- **MaterialManager**: material blueprints and material resources, possibly streaming
- **RenderQueue**: per-pass queue resolving, sorting and recording draws
- **CompositorWorkspaceInstance**: runtime graph built from a `CompositorWorkspaceDesc`

Backends implement `GraphicsDevice`; the crate ships a recording mock device
used by its tests.
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod utils;
pub mod graphics_device;
pub mod camera;
pub mod scene;
pub mod material;
pub mod render_queue;
pub mod compositor;

#[cfg(test)]
mod test_fixtures;

// Main galaxy3d namespace module
pub mod galaxy3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Process-wide services (logger)
    pub use crate::engine::Engine;

    // Shared containers
    pub use crate::utils::{AttachmentHandle, AttachmentList, GenerationCache, SlotAllocator, StringId};

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
        // Note: engine_* macros are exported at the crate root
    }

    // Graphics device sub-module
    pub mod device {
        pub use crate::graphics_device::*;
    }

    // Camera sub-module
    pub mod camera {
        pub use crate::camera::*;
    }

    // Scene sub-module
    pub mod scene {
        pub use crate::scene::*;
    }

    // Material sub-module
    pub mod material {
        pub use crate::material::*;
    }

    // Render queue sub-module
    pub mod render_queue {
        pub use crate::render_queue::*;
    }

    // Compositor sub-module
    pub mod compositor {
        pub use crate::compositor::*;
    }
}

// Re-export math library at crate root
pub use glam;
