//! Error types for the Galaxy3D compositor
//!
//! This module defines the error type used throughout the compositor,
//! including device failures, resource lookups and graph configuration.

use std::fmt;

/// Result type for Galaxy3D compositor operations
pub type Result<T> = std::result::Result<T, Error>;

/// Galaxy3D compositor errors
#[derive(Debug, Clone)]
pub enum Error {
    /// Backend-specific error reported by the graphics device
    BackendError(String),

    /// Out of GPU memory
    OutOfMemory,

    /// Invalid resource (texture, framebuffer, material, etc.)
    InvalidResource(String),

    /// Initialization failed (engine, workspace, subsystems)
    InitializationFailed(String),

    /// Invalid configuration (compositor graph, renderable manager layout, settings)
    InvalidConfiguration(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::InvalidConfiguration(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ===== ERROR MACROS =====

/// Log an error and build an `Error::BackendError` from it
///
/// # Example
///
/// ```ignore
/// let texture = textures.get(name)
///     .ok_or_else(|| engine_err!("galaxy3d::Copy", "Texture '{}' not found", name))?;
/// ```
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::galaxy3d::Error::BackendError(message)
    }};
}

/// Log an error and return early with an `Error::BackendError`
///
/// # Example
///
/// ```ignore
/// if cascades > 4 {
///     engine_bail!("galaxy3d::ShadowMap", "Too many cascades: {}", cascades);
/// }
/// ```
#[macro_export]
macro_rules! engine_bail {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::engine_err!($source, $($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
