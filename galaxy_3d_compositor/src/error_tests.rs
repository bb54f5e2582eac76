//! Unit tests for error.rs
//!
//! Tests the Error variants, their Display output and the engine_err!/engine_bail! macros.

use crate::error::{Error, Result};

// ============================================================================
// ERROR DISPLAY TESTS
// ============================================================================

#[test]
fn test_backend_error_display() {
    let err = Error::BackendError("command buffer submission failed".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Backend error"));
    assert!(display.contains("command buffer submission failed"));
}

#[test]
fn test_out_of_memory_display() {
    assert_eq!(format!("{}", Error::OutOfMemory), "Out of GPU memory");
}

#[test]
fn test_invalid_resource_display() {
    let err = Error::InvalidResource("Framebuffer 'HdrFramebuffer' not found".to_string());
    let display = format!("{}", err);
    assert!(display.starts_with("Invalid resource"));
    assert!(display.contains("HdrFramebuffer"));
}

#[test]
fn test_invalid_configuration_display() {
    let err = Error::InvalidConfiguration("7 renderables for 2 LODs".to_string());
    let display = format!("{}", err);
    assert!(display.starts_with("Invalid configuration"));
    assert!(display.contains("2 LODs"));
}

#[test]
fn test_error_is_std_error() {
    let err = Error::OutOfMemory;
    let _: &dyn std::error::Error = &err;
}

// ============================================================================
// MACRO TESTS
// ============================================================================

#[test]
fn test_engine_err_builds_backend_error() {
    let err = crate::engine_err!("galaxy3d::Test", "Texture '{}' has {} mips", "Depth", 3);
    match err {
        Error::BackendError(msg) => assert_eq!(msg, "Texture 'Depth' has 3 mips"),
        other => panic!("Expected BackendError, got {:?}", other),
    }
}

#[test]
fn test_engine_bail_returns_early() {
    fn validate(cascades: u8) -> Result<u8> {
        if cascades > 4 {
            crate::engine_bail!("galaxy3d::Test", "Too many cascades: {}", cascades);
        }
        Ok(cascades)
    }

    assert_eq!(validate(2).unwrap(), 2);
    assert!(matches!(validate(9), Err(Error::BackendError(ref msg)) if msg.contains("9")));
}

#[test]
fn test_error_propagation_with_question_mark() {
    fn inner() -> Result<i32> {
        Err(Error::OutOfMemory)
    }

    fn outer() -> Result<i32> {
        inner()?;
        Ok(42)
    }

    assert!(matches!(outer(), Err(Error::OutOfMemory)));
}
