//! Unit tests for shared_geometry.rs

use crate::graphics_device::mock_graphics_device::MockGraphicsDevice;
use crate::graphics_device::same_object;
use super::*;

#[test]
fn test_acquire_creates_geometry_once() {
    let mut device = MockGraphicsDevice::new();
    let mut registry = SharedGeometryRegistry::new();

    let first = registry.acquire(SharedGeometryKind::Sky, &mut device).unwrap();
    let second = registry.acquire(SharedGeometryKind::Sky, &mut device).unwrap();

    assert!(same_object(first.vertex_array(), second.vertex_array()));
    assert_eq!(device.created_vertex_arrays, vec!["SharedSkyGeometry"]);
    assert_eq!(registry.handle_count(SharedGeometryKind::Sky), 2);
}

#[test]
fn test_kinds_are_independent() {
    let mut device = MockGraphicsDevice::new();
    let mut registry = SharedGeometryRegistry::new();

    let sky = registry.acquire(SharedGeometryKind::Sky, &mut device).unwrap();
    let volume = registry.acquire(SharedGeometryKind::Volume, &mut device).unwrap();

    assert_eq!(sky.kind(), SharedGeometryKind::Sky);
    assert_eq!(volume.kind(), SharedGeometryKind::Volume);
    assert!(!same_object(sky.vertex_array(), volume.vertex_array()));
}

#[test]
fn test_geometry_released_with_last_handle() {
    let mut device = MockGraphicsDevice::new();
    let mut registry = SharedGeometryRegistry::new();

    let first = registry.acquire(SharedGeometryKind::Volume, &mut device).unwrap();
    let second = first.clone();
    drop(first);
    assert!(registry.is_alive(SharedGeometryKind::Volume));

    drop(second);
    assert!(!registry.is_alive(SharedGeometryKind::Volume));

    // Next acquire recreates it
    let _again = registry.acquire(SharedGeometryKind::Volume, &mut device).unwrap();
    assert_eq!(device.created_vertex_arrays.len(), 2);
}

#[test]
fn test_cube_has_36_indices() {
    let desc = cube_vertex_array_desc("Cube");
    assert_eq!(desc.positions.len(), 8);
    let indices = desc.indices.unwrap();
    assert_eq!(indices.len(), 36);
    assert!(indices.iter().all(|&index| index < 8));
}
