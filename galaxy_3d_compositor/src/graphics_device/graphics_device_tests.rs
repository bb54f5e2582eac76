//! Unit tests for graphics_device.rs

use std::thread;
use crate::graphics_device::mock_graphics_device::MockVertexArray;
use crate::test_fixtures::shared_device;
use super::*;

#[test]
fn test_lock_device_gives_access_to_the_shared_device() {
    let (mock, shared) = shared_device();
    {
        let mut device = lock_device(&shared).unwrap();
        assert_eq!(device.capabilities().max_number_of_multisamples, 8);
        device.submit_command_buffer(&CommandBuffer::new()).unwrap();
    }
    assert_eq!(mock.lock().unwrap().submitted.len(), 1);
}

#[test]
fn test_lock_poisoned_device_is_backend_error() {
    let (_mock, shared) = shared_device();
    let poisoner = shared.clone();
    let _ = thread::spawn(move || {
        let _guard = poisoner.lock().unwrap();
        panic!("device thread panicked");
    })
    .join();

    assert!(matches!(lock_device(&shared), Err(Error::BackendError(_))));
}

#[test]
fn test_same_object_compares_allocations() {
    let a = MockVertexArray::shared("Cube");
    let b = MockVertexArray::shared("Cube");
    assert!(same_object(&a, &a.clone()));
    assert!(!same_object(&a, &b));
}
