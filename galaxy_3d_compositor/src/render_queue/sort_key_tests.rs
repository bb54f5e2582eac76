use super::*;

// ============================================================================
// Opaque keys
// ============================================================================

#[test]
fn test_opaque_pipeline_dominates_material_and_depth() {
    let near_other_pipeline = SortKey::opaque(2, 0, 0.0);
    let far_first_pipeline = SortKey::opaque(1, 999, 1.0);
    assert!(far_first_pipeline < near_other_pipeline);
}

#[test]
fn test_opaque_material_dominates_depth() {
    assert!(SortKey::opaque(1, 3, 1.0) < SortKey::opaque(1, 4, 0.0));
}

#[test]
fn test_opaque_front_to_back_within_state() {
    assert!(SortKey::opaque(1, 1, 0.1) < SortKey::opaque(1, 1, 0.9));
}

#[test]
fn test_opaque_fields_do_not_overflow() {
    let key = SortKey::opaque(u32::MAX, u32::MAX, 2.0);
    assert_eq!(key.value(), u64::MAX);
    assert_eq!(SortKey::opaque(0, 0, -1.0).value(), 0);
}

// ============================================================================
// Transparent keys
// ============================================================================

#[test]
fn test_transparent_back_to_front() {
    let far = SortKey::transparent(7, 1, 0.9);
    let near = SortKey::transparent(1, 1, 0.1);
    assert!(far < near, "farther transparent draws must come first");
}

#[test]
fn test_transparent_state_breaks_depth_ties() {
    assert!(SortKey::transparent(1, 0, 0.5) < SortKey::transparent(2, 0, 0.5));
}

// ============================================================================
// Depth normalization
// ============================================================================

#[test]
fn test_normalized_depth() {
    assert_eq!(SortKey::normalized_depth(50.0, 100.0), 0.5);
    assert_eq!(SortKey::normalized_depth(500.0, 100.0), 1.0);
    assert_eq!(SortKey::normalized_depth(5.0, 0.0), 0.0);
}
