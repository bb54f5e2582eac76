use super::*;

// ============================================================================
// Insert tests
// ============================================================================

#[test]
fn test_new_is_empty() {
    let list: AttachmentList<u32> = AttachmentList::new();
    assert!(list.is_empty());
    assert_eq!(list.len(), 0);
}

#[test]
fn test_insert_appends_in_dense_order() {
    let mut list = AttachmentList::new();
    let a = list.insert(10);
    let b = list.insert(20);
    assert_eq!(list.position(a), Some(0));
    assert_eq!(list.position(b), Some(1));
    assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![10, 20]);
}

// ============================================================================
// Swap-remove tests
// ============================================================================

#[test]
fn test_remove_rehomes_last_value() {
    let mut list = AttachmentList::new();
    let a = list.insert('a');
    let b = list.insert('b');
    let c = list.insert('c');

    assert_eq!(list.remove(a), Some('a'));

    // 'c' was swapped into position 0
    assert_eq!(list.position(c), Some(0));
    assert_eq!(list.position(b), Some(1));
    assert_eq!(list.at(0), Some(&'c'));
    assert!(!list.contains(a));
}

#[test]
fn test_remove_last_value_moves_nothing() {
    let mut list = AttachmentList::new();
    let a = list.insert(1);
    let b = list.insert(2);

    assert_eq!(list.remove(b), Some(2));
    assert_eq!(list.position(a), Some(0));
    assert_eq!(list.len(), 1);
}

#[test]
fn test_remove_twice_returns_none() {
    let mut list = AttachmentList::new();
    let a = list.insert(1);
    assert!(list.remove(a).is_some());
    assert!(list.remove(a).is_none());
}

#[test]
fn test_handles_are_recycled() {
    let mut list = AttachmentList::new();
    let a = list.insert(1);
    let _b = list.insert(2);
    list.remove(a);
    let c = list.insert(3);
    assert_eq!(c, a);
    assert_eq!(list.get(c), Some(&3));
    assert_eq!(list.position(c), Some(1));
}

#[test]
fn test_positions_stay_consistent_after_many_removals() {
    let mut list = AttachmentList::new();
    let handles: Vec<_> = (0..8).map(|i| list.insert(i)).collect();
    for handle in handles.iter().step_by(2) {
        list.remove(*handle);
    }
    for (position, (handle, value)) in list.iter_with_handles().enumerate() {
        assert_eq!(list.position(handle), Some(position));
        assert_eq!(value % 2, 1);
    }
}

#[test]
fn test_clear_invalidates_handles() {
    let mut list = AttachmentList::new();
    let a = list.insert(1);
    list.clear();
    assert!(list.is_empty());
    assert!(list.get(a).is_none());
}
