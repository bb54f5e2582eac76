//! Unit tests for scene_culling.rs
//!
//! Tests the SoA item set and frustum gathering into render-queue-index
//! ranges (sphere/box rejection, fail-open bounds, uncullable items).

use std::sync::Arc;
use glam::Vec3;
use crate::compositor::CompositorContext;
use crate::graphics_device::{CommandBuffer, RenderTarget};
use crate::material::MaterialManager;
use crate::render_queue::RenderQueueIndexRanges;
use crate::test_fixtures::{camera, graphics_blueprint, loaded_material, mesh_item, shared_device, triangle_renderable};
use crate::scene::{Scene, SceneItemDesc, SceneItemHook, SceneItemKind, Transform};
use super::*;

struct NoopHook;

impl SceneItemHook for NoopHook {
    fn on_execute_on_rendering(&self, _: &Arc<dyn RenderTarget>, _: &CompositorContext, _: &mut CommandBuffer) {}
}

fn setup() -> (Scene, MaterialManager, RenderQueueIndexRanges) {
    let (_, device) = shared_device();
    let mut ranges = RenderQueueIndexRanges::new();
    ranges.add_range(0, 50);
    ranges.add_range(51, 100);
    ranges.add_range(0, 255);
    (Scene::new(device).unwrap(), MaterialManager::new(), ranges)
}

fn material(materials: &mut MaterialManager, name: &str, render_queue_index: u8) -> crate::material::MaterialResourceId {
    let blueprint = match materials.find_blueprint_by_name("Opaque") {
        Some(blueprint) => blueprint,
        None => graphics_blueprint(materials, "Opaque"),
    };
    loaded_material(materials, name, blueprint, render_queue_index)
}

fn range_sizes(ranges: &RenderQueueIndexRanges) -> Vec<usize> {
    ranges.iter().map(|range| range.managers.len()).collect()
}

// ============================================================================
// SCENE ITEM SET TESTS
// ============================================================================

#[test]
fn test_item_set_stores_sphere_with_negative_radius() {
    let mut set = SceneItemSet::new();
    let aabb = AABB::new(Vec3::new(-1.0, -2.0, -2.0), Vec3::new(1.0, 2.0, 2.0));
    let index = set.push(SceneItemKey::default(), RenderableManagerKey::default(), Some(aabb));

    assert_eq!(set.bounds(index), Some(aabb));
    assert!((set.negative_radii[index] + 3.0).abs() < 1e-5);
    assert_eq!(set.sphere_centers[index], Vec3::ZERO);
}

#[test]
fn test_item_set_without_bounds() {
    let mut set = SceneItemSet::new();
    let index = set.push(SceneItemKey::default(), RenderableManagerKey::default(), None);
    assert_eq!(set.bounds(index), None);
    assert_eq!(set.len(), 1);
}

#[test]
fn test_item_set_swap_remove_reports_moved_item() {
    let mut items: slotmap::SlotMap<SceneItemKey, ()> = slotmap::SlotMap::with_key();
    let (a, b, c) = (items.insert(()), items.insert(()), items.insert(()));
    let mut set = SceneItemSet::new();
    for key in [a, b, c] {
        set.push(key, RenderableManagerKey::default(), None);
    }

    assert_eq!(set.swap_remove(0), Some(c));
    assert_eq!(set.item(0), c);
    assert_eq!(set.swap_remove(1), None);
    assert_eq!(set.len(), 1);
}

// ============================================================================
// GATHER TESTS
// ============================================================================

#[test]
fn test_visible_item_lands_in_overlapping_ranges() {
    let (mut scene, mut materials, mut ranges) = setup();
    let rock = material(&mut materials, "Rock", 10);
    let (_, manager) = mesh_item(&mut scene, &mut materials, Vec3::new(0.0, 0.0, -10.0), Some(rock));

    let mut callbacks = Vec::new();
    let accepted = scene.cull(&camera(), &mut ranges, &mut callbacks);

    assert_eq!(accepted, 1);
    assert_eq!(range_sizes(&ranges), vec![1, 0, 1]);
    assert_eq!(ranges.get(0).unwrap().managers, vec![manager]);
    assert!(callbacks.is_empty());
}

#[test]
fn test_item_behind_camera_is_culled() {
    let (mut scene, mut materials, mut ranges) = setup();
    let rock = material(&mut materials, "Rock", 10);
    mesh_item(&mut scene, &mut materials, Vec3::new(0.0, 0.0, 10.0), Some(rock));

    let accepted = scene.cull(&camera(), &mut ranges, &mut Vec::new());

    assert_eq!(accepted, 0);
    assert_eq!(range_sizes(&ranges), vec![0, 0, 0]);
}

#[test]
fn test_item_beyond_far_plane_is_culled() {
    let (mut scene, mut materials, mut ranges) = setup();
    let rock = material(&mut materials, "Rock", 10);
    mesh_item(&mut scene, &mut materials, Vec3::new(0.0, 0.0, -500.0), Some(rock));

    assert_eq!(scene.cull(&camera(), &mut ranges, &mut Vec::new()), 0);
}

#[test]
fn test_item_straddling_far_plane_is_kept() {
    let (mut scene, mut materials, mut ranges) = setup();
    let rock = material(&mut materials, "Rock", 10);
    // Center 0.4 past the far plane, bounding radius ~0.87
    mesh_item(&mut scene, &mut materials, Vec3::new(0.0, 0.0, -100.4), Some(rock));
    // Sphere touches the far plane, box does not
    mesh_item(&mut scene, &mut materials, Vec3::new(0.0, 0.0, -100.7), Some(rock));
    // Both rejected
    mesh_item(&mut scene, &mut materials, Vec3::new(0.0, 0.0, -101.0), Some(rock));

    assert_eq!(scene.cull(&camera(), &mut ranges, &mut Vec::new()), 1);
}

#[test]
fn test_ranges_are_cleared_every_frame() {
    let (mut scene, mut materials, mut ranges) = setup();
    let rock = material(&mut materials, "Rock", 60);
    let (_, manager) = mesh_item(&mut scene, &mut materials, Vec3::new(0.0, 0.0, -10.0), Some(rock));

    scene.cull(&camera(), &mut ranges, &mut Vec::new());
    scene.cull(&camera(), &mut ranges, &mut Vec::new());
    assert_eq!(range_sizes(&ranges), vec![0, 1, 1]);

    scene.set_renderable_manager_visible(manager, false);
    scene.cull(&camera(), &mut ranges, &mut Vec::new());
    assert_eq!(range_sizes(&ranges), vec![0, 0, 0]);
}

#[test]
fn test_item_without_bounds_fails_open() {
    let (mut scene, mut materials, mut ranges) = setup();
    let rock = material(&mut materials, "Rock", 10);
    // Behind the camera, but no bounds
    let node = scene.create_node(Transform::from_position(Vec3::new(0.0, 0.0, 50.0)), None);
    let item = scene
        .create_scene_item(SceneItemDesc::new(SceneItemKind::Mesh, node, vec![triangle_renderable()]))
        .unwrap();
    let manager = scene.scene_item(item).unwrap().renderable_manager();
    scene.set_renderable_material(manager, 0, &mut materials, Some(rock));
    scene.update_transforms();

    assert_eq!(scene.cull(&camera(), &mut ranges, &mut Vec::new()), 1);
    assert_eq!(ranges.get(0).unwrap().managers, vec![manager]);
}

#[test]
fn test_uncullable_items_always_gathered() {
    let (mut scene, mut materials, mut ranges) = setup();
    let sky_material = material(&mut materials, "Sky", 80);
    let node = scene.create_node(Transform::from_position(Vec3::new(0.0, 0.0, 1000.0)), None);
    let item = scene
        .create_scene_item(
            SceneItemDesc::new(SceneItemKind::Sky, node, vec![triangle_renderable()])
                .with_bounds(AABB::new(Vec3::splat(-1.0), Vec3::splat(1.0))),
        )
        .unwrap();
    let manager = scene.scene_item(item).unwrap().renderable_manager();
    scene.set_renderable_material(manager, 0, &mut materials, Some(sky_material));
    scene.update_transforms();

    assert_eq!(scene.cull(&camera(), &mut ranges, &mut Vec::new()), 1);
    assert_eq!(range_sizes(&ranges), vec![0, 1, 1]);
    assert_eq!(scene.culling_manager().number_of_uncullable_items(), 1);
}

#[test]
fn test_distance_to_camera_is_cached() {
    let (mut scene, mut materials, mut ranges) = setup();
    let rock = material(&mut materials, "Rock", 10);
    let (_, manager) = mesh_item(&mut scene, &mut materials, Vec3::new(0.0, 0.0, -20.0), Some(rock));

    scene.cull(&camera(), &mut ranges, &mut Vec::new());
    let distance = scene.renderable_manager(manager).unwrap().cached_distance();
    assert!((distance - 20.0).abs() < 1e-3);
}

#[test]
fn test_hook_items_are_collected() {
    let (mut scene, mut materials, mut ranges) = setup();
    let grass = material(&mut materials, "Grass", 10);
    let node = scene.create_node(Transform::from_position(Vec3::new(0.0, 0.0, -5.0)), None);
    let item = scene
        .create_scene_item(
            SceneItemDesc::new(SceneItemKind::Grass, node, vec![triangle_renderable()])
                .with_bounds(AABB::new(Vec3::splat(-1.0), Vec3::splat(1.0)))
                .with_hook(Arc::new(NoopHook)),
        )
        .unwrap();
    let manager = scene.scene_item(item).unwrap().renderable_manager();
    scene.set_renderable_material(manager, 0, &mut materials, Some(grass));
    scene.update_transforms();

    let mut callbacks = Vec::new();
    scene.cull(&camera(), &mut ranges, &mut callbacks);
    assert_eq!(callbacks, vec![item]);
}

#[test]
fn test_culling_monotonicity() {
    let (mut scene, mut materials, mut ranges) = setup();
    let inside_material = material(&mut materials, "Inside", 30);
    let outside_material = material(&mut materials, "Outside", 30);
    let (_, inside) = mesh_item(&mut scene, &mut materials, Vec3::new(0.0, 0.0, -30.0), Some(inside_material));
    let (_, outside) = mesh_item(&mut scene, &mut materials, Vec3::new(0.0, 200.0, -30.0), Some(outside_material));

    scene.cull(&camera(), &mut ranges, &mut Vec::new());

    for range in ranges.iter() {
        assert_eq!(range.managers.contains(&inside), range.contains(30));
        assert!(!range.managers.contains(&outside));
    }
}
