//! Unit tests for command_buffer.rs
//!
//! Tests recording, statistics and the Debug output of commands.

use std::sync::Arc;
use crate::graphics_device::{
    same_object, ClearFlags, Command, CommandBuffer, CommandKind, Rect2D, Viewport,
};
use crate::graphics_device::mock_graphics_device::{
    MockGraphicsPipeline, MockIndirectBuffer, MockRenderTarget, MockTexture,
};

fn clear() -> Command {
    Command::ClearGraphics {
        flags: ClearFlags::COLOR_DEPTH,
        color: [0.0, 0.0, 0.0, 1.0],
        depth: 1.0,
        stencil: 0,
    }
}

// ============================================================================
// RECORDING TESTS
// ============================================================================

#[test]
fn test_new_command_buffer_is_empty() {
    let cmd = CommandBuffer::new();
    assert!(cmd.is_empty());
    assert_eq!(cmd.number_of_draw_calls(), 0);
}

#[test]
fn test_commands_keep_recording_order() {
    let mut cmd = CommandBuffer::new();
    cmd.push(Command::SetGraphicsRenderTarget(MockRenderTarget::shared("Main", 800, 600)));
    cmd.push(Command::SetGraphicsViewportAndScissorRectangle {
        viewport: Viewport::full(800, 600, 0.0, 1.0),
        scissor: Rect2D { x: 0, y: 0, width: 800, height: 600 },
    });
    cmd.push(clear());

    let kinds: Vec<CommandKind> = cmd.commands().iter().map(|c| c.kind()).collect();
    assert_eq!(kinds, vec![
        CommandKind::SetGraphicsRenderTarget,
        CommandKind::SetGraphicsViewportAndScissorRectangle,
        CommandKind::ClearGraphics,
    ]);
}

#[test]
fn test_debug_event_helpers() {
    let mut cmd = CommandBuffer::new();
    cmd.begin_debug_event("Scene");
    cmd.end_debug_event();
    assert!(matches!(&cmd.commands()[0], Command::BeginDebugEvent(name) if name == "Scene"));
    assert_eq!(cmd.commands()[1].kind(), CommandKind::EndDebugEvent);
}

// ============================================================================
// STATISTICS TESTS
// ============================================================================

#[test]
fn test_number_of_draw_calls_counts_every_draw_flavor() {
    let mut cmd = CommandBuffer::new();
    cmd.push(Command::Draw { vertex_count_per_instance: 3, instance_count: 1, start_vertex: 0 });
    cmd.push(Command::DrawIndexed {
        index_count_per_instance: 36,
        instance_count: 2,
        start_index: 0,
        base_vertex: 0,
    });
    cmd.push(Command::DrawIndirect {
        indirect_buffer: MockIndirectBuffer::shared("Grass", 64),
        indirect_buffer_offset: 0,
        number_of_draws: 1,
        indexed: false,
    });
    cmd.push(Command::DispatchCompute { group_count_x: 8, group_count_y: 8, group_count_z: 1 });
    cmd.push(clear());

    assert_eq!(cmd.number_of_draw_calls(), 3);
    assert_eq!(cmd.count(CommandKind::DispatchCompute), 1);
    assert_eq!(cmd.count(CommandKind::ClearGraphics), 1);
}

#[test]
fn test_clear_resets_statistics() {
    let mut cmd = CommandBuffer::new();
    cmd.push(Command::Draw { vertex_count_per_instance: 3, instance_count: 1, start_vertex: 0 });
    cmd.clear();
    assert!(cmd.is_empty());
    assert_eq!(cmd.number_of_draw_calls(), 0);
}

// ============================================================================
// DEBUG / IDENTITY TESTS
// ============================================================================

#[test]
fn test_command_debug_names_objects() {
    let pipeline = MockGraphicsPipeline::shared("Opaque");
    let text = format!("{:?}", Command::SetGraphicsPipelineState(pipeline));
    assert_eq!(text, "SetGraphicsPipelineState(Opaque)");

    let texture: Arc<dyn crate::graphics_device::Texture> = Arc::new(MockTexture::new("Hdr", 64, 64, 7));
    let text = format!("{:?}", Command::SetTextureMinimumMaximumMipmapIndex {
        texture,
        minimum: 2,
        maximum: 2,
    });
    assert_eq!(text, "SetTextureMinimumMaximumMipmapIndex(Hdr, 2..=2)");
    assert_eq!(format!("{:?}", Command::EndDebugEvent), "EndDebugEvent");
}

#[test]
fn test_same_object_compares_identity() {
    let a = MockGraphicsPipeline::shared("A");
    let b = MockGraphicsPipeline::shared("A");
    assert!(same_object(&a, &a.clone()));
    assert!(!same_object(&a, &b));
}
