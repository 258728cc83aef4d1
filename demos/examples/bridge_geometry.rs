// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bridge geometry.
//!
//! Resolve bounds through nested transforms, see clipping and offscreen
//! reporting, and hit-test.
//!
//! Run:
//! - `cargo run -p understory_demos --example bridge_geometry`

use kurbo::{Affine, Point, Rect};
use understory_ax_bridge::{
    AccessibilityBridge, BridgeDelegate, PlatformNodeDelegate, SemanticsAction, SemanticsNode,
};
use understory_ax_tree::{Matrix4, NodeId, TargetedEvent};

struct Node(NodeId);

impl PlatformNodeDelegate for Node {
    fn node_id(&self) -> NodeId {
        self.0
    }
}

struct Quiet;

impl BridgeDelegate for Quiet {
    type Node = Node;

    fn on_accessibility_event(&mut self, _event: TargetedEvent) {}

    fn dispatch_accessibility_action(&mut self, _: NodeId, _: SemanticsAction, _: Vec<u8>) {}

    fn create_platform_node_delegate(&mut self, id: NodeId) -> Node {
        Node(id)
    }
}

fn main() {
    let mut bridge = AccessibilityBridge::new(Quiet);
    bridge.stage_nodes([
        SemanticsNode::new(0)
            .with_children([1])
            .with_rect(Rect::new(0.0, 0.0, 200.0, 200.0)),
        // A scrolled viewport, offset by 50 and scaled by 2
        SemanticsNode::new(1)
            .with_children([2, 3])
            .with_rect(Rect::new(0.0, 0.0, 50.0, 50.0))
            .with_transform(Matrix4::from(
                Affine::translate((50.0, 50.0)) * Affine::scale(2.0),
            )),
        SemanticsNode::new(2)
            .with_label("visible")
            .with_rect(Rect::new(10.0, 10.0, 20.0, 20.0)),
        SemanticsNode::new(3)
            .with_label("scrolled away")
            .with_rect(Rect::new(80.0, 0.0, 90.0, 10.0)),
    ]);
    bridge.commit().expect("well formed");

    let visible = bridge.bounds(NodeId(2), true).expect("node 2 is live");
    println!("visible: {:?}", visible);
    assert_eq!(visible.rect, Rect::new(70.0, 70.0, 90.0, 90.0));
    assert!(!visible.offscreen);

    let away = bridge.bounds(NodeId(3), false).expect("node 3 is live");
    println!("scrolled away: {:?}", away);
    assert!(away.offscreen, "outside the viewport");

    let hit = bridge.hit_test(Point::new(80.0, 80.0));
    println!("hit at (80, 80): {:?}", hit);
    assert_eq!(hit, Some(NodeId(2)));
}
