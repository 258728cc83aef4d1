// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bridge basics.
//!
//! Stage a small screen, commit it, change a value, remove a subtree, and
//! forward an action.
//!
//! Run:
//! - `cargo run -p understory_demos --example bridge_basics`

use kurbo::Rect;
use understory_ax_bridge::{
    AccessibilityBridge, BridgeDelegate, PlatformNodeDelegate, SemanticsAction, SemanticsFlags,
    SemanticsNode,
};
use understory_ax_tree::{EventKind, NodeId, TargetedEvent};

struct PrintNode(NodeId);

impl PlatformNodeDelegate for PrintNode {
    fn node_id(&self) -> NodeId {
        self.0
    }
}

#[derive(Default)]
struct PrintHost {
    actions: usize,
}

impl BridgeDelegate for PrintHost {
    type Node = PrintNode;

    fn on_accessibility_event(&mut self, event: TargetedEvent) {
        println!("  event {:?} on {}", event.kind, event.node);
    }

    fn dispatch_accessibility_action(
        &mut self,
        target: NodeId,
        action: SemanticsAction,
        data: Vec<u8>,
    ) {
        self.actions += 1;
        println!("  action {action:?} on {target} ({} bytes)", data.len());
    }

    fn create_platform_node_delegate(&mut self, id: NodeId) -> PrintNode {
        PrintNode(id)
    }
}

fn main() {
    let mut bridge = AccessibilityBridge::new(PrintHost::default());

    // A root with a header, a slider, and a group holding two buttons
    bridge.stage_nodes([
        SemanticsNode::new(0)
            .with_children([1, 2, 3])
            .with_rect(Rect::new(0.0, 0.0, 400.0, 300.0)),
        SemanticsNode::new(1)
            .with_label("Settings")
            .with_flags(SemanticsFlags::IS_HEADER),
        SemanticsNode::new(2)
            .with_label("Volume")
            .with_value("3")
            .with_flags(SemanticsFlags::IS_SLIDER)
            .with_actions(SemanticsAction::INCREASE | SemanticsAction::DECREASE),
        SemanticsNode::new(3).with_children([4, 5]),
        SemanticsNode::new(4)
            .with_label("OK")
            .with_flags(SemanticsFlags::IS_BUTTON)
            .with_actions(SemanticsAction::TAP),
        SemanticsNode::new(5)
            .with_label("Cancel")
            .with_flags(SemanticsFlags::IS_BUTTON)
            .with_actions(SemanticsAction::TAP),
    ]);
    println!("first commit:");
    let summary = bridge.commit().expect("first frame is well formed");
    println!("  created {} nodes", summary.created().count());

    // Only the value changes
    bridge.stage_node(
        SemanticsNode::new(2)
            .with_label("Volume")
            .with_value("4")
            .with_flags(SemanticsFlags::IS_SLIDER)
            .with_actions(SemanticsAction::INCREASE | SemanticsAction::DECREASE),
    );
    println!("value change:");
    bridge.commit().expect("value change is well formed");
    assert_eq!(
        bridge.pending_events(),
        &[TargetedEvent::new(NodeId(2), EventKind::ValueChanged)]
    );

    // Dropping the group removes both buttons with it
    bridge.stage_node(
        SemanticsNode::new(0)
            .with_children([1, 2])
            .with_rect(Rect::new(0.0, 0.0, 400.0, 300.0)),
    );
    println!("remove group:");
    let summary = bridge.commit().expect("removal is well formed");
    let deleted: Vec<_> = summary.deleted().collect();
    assert_eq!(deleted, vec![NodeId(4), NodeId(5), NodeId(3)]);
    assert!(bridge.delegate_for(NodeId(4)).upgrade().is_none());

    println!("action:");
    bridge
        .dispatch_action(NodeId(2), SemanticsAction::INCREASE, Vec::new())
        .expect("slider is live");
    assert_eq!(bridge.delegate().actions, 1);
}
