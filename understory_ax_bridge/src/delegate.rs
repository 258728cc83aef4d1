// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Seams between the bridge and a platform accessibility layer.

use understory_ax_tree::{NodeId, TargetedEvent};

use crate::descriptor::SemanticsAction;

/// Opaque handle to a platform accessibility object.
///
/// The bridge never interprets the value; it only passes it back to callers
/// of [`AccessibilityBridge::native_accessible_from_id`](crate::AccessibilityBridge::native_accessible_from_id).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NativeHandle(pub u64);

/// Per-node delegate owned by the bridge's registry.
///
/// One is created for every node that enters the tree, the root included,
/// and dropped when the node leaves it.
pub trait PlatformNodeDelegate {
    /// Id of the node this delegate represents.
    fn node_id(&self) -> NodeId;

    /// Native accessibility object backing this node, if the platform has one.
    fn native_handle(&self) -> Option<NativeHandle> {
        None
    }
}

/// Host-side delegate, one per bridge.
///
/// Events flow out through [`BridgeDelegate::on_accessibility_event`] once a
/// commit has fully applied. Action requests from assistive technology flow
/// back through [`BridgeDelegate::dispatch_accessibility_action`].
pub trait BridgeDelegate {
    /// Per-node delegate type produced by this host.
    type Node: PlatformNodeDelegate;

    /// Called once per derived event, in order.
    fn on_accessibility_event(&mut self, event: TargetedEvent);

    /// Forward an action request to the application.
    fn dispatch_accessibility_action(
        &mut self,
        target: NodeId,
        action: SemanticsAction,
        data: Vec<u8>,
    );

    /// Create the per-node delegate for a node entering the tree.
    fn create_platform_node_delegate(&mut self, id: NodeId) -> Self::Node;
}
