// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_ax_bridge --heading-base-level=0

//! Understory AX Bridge: keep an accessibility tree in sync with per-frame semantics.
//!
//! A UI framework describes its semantics as a flat list of [`SemanticsNode`]s
//! and [`SemanticsCustomAction`]s every frame. The [`AccessibilityBridge`]
//! stages those descriptions, translates them into platform-neutral
//! [`NodeData`](understory_ax_tree::NodeData), and applies them to an
//! [`understory_ax_tree::Tree`] in one atomic commit.
//!
//! Around the tree the bridge keeps:
//! - one [`PlatformNodeDelegate`] per live node, created by the host's
//!   [`BridgeDelegate`] and handed out as [`Weak`](std::sync::Weak) references;
//! - the events derived by the last commit, forwarded to the host in order;
//! - tree-wide focus and selection, which assistive technology may also move.
//!
//! Action requests from assistive technology go the other way, through
//! [`AccessibilityBridge::dispatch_action`] to the host delegate.
//!
//! ## Commit cycle
//!
//! 1. Stage descriptors. Staging an id twice keeps the later one.
//! 2. [`AccessibilityBridge::commit`]: translate (phase [`CommitPhase::Building`]),
//!    then validate and apply (phase [`CommitPhase::Applying`]).
//! 3. A rejected batch leaves the tree and delegates untouched; either way the
//!    staged batch is gone.
//!
//! ### Minimal usage
//!
//! ```
//! use understory_ax_bridge::{
//!     AccessibilityBridge, BridgeDelegate, PlatformNodeDelegate, SemanticsAction,
//!     SemanticsFlags, SemanticsNode,
//! };
//! use understory_ax_tree::{NodeId, Role, TargetedEvent};
//!
//! struct Node(NodeId);
//! impl PlatformNodeDelegate for Node {
//!     fn node_id(&self) -> NodeId { self.0 }
//! }
//!
//! #[derive(Default)]
//! struct Host { events: Vec<TargetedEvent> }
//! impl BridgeDelegate for Host {
//!     type Node = Node;
//!     fn on_accessibility_event(&mut self, event: TargetedEvent) { self.events.push(event); }
//!     fn dispatch_accessibility_action(&mut self, _: NodeId, _: SemanticsAction, _: Vec<u8>) {}
//!     fn create_platform_node_delegate(&mut self, id: NodeId) -> Node { Node(id) }
//! }
//!
//! let mut bridge = AccessibilityBridge::new(Host::default());
//! bridge.stage_node(SemanticsNode::new(0).with_children([1]));
//! bridge.stage_node(
//!     SemanticsNode::new(1)
//!         .with_label("Play")
//!         .with_flags(SemanticsFlags::IS_BUTTON)
//!         .with_actions(SemanticsAction::TAP),
//! );
//! bridge.commit().unwrap();
//!
//! assert_eq!(bridge.tree().node(NodeId(1)).unwrap().role, Role::Button);
//! assert!(bridge.delegate_for(NodeId(1)).upgrade().is_some());
//! assert_eq!(bridge.delegate().events, bridge.pending_events());
//! ```

mod bridge;
mod delegate;
mod descriptor;
mod error;
mod pending;
mod registry;
pub mod translate;

pub use bridge::{AccessibilityBridge, CommitPhase, CommitSummary};
pub use delegate::{BridgeDelegate, NativeHandle, PlatformNodeDelegate};
pub use descriptor::{
    SemanticsAction, SemanticsCustomAction, SemanticsFlags, SemanticsNode, TextDirection,
};
pub use error::BridgeError;
pub use pending::PendingBatch;
pub use registry::DelegateRegistry;
