// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_ax_tree --heading-base-level=0

//! Understory AX Tree: a persistent, id-keyed accessibility tree.
//!
//! The tree holds platform-neutral node data (role, states, actions, name, value,
//! relationships, geometry) keyed by producer-chosen [`NodeId`]s, and is changed
//! only through atomic [`TreeUpdate`]s.
//!
//! - [`Tree::apply`] validates the structure an update would produce before
//!   touching anything, so a bad update leaves the tree as it was.
//! - A successful update yields an ordered list of [`TreeChange`]s (creations,
//!   reparents, role changes, cascaded deletions) and the [`TargetedEvent`]s a
//!   native accessibility stack needs to hear about.
//! - Geometry queries resolve a node's bounds in root coordinates by composing
//!   4×4 transforms and optionally clipping against ancestors.
//!
//! ## Where this fits
//!
//! A producer (usually a UI framework's semantics layer) describes nodes in a
//! flat form. A bridge translates those descriptions into [`NodeData`] and
//! feeds them to this tree once per frame. Platform adapters then read the
//! tree and forward the derived events to the operating system.
//!
//! ## Invariants
//!
//! - [`NodeId::ROOT`] is always present and has no parent.
//! - Every other node has exactly one parent, and its parent lists it exactly once.
//! - A node's children are exactly its [`NodeData::child_ids`], in traversal order.
//! - The stored nodes are exactly the nodes reachable from the root.
//!
//! ## API overview
//!
//! - [`Tree`]: the container; [`Tree::apply`], [`Tree::node`], [`Tree::parent`],
//!   [`Tree::set_focus`], [`Tree::relative_to_tree_bounds`], [`Tree::hit_test`].
//! - [`NodeData`] and [`TreeData`]: per-node and tree-wide data.
//! - [`Role`], [`StateFlags`], [`ActionFlags`]: derived semantics.
//! - [`TreeChange`] and [`TargetedEvent`]/[`EventKind`]: what an update did.
//! - [`Matrix4`]: node transforms.
//!
//! ### Minimal usage
//!
//! ```
//! use kurbo::Rect;
//! use understory_ax_tree::{EventKind, Matrix4, NodeData, NodeId, Tree, TreeUpdate};
//!
//! let mut tree = Tree::new();
//!
//! let root = NodeData { child_ids: vec![NodeId(1)], ..NodeData::new(NodeId::ROOT) };
//! let child = NodeData {
//!     child_ids: vec![NodeId(2)],
//!     transform: Matrix4::translate(10.0, 10.0),
//!     ..NodeData::new(NodeId(1))
//! };
//! let leaf = NodeData {
//!     bounds: Rect::new(0.0, 0.0, 5.0, 5.0),
//!     ..NodeData::new(NodeId(2))
//! };
//!
//! let applied = tree
//!     .apply(TreeUpdate { nodes: vec![root, child, leaf], tree_data: None })
//!     .unwrap();
//! assert!(applied.events.iter().any(|e| e.kind == EventKind::SubtreeCreated));
//!
//! let bounds = tree.relative_to_tree_bounds(NodeId(2), true).unwrap();
//! assert_eq!(bounds.rect, Rect::new(10.0, 10.0, 15.0, 15.0));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod data;
mod error;
mod events;
mod geometry;
mod matrix;
mod tree;
mod types;
mod update;

pub use data::{NodeData, TreeData, TreeSelection};
pub use error::{TreeError, UpdateError};
pub use events::{EventKind, TargetedEvent};
pub use geometry::ResolvedBounds;
pub use matrix::Matrix4;
pub use tree::Tree;
pub use types::{
    ActionFlags, CustomActionInfo, NameFrom, NodeId, Role, StateFlags, TextDirection,
    TextSelection,
};
pub use update::{AppliedUpdate, TreeChange, TreeUpdate};
