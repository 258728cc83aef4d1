// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Update batches and the structural change list produced by applying them.

use alloc::vec::Vec;

use crate::data::{NodeData, TreeData};
use crate::events::TargetedEvent;
use crate::types::{NodeId, Role};

/// A batch of node replacements applied atomically by [`Tree::apply`](crate::Tree::apply).
///
/// Each entry fully replaces the data of the node with the same id. Nodes not
/// mentioned keep their data and children. If an id appears more than once,
/// the last entry wins.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TreeUpdate {
    /// Replacement data, in any order.
    pub nodes: Vec<NodeData>,
    /// New tree-wide data, or `None` to keep the current data.
    pub tree_data: Option<TreeData>,
}

impl TreeUpdate {
    /// True if the update carries no nodes and no tree data.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.tree_data.is_none()
    }
}

/// A structural change made by one update.
///
/// Changes are ordered so that a consumer replaying them never sees an
/// inconsistent tree: creations, reparents, and role changes come first in
/// pre-order (a parent before its children), then each removed subtree is
/// announced with [`TreeChange::SubtreeWillBeDeleted`] and its nodes are
/// deleted children first.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TreeChange {
    /// A node entered the tree.
    NodeCreated {
        /// The new node.
        id: NodeId,
        /// Its parent.
        parent: NodeId,
    },
    /// A node moved from one parent to another in a single step.
    NodeReparented {
        /// The moved node.
        id: NodeId,
        /// Parent before the update.
        old_parent: NodeId,
        /// Parent after the update.
        new_parent: NodeId,
    },
    /// A node kept its id but its role changed.
    RoleChanged {
        /// The node.
        id: NodeId,
        /// Role before the update.
        old: Role,
        /// Role after the update.
        new: Role,
    },
    /// A subtree rooted at `id` is about to be removed.
    SubtreeWillBeDeleted {
        /// Root of the removed subtree.
        id: NodeId,
    },
    /// A node left the tree.
    NodeDeleted {
        /// The removed node.
        id: NodeId,
    },
}

impl TreeChange {
    /// The node this change is about.
    pub fn node(&self) -> NodeId {
        match *self {
            Self::NodeCreated { id, .. }
            | Self::NodeReparented { id, .. }
            | Self::RoleChanged { id, .. }
            | Self::SubtreeWillBeDeleted { id }
            | Self::NodeDeleted { id } => id,
        }
    }
}

/// Result of a successful [`Tree::apply`](crate::Tree::apply).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AppliedUpdate {
    /// Structural changes, in application order.
    pub changes: Vec<TreeChange>,
    /// Events derived from comparing the tree before and after the update.
    pub events: Vec<TargetedEvent>,
}

impl AppliedUpdate {
    /// Ids created by the update, parents first.
    pub fn created(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.changes.iter().filter_map(|c| match *c {
            TreeChange::NodeCreated { id, .. } => Some(id),
            _ => None,
        })
    }

    /// Ids deleted by the update, children first.
    pub fn deleted(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.changes.iter().filter_map(|c| match *c {
            TreeChange::NodeDeleted { id } => Some(id),
            _ => None,
        })
    }
}
