// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.

use crate::types::NodeId;

/// Reasons an update is rejected by [`Tree::apply`](crate::Tree::apply).
///
/// A rejected update leaves the tree exactly as it was.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum UpdateError {
    /// A child list names an id that is neither in the update nor in the tree.
    #[error("node {parent} lists unknown child {child}")]
    UnknownChild {
        /// Node whose child list holds the unknown id.
        parent: NodeId,
        /// The unknown id.
        child: NodeId,
    },
    /// A node is listed as a child more than once after the update.
    #[error("node {child} is listed as a child of both {first_parent} and {second_parent}")]
    MultipleParents {
        /// The node listed twice.
        child: NodeId,
        /// First parent found listing the node.
        first_parent: NodeId,
        /// Second parent found listing the node.
        second_parent: NodeId,
    },
    /// A child list names one of the node's own ancestors (or the root).
    #[error("node {node} would become its own ancestor")]
    Cycle {
        /// Node that would close the cycle.
        node: NodeId,
    },
    /// A node in the update is not reachable from the root after the update.
    #[error("updated node {0} is not reachable from the root")]
    Unreachable(NodeId),
}

/// Errors from queries against the tree.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// The node is not (or no longer) in the tree.
    #[error("node {0} is not in the tree")]
    NotInTree(NodeId),
}
