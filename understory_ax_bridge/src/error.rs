// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.

use understory_ax_tree::{NodeId, TreeError, UpdateError};

/// Errors reported by the bridge.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BridgeError {
    /// The tree rejected the committed batch.
    #[error(transparent)]
    Update(#[from] UpdateError),
    /// A node references a custom action that was never staged.
    #[error("node {node} references unknown custom action {action}")]
    UnknownCustomAction {
        /// Node holding the reference.
        node: NodeId,
        /// The unresolved custom action id.
        action: i32,
    },
    /// The node is not in the tree.
    #[error("node {0} not found")]
    NotFound(NodeId),
}

impl From<TreeError> for BridgeError {
    fn from(err: TreeError) -> Self {
        match err {
            TreeError::NotInTree(id) => Self::NotFound(id),
        }
    }
}
