// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Staging area for descriptors between commits.

use std::collections::HashMap;

use understory_ax_tree::NodeId;

use crate::descriptor::{SemanticsCustomAction, SemanticsNode};

/// Nodes and custom actions staged since the last commit.
///
/// Staging the same id twice keeps the later descriptor.
#[derive(Clone, Debug, Default)]
pub struct PendingBatch {
    pub(crate) nodes: HashMap<NodeId, SemanticsNode>,
    pub(crate) custom_actions: HashMap<i32, SemanticsCustomAction>,
}

impl PendingBatch {
    /// Create an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a node descriptor, replacing any staged descriptor with the same id.
    pub fn stage_node(&mut self, node: SemanticsNode) {
        self.nodes.insert(node.id, node);
    }

    /// Stage several node descriptors in order.
    pub fn stage_nodes(&mut self, nodes: impl IntoIterator<Item = SemanticsNode>) {
        for node in nodes {
            self.stage_node(node);
        }
    }

    /// Stage a custom action, replacing any staged action with the same id.
    pub fn stage_custom_action(&mut self, action: SemanticsCustomAction) {
        self.custom_actions.insert(action.id, action);
    }

    /// Stage several custom actions in order.
    pub fn stage_custom_actions(
        &mut self,
        actions: impl IntoIterator<Item = SemanticsCustomAction>,
    ) {
        for action in actions {
            self.stage_custom_action(action);
        }
    }

    /// Staged node descriptor for `id`.
    pub fn node(&self, id: NodeId) -> Option<&SemanticsNode> {
        self.nodes.get(&id)
    }

    /// True if nothing is staged.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.custom_actions.is_empty()
    }

    /// Number of staged node descriptors.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Number of staged custom actions.
    pub fn custom_action_count(&self) -> usize {
        self.custom_actions.len()
    }

    /// Drop everything staged.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.custom_actions.clear();
    }

    /// Take the staged contents, leaving the batch empty.
    pub fn take(&mut self) -> Self {
        core::mem::take(self)
    }
}
