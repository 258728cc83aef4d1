// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: structure, atomic updates, invariants.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::vec;
use alloc::vec::Vec;

use crate::data::{NodeData, TreeData};
use crate::error::{TreeError, UpdateError};
use crate::events;
use crate::types::NodeId;
use crate::update::{AppliedUpdate, TreeChange, TreeUpdate};

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

/// Persistent accessibility tree keyed by [`NodeId`].
///
/// The tree always contains [`NodeId::ROOT`]. Every other node has exactly one
/// parent, a node's children are exactly its traversal order, and the set of
/// stored nodes is exactly the set reachable from the root.
pub struct Tree {
    nodes: BTreeMap<NodeId, Node>,
    data: TreeData,
}

impl core::fmt::Debug for Tree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tree")
            .field("nodes_alive", &self.nodes.len())
            .field("focus", &self.data.focus)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
struct Node {
    parent: Option<NodeId>,
    data: NodeData,
}

/// Validated shape of the tree after an update.
struct Plan {
    /// Parent of every non-root node reachable after the update.
    parents: BTreeMap<NodeId, NodeId>,
    /// Reachable nodes in pre-order.
    order: Vec<NodeId>,
}

impl Tree {
    /// Create a tree holding only an empty root.
    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(
            NodeId::ROOT,
            Node {
                parent: None,
                data: NodeData::new(NodeId::ROOT),
            },
        );
        Self {
            nodes,
            data: TreeData::default(),
        }
    }

    /// Number of nodes in the tree, including the root.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if `id` is in the tree.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Data of a node, if it is in the tree.
    pub fn node(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(&id).map(|n| &n.data)
    }

    /// Parent of a node. `None` for the root and for ids not in the tree.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    /// Children of a node in traversal order; empty for ids not in the tree.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(&id)
            .map(|n| n.data.child_ids.as_slice())
            .unwrap_or(&[])
    }

    /// Iterate all ids in the tree in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Tree-wide data: focus and selection.
    pub fn data(&self) -> &TreeData {
        &self.data
    }

    /// Move input focus without an update.
    ///
    /// Native accessibility APIs move focus on their own before the producer
    /// describes it; the new focus stays until an update focuses another node
    /// or removes this one.
    pub fn set_focus(&mut self, focus: Option<NodeId>) -> Result<(), TreeError> {
        if let Some(id) = focus
            && !self.contains(id)
        {
            return Err(TreeError::NotInTree(id));
        }
        self.data.focus = focus;
        Ok(())
    }

    /// Path from the root to `id` (inclusive).
    pub fn path_to_root(&self, id: NodeId) -> Result<Vec<NodeId>, TreeError> {
        if !self.contains(id) {
            return Err(TreeError::NotInTree(id));
        }
        let mut out = vec![id];
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            out.push(parent);
            current = parent;
        }
        out.reverse();
        Ok(out)
    }

    /// Apply an update atomically.
    ///
    /// The post-update structure is validated before anything is modified, so
    /// a rejected update leaves the tree untouched. Nodes that are no longer
    /// reachable from the root are deleted along with their subtrees; a node
    /// that moves between parents is reparented in one step.
    ///
    /// A node can only move if both its old and its new parent are part of
    /// the same update; otherwise it ends up listed twice and the update is
    /// rejected with [`UpdateError::MultipleParents`].
    ///
    /// # Panics
    ///
    /// Panics if the tree breaks its structural invariants after a validated
    /// update. That indicates a bug in this crate, not bad input.
    pub fn apply(&mut self, update: TreeUpdate) -> Result<AppliedUpdate, UpdateError> {
        let span = tracing::debug_span!(
            target: "understory_ax_tree::apply",
            "apply",
            nodes = update.nodes.len()
        );
        let _guard = span.enter();

        if update.is_empty() {
            return Ok(AppliedUpdate::default());
        }
        let TreeUpdate { nodes, tree_data } = update;
        let mut staged: BTreeMap<NodeId, NodeData> = BTreeMap::new();
        for data in nodes {
            staged.insert(data.id, data);
        }

        let Plan { parents, order } = match self.plan(&staged) {
            Ok(plan) => plan,
            Err(err) => {
                tracing::warn!(target: "understory_ax_tree::apply", %err, "rejected update");
                return Err(err);
            }
        };

        let mut changes = Vec::new();
        for &id in &order {
            let old = self.nodes.get(&id);
            match (old, parents.get(&id)) {
                (None, Some(&parent)) => changes.push(TreeChange::NodeCreated { id, parent }),
                (Some(old), Some(&new_parent)) => {
                    if let Some(old_parent) = old.parent.filter(|&p| p != new_parent) {
                        changes.push(TreeChange::NodeReparented {
                            id,
                            old_parent,
                            new_parent,
                        });
                    }
                }
                _ => {}
            }
            if let (Some(old), Some(new)) = (old, staged.get(&id))
                && old.data.role != new.role
            {
                changes.push(TreeChange::RoleChanged {
                    id,
                    old: old.data.role,
                    new: new.role,
                });
            }
        }

        let removed = self.removed_nodes(&staged, &parents);
        for &id in &removed {
            let subtree_root = self
                .parent(id)
                .is_none_or(|parent| !removed.contains(&parent));
            if subtree_root {
                changes.push(TreeChange::SubtreeWillBeDeleted { id });
                self.push_deletions(id, &removed, &mut changes);
            }
        }

        let previous_data = self.data;
        let mut previous: BTreeMap<NodeId, NodeData> = BTreeMap::new();
        for id in &removed {
            self.nodes.remove(id);
        }
        for (id, data) in staged {
            match self.nodes.get_mut(&id) {
                Some(node) => {
                    previous.insert(id, core::mem::replace(&mut node.data, data));
                }
                None => {
                    self.nodes.insert(id, Node { parent: None, data });
                }
            }
        }
        for (&id, &parent) in &parents {
            if let Some(node) = self.nodes.get_mut(&id) {
                node.parent = Some(parent);
            }
        }
        if let Some(data) = tree_data {
            self.data = data;
        }
        self.drop_stale_tree_data();

        self.check_invariants();

        for change in &changes {
            tracing::trace!(target: "understory_ax_tree::apply", ?change, "applied");
        }
        let events = events::derive(self, &changes, &previous, &previous_data);
        tracing::debug!(
            target: "understory_ax_tree::apply",
            changes = changes.len(),
            events = events.len(),
            nodes_alive = self.nodes.len(),
            "update applied"
        );
        Ok(AppliedUpdate { changes, events })
    }

    /// Panics unless the tree is connected, rooted at [`NodeId::ROOT`], and
    /// every non-root node has exactly one parent that lists it once.
    pub(crate) fn check_invariants(&self) {
        let root = self
            .nodes
            .get(&NodeId::ROOT)
            .expect("tree invariant violated: root missing");
        assert!(
            root.parent.is_none(),
            "tree invariant violated: root has a parent"
        );
        let mut visited = BTreeSet::new();
        visited.insert(NodeId::ROOT);
        let mut stack = vec![NodeId::ROOT];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(&id) else {
                panic!("tree invariant violated: {id} is listed as a child but not stored");
            };
            for &child in &node.data.child_ids {
                let parent = self.parent(child);
                assert_eq!(
                    parent,
                    Some(id),
                    "tree invariant violated: {child} is listed under {id} but its parent is {parent:?}"
                );
                assert!(
                    visited.insert(child),
                    "tree invariant violated: {child} is listed more than once"
                );
                stack.push(child);
            }
        }
        assert_eq!(
            visited.len(),
            self.nodes.len(),
            "tree invariant violated: stored nodes are unreachable from the root"
        );
    }

    /// Walk the structure the tree will have after `staged` is applied and
    /// reject anything that is not a tree rooted at [`NodeId::ROOT`].
    fn plan(&self, staged: &BTreeMap<NodeId, NodeData>) -> Result<Plan, UpdateError> {
        let next_children = |id: NodeId| -> &[NodeId] {
            match staged.get(&id) {
                Some(data) => &data.child_ids,
                None => self.children(id),
            }
        };

        let mut parents: BTreeMap<NodeId, NodeId> = BTreeMap::new();
        let mut order = Vec::new();
        let mut stack = vec![NodeId::ROOT];
        while let Some(id) = stack.pop() {
            order.push(id);
            // Reverse so that the pre-order follows traversal order.
            for &child in next_children(id).iter().rev() {
                if child.is_root() {
                    return Err(UpdateError::Cycle { node: child });
                }
                // Every planned ancestor is already parented, so the ancestor
                // walk is only needed to classify a repeat.
                if let Some(&first_parent) = parents.get(&child) {
                    if Self::is_planned_ancestor(&parents, child, id) {
                        return Err(UpdateError::Cycle { node: child });
                    }
                    return Err(UpdateError::MultipleParents {
                        child,
                        first_parent,
                        second_parent: id,
                    });
                }
                if !staged.contains_key(&child) && !self.contains(child) {
                    return Err(UpdateError::UnknownChild { parent: id, child });
                }
                parents.insert(child, id);
                stack.push(child);
            }
        }

        if let Some(&id) = staged
            .keys()
            .find(|id| !id.is_root() && !parents.contains_key(id))
        {
            return Err(UpdateError::Unreachable(id));
        }
        Ok(Plan { parents, order })
    }

    fn is_planned_ancestor(parents: &BTreeMap<NodeId, NodeId>, candidate: NodeId, of: NodeId) -> bool {
        let mut current = of;
        loop {
            if current == candidate {
                return true;
            }
            match parents.get(&current) {
                Some(&parent) => current = parent,
                None => return false,
            }
        }
    }

    /// Nodes that the update disconnects from the root.
    ///
    /// Only child lists of staged nodes change, so every removed node sits
    /// below a child that a staged node stopped listing. Nodes that were
    /// re-listed elsewhere stay, and so do their subtrees.
    fn removed_nodes(
        &self,
        staged: &BTreeMap<NodeId, NodeData>,
        parents: &BTreeMap<NodeId, NodeId>,
    ) -> BTreeSet<NodeId> {
        let mut removed = BTreeSet::new();
        let mut stack: Vec<NodeId> = staged
            .keys()
            .flat_map(|&id| self.children(id).iter().copied())
            .filter(|child| !parents.contains_key(child))
            .collect();
        while let Some(id) = stack.pop() {
            if removed.insert(id) {
                stack.extend(
                    self.children(id)
                        .iter()
                        .copied()
                        .filter(|child| !parents.contains_key(child)),
                );
            }
        }
        removed
    }

    /// Push [`TreeChange::NodeDeleted`] for the removed part of the subtree at
    /// `root`, children before parents.
    fn push_deletions(
        &self,
        root: NodeId,
        removed: &BTreeSet<NodeId>,
        changes: &mut Vec<TreeChange>,
    ) {
        let mut stack = vec![(root, false)];
        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                changes.push(TreeChange::NodeDeleted { id });
                continue;
            }
            stack.push((id, true));
            for &child in self.children(id).iter().rev() {
                if removed.contains(&child) {
                    stack.push((child, false));
                }
            }
        }
    }

    fn drop_stale_tree_data(&mut self) {
        if let Some(focus) = self.data.focus
            && !self.nodes.contains_key(&focus)
        {
            self.data.focus = None;
        }
        if let Some(selection) = self.data.selection
            && (!self.nodes.contains_key(&selection.anchor_object)
                || !self.nodes.contains_key(&selection.focus_object))
        {
            self.data.selection = None;
        }
    }
}
