// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Events derived from comparing the tree before and after an update.
//!
//! ## Ordering
//!
//! Events come out in three groups:
//! 1) structural events, in the order of the update's [`TreeChange`] list;
//! 2) attribute events for nodes whose data was replaced, by ascending id;
//! 3) tree-wide events (focus, selection).
//!
//! Each `(node, kind)` pair appears at most once per update, at its first position.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::vec::Vec;

use crate::data::{NodeData, TreeData};
use crate::tree::Tree;
use crate::types::{NodeId, StateFlags};
use crate::update::TreeChange;

/// Kind of an accessibility event.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum EventKind {
    /// The node entered the tree.
    NodeCreated,
    /// The node left the tree.
    NodeDeleted,
    /// The node is the root of a newly created subtree.
    SubtreeCreated,
    /// The node moved to a different parent.
    NodeReparented,
    /// The node's list of children changed.
    ChildrenChanged,
    /// The node's role changed.
    RoleChanged,
    /// The node's label-derived name changed.
    NameChanged,
    /// The node's description changed.
    DescriptionChanged,
    /// The node's value changed.
    ValueChanged,
    /// Checked, mixed, or toggled state changed.
    CheckedStateChanged,
    /// Selected state changed.
    SelectedChanged,
    /// Enabled state changed.
    EnabledChanged,
    /// Expanded or collapsed state changed.
    ExpandedChanged,
    /// Any other boolean state changed.
    StateChanged,
    /// The set of supported actions changed.
    ActionsChanged,
    /// Scroll position or extent changed.
    ScrollPositionChanged,
    /// Bounds or transform changed.
    BoundsChanged,
    /// A live region's content changed.
    LiveRegionChanged,
    /// Input focus moved to this node (or to the root when focus was cleared).
    FocusChanged,
    /// The tree-wide text selection changed.
    DocumentSelectionChanged,
}

impl EventKind {
    /// True for events that describe a change in tree structure.
    pub fn is_structural(self) -> bool {
        matches!(
            self,
            Self::NodeCreated
                | Self::NodeDeleted
                | Self::SubtreeCreated
                | Self::NodeReparented
                | Self::ChildrenChanged
        )
    }
}

/// An event together with the node it targets.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct TargetedEvent {
    /// Target node.
    pub node: NodeId,
    /// What happened.
    pub kind: EventKind,
}

impl TargetedEvent {
    /// Create an event.
    pub const fn new(node: NodeId, kind: EventKind) -> Self {
        Self { node, kind }
    }
}

#[derive(Default)]
struct EventQueue {
    events: Vec<TargetedEvent>,
    seen: BTreeSet<(NodeId, EventKind)>,
}

impl EventQueue {
    fn push(&mut self, node: NodeId, kind: EventKind) {
        if self.seen.insert((node, kind)) {
            self.events.push(TargetedEvent::new(node, kind));
        }
    }
}

/// Derive events for an applied update.
///
/// `previous` holds the data each replaced node had before the update and
/// `previous_data` the tree-wide data.
pub(crate) fn derive(
    tree: &Tree,
    changes: &[TreeChange],
    previous: &BTreeMap<NodeId, NodeData>,
    previous_data: &TreeData,
) -> Vec<TargetedEvent> {
    let mut queue = EventQueue::default();

    let created: BTreeSet<NodeId> = changes
        .iter()
        .filter_map(|c| match *c {
            TreeChange::NodeCreated { id, .. } => Some(id),
            _ => None,
        })
        .collect();
    for change in changes {
        match *change {
            TreeChange::NodeCreated { id, parent } => {
                queue.push(id, EventKind::NodeCreated);
                if !created.contains(&parent) {
                    queue.push(id, EventKind::SubtreeCreated);
                }
            }
            TreeChange::NodeReparented { id, .. } => queue.push(id, EventKind::NodeReparented),
            TreeChange::RoleChanged { id, .. } => queue.push(id, EventKind::RoleChanged),
            TreeChange::NodeDeleted { id } => queue.push(id, EventKind::NodeDeleted),
            TreeChange::SubtreeWillBeDeleted { .. } => {}
        }
    }

    for (&id, old) in previous {
        let Some(new) = tree.node(id) else {
            continue;
        };
        attribute_events(&mut queue, old, new);
    }

    let current = tree.data();
    if current.focus != previous_data.focus {
        queue.push(
            current.focus.unwrap_or(NodeId::ROOT),
            EventKind::FocusChanged,
        );
    }
    if current.selection != previous_data.selection {
        let target = current
            .selection
            .map(|s| s.focus_object)
            .unwrap_or(NodeId::ROOT);
        queue.push(target, EventKind::DocumentSelectionChanged);
    }

    queue.events
}

fn attribute_events(queue: &mut EventQueue, old: &NodeData, new: &NodeData) {
    let id = new.id;
    if old.child_ids != new.child_ids {
        queue.push(id, EventKind::ChildrenChanged);
    }
    // A value-derived name follows the value; ValueChanged already covers it.
    let name_changed = old.label_name() != new.label_name();
    if name_changed {
        queue.push(id, EventKind::NameChanged);
    }
    if old.description != new.description {
        queue.push(id, EventKind::DescriptionChanged);
    }
    let value_changed = old.value != new.value;
    if value_changed {
        queue.push(id, EventKind::ValueChanged);
    }

    let flipped = old.states ^ new.states;
    if flipped.intersects(StateFlags::CHECKED_GROUP) {
        queue.push(id, EventKind::CheckedStateChanged);
    }
    if flipped.contains(StateFlags::SELECTED) {
        queue.push(id, EventKind::SelectedChanged);
    }
    if flipped.contains(StateFlags::DISABLED) {
        queue.push(id, EventKind::EnabledChanged);
    }
    if flipped.intersects(StateFlags::EXPANDED_GROUP) {
        queue.push(id, EventKind::ExpandedChanged);
    }
    // Focus is reported through tree data, not per node.
    let other = flipped
        - StateFlags::CHECKED_GROUP
        - StateFlags::SELECTED
        - StateFlags::DISABLED
        - StateFlags::EXPANDED_GROUP
        - StateFlags::FOCUSED;
    if !other.is_empty() {
        queue.push(id, EventKind::StateChanged);
    }

    if old.actions != new.actions {
        queue.push(id, EventKind::ActionsChanged);
    }
    if old.scroll_position != new.scroll_position
        || old.scroll_extent_max != new.scroll_extent_max
        || old.scroll_extent_min != new.scroll_extent_min
    {
        queue.push(id, EventKind::ScrollPositionChanged);
    }
    if old.bounds != new.bounds || old.transform != new.transform {
        queue.push(id, EventKind::BoundsChanged);
    }
    if new.states.contains(StateFlags::LIVE_REGION) && (name_changed || value_changed) {
        queue.push(id, EventKind::LiveRegionChanged);
    }
}
