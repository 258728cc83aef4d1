// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The bridge: staging, commit, delegate bookkeeping, and queries.

use std::collections::HashMap;
use std::fmt;
use std::sync::Weak;

use kurbo::Point;
use understory_ax_tree::{
    NodeId, ResolvedBounds, TargetedEvent, Tree, TreeChange, TreeData, TreeUpdate,
};

use crate::delegate::{BridgeDelegate, NativeHandle, PlatformNodeDelegate};
use crate::descriptor::{SemanticsAction, SemanticsCustomAction, SemanticsNode};
use crate::error::BridgeError;
use crate::pending::PendingBatch;
use crate::registry::DelegateRegistry;
use crate::translate::{Layered, contribute_tree_data, translate_node};

/// Where the bridge is in its commit cycle.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum CommitPhase {
    /// Accepting staged descriptors.
    #[default]
    Idle,
    /// Translating the staged batch into a tree update.
    Building,
    /// Applying the update and notifying delegates.
    Applying,
}

/// What a successful commit did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CommitSummary {
    /// Structural changes, in the order they were applied.
    pub changes: Vec<TreeChange>,
    /// Number of events forwarded to the host delegate.
    pub events: usize,
}

impl CommitSummary {
    /// Ids that entered the tree.
    pub fn created(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.changes.iter().filter_map(|c| match *c {
            TreeChange::NodeCreated { id, .. } => Some(id),
            _ => None,
        })
    }

    /// Ids that left the tree.
    pub fn deleted(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.changes.iter().filter_map(|c| match *c {
            TreeChange::NodeDeleted { id } => Some(id),
            _ => None,
        })
    }
}

/// Keeps an accessibility tree in sync with per-frame semantics descriptions.
///
/// Descriptors are staged with [`stage_node`](Self::stage_node) and
/// [`stage_custom_action`](Self::stage_custom_action), then applied together
/// by [`commit`](Self::commit). Each node in the tree has a delegate created
/// by the host `D` and owned by the bridge.
pub struct AccessibilityBridge<D: BridgeDelegate> {
    tree: Tree,
    pending: PendingBatch,
    known_custom_actions: HashMap<i32, SemanticsCustomAction>,
    registry: DelegateRegistry<D::Node>,
    delegate: D,
    phase: CommitPhase,
    last_events: Vec<TargetedEvent>,
}

impl<D: BridgeDelegate> AccessibilityBridge<D> {
    /// Create a bridge whose tree holds only the root.
    ///
    /// The root's delegate is created immediately.
    pub fn new(mut delegate: D) -> Self {
        let mut registry = DelegateRegistry::new();
        registry.insert(
            NodeId::ROOT,
            delegate.create_platform_node_delegate(NodeId::ROOT),
        );
        Self {
            tree: Tree::new(),
            pending: PendingBatch::new(),
            known_custom_actions: HashMap::new(),
            registry,
            delegate,
            phase: CommitPhase::Idle,
            last_events: Vec::new(),
        }
    }

    /// Stage a node descriptor for the next commit.
    pub fn stage_node(&mut self, node: SemanticsNode) {
        self.pending.stage_node(node);
    }

    /// Stage several node descriptors; a later duplicate id wins.
    pub fn stage_nodes(&mut self, nodes: impl IntoIterator<Item = SemanticsNode>) {
        self.pending.stage_nodes(nodes);
    }

    /// Stage a custom action for the next commit.
    pub fn stage_custom_action(&mut self, action: SemanticsCustomAction) {
        self.pending.stage_custom_action(action);
    }

    /// Stage several custom actions; a later duplicate id wins.
    pub fn stage_custom_actions(
        &mut self,
        actions: impl IntoIterator<Item = SemanticsCustomAction>,
    ) {
        self.pending.stage_custom_actions(actions);
    }

    /// Descriptors staged since the last commit.
    pub fn pending(&self) -> &PendingBatch {
        &self.pending
    }

    /// Current commit phase.
    ///
    /// [`CommitPhase::Idle`] between commits. If a host callback unwinds out
    /// of [`commit`](Self::commit), the phase it was interrupted in stays
    /// here, and [`CommitPhase::Applying`] then means the tree was already
    /// updated but delegates or events may be incomplete.
    pub fn phase(&self) -> CommitPhase {
        self.phase
    }

    fn set_phase(&mut self, phase: CommitPhase) {
        tracing::trace!(target: "understory_ax_bridge::commit", ?phase, "commit phase");
        self.phase = phase;
    }

    /// Apply everything staged since the last commit.
    ///
    /// The staged batch is consumed whether or not the commit succeeds. On
    /// failure the tree, its delegates, and the previous commit's events are
    /// left as they were.
    ///
    /// On success, delegates are created for new nodes and dropped for
    /// removed ones, and every derived event is forwarded to the host
    /// delegate in order.
    pub fn commit(&mut self) -> Result<CommitSummary, BridgeError> {
        if self.pending.is_empty() {
            return Ok(CommitSummary::default());
        }
        let batch = self.pending.take();
        let span = tracing::debug_span!(
            target: "understory_ax_bridge::commit",
            "commit",
            nodes = batch.len(),
            custom_actions = batch.custom_action_count()
        );
        let _guard = span.enter();

        let result = self.build(&batch).and_then(|update| {
            self.set_phase(CommitPhase::Applying);
            self.tree.apply(update).map_err(BridgeError::from)
        });
        let applied = match result {
            Ok(applied) => applied,
            Err(err) => {
                self.set_phase(CommitPhase::Idle);
                tracing::warn!(target: "understory_ax_bridge::commit", %err, "commit rejected");
                return Err(err);
            }
        };

        self.known_custom_actions.extend(batch.custom_actions);
        for change in &applied.changes {
            self.sync_delegate(change);
        }
        self.last_events = applied.events;
        for &event in &self.last_events {
            self.delegate.on_accessibility_event(event);
        }
        self.set_phase(CommitPhase::Idle);

        tracing::debug!(
            target: "understory_ax_bridge::commit",
            changes = applied.changes.len(),
            events = self.last_events.len(),
            delegates = self.registry.len(),
            "commit applied"
        );
        Ok(CommitSummary {
            changes: applied.changes,
            events: self.last_events.len(),
        })
    }

    fn build(&mut self, batch: &PendingBatch) -> Result<TreeUpdate, BridgeError> {
        self.set_phase(CommitPhase::Building);
        let source = Layered {
            front: &batch.custom_actions,
            back: &self.known_custom_actions,
        };
        let mut ids: Vec<NodeId> = batch.nodes.keys().copied().collect();
        ids.sort_unstable();

        let mut tree_data = *self.tree.data();
        let mut nodes = Vec::with_capacity(ids.len());
        for id in ids {
            let Some(node) = batch.node(id) else {
                continue;
            };
            nodes.push(translate_node(node, &source)?);
            contribute_tree_data(node, &mut tree_data);
        }
        Ok(TreeUpdate {
            nodes,
            tree_data: Some(tree_data),
        })
    }

    fn sync_delegate(&mut self, change: &TreeChange) {
        match *change {
            TreeChange::NodeCreated { id, .. } => {
                let node = self.delegate.create_platform_node_delegate(id);
                self.registry.insert(id, node);
            }
            TreeChange::NodeDeleted { id } => {
                self.registry.release(id);
            }
            TreeChange::NodeReparented { .. }
            | TreeChange::RoleChanged { .. }
            | TreeChange::SubtreeWillBeDeleted { .. } => {}
        }
        tracing::trace!(
            target: "understory_ax_bridge::commit",
            node = %change.node(),
            ?change,
            "delegates synced"
        );
    }

    /// Events derived by the most recent successful commit.
    ///
    /// Reading them does not clear them.
    pub fn pending_events(&self) -> &[TargetedEvent] {
        &self.last_events
    }

    /// Non-owning reference to the delegate for `id`.
    ///
    /// The reference stops upgrading once the node leaves the tree.
    pub fn delegate_for(&self, id: NodeId) -> Weak<D::Node> {
        self.registry.get(id)
    }

    /// Native accessibility object of the node `id`, if it has one.
    pub fn native_accessible_from_id(&self, id: NodeId) -> Option<NativeHandle> {
        self.registry
            .get(id)
            .upgrade()
            .and_then(|node| node.native_handle())
    }

    /// The tree as of the last successful commit.
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Tree-wide data: focus and selection.
    pub fn tree_data(&self) -> &TreeData {
        self.tree.data()
    }

    /// Node with input focus, if any.
    pub fn focus(&self) -> Option<NodeId> {
        self.tree.data().focus
    }

    /// Record a focus change made outside the producer, such as by a screen reader.
    pub fn set_focus(&mut self, focus: Option<NodeId>) -> Result<(), BridgeError> {
        self.tree.set_focus(focus)?;
        tracing::debug!(target: "understory_ax_bridge::commit", ?focus, "focus set");
        Ok(())
    }

    /// Bounds of `id` in root coordinates, optionally clipped by its ancestors.
    pub fn bounds(&self, id: NodeId, clip: bool) -> Result<ResolvedBounds, BridgeError> {
        Ok(self.tree.relative_to_tree_bounds(id, clip)?)
    }

    /// Deepest visible node under `pt`, in root coordinates.
    pub fn hit_test(&self, pt: Point) -> Option<NodeId> {
        self.tree.hit_test(pt)
    }

    /// Forward an action request for `target` to the host delegate unchanged.
    pub fn dispatch_action(
        &mut self,
        target: NodeId,
        action: SemanticsAction,
        data: Vec<u8>,
    ) -> Result<(), BridgeError> {
        if !self.tree.contains(target) {
            return Err(BridgeError::NotFound(target));
        }
        tracing::trace!(target: "understory_ax_bridge::commit", %target, ?action, "dispatch action");
        self.delegate
            .dispatch_accessibility_action(target, action, data);
        Ok(())
    }

    /// The host delegate.
    pub fn delegate(&self) -> &D {
        &self.delegate
    }

    /// The host delegate, mutably.
    pub fn delegate_mut(&mut self) -> &mut D {
        &mut self.delegate
    }

    /// Swap in a new host delegate and return the old one.
    ///
    /// Node delegates already in the registry stay alive; only nodes created
    /// after the swap get delegates from the new host.
    pub fn replace_delegate(&mut self, delegate: D) -> D {
        core::mem::replace(&mut self.delegate, delegate)
    }
}

impl<D: BridgeDelegate + fmt::Debug> fmt::Debug for AccessibilityBridge<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessibilityBridge")
            .field("nodes", &self.tree.node_count())
            .field("pending", &self.pending.len())
            .field("phase", &self.phase)
            .field("delegate", &self.delegate)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::SemanticsFlags;
    use kurbo::Rect;
    use std::cell::RefCell;
    use std::panic::AssertUnwindSafe;
    use std::rc::Rc;
    use understory_ax_tree::{EventKind, Matrix4, Role, StateFlags, TextSelection, UpdateError};

    #[derive(Debug)]
    struct TestNode {
        id: NodeId,
        handle: Option<NativeHandle>,
    }

    impl PlatformNodeDelegate for TestNode {
        fn node_id(&self) -> NodeId {
            self.id
        }

        fn native_handle(&self) -> Option<NativeHandle> {
            self.handle
        }
    }

    #[derive(Debug, Default)]
    struct Log {
        events: Vec<TargetedEvent>,
        actions: Vec<(NodeId, SemanticsAction, Vec<u8>)>,
        created: Vec<NodeId>,
    }

    #[derive(Debug, Default)]
    struct Recorder {
        log: Rc<RefCell<Log>>,
        handle_base: u64,
        panic_on_event: bool,
    }

    impl BridgeDelegate for Recorder {
        type Node = TestNode;

        fn on_accessibility_event(&mut self, event: TargetedEvent) {
            assert!(!self.panic_on_event, "host failed on {event:?}");
            self.log.borrow_mut().events.push(event);
        }

        fn dispatch_accessibility_action(
            &mut self,
            target: NodeId,
            action: SemanticsAction,
            data: Vec<u8>,
        ) {
            self.log.borrow_mut().actions.push((target, action, data));
        }

        fn create_platform_node_delegate(&mut self, id: NodeId) -> TestNode {
            self.log.borrow_mut().created.push(id);
            TestNode {
                id,
                handle: (self.handle_base != 0)
                    .then(|| NativeHandle(self.handle_base + id.0 as u64)),
            }
        }
    }

    fn bridge() -> (AccessibilityBridge<Recorder>, Rc<RefCell<Log>>) {
        let recorder = Recorder::default();
        let log = recorder.log.clone();
        (AccessibilityBridge::new(recorder), log)
    }

    fn node(id: i32, children: &[i32]) -> SemanticsNode {
        SemanticsNode::new(id).with_children(children.iter().copied())
    }

    fn has_event(events: &[TargetedEvent], id: i32, kind: EventKind) -> bool {
        events.contains(&TargetedEvent::new(NodeId(id), kind))
    }

    #[test]
    fn new_bridge_has_root_delegate() {
        let (bridge, log) = bridge();
        assert_eq!(bridge.tree().node_count(), 1);
        assert_eq!(log.borrow().created, vec![NodeId::ROOT]);
        assert!(bridge.delegate_for(NodeId::ROOT).upgrade().is_some());
        assert_eq!(bridge.phase(), CommitPhase::Idle);
    }

    #[test]
    fn first_commit_builds_tree_and_delegates() {
        let (mut bridge, log) = bridge();
        bridge.stage_nodes([
            node(0, &[1, 2]),
            node(1, &[]).with_label("Play").with_flags(SemanticsFlags::IS_BUTTON),
            node(2, &[]).with_label("Title"),
        ]);
        let summary = bridge.commit().expect("valid batch");
        assert_eq!(summary.created().collect::<Vec<_>>(), vec![NodeId(1), NodeId(2)]);
        assert_eq!(bridge.tree().children(NodeId::ROOT), &[NodeId(1), NodeId(2)]);
        assert_eq!(bridge.tree().node(NodeId(1)).unwrap().role, Role::Button);
        assert_eq!(bridge.tree().node(NodeId(2)).unwrap().role, Role::StaticText);
        assert_eq!(bridge.tree().node(NodeId::ROOT).unwrap().role, Role::GenericContainer);

        let log = log.borrow();
        assert_eq!(log.created, vec![NodeId::ROOT, NodeId(1), NodeId(2)]);
        assert_eq!(log.events, bridge.pending_events());
        assert_eq!(summary.events, log.events.len());
        assert!(has_event(&log.events, 1, EventKind::NodeCreated));
        assert!(has_event(&log.events, 1, EventKind::SubtreeCreated));
        assert!(has_event(&log.events, 0, EventKind::ChildrenChanged));
        assert!(bridge.pending().is_empty(), "commit consumes the batch");
    }

    #[test]
    fn removing_a_child_cascades_and_releases_delegates() {
        let (mut bridge, log) = bridge();
        bridge.stage_nodes([node(0, &[1]), node(1, &[2]), node(2, &[3]), node(3, &[])]);
        bridge.commit().unwrap();
        let weak = bridge.delegate_for(NodeId(3));
        assert!(weak.upgrade().is_some());

        bridge.stage_node(node(0, &[]));
        let summary = bridge.commit().unwrap();
        assert_eq!(
            summary.deleted().collect::<Vec<_>>(),
            vec![NodeId(3), NodeId(2), NodeId(1)],
            "children are deleted before their parents"
        );
        assert_eq!(bridge.tree().node_count(), 1);
        assert!(weak.upgrade().is_none(), "deleted node's delegate is released");
        assert!(bridge.delegate_for(NodeId(1)).upgrade().is_none());
        assert_eq!(
            bridge.bounds(NodeId(3), false),
            Err(BridgeError::NotFound(NodeId(3))),
            "bounds of a deleted node are not derived from its last state"
        );
        let log = log.borrow();
        for id in [1, 2, 3] {
            assert!(has_event(&log.events, id, EventKind::NodeDeleted));
        }
    }

    #[test]
    fn restaging_the_same_descriptor_is_idempotent() {
        let frame = [node(0, &[1]), node(1, &[]).with_label("Once")];
        let (mut once, _) = bridge();
        once.stage_nodes(frame.clone());
        once.commit().unwrap();
        let (mut twice, _) = bridge();
        twice.stage_nodes(frame.clone());
        twice.stage_nodes(frame);
        twice.commit().unwrap();
        for id in [NodeId::ROOT, NodeId(1)] {
            assert_eq!(once.tree().node(id), twice.tree().node(id));
        }
        assert_eq!(once.pending_events(), twice.pending_events());
    }

    #[test]
    fn paired_move_keeps_delegate() {
        let (mut bridge, _log) = bridge();
        bridge.stage_nodes([node(0, &[1, 2]), node(1, &[3]), node(2, &[]), node(3, &[])]);
        bridge.commit().unwrap();
        let weak = bridge.delegate_for(NodeId(3));

        bridge.stage_nodes([node(1, &[]), node(2, &[3])]);
        let summary = bridge.commit().unwrap();
        let moves: Vec<_> = summary
            .changes
            .iter()
            .filter(|c| matches!(c, TreeChange::NodeReparented { .. }))
            .collect();
        assert_eq!(
            moves,
            vec![&TreeChange::NodeReparented {
                id: NodeId(3),
                old_parent: NodeId(1),
                new_parent: NodeId(2),
            }]
        );
        assert_eq!(summary.created().count(), 0);
        assert_eq!(summary.deleted().count(), 0);
        assert_eq!(bridge.tree().parent(NodeId(3)), Some(NodeId(2)));
        assert!(weak.upgrade().is_some(), "a moved node keeps its delegate");
        assert!(has_event(bridge.pending_events(), 3, EventKind::NodeReparented));
    }

    #[test]
    fn unpaired_move_is_rejected_and_batch_cleared() {
        let (mut bridge, log) = bridge();
        bridge.stage_nodes([node(0, &[1, 2]), node(1, &[3]), node(2, &[]), node(3, &[])]);
        bridge.commit().unwrap();
        let events_before = bridge.pending_events().to_vec();
        let delivered = log.borrow().events.len();

        bridge.stage_node(node(2, &[3]));
        let err = bridge.commit().unwrap_err();
        assert!(matches!(
            err,
            BridgeError::Update(UpdateError::MultipleParents { child: NodeId(3), .. })
        ));
        assert!(bridge.pending().is_empty(), "failed commit still clears the batch");
        assert_eq!(bridge.tree().parent(NodeId(3)), Some(NodeId(1)));
        assert_eq!(bridge.pending_events(), events_before.as_slice());
        assert_eq!(log.borrow().events.len(), delivered, "no events for a rejected commit");
        assert_eq!(bridge.phase(), CommitPhase::Idle);
    }

    #[test]
    fn unknown_child_and_cycles_are_rejected() {
        let (mut bridge, _log) = bridge();
        bridge.stage_node(node(0, &[5]));
        assert_eq!(
            bridge.commit(),
            Err(BridgeError::Update(UpdateError::UnknownChild {
                parent: NodeId::ROOT,
                child: NodeId(5),
            }))
        );
        bridge.stage_nodes([node(0, &[1]), node(1, &[0])]);
        assert!(matches!(
            bridge.commit(),
            Err(BridgeError::Update(UpdateError::Cycle { .. }))
        ));
        assert_eq!(bridge.tree().node_count(), 1);
    }

    #[test]
    fn value_only_change_yields_exactly_one_value_event() {
        let (mut bridge, _log) = bridge();
        bridge.stage_nodes([
            node(0, &[1]),
            node(1, &[]).with_label("Volume").with_value("3"),
        ]);
        bridge.commit().unwrap();
        bridge.stage_node(node(1, &[]).with_label("Volume").with_value("4"));
        bridge.commit().unwrap();
        assert_eq!(
            bridge.pending_events(),
            &[TargetedEvent::new(NodeId(1), EventKind::ValueChanged)]
        );
    }

    #[test]
    fn role_change_is_reported() {
        let (mut bridge, _log) = bridge();
        bridge.stage_nodes([node(0, &[1]), node(1, &[]).with_label("x")]);
        bridge.commit().unwrap();
        bridge.stage_node(
            node(1, &[])
                .with_label("x")
                .with_flags(SemanticsFlags::IS_HEADER),
        );
        let summary = bridge.commit().unwrap();
        assert_eq!(
            summary.changes,
            vec![TreeChange::RoleChanged {
                id: NodeId(1),
                old: Role::StaticText,
                new: Role::Header,
            }]
        );
        assert!(has_event(bridge.pending_events(), 1, EventKind::RoleChanged));
    }

    #[test]
    fn empty_commit_is_a_no_op() {
        let (mut bridge, log) = bridge();
        bridge.stage_nodes([node(0, &[1]), node(1, &[])]);
        bridge.commit().unwrap();
        let before = bridge.pending_events().to_vec();
        let summary = bridge.commit().unwrap();
        assert_eq!(summary, CommitSummary::default());
        assert_eq!(bridge.pending_events(), before.as_slice());
        assert_eq!(log.borrow().events.len(), before.len());
    }

    #[test]
    fn custom_actions_resolve_now_and_later() {
        let (mut bridge, _log) = bridge();
        bridge.stage_custom_action(SemanticsCustomAction {
            hint: "Moves the message".into(),
            ..SemanticsCustomAction::new(7, "Archive")
        });
        bridge.stage_nodes([node(0, &[1]), node(1, &[]).with_custom_actions([7])]);
        bridge.commit().unwrap();
        let info = &bridge.tree().node(NodeId(1)).unwrap().custom_actions;
        assert_eq!(info.len(), 1);
        assert_eq!(info[0].label, "Archive");
        assert_eq!(info[0].hint, "Moves the message");

        bridge.stage_node(
            node(1, &[])
                .with_label("Message")
                .with_custom_actions([7]),
        );
        bridge.commit().expect("earlier custom action is still known");

        bridge.stage_node(node(1, &[]).with_custom_actions([8]));
        assert_eq!(
            bridge.commit(),
            Err(BridgeError::UnknownCustomAction {
                node: NodeId(1),
                action: 8,
            })
        );
        assert_eq!(
            bridge.tree().node(NodeId(1)).unwrap().name.as_deref(),
            Some("Message"),
            "failed commit leaves the tree untouched"
        );
    }

    #[test]
    fn focus_follows_flags_and_survives_churn() {
        let (mut bridge, _log) = bridge();
        bridge.stage_nodes([
            node(0, &[1, 2]),
            node(1, &[]).with_flags(SemanticsFlags::IS_FOCUSED | SemanticsFlags::IS_FOCUSABLE),
            node(2, &[]).with_label("other"),
        ]);
        bridge.commit().unwrap();
        assert_eq!(bridge.focus(), Some(NodeId(1)));
        assert!(has_event(bridge.pending_events(), 1, EventKind::FocusChanged));

        bridge.stage_node(node(2, &[]).with_label("changed"));
        bridge.commit().unwrap();
        assert_eq!(bridge.focus(), Some(NodeId(1)), "unrelated batch keeps focus");

        bridge.set_focus(Some(NodeId(2))).unwrap();
        assert_eq!(bridge.tree_data().focus, Some(NodeId(2)));
        assert_eq!(
            bridge.set_focus(Some(NodeId(9))),
            Err(BridgeError::NotFound(NodeId(9)))
        );

        bridge.stage_node(node(0, &[1]));
        bridge.commit().unwrap();
        assert_eq!(bridge.focus(), None, "deleting the focused node clears focus");
    }

    #[test]
    fn text_selection_becomes_tree_selection() {
        let (mut bridge, _log) = bridge();
        let mut field = node(1, &[]).with_flags(SemanticsFlags::IS_TEXT_FIELD);
        field.text_selection = Some(TextSelection { base: 2, extent: 5 });
        bridge.stage_nodes([node(0, &[1]), field]);
        bridge.commit().unwrap();
        let selection = bridge.tree_data().selection.expect("selection");
        assert_eq!(selection.anchor_object, NodeId(1));
        assert_eq!((selection.anchor_offset, selection.focus_offset), (2, 5));
        assert!(has_event(
            bridge.pending_events(),
            1,
            EventKind::DocumentSelectionChanged
        ));
        assert!(
            bridge
                .tree()
                .node(NodeId(1))
                .unwrap()
                .states
                .contains(StateFlags::EDITABLE)
        );
    }

    #[test]
    fn bounds_compose_and_clip() {
        let (mut bridge, _log) = bridge();
        bridge.stage_nodes([
            node(0, &[1]).with_rect(Rect::new(0.0, 0.0, 100.0, 100.0)),
            node(1, &[2])
                .with_rect(Rect::new(0.0, 0.0, 50.0, 50.0))
                .with_transform(Matrix4::translate(10.0, 10.0)),
            node(2, &[]).with_rect(Rect::new(45.0, 0.0, 60.0, 5.0)),
        ]);
        bridge.commit().unwrap();
        let unclipped = bridge.bounds(NodeId(2), false).unwrap();
        assert_eq!(unclipped.rect, Rect::new(55.0, 10.0, 70.0, 15.0));
        let clipped = bridge.bounds(NodeId(2), true).unwrap();
        assert_eq!(clipped.rect, Rect::new(55.0, 10.0, 60.0, 15.0));
        assert!(!clipped.offscreen);
        assert_eq!(bridge.hit_test(Point::new(57.0, 12.0)), Some(NodeId(2)));
        assert_eq!(
            bridge.bounds(NodeId(4), true),
            Err(BridgeError::NotFound(NodeId(4)))
        );
    }

    #[test]
    fn actions_forward_unchanged() {
        let (mut bridge, log) = bridge();
        bridge.stage_nodes([
            node(0, &[1]),
            node(1, &[]).with_actions(SemanticsAction::TAP | SemanticsAction::SET_TEXT),
        ]);
        bridge.commit().unwrap();
        bridge
            .dispatch_action(NodeId(1), SemanticsAction::SET_TEXT, b"hello".to_vec())
            .unwrap();
        assert_eq!(
            log.borrow().actions,
            vec![(NodeId(1), SemanticsAction::SET_TEXT, b"hello".to_vec())]
        );
        assert_eq!(
            bridge.dispatch_action(NodeId(5), SemanticsAction::TAP, Vec::new()),
            Err(BridgeError::NotFound(NodeId(5)))
        );
        assert_eq!(log.borrow().actions.len(), 1);
    }

    #[test]
    fn native_handles_and_delegate_replacement() {
        let (mut bridge, old_log) = bridge();
        bridge.stage_nodes([node(0, &[1]), node(1, &[])]);
        bridge.commit().unwrap();
        assert_eq!(bridge.native_accessible_from_id(NodeId(1)), None);

        let replacement = Recorder {
            handle_base: 100,
            ..Recorder::default()
        };
        let new_log = replacement.log.clone();
        let old = bridge.replace_delegate(replacement);
        assert!(Rc::ptr_eq(&old.log, &old_log));
        assert!(
            bridge.delegate_for(NodeId(1)).upgrade().is_some(),
            "existing node delegates survive the swap"
        );

        bridge.stage_nodes([node(0, &[1, 2]), node(2, &[])]);
        bridge.commit().unwrap();
        assert_eq!(
            bridge.native_accessible_from_id(NodeId(2)),
            Some(NativeHandle(102))
        );
        assert_eq!(new_log.borrow().created, vec![NodeId(2)]);
        assert!(!new_log.borrow().events.is_empty());
        assert_eq!(bridge.native_accessible_from_id(NodeId(9)), None);
    }

    #[test]
    fn delegate_node_ids_match_tree() {
        let (mut bridge, _log) = bridge();
        bridge.stage_nodes([node(0, &[4]), node(4, &[])]);
        bridge.commit().unwrap();
        let node = bridge.delegate_for(NodeId(4)).upgrade().unwrap();
        assert_eq!(node.node_id(), NodeId(4));
    }

    #[test]
    fn phase_shows_where_an_unwinding_host_stopped_the_commit() {
        let (mut bridge, log) = bridge();
        bridge.delegate_mut().panic_on_event = true;
        bridge.stage_nodes([node(0, &[1]), node(1, &[])]);
        let outcome = std::panic::catch_unwind(AssertUnwindSafe(|| bridge.commit()));
        assert!(outcome.is_err());
        assert_eq!(bridge.phase(), CommitPhase::Applying);
        assert!(bridge.tree().contains(NodeId(1)));
        assert!(bridge.delegate_for(NodeId(1)).upgrade().is_some());
        assert!(log.borrow().events.is_empty());

        bridge.delegate_mut().panic_on_event = false;
        bridge.stage_node(node(1, &[]).with_label("Play"));
        bridge.commit().unwrap();
        assert_eq!(bridge.phase(), CommitPhase::Idle);
        assert!(has_event(&log.borrow().events, 1, EventKind::NameChanged));
    }
}
