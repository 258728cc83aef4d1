// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pure translation from [`SemanticsNode`] descriptors to tree [`NodeData`].
//!
//! Nothing in here touches the tree or any delegate. The same descriptor and
//! the same custom actions always translate to the same data.

use std::collections::HashMap;

use understory_ax_tree::{
    ActionFlags, CustomActionInfo, NameFrom, NodeData, NodeId, Role, StateFlags, TextDirection,
    TreeData, TreeSelection,
};

use crate::descriptor::{
    SemanticsAction, SemanticsCustomAction, SemanticsFlags, SemanticsNode,
    TextDirection as SemanticsTextDirection,
};
use crate::error::BridgeError;

/// Lookup of custom action descriptors by id.
pub trait CustomActionSource {
    /// Return the custom action with `id`, if known.
    fn custom_action(&self, id: i32) -> Option<&SemanticsCustomAction>;
}

impl CustomActionSource for HashMap<i32, SemanticsCustomAction> {
    fn custom_action(&self, id: i32) -> Option<&SemanticsCustomAction> {
        self.get(&id)
    }
}

/// Looks in `front` first, then in `back`.
#[derive(Clone, Copy, Debug)]
pub struct Layered<'a, F, B> {
    /// Checked first.
    pub front: &'a F,
    /// Checked when `front` has no match.
    pub back: &'a B,
}

impl<F: CustomActionSource, B: CustomActionSource> CustomActionSource for Layered<'_, F, B> {
    fn custom_action(&self, id: i32) -> Option<&SemanticsCustomAction> {
        self.front
            .custom_action(id)
            .or_else(|| self.back.custom_action(id))
    }
}

/// Role rules, first match wins: `(required, forbidden, role)`.
const ROLE_RULES: &[(SemanticsFlags, SemanticsFlags, Role)] = &[
    (
        SemanticsFlags::IS_BUTTON,
        SemanticsFlags::empty(),
        Role::Button,
    ),
    (
        SemanticsFlags::IS_TEXT_FIELD.union(SemanticsFlags::IS_MULTILINE),
        SemanticsFlags::IS_READ_ONLY,
        Role::MultilineTextField,
    ),
    (
        SemanticsFlags::IS_TEXT_FIELD,
        SemanticsFlags::IS_READ_ONLY,
        Role::TextField,
    ),
    (SemanticsFlags::IS_LINK, SemanticsFlags::empty(), Role::Link),
    (SemanticsFlags::IS_HEADER, SemanticsFlags::empty(), Role::Header),
    (SemanticsFlags::IS_IMAGE, SemanticsFlags::empty(), Role::Image),
    (SemanticsFlags::IS_SLIDER, SemanticsFlags::empty(), Role::Slider),
    (
        SemanticsFlags::IS_KEYBOARD_KEY,
        SemanticsFlags::empty(),
        Role::KeyboardKey,
    ),
    (
        SemanticsFlags::HAS_CHECKED_STATE.union(SemanticsFlags::IS_IN_MUTUALLY_EXCLUSIVE_GROUP),
        SemanticsFlags::empty(),
        Role::RadioButton,
    ),
    (
        SemanticsFlags::HAS_CHECKED_STATE,
        SemanticsFlags::empty(),
        Role::CheckBox,
    ),
    (
        SemanticsFlags::HAS_TOGGLED_STATE,
        SemanticsFlags::empty(),
        Role::Switch,
    ),
];

/// Derive the role of `node`.
///
/// Flags are tried in a fixed priority order. A node matching none of them is
/// a container if it has children, static text if it has a label, value, or
/// hint, and [`Role::Unknown`] otherwise.
pub fn role_for(node: &SemanticsNode) -> Role {
    let flags = node.flags;
    if let Some(&(_, _, role)) = ROLE_RULES
        .iter()
        .find(|(required, forbidden, _)| flags.contains(*required) && !flags.intersects(*forbidden))
    {
        return role;
    }
    if !node.children_in_traversal_order.is_empty() {
        Role::GenericContainer
    } else if !node.label.is_empty() || !node.value.is_empty() || !node.hint.is_empty() {
        Role::StaticText
    } else {
        Role::Unknown
    }
}

/// Derive the boolean states of `node`.
pub fn states_for(node: &SemanticsNode) -> StateFlags {
    let flags = node.flags;
    let mut states = StateFlags::empty();
    let mut set = |state: StateFlags, on: bool| states.set(state, on);

    let checkable = flags.contains(SemanticsFlags::HAS_CHECKED_STATE);
    set(
        StateFlags::CHECKED,
        checkable && flags.contains(SemanticsFlags::IS_CHECKED),
    );
    set(
        StateFlags::MIXED,
        checkable && flags.contains(SemanticsFlags::IS_CHECK_STATE_MIXED),
    );
    set(
        StateFlags::TOGGLED,
        flags.contains(SemanticsFlags::HAS_TOGGLED_STATE | SemanticsFlags::IS_TOGGLED),
    );
    set(
        StateFlags::DISABLED,
        flags.contains(SemanticsFlags::HAS_ENABLED_STATE)
            && !flags.contains(SemanticsFlags::IS_ENABLED),
    );
    if flags.contains(SemanticsFlags::HAS_EXPANDED_STATE) {
        let expanded = flags.contains(SemanticsFlags::IS_EXPANDED);
        set(StateFlags::EXPANDED, expanded);
        set(StateFlags::COLLAPSED, !expanded);
    }
    set(
        StateFlags::EDITABLE,
        flags.contains(SemanticsFlags::IS_TEXT_FIELD)
            && !flags.contains(SemanticsFlags::IS_READ_ONLY),
    );

    for (flag, state) in [
        (SemanticsFlags::IS_FOCUSABLE, StateFlags::FOCUSABLE),
        (SemanticsFlags::IS_FOCUSED, StateFlags::FOCUSED),
        (SemanticsFlags::IS_SELECTED, StateFlags::SELECTED),
        (SemanticsFlags::IS_READ_ONLY, StateFlags::READ_ONLY),
        (SemanticsFlags::IS_HIDDEN, StateFlags::HIDDEN),
        (SemanticsFlags::IS_OBSCURED, StateFlags::OBSCURED),
        (SemanticsFlags::IS_MULTILINE, StateFlags::MULTILINE),
        (SemanticsFlags::IS_LIVE_REGION, StateFlags::LIVE_REGION),
        (SemanticsFlags::SCOPES_ROUTE, StateFlags::SCOPES_ROUTE),
        (SemanticsFlags::NAMES_ROUTE, StateFlags::NAMES_ROUTE),
    ] {
        set(state, flags.contains(flag));
    }

    let actions = actions_for(node.actions);
    set(
        StateFlags::SCROLLABLE,
        actions.intersects(ActionFlags::SCROLL)
            || flags.contains(SemanticsFlags::HAS_IMPLICIT_SCROLLING),
    );
    set(StateFlags::CLICKABLE, actions.contains(ActionFlags::DEFAULT));
    set(
        StateFlags::CLIPS_CHILDREN,
        !node.children_in_traversal_order.is_empty(),
    );
    states
}

const ACTION_MAP: &[(SemanticsAction, ActionFlags)] = &[
    (SemanticsAction::TAP, ActionFlags::DEFAULT),
    (SemanticsAction::LONG_PRESS, ActionFlags::SHOW_CONTEXT_MENU),
    (SemanticsAction::SCROLL_LEFT, ActionFlags::SCROLL_LEFT),
    (SemanticsAction::SCROLL_RIGHT, ActionFlags::SCROLL_RIGHT),
    (SemanticsAction::SCROLL_UP, ActionFlags::SCROLL_UP),
    (SemanticsAction::SCROLL_DOWN, ActionFlags::SCROLL_DOWN),
    (SemanticsAction::INCREASE, ActionFlags::INCREMENT),
    (SemanticsAction::DECREASE, ActionFlags::DECREMENT),
    (
        SemanticsAction::SHOW_ON_SCREEN,
        ActionFlags::SCROLL_TO_MAKE_VISIBLE,
    ),
    (
        SemanticsAction::MOVE_CURSOR_FORWARD_BY_CHARACTER,
        ActionFlags::MOVE_CURSOR_FORWARD,
    ),
    (
        SemanticsAction::MOVE_CURSOR_FORWARD_BY_WORD,
        ActionFlags::MOVE_CURSOR_FORWARD,
    ),
    (
        SemanticsAction::MOVE_CURSOR_BACKWARD_BY_CHARACTER,
        ActionFlags::MOVE_CURSOR_BACKWARD,
    ),
    (
        SemanticsAction::MOVE_CURSOR_BACKWARD_BY_WORD,
        ActionFlags::MOVE_CURSOR_BACKWARD,
    ),
    (SemanticsAction::SET_SELECTION, ActionFlags::SET_SELECTION),
    (SemanticsAction::COPY, ActionFlags::COPY),
    (SemanticsAction::CUT, ActionFlags::CUT),
    (SemanticsAction::PASTE, ActionFlags::PASTE),
    (
        SemanticsAction::DID_GAIN_ACCESSIBILITY_FOCUS,
        ActionFlags::FOCUS,
    ),
    (SemanticsAction::DID_LOSE_ACCESSIBILITY_FOCUS, ActionFlags::BLUR),
    (SemanticsAction::CUSTOM_ACTION, ActionFlags::CUSTOM),
    (SemanticsAction::DISMISS, ActionFlags::DISMISS),
    (SemanticsAction::SET_TEXT, ActionFlags::SET_VALUE),
];

/// Map raw actions to platform-neutral actions.
///
/// Character and word cursor movement collapse into one action per direction.
pub fn actions_for(actions: SemanticsAction) -> ActionFlags {
    ACTION_MAP
        .iter()
        .filter(|(raw, _)| actions.contains(*raw))
        .fold(ActionFlags::empty(), |acc, (_, mapped)| acc | *mapped)
}

fn non_empty(text: &str) -> Option<String> {
    (!text.is_empty()).then(|| text.to_owned())
}

/// Accessible name of `node` and where it came from.
///
/// The label wins; an unlabelled node falls back to its value.
pub fn name_for(node: &SemanticsNode) -> Option<(String, NameFrom)> {
    non_empty(&node.label)
        .map(|label| (label, NameFrom::Label))
        .or_else(|| non_empty(&node.value).map(|value| (value, NameFrom::Value)))
}

fn resolve_custom_action(
    node: NodeId,
    id: i32,
    source: &impl CustomActionSource,
) -> Result<CustomActionInfo, BridgeError> {
    let action = source
        .custom_action(id)
        .ok_or(BridgeError::UnknownCustomAction { node, action: id })?;
    Ok(CustomActionInfo {
        id: action.id,
        label: action.label.clone(),
        hint: action.hint.clone(),
        overrides: action.override_action.map(actions_for),
    })
}

/// Translate one descriptor into tree node data.
///
/// Every custom action id the node references must resolve through `source`.
pub fn translate_node(
    node: &SemanticsNode,
    source: &impl CustomActionSource,
) -> Result<NodeData, BridgeError> {
    let custom_actions = node
        .custom_accessibility_actions
        .iter()
        .map(|&id| resolve_custom_action(node.id, id, source))
        .collect::<Result<Vec<_>, _>>()?;
    let (name, name_from) = match name_for(node) {
        Some((name, from)) => (Some(name), from),
        None => (None, NameFrom::Label),
    };
    Ok(NodeData {
        id: node.id,
        role: role_for(node),
        states: states_for(node),
        actions: actions_for(node.actions),
        name,
        name_from,
        value: non_empty(&node.value),
        description: non_empty(&node.hint),
        value_increased: non_empty(&node.increased_value),
        value_decreased: non_empty(&node.decreased_value),
        text_direction: match node.text_direction {
            SemanticsTextDirection::Unknown => None,
            SemanticsTextDirection::Rtl => Some(TextDirection::Rtl),
            SemanticsTextDirection::Ltr => Some(TextDirection::Ltr),
        },
        text_selection: node.text_selection,
        scroll_child_count: node.scroll_child_count,
        scroll_index: node.scroll_index,
        scroll_position: node.scroll_position,
        scroll_extent_max: node.scroll_extent_max,
        scroll_extent_min: node.scroll_extent_min,
        elevation: node.elevation,
        thickness: node.thickness,
        custom_actions,
        child_ids: node.children_in_traversal_order.clone(),
        bounds: node.rect,
        transform: node.transform,
    })
}

/// Fold the tree-wide contribution of `node` into `data`.
///
/// A focused node takes focus. A node with a text selection becomes the
/// anchor and focus of the tree selection; a node that held the selection and
/// no longer describes one clears it.
pub fn contribute_tree_data(node: &SemanticsNode, data: &mut TreeData) {
    if node.flags.contains(SemanticsFlags::IS_FOCUSED) {
        data.focus = Some(node.id);
    }
    match node.text_selection {
        Some(selection) => {
            data.selection = Some(TreeSelection {
                anchor_object: node.id,
                anchor_offset: selection.base,
                focus_object: node.id,
                focus_offset: selection.extent,
            });
        }
        None => {
            if data.selection.is_some_and(|s| s.focus_object == node.id) {
                data.selection = None;
            }
        }
    }
}
