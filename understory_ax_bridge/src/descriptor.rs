// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flat, per-frame node and custom action descriptors.
//!
//! Bit positions of [`SemanticsFlags`] and [`SemanticsAction`] follow the
//! widely used embedder layout, so producers can pass their raw bitsets
//! through [`SemanticsFlags::from_bits_retain`] unchanged.

use kurbo::Rect;
use understory_ax_tree::{Matrix4, NodeId, TextSelection};

bitflags::bitflags! {
    /// Raw per-node flags as produced by the semantics layer.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct SemanticsFlags: u32 {
        /// The node has a checked state (checkbox, radio button).
        const HAS_CHECKED_STATE = 1 << 0;
        /// The node is checked.
        const IS_CHECKED = 1 << 1;
        /// The node is selected.
        const IS_SELECTED = 1 << 2;
        /// The node is a button.
        const IS_BUTTON = 1 << 3;
        /// The node is a text field.
        const IS_TEXT_FIELD = 1 << 4;
        /// The node has input focus.
        const IS_FOCUSED = 1 << 5;
        /// The node has an enabled state.
        const HAS_ENABLED_STATE = 1 << 6;
        /// The node is enabled.
        const IS_ENABLED = 1 << 7;
        /// The node belongs to a mutually exclusive group.
        const IS_IN_MUTUALLY_EXCLUSIVE_GROUP = 1 << 8;
        /// The node is a header.
        const IS_HEADER = 1 << 9;
        /// The node's text is obscured.
        const IS_OBSCURED = 1 << 10;
        /// The node starts a route.
        const SCOPES_ROUTE = 1 << 11;
        /// The node names its route.
        const NAMES_ROUTE = 1 << 12;
        /// The node is hidden.
        const IS_HIDDEN = 1 << 13;
        /// The node is an image.
        const IS_IMAGE = 1 << 14;
        /// The node is a live region.
        const IS_LIVE_REGION = 1 << 15;
        /// The node has a toggled state (switch).
        const HAS_TOGGLED_STATE = 1 << 16;
        /// The node is toggled on.
        const IS_TOGGLED = 1 << 17;
        /// The node scrolls implicitly.
        const HAS_IMPLICIT_SCROLLING = 1 << 18;
        /// The text field accepts multiple lines.
        const IS_MULTILINE = 1 << 19;
        /// The text field is read-only.
        const IS_READ_ONLY = 1 << 20;
        /// The node can take input focus.
        const IS_FOCUSABLE = 1 << 21;
        /// The node is a link.
        const IS_LINK = 1 << 22;
        /// The node is a slider.
        const IS_SLIDER = 1 << 23;
        /// The node is a keyboard key.
        const IS_KEYBOARD_KEY = 1 << 24;
        /// The checkbox is in its mixed state.
        const IS_CHECK_STATE_MIXED = 1 << 25;
        /// The node has an expanded state.
        const HAS_EXPANDED_STATE = 1 << 26;
        /// The node is expanded.
        const IS_EXPANDED = 1 << 27;
    }
}

bitflags::bitflags! {
    /// Raw actions as produced by the semantics layer.
    ///
    /// A node descriptor carries the set of supported actions; an inbound
    /// action request carries exactly one.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct SemanticsAction: u32 {
        /// Tap or click.
        const TAP = 1 << 0;
        /// Long press.
        const LONG_PRESS = 1 << 1;
        /// Scroll left.
        const SCROLL_LEFT = 1 << 2;
        /// Scroll right.
        const SCROLL_RIGHT = 1 << 3;
        /// Scroll up.
        const SCROLL_UP = 1 << 4;
        /// Scroll down.
        const SCROLL_DOWN = 1 << 5;
        /// Increase the value.
        const INCREASE = 1 << 6;
        /// Decrease the value.
        const DECREASE = 1 << 7;
        /// Scroll the node on screen.
        const SHOW_ON_SCREEN = 1 << 8;
        /// Move the cursor forward by one character.
        const MOVE_CURSOR_FORWARD_BY_CHARACTER = 1 << 9;
        /// Move the cursor backward by one character.
        const MOVE_CURSOR_BACKWARD_BY_CHARACTER = 1 << 10;
        /// Set the text selection.
        const SET_SELECTION = 1 << 11;
        /// Copy.
        const COPY = 1 << 12;
        /// Cut.
        const CUT = 1 << 13;
        /// Paste.
        const PASTE = 1 << 14;
        /// The node gained accessibility focus.
        const DID_GAIN_ACCESSIBILITY_FOCUS = 1 << 15;
        /// The node lost accessibility focus.
        const DID_LOSE_ACCESSIBILITY_FOCUS = 1 << 16;
        /// Run a custom action.
        const CUSTOM_ACTION = 1 << 17;
        /// Dismiss.
        const DISMISS = 1 << 18;
        /// Move the cursor forward by one word.
        const MOVE_CURSOR_FORWARD_BY_WORD = 1 << 19;
        /// Move the cursor backward by one word.
        const MOVE_CURSOR_BACKWARD_BY_WORD = 1 << 20;
        /// Replace the text.
        const SET_TEXT = 1 << 21;
    }
}

/// Direction of a node's text as described by the producer.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum TextDirection {
    /// Not specified.
    #[default]
    Unknown,
    /// Right to left.
    Rtl,
    /// Left to right.
    Ltr,
}

/// One frame's full description of one semantics node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SemanticsNode {
    /// Node id.
    pub id: NodeId,
    /// Flag bitset.
    pub flags: SemanticsFlags,
    /// Supported actions.
    pub actions: SemanticsAction,
    /// Text selection, if the node has one.
    pub text_selection: Option<TextSelection>,
    /// Number of scrollable children.
    pub scroll_child_count: Option<i32>,
    /// Index of the first visible scrollable child.
    pub scroll_index: Option<i32>,
    /// Scroll offset.
    pub scroll_position: Option<f64>,
    /// Largest scroll offset.
    pub scroll_extent_max: Option<f64>,
    /// Smallest scroll offset.
    pub scroll_extent_min: Option<f64>,
    /// Elevation relative to the parent.
    pub elevation: Option<f64>,
    /// Thickness along the elevation axis.
    pub thickness: Option<f64>,
    /// Label; empty when absent.
    pub label: String,
    /// Hint; empty when absent.
    pub hint: String,
    /// Value; empty when absent.
    pub value: String,
    /// Value after an increase; empty when absent.
    pub increased_value: String,
    /// Value after a decrease; empty when absent.
    pub decreased_value: String,
    /// Text direction.
    pub text_direction: TextDirection,
    /// Rectangle in the node's own coordinates.
    pub rect: Rect,
    /// Transform into the parent's coordinates.
    pub transform: Matrix4,
    /// Children in traversal order.
    pub children_in_traversal_order: Vec<NodeId>,
    /// Ids of the node's custom actions.
    pub custom_accessibility_actions: Vec<i32>,
}

impl SemanticsNode {
    /// Create an empty descriptor for `id`.
    pub fn new(id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Set the children, in traversal order.
    pub fn with_children(mut self, children: impl IntoIterator<Item = i32>) -> Self {
        self.children_in_traversal_order = children.into_iter().map(NodeId).collect();
        self
    }

    /// Set the flags.
    pub fn with_flags(mut self, flags: SemanticsFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Set the supported actions.
    pub fn with_actions(mut self, actions: SemanticsAction) -> Self {
        self.actions = actions;
        self
    }

    /// Set the label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set the value.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Set the hint.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = hint.into();
        self
    }

    /// Set the rectangle.
    pub fn with_rect(mut self, rect: Rect) -> Self {
        self.rect = rect;
        self
    }

    /// Set the transform.
    pub fn with_transform(mut self, transform: Matrix4) -> Self {
        self.transform = transform;
        self
    }

    /// Set the custom action ids.
    pub fn with_custom_actions(mut self, ids: impl IntoIterator<Item = i32>) -> Self {
        self.custom_accessibility_actions = ids.into_iter().collect();
        self
    }
}

/// One frame's description of a custom action.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct SemanticsCustomAction {
    /// Custom action id.
    pub id: i32,
    /// Standard action this one overrides, if any.
    pub override_action: Option<SemanticsAction>,
    /// Label.
    pub label: String,
    /// Hint.
    pub hint: String,
}

impl SemanticsCustomAction {
    /// Create a custom action with a label.
    pub fn new(id: i32, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            ..Default::default()
        }
    }
}
