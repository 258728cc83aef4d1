// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the accessibility tree: node identifiers, roles, states, and actions.

use alloc::string::String;

/// Identifier for a node in the tree.
///
/// Ids are chosen by the producer of semantics updates and stay stable for as
/// long as the producer keeps describing the same node. Unlike the generational
/// handles of a slot map, an id may be reused by the producer after the node it
/// named has been removed; the tree treats the reuse as a fresh creation.
///
/// [`NodeId::ROOT`] is reserved and always present in a [`Tree`](crate::Tree).
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct NodeId(pub i32);

impl NodeId {
    /// The reserved id of the root node.
    pub const ROOT: Self = Self(0);

    /// Returns true for [`NodeId::ROOT`].
    pub const fn is_root(self) -> bool {
        self.0 == Self::ROOT.0
    }
}

impl From<i32> for NodeId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for NodeId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Platform-neutral role of a node.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Role {
    /// No role could be derived (a leaf without any text).
    #[default]
    Unknown,
    /// A node that only groups its children.
    GenericContainer,
    /// A leaf presenting text.
    StaticText,
    /// A push button.
    Button,
    /// A single-line editable text field.
    TextField,
    /// A multi-line editable text field.
    MultilineTextField,
    /// A hyperlink.
    Link,
    /// A heading.
    Header,
    /// An image.
    Image,
    /// A slider selecting a value from a range.
    Slider,
    /// A key on an on-screen keyboard.
    KeyboardKey,
    /// A radio button in a mutually exclusive group.
    RadioButton,
    /// A checkbox.
    CheckBox,
    /// A two-state toggle switch.
    Switch,
}

bitflags::bitflags! {
    /// Boolean state of a node, each independently queryable.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct StateFlags: u32 {
        /// Can receive input focus.
        const FOCUSABLE      = 1 << 0;
        /// Currently has input focus according to its own description.
        const FOCUSED        = 1 << 1;
        /// Checked (checkbox, radio button).
        const CHECKED        = 1 << 2;
        /// Tri-state checkbox in its indeterminate state.
        const MIXED          = 1 << 3;
        /// Selected.
        const SELECTED       = 1 << 4;
        /// Disabled; only set for nodes that report an enabled state at all.
        const DISABLED       = 1 << 5;
        /// Read-only text.
        const READ_ONLY      = 1 << 6;
        /// Editable text.
        const EDITABLE       = 1 << 7;
        /// Expanded.
        const EXPANDED       = 1 << 8;
        /// Collapsed.
        const COLLAPSED      = 1 << 9;
        /// Hidden from sighted users.
        const HIDDEN         = 1 << 10;
        /// Obscured text, such as a password.
        const OBSCURED       = 1 << 11;
        /// Accepts multiple lines of text.
        const MULTILINE      = 1 << 12;
        /// Toggled on (switch).
        const TOGGLED        = 1 << 13;
        /// Content changes should be announced.
        const LIVE_REGION    = 1 << 14;
        /// Starts a new navigation scope.
        const SCOPES_ROUTE   = 1 << 15;
        /// Provides the name of the enclosing route.
        const NAMES_ROUTE    = 1 << 16;
        /// Supports at least one scroll action.
        const SCROLLABLE     = 1 << 17;
        /// Supports the default (tap) action.
        const CLICKABLE      = 1 << 18;
        /// Clips its children to its own bounds.
        const CLIPS_CHILDREN = 1 << 19;
    }
}

impl StateFlags {
    /// States reported through [`EventKind::CheckedStateChanged`](crate::EventKind::CheckedStateChanged).
    pub const CHECKED_GROUP: Self = Self::CHECKED.union(Self::MIXED).union(Self::TOGGLED);
    /// States reported through [`EventKind::ExpandedChanged`](crate::EventKind::ExpandedChanged).
    pub const EXPANDED_GROUP: Self = Self::EXPANDED.union(Self::COLLAPSED);
}

bitflags::bitflags! {
    /// Actions a node supports, each independently queryable.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ActionFlags: u32 {
        /// Activate (tap, click, press).
        const DEFAULT                = 1 << 0;
        /// Open a context menu (long press).
        const SHOW_CONTEXT_MENU      = 1 << 1;
        /// Scroll content to the left.
        const SCROLL_LEFT            = 1 << 2;
        /// Scroll content to the right.
        const SCROLL_RIGHT           = 1 << 3;
        /// Scroll content up.
        const SCROLL_UP              = 1 << 4;
        /// Scroll content down.
        const SCROLL_DOWN            = 1 << 5;
        /// Increase the value.
        const INCREMENT              = 1 << 6;
        /// Decrease the value.
        const DECREMENT              = 1 << 7;
        /// Scroll so that the node becomes visible.
        const SCROLL_TO_MAKE_VISIBLE = 1 << 8;
        /// Move the text cursor forward.
        const MOVE_CURSOR_FORWARD    = 1 << 9;
        /// Move the text cursor backward.
        const MOVE_CURSOR_BACKWARD   = 1 << 10;
        /// Set the text selection.
        const SET_SELECTION          = 1 << 11;
        /// Copy the selection.
        const COPY                   = 1 << 12;
        /// Cut the selection.
        const CUT                    = 1 << 13;
        /// Paste into the node.
        const PASTE                  = 1 << 14;
        /// Give the node accessibility focus.
        const FOCUS                  = 1 << 15;
        /// Take accessibility focus away from the node.
        const BLUR                   = 1 << 16;
        /// Run one of the node's custom actions.
        const CUSTOM                 = 1 << 17;
        /// Dismiss the node (close a dialog or banner).
        const DISMISS                = 1 << 18;
        /// Replace the node's text.
        const SET_VALUE              = 1 << 19;
    }
}

impl ActionFlags {
    /// Any of the four scroll directions.
    pub const SCROLL: Self = Self::SCROLL_LEFT
        .union(Self::SCROLL_RIGHT)
        .union(Self::SCROLL_UP)
        .union(Self::SCROLL_DOWN);
}

/// Direction of a node's text.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum TextDirection {
    /// Right to left.
    Rtl,
    /// Left to right.
    Ltr,
}

/// Where a node's accessible name came from.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum NameFrom {
    /// The node's label.
    #[default]
    Label,
    /// The node's value, used because the label was empty.
    Value,
}

/// A text selection inside one node, as character offsets.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct TextSelection {
    /// Where the selection started.
    pub base: i32,
    /// Where the selection currently ends.
    pub extent: i32,
}

/// A custom action attached to a node, resolved to its label and hint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct CustomActionInfo {
    /// Producer-assigned id of the custom action.
    pub id: i32,
    /// Label describing the action.
    pub label: String,
    /// Hint describing the result of the action.
    pub hint: String,
    /// Standard action this custom action replaces, if any.
    pub overrides: Option<ActionFlags>,
}
