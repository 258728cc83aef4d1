// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node and tree-wide attribute data.

use alloc::string::String;
use alloc::vec::Vec;
use kurbo::Rect;

use crate::matrix::Matrix4;
use crate::types::{
    ActionFlags, CustomActionInfo, NameFrom, NodeId, Role, StateFlags, TextDirection,
    TextSelection,
};

/// Platform-neutral attributes of one node.
///
/// Optional attributes are `None` when the producer did not supply them;
/// they are never filled with a sentinel zero.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeData {
    /// The node's id.
    pub id: NodeId,
    /// Role derived from the node's flags.
    pub role: Role,
    /// Boolean states.
    pub states: StateFlags,
    /// Supported actions.
    pub actions: ActionFlags,
    /// Accessible name.
    pub name: Option<String>,
    /// Source of [`NodeData::name`]; meaningful only when a name is present.
    pub name_from: NameFrom,
    /// Current value.
    pub value: Option<String>,
    /// Longer description, such as a usage hint.
    pub description: Option<String>,
    /// Value after an increment action.
    pub value_increased: Option<String>,
    /// Value after a decrement action.
    pub value_decreased: Option<String>,
    /// Direction of the node's text.
    pub text_direction: Option<TextDirection>,
    /// Text selection inside the node.
    pub text_selection: Option<TextSelection>,
    /// Number of children that can be scrolled through.
    pub scroll_child_count: Option<i32>,
    /// Index of the first visible scroll child.
    pub scroll_index: Option<i32>,
    /// Current scroll offset.
    pub scroll_position: Option<f64>,
    /// Largest scroll offset.
    pub scroll_extent_max: Option<f64>,
    /// Smallest scroll offset.
    pub scroll_extent_min: Option<f64>,
    /// Elevation above the parent.
    pub elevation: Option<f64>,
    /// Extent along the elevation axis.
    pub thickness: Option<f64>,
    /// Custom actions, resolved to label and hint.
    pub custom_actions: Vec<CustomActionInfo>,
    /// Children in traversal order.
    pub child_ids: Vec<NodeId>,
    /// Bounds in the node's own coordinates.
    pub bounds: Rect,
    /// Transform from the node's coordinates into its parent's.
    pub transform: Matrix4,
}

impl NodeData {
    /// Create empty data for `id`.
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    /// The name, if it came from the node's label.
    pub fn label_name(&self) -> Option<&str> {
        match self.name_from {
            NameFrom::Label => self.name.as_deref(),
            NameFrom::Value => None,
        }
    }
}

/// Text selection spanning the tree, expressed as anchor and focus positions.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct TreeSelection {
    /// Node holding the selection anchor.
    pub anchor_object: NodeId,
    /// Character offset of the anchor.
    pub anchor_offset: i32,
    /// Node holding the selection focus.
    pub focus_object: NodeId,
    /// Character offset of the focus.
    pub focus_offset: i32,
}

/// Tree-wide data, independent of any one node's attributes.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct TreeData {
    /// Node that currently has input focus.
    pub focus: Option<NodeId>,
    /// Current text selection.
    pub selection: Option<TreeSelection>,
}
