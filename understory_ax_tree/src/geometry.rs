// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry queries: root-relative bounds and hit testing.

use kurbo::{Point, Rect};

use crate::error::TreeError;
use crate::matrix::Matrix4;
use crate::tree::Tree;
use crate::types::{NodeId, StateFlags};

/// Bounds of a node in root coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ResolvedBounds {
    /// The node's rectangle in root coordinates; clipped by its ancestors
    /// when clipping was requested.
    pub rect: Rect,
    /// True if the ancestors' rectangles clip the node away entirely.
    pub offscreen: bool,
}

fn has_area(rect: Rect) -> bool {
    rect.width() > 0.0 && rect.height() > 0.0
}

impl Tree {
    /// Resolve the bounds of `id` in root coordinates.
    ///
    /// The node's rectangle is mapped through its own transform and then
    /// through every ancestor's transform up to and including the root's. On
    /// the way up, a copy is intersected with each ancestor's rectangle; that
    /// copy is returned when `clip` is true. Ancestors without area do not clip.
    ///
    /// `offscreen` is reported either way. A node whose rectangle maps to
    /// infinity under some perspective transform is offscreen with an empty
    /// rectangle.
    pub fn relative_to_tree_bounds(
        &self,
        id: NodeId,
        clip: bool,
    ) -> Result<ResolvedBounds, TreeError> {
        let node = self.node(id).ok_or(TreeError::NotInTree(id))?;
        let mut rect = node.transform.transform_rect_bbox(node.bounds);
        let mut clipped = rect;
        let mut current = id;
        while let Some(parent_id) = self.parent(current) {
            let parent = self.node(parent_id).ok_or(TreeError::NotInTree(id))?;
            if has_area(parent.bounds) {
                clipped = clipped.map(|r| r.intersect(parent.bounds));
            }
            rect = rect.and_then(|r| parent.transform.transform_rect_bbox(r));
            clipped = clipped.and_then(|r| parent.transform.transform_rect_bbox(r));
            current = parent_id;
        }
        let (Some(rect), Some(clipped)) = (rect, clipped) else {
            return Ok(ResolvedBounds {
                rect: Rect::ZERO,
                offscreen: true,
            });
        };
        let offscreen = has_area(rect) && !has_area(clipped);
        Ok(ResolvedBounds {
            rect: if clip { clipped } else { rect },
            offscreen,
        })
    }

    /// Transform from `id`'s coordinates into root coordinates.
    pub fn transform_to_root(&self, id: NodeId) -> Result<Matrix4, TreeError> {
        let mut transform = self.node(id).ok_or(TreeError::NotInTree(id))?.transform;
        let mut current = id;
        while let Some(parent_id) = self.parent(current) {
            let parent = self.node(parent_id).ok_or(TreeError::NotInTree(id))?;
            transform = parent.transform * transform;
            current = parent_id;
        }
        Ok(transform)
    }

    /// Find the deepest node whose root-relative bounds contain `pt`.
    ///
    /// Hidden nodes and their subtrees are skipped. Among overlapping siblings
    /// the one later in traversal order wins, since it is painted on top.
    pub fn hit_test(&self, pt: Point) -> Option<NodeId> {
        let hits = |id: NodeId| {
            self.node(id)
                .is_some_and(|n| !n.states.contains(StateFlags::HIDDEN))
                && self
                    .relative_to_tree_bounds(id, true)
                    .is_ok_and(|b| b.rect.contains(pt))
        };
        let mut best = hits(NodeId::ROOT).then_some(NodeId::ROOT);
        let mut current = NodeId::ROOT;
        while let Some(child) = self.children(current).iter().rev().copied().find(|&c| hits(c)) {
            best = Some(child);
            current = child;
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::NodeData;
    use crate::update::TreeUpdate;
    use alloc::vec;
    use alloc::vec::Vec;

    fn node(id: i32, children: &[i32], bounds: Rect, transform: Matrix4) -> NodeData {
        NodeData {
            child_ids: children.iter().copied().map(NodeId).collect(),
            bounds,
            transform,
            ..NodeData::new(NodeId(id))
        }
    }

    fn tree_of(nodes: Vec<NodeData>) -> Tree {
        let mut tree = Tree::new();
        tree.apply(TreeUpdate {
            nodes,
            tree_data: None,
        })
        .expect("valid update");
        tree
    }

    #[test]
    fn transforms_compose_to_root() {
        let tree = tree_of(vec![
            node(0, &[1], Rect::ZERO, Matrix4::IDENTITY),
            node(1, &[2], Rect::ZERO, Matrix4::translate(10.0, 10.0)),
            node(2, &[], Rect::new(0.0, 0.0, 5.0, 5.0), Matrix4::IDENTITY),
        ]);
        let b = tree.relative_to_tree_bounds(NodeId(2), true).unwrap();
        assert_eq!(b.rect, Rect::new(10.0, 10.0, 15.0, 15.0));
        assert!(!b.offscreen);
        let m = tree.transform_to_root(NodeId(2)).unwrap();
        assert_eq!(m, Matrix4::translate(10.0, 10.0));
    }

    #[test]
    fn ancestors_clip_and_report_offscreen() {
        let tree = tree_of(vec![
            node(0, &[1], Rect::new(0.0, 0.0, 100.0, 100.0), Matrix4::IDENTITY),
            node(
                1,
                &[2, 3],
                Rect::new(0.0, 0.0, 50.0, 50.0),
                Matrix4::translate(20.0, 0.0),
            ),
            node(2, &[], Rect::new(40.0, 0.0, 60.0, 10.0), Matrix4::IDENTITY),
            node(3, &[], Rect::new(200.0, 200.0, 210.0, 210.0), Matrix4::IDENTITY),
        ]);
        let clipped = tree.relative_to_tree_bounds(NodeId(2), true).unwrap();
        assert_eq!(clipped.rect, Rect::new(60.0, 0.0, 70.0, 10.0));
        assert!(!clipped.offscreen);
        let unclipped = tree.relative_to_tree_bounds(NodeId(2), false).unwrap();
        assert_eq!(unclipped.rect, Rect::new(60.0, 0.0, 80.0, 10.0));

        let gone = tree.relative_to_tree_bounds(NodeId(3), false).unwrap();
        assert!(gone.offscreen, "fully clipped node must be offscreen");
        assert_eq!(gone.rect, Rect::new(220.0, 200.0, 230.0, 210.0));
    }

    #[test]
    fn degenerate_perspective_is_offscreen() {
        // w = x - 2 for the child, so its right edge maps to infinity.
        let tree = tree_of(vec![
            node(0, &[1], Rect::new(0.0, 0.0, 100.0, 100.0), Matrix4::IDENTITY),
            node(
                1,
                &[],
                Rect::new(0.0, 0.0, 2.0, 2.0),
                Matrix4::from_3x3([1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 0.0, -2.0]),
            ),
        ]);
        for clip in [false, true] {
            let b = tree.relative_to_tree_bounds(NodeId(1), clip).unwrap();
            assert!(b.offscreen, "a rectangle reaching infinity is offscreen");
            assert_eq!(b.rect, Rect::ZERO);
        }
        assert_eq!(tree.hit_test(Point::new(1.0, 1.0)), Some(NodeId::ROOT));
    }

    #[test]
    fn missing_node_is_not_in_tree() {
        let tree = Tree::new();
        assert_eq!(
            tree.relative_to_tree_bounds(NodeId(7), false),
            Err(TreeError::NotInTree(NodeId(7)))
        );
    }

    #[test]
    fn hit_test_prefers_deepest_and_topmost() {
        let tree = tree_of(vec![
            node(0, &[1, 2], Rect::new(0.0, 0.0, 100.0, 100.0), Matrix4::IDENTITY),
            node(1, &[3], Rect::new(0.0, 0.0, 50.0, 50.0), Matrix4::IDENTITY),
            node(2, &[], Rect::new(25.0, 25.0, 75.0, 75.0), Matrix4::IDENTITY),
            node(3, &[], Rect::new(0.0, 0.0, 10.0, 10.0), Matrix4::IDENTITY),
        ]);
        assert_eq!(tree.hit_test(Point::new(5.0, 5.0)), Some(NodeId(3)));
        assert_eq!(tree.hit_test(Point::new(30.0, 30.0)), Some(NodeId(2)));
        assert_eq!(tree.hit_test(Point::new(90.0, 90.0)), Some(NodeId::ROOT));
        assert_eq!(tree.hit_test(Point::new(500.0, 5.0)), None);
    }
}
