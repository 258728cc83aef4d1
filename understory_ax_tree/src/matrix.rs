// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A 4×4 transform for node geometry.
//!
//! Node transforms arrive as full 4×4 matrices so that producers can describe
//! perspective. Points are treated as column vectors `(x, y, 0, 1)` and the
//! result is divided by `w` when the bottom row is not affine. Points that
//! land at `w == 0` have no image and are reported as `None`.

use kurbo::{Affine, Point, Rect};

/// Row-major 4×4 transform mapping a node's coordinates into its parent's.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Matrix4 {
    /// Rows of the matrix; `rows[r][c]`.
    pub rows: [[f64; 4]; 4],
}

impl Default for Matrix4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix4 {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        rows: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// Create a matrix from its rows.
    pub const fn from_rows(rows: [[f64; 4]; 4]) -> Self {
        Self { rows }
    }

    /// A 2D translation.
    pub const fn translate(x: f64, y: f64) -> Self {
        Self::from_rows([
            [1.0, 0.0, 0.0, x],
            [0.0, 1.0, 0.0, y],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// A 2D scale about the origin.
    pub const fn scale(sx: f64, sy: f64) -> Self {
        Self::from_rows([
            [sx, 0.0, 0.0, 0.0],
            [0.0, sy, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Build a matrix from a 3×3 homogeneous 2D transform, the layout used by
    /// most embedder APIs: scale/skew/translate rows plus a perspective row.
    pub const fn from_3x3(
        [scale_x, skew_x, trans_x]: [f64; 3],
        [skew_y, scale_y, trans_y]: [f64; 3],
        [pers0, pers1, pers2]: [f64; 3],
    ) -> Self {
        Self::from_rows([
            [scale_x, skew_x, 0.0, trans_x],
            [skew_y, scale_y, 0.0, trans_y],
            [0.0, 0.0, 1.0, 0.0],
            [pers0, pers1, 0.0, pers2],
        ])
    }

    /// True if this is exactly the identity.
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Map a 2D point, dividing by `w` when needed.
    ///
    /// Returns `None` when the point maps to infinity (`w == 0`) or to a
    /// non-finite position.
    pub fn transform_point(&self, pt: Point) -> Option<Point> {
        let r = &self.rows;
        let x = r[0][0] * pt.x + r[0][1] * pt.y + r[0][3];
        let y = r[1][0] * pt.x + r[1][1] * pt.y + r[1][3];
        let w = r[3][0] * pt.x + r[3][1] * pt.y + r[3][3];
        if w == 0.0 {
            return None;
        }
        let mapped = if w == 1.0 {
            Point::new(x, y)
        } else {
            Point::new(x / w, y / w)
        };
        mapped.is_finite().then_some(mapped)
    }

    /// Transform an axis-aligned `Rect` and return a conservative axis-aligned
    /// bounding box in the target space.
    ///
    /// `None` if any corner has no finite image.
    pub fn transform_rect_bbox(&self, rect: Rect) -> Option<Rect> {
        let p0 = self.transform_point(Point::new(rect.x0, rect.y0))?;
        let p1 = self.transform_point(Point::new(rect.x1, rect.y0))?;
        let p2 = self.transform_point(Point::new(rect.x0, rect.y1))?;
        let p3 = self.transform_point(Point::new(rect.x1, rect.y1))?;
        let min_x = p0.x.min(p1.x).min(p2.x).min(p3.x);
        let min_y = p0.y.min(p1.y).min(p2.y).min(p3.y);
        let max_x = p0.x.max(p1.x).max(p2.x).max(p3.x);
        let max_y = p0.y.max(p1.y).max(p2.y).max(p3.y);
        Some(Rect::new(min_x, min_y, max_x, max_y))
    }
}

impl From<Affine> for Matrix4 {
    fn from(affine: Affine) -> Self {
        let [a, b, c, d, e, f] = affine.as_coeffs();
        Self::from_rows([
            [a, c, 0.0, e],
            [b, d, 0.0, f],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }
}

impl core::ops::Mul for Matrix4 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let mut rows = [[0.0; 4]; 4];
        for (r, row) in rows.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                *cell = (0..4).map(|k| self.rows[r][k] * rhs.rows[k][c]).sum();
            }
        }
        Self { rows }
    }
}
