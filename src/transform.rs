//! 2D affine transforms over homogeneous coordinates.
//!
//! A [`Transform`] is a 3x3 row-major matrix whose bottom row stays
//! `(0, 0, 1)`. Composition is ordinary matrix multiplication: `a * b` maps a
//! point through `b` first, then `a`. The scene walker therefore computes
//! `parent * local` when descending into an element.

use crate::geometry::Point;
use std::ops::Mul;

/// Affine 2D transform stored as a 3x3 row-major matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    m: [[f32; 3]; 3],
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };

    /// Build from the six affine coefficients.
    ///
    /// Maps `(x, y)` to `(a*x + b*y + c, d*x + e*y + f)`.
    #[must_use]
    pub const fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self {
            m: [[a, b, c], [d, e, f], [0.0, 0.0, 1.0]],
        }
    }

    /// Translation by `(tx, ty)`.
    #[must_use]
    pub const fn translate(tx: f32, ty: f32) -> Self {
        Self::new(1.0, 0.0, tx, 0.0, 1.0, ty)
    }

    /// Axis-aligned scale.
    #[must_use]
    pub const fn scale(sx: f32, sy: f32) -> Self {
        Self::new(sx, 0.0, 0.0, 0.0, sy, 0.0)
    }

    /// Counter-clockwise rotation by `radians` (clockwise on a y-down screen).
    #[must_use]
    pub fn rotate(radians: f32) -> Self {
        let (s, c) = radians.sin_cos();
        Self::new(c, -s, 0.0, s, c, 0.0)
    }

    /// Matrix entry at `(row, col)`.
    #[must_use]
    pub const fn get(&self, row: usize, col: usize) -> f32 {
        self.m[row][col]
    }

    /// Map a point through the transform.
    #[must_use]
    pub fn apply(&self, p: Point) -> Point {
        let m = &self.m;
        Point::new(
            m[0][0] * p.x + m[0][1] * p.y + m[0][2],
            m[1][0] * p.x + m[1][1] * p.y + m[1][2],
        )
    }

    /// Compose `self` after `other`: the result maps through `other` first.
    #[must_use]
    pub fn then_after(&self, other: &Self) -> Self {
        let mut out = [[0.0f32; 3]; 3];
        for (r, row) in out.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                *cell = (0..3).map(|k| self.m[r][k] * other.m[k][c]).sum();
            }
        }
        Self { m: out }
    }
}

impl Mul for Transform {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        self.then_after(&rhs)
    }
}

impl Mul<Point> for Transform {
    type Output = Point;

    fn mul(self, rhs: Point) -> Point {
        self.apply(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_point_eq(a: Point, b: Point) {
        assert_relative_eq!(a.x, b.x, epsilon = 1e-4);
        assert_relative_eq!(a.y, b.y, epsilon = 1e-4);
    }

    #[test]
    fn test_identity() {
        let p = Point::new(3.5, -2.0);
        assert_eq!(Transform::IDENTITY.apply(p), p);
        assert_eq!(Transform::default(), Transform::IDENTITY);
    }

    #[test]
    fn test_translate_and_scale() {
        let p = Point::new(1.0, 2.0);
        assert_point_eq(Transform::translate(10.0, 20.0) * p, Point::new(11.0, 22.0));
        assert_point_eq(Transform::scale(2.0, 3.0) * p, Point::new(2.0, 6.0));
    }

    #[test]
    fn test_composition_order() {
        // scale first, then translate
        let t = Transform::translate(10.0, 0.0) * Transform::scale(2.0, 2.0);
        assert_point_eq(t * Point::new(1.0, 1.0), Point::new(12.0, 2.0));

        // translate first, then scale
        let t = Transform::scale(2.0, 2.0) * Transform::translate(10.0, 0.0);
        assert_point_eq(t * Point::new(1.0, 1.0), Point::new(22.0, 2.0));
    }

    #[test]
    fn test_composition_associative() {
        let a = Transform::translate(3.0, -1.0);
        let b = Transform::rotate(0.3);
        let c = Transform::scale(1.5, 0.5);
        let p = Point::new(2.0, 7.0);
        assert_point_eq(((a * b) * c) * p, (a * (b * c)) * p);
        assert_point_eq((a * b * c) * p, a * (b * (c * p)));
    }

    #[test]
    fn test_bottom_row_preserved() {
        let t = Transform::rotate(1.0) * Transform::translate(4.0, 5.0) * Transform::scale(2.0, 3.0);
        assert_eq!(t.get(2, 0), 0.0);
        assert_eq!(t.get(2, 1), 0.0);
        assert_eq!(t.get(2, 2), 1.0);
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let t = Transform::rotate(std::f32::consts::FRAC_PI_2);
        assert_point_eq(t * Point::new(1.0, 0.0), Point::new(0.0, 1.0));
    }
}
