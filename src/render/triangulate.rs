//! Polygon triangulation by ear clipping.

use crate::geometry::Point;
use crate::render::triangle::Triangle;

/// Split a simple polygon into triangles.
///
/// Works for convex and concave outlines in either winding. Collinear
/// vertices are dropped without emitting a triangle. Self-intersecting input
/// still terminates: when no ear can be found, the remaining vertices are
/// fanned from the first one.
#[must_use]
pub fn triangulate(points: &[Point]) -> Vec<Triangle> {
    let mut idx: Vec<usize> = (0..points.len()).collect();
    idx.dedup_by(|a, b| points[*a] == points[*b]);
    if idx.len() > 1 && points[idx[0]] == points[idx[idx.len() - 1]] {
        idx.pop();
    }

    let mut out = Vec::with_capacity(idx.len().saturating_sub(2));
    if idx.len() < 3 {
        return out;
    }

    let orientation = signed_area(points, &idx).signum();

    while idx.len() > 3 {
        let n = idx.len();
        let mut clipped = false;
        for i in 0..n {
            let (prev, cur, next) = (
                points[idx[(i + n - 1) % n]],
                points[idx[i]],
                points[idx[(i + 1) % n]],
            );
            let turn = (cur - prev).cross(next - cur);
            if turn == 0.0 {
                idx.remove(i);
                clipped = true;
                break;
            }
            if turn * orientation < 0.0 {
                continue;
            }
            let ear = Triangle::new(prev, cur, next);
            let blocked = idx.iter().enumerate().any(|(k, &v)| {
                k != i && k != (i + n - 1) % n && k != (i + 1) % n && ear.contains(points[v])
            });
            if !blocked {
                out.push(ear);
                idx.remove(i);
                clipped = true;
                break;
            }
        }

        if !clipped {
            log::trace!("no ear among {} vertices, fanning remainder", idx.len());
            let anchor = points[idx[0]];
            out.extend(
                idx.windows(2)
                    .skip(1)
                    .map(|w| Triangle::new(anchor, points[w[0]], points[w[1]])),
            );
            return out;
        }
    }

    let last = Triangle::new(points[idx[0]], points[idx[1]], points[idx[2]]);
    if (last.b - last.a).cross(last.c - last.a) != 0.0 {
        out.push(last);
    }
    out
}

/// Twice the signed area of the polygon `idx` indexes into.
fn signed_area(points: &[Point], idx: &[usize]) -> f32 {
    let n = idx.len();
    (0..n)
        .map(|i| points[idx[i]].cross(points[idx[(i + 1) % n]]))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area(t: &Triangle) -> f32 {
        ((t.b - t.a).cross(t.c - t.a) / 2.0).abs()
    }

    fn pts(v: &[(f32, f32)]) -> Vec<Point> {
        v.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(triangulate(&[]).is_empty());
        assert!(triangulate(&pts(&[(0.0, 0.0), (1.0, 1.0)])).is_empty());
        assert!(triangulate(&pts(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)])).is_empty());
    }

    #[test]
    fn test_square_both_windings() {
        let cw = pts(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]);
        let mut ccw = cw.clone();
        ccw.reverse();
        for poly in [cw, ccw] {
            let tris = triangulate(&poly);
            assert_eq!(tris.len(), 2);
            let total: f32 = tris.iter().map(area).sum();
            assert!((total - 16.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_concave_l_shape() {
        // L: 3x3 square minus its top-right 2x2
        let poly = pts(&[
            (0.0, 0.0),
            (1.0, 0.0),
            (1.0, 2.0),
            (3.0, 2.0),
            (3.0, 3.0),
            (0.0, 3.0),
        ]);
        let tris = triangulate(&poly);
        assert_eq!(tris.len(), 4);
        let total: f32 = tris.iter().map(area).sum();
        assert!((total - 5.0).abs() < 1e-4);
        // the notch stays empty
        assert!(!tris.iter().any(|t| t.contains(Point::new(2.0, 1.0))));
    }

    #[test]
    fn test_closing_duplicate_and_collinear() {
        let poly = pts(&[
            (0.0, 0.0),
            (2.0, 0.0),
            (4.0, 0.0),
            (4.0, 4.0),
            (4.0, 4.0),
            (0.0, 4.0),
            (0.0, 0.0),
        ]);
        let tris = triangulate(&poly);
        let total: f32 = tris.iter().map(area).sum();
        assert!((total - 16.0).abs() < 1e-4);
        assert!(tris.iter().all(|t| area(t) > 0.0));
    }

    #[test]
    fn test_self_intersecting_terminates() {
        let bowtie = pts(&[(0.0, 0.0), (4.0, 4.0), (4.0, 0.0), (0.0, 4.0)]);
        let tris = triangulate(&bowtie);
        assert!(!tris.is_empty());
    }
}
