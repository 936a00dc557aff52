//! Point and line rasterization.
//!
//! Lines take one of two paths. Thin lines on a single-sample target are
//! stepped along their major axis one pixel at a time, optionally with Wu
//! style coverage split across the two nearest pixels. Everything else is
//! drawn as a quad of two triangles around the segment, which gives wide
//! strokes and multi-sampled targets real coverage.

use crate::color::Color;
use crate::geometry::Point;
use crate::render::triangle::{rasterize_triangle, Triangle, TriangleStrategy};
use crate::sample_buffer::SampleBuffer;

/// Half-widths below this are not drawn.
pub const MIN_HALF_WIDTH: f32 = 0.5;

/// Half-widths at or above this always use the quad path.
pub const THIN_HALF_WIDTH: f32 = 1.0;

/// Stroke geometry and quality for a line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    /// Half-width at the start point.
    pub start_half_width: f32,
    /// Half-width at the end point.
    pub end_half_width: f32,
    /// Distribute coverage between neighbouring pixels on the thin path.
    pub antialias: bool,
}

impl Stroke {
    /// A stroke with the same half-width at both ends.
    #[must_use]
    pub const fn uniform(half_width: f32, antialias: bool) -> Self {
        Self {
            start_half_width: half_width,
            end_half_width: half_width,
            antialias,
        }
    }
}

impl Default for Stroke {
    fn default() -> Self {
        Self::uniform(0.6, false)
    }
}

/// Triangle settings used by quad strokes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleOptions {
    /// Coverage strategy.
    pub strategy: TriangleStrategy,
    /// Leaf block area in square pixels.
    pub leaf_area: f32,
}

impl Default for TriangleOptions {
    fn default() -> Self {
        Self {
            strategy: TriangleStrategy::Adaptive,
            leaf_area: 16.0,
        }
    }
}

// ============================================================================
// Point Drawing
// ============================================================================

/// Composite `color` over every sample of the pixel containing `(x, y)`.
///
/// Points off the target are ignored.
pub fn rasterize_point(buf: &mut SampleBuffer, x: f32, y: f32, color: Color) {
    if !(x.is_finite() && y.is_finite()) {
        return;
    }
    buf.composite_pixel(x.floor() as i64, y.floor() as i64, color);
}

// ============================================================================
// Line Drawing
// ============================================================================

/// Rasterize the segment `p0-p1`.
///
/// Strokes with both half-widths under [`MIN_HALF_WIDTH`] draw nothing. A
/// zero-length thin line draws nothing.
pub fn rasterize_line(
    buf: &mut SampleBuffer,
    p0: Point,
    p1: Point,
    color: Color,
    stroke: &Stroke,
    triangles: &TriangleOptions,
) {
    let (w0, w1) = (stroke.start_half_width, stroke.end_half_width);
    if w0 < MIN_HALF_WIDTH && w1 < MIN_HALF_WIDTH {
        return;
    }

    if w0 >= THIN_HALF_WIDTH || w1 >= THIN_HALF_WIDTH || buf.rate() > 1 {
        rasterize_quad_line(buf, p0, p1, color, w0, w1, triangles);
    } else {
        rasterize_thin_line(buf, p0, p1, color, stroke.antialias);
    }
}

/// Draw the segment as two triangles offset along its normal.
fn rasterize_quad_line(
    buf: &mut SampleBuffer,
    p0: Point,
    p1: Point,
    color: Color,
    w0: f32,
    w1: f32,
    triangles: &TriangleOptions,
) {
    let (p0, p1, w0, w1) = if p0.x > p1.x {
        (p1, p0, w1, w0)
    } else {
        (p0, p1, w0, w1)
    };

    let theta = (p1.y - p0.y).atan2(p1.x - p0.x);
    let (s, c) = theta.sin_cos();
    let normal = Point::new(s, -c);

    let p00 = p0 + normal * w0;
    let p01 = p0 - normal * w0;
    let p10 = p1 + normal * w1;
    let p11 = p1 - normal * w1;

    let TriangleOptions {
        strategy,
        leaf_area,
    } = *triangles;
    rasterize_triangle(buf, &Triangle::new(p00, p01, p10), color, strategy, leaf_area);
    rasterize_triangle(buf, &Triangle::new(p11, p01, p10), color, strategy, leaf_area);
}

/// Step one pixel at a time along the major axis.
fn rasterize_thin_line(buf: &mut SampleBuffer, p0: Point, p1: Point, color: Color, antialias: bool) {
    let dx = p1.x - p0.x;
    let dy = p1.y - p0.y;
    if !(dx.is_finite() && dy.is_finite()) || (dx == 0.0 && dy == 0.0) {
        return;
    }

    let steep = dy.abs() > dx.abs();

    // Work in (major, minor) coordinates
    let (a0, b0, a1, b1) = if steep {
        (p0.y, p0.x, p1.y, p1.x)
    } else {
        (p0.x, p0.y, p1.x, p1.y)
    };
    let (a0, b0, a1) = if a0 > a1 { (a1, b1, a0) } else { (a0, b0, a1) };
    let gradient = if steep { dx / dy } else { dy / dx };

    // Skip whole steps that fall before the target, stop past its far edge
    let extent = if steep { buf.height() } else { buf.width() } as f32;
    let skip = (-1.0 - a0).max(0.0).floor();
    let end = a1.min(extent + 1.0);

    let mut major = a0 + skip;
    let mut minor = b0 + gradient * skip;
    while major < end {
        if antialias {
            plot_wu(buf, major, minor, steep, color);
        } else {
            plot(buf, major, minor, steep, color);
        }
        major += 1.0;
        minor += gradient;
    }
}

#[inline]
fn plot(buf: &mut SampleBuffer, major: f32, minor: f32, steep: bool, color: Color) {
    if steep {
        rasterize_point(buf, minor, major, color);
    } else {
        rasterize_point(buf, major, minor, color);
    }
}

/// Split coverage between the pixel holding `minor` and the neighbour on the
/// side of the pixel center it falls on.
#[inline]
fn plot_wu(buf: &mut SampleBuffer, major: f32, minor: f32, steep: bool, color: Color) {
    let offset = fpart(minor) - 0.5;
    let neighbour = if offset > 0.0 { minor + 1.0 } else { minor - 1.0 };
    let near = offset.abs();
    plot(buf, major, neighbour, steep, color.with_alpha(color.a * near));
    plot(buf, major, minor, steep, color.with_alpha(color.a * (1.0 - near)));
}

/// Fractional part of a float.
#[inline]
fn fpart(x: f32) -> f32 {
    x - x.floor()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;

    fn thin() -> Stroke {
        Stroke::uniform(0.6, false)
    }

    fn covered(buf: &SampleBuffer) -> usize {
        buf.samples().chunks_exact(4).filter(|s| *s != [255u8; 4]).count()
    }

    #[test]
    fn test_point_covers_pixel() {
        let mut buf = SampleBuffer::new(4, 4, 2).unwrap();
        rasterize_point(&mut buf, 1.7, 2.2, Color::RED);
        for sy in 4..6 {
            for sx in 2..4 {
                assert_eq!(buf.get_sample(sx, sy), Some(Rgba::RED));
            }
        }
        assert_eq!(covered(&buf), 4);
    }

    #[test]
    fn test_point_outside_ignored() {
        let mut buf = SampleBuffer::new(4, 4, 1).unwrap();
        rasterize_point(&mut buf, -0.5, 1.0, Color::RED);
        rasterize_point(&mut buf, 4.0, 1.0, Color::RED);
        rasterize_point(&mut buf, f32::NAN, 1.0, Color::RED);
        assert_eq!(covered(&buf), 0);
    }

    #[test]
    fn test_horizontal_thin_line() {
        let mut buf = SampleBuffer::new(10, 5, 1).unwrap();
        rasterize_line(
            &mut buf,
            Point::new(1.0, 2.5),
            Point::new(6.0, 2.5),
            Color::BLACK,
            &thin(),
            &TriangleOptions::default(),
        );
        for x in 1..6 {
            assert_eq!(buf.get_sample(x, 2), Some(Rgba::BLACK));
        }
        assert_eq!(buf.get_sample(6, 2), Some(Rgba::WHITE));
        assert_eq!(covered(&buf), 5);
    }

    #[test]
    fn test_reversed_line_same_pixels() {
        let mut a = SampleBuffer::new(10, 10, 1).unwrap();
        let mut b = SampleBuffer::new(10, 10, 1).unwrap();
        let opts = TriangleOptions::default();
        rasterize_line(&mut a, Point::new(1.0, 1.0), Point::new(8.0, 4.0), Color::BLACK, &thin(), &opts);
        rasterize_line(&mut b, Point::new(8.0, 4.0), Point::new(1.0, 1.0), Color::BLACK, &thin(), &opts);
        assert_eq!(a.samples(), b.samples());
    }

    #[test]
    fn test_steep_line_steps_rows() {
        let mut buf = SampleBuffer::new(5, 10, 1).unwrap();
        rasterize_line(
            &mut buf,
            Point::new(2.5, 1.0),
            Point::new(3.5, 8.0),
            Color::BLACK,
            &thin(),
            &TriangleOptions::default(),
        );
        // one pixel per row from 1 through 7
        assert_eq!(covered(&buf), 7);
        for y in 1..8 {
            let row_hits = (0..5).filter(|&x| buf.get_sample(x, y) == Some(Rgba::BLACK)).count();
            assert_eq!(row_hits, 1, "row {y}");
        }
    }

    #[test]
    fn test_zero_length_thin_line_draws_nothing() {
        let mut buf = SampleBuffer::new(4, 4, 1).unwrap();
        let p = Point::new(2.0, 2.0);
        rasterize_line(&mut buf, p, p, Color::BLACK, &thin(), &TriangleOptions::default());
        assert_eq!(covered(&buf), 0);
    }

    #[test]
    fn test_narrow_stroke_skipped() {
        let mut buf = SampleBuffer::new(8, 8, 1).unwrap();
        rasterize_line(
            &mut buf,
            Point::new(0.0, 0.0),
            Point::new(7.0, 7.0),
            Color::BLACK,
            &Stroke::uniform(0.4, false),
            &TriangleOptions::default(),
        );
        assert_eq!(covered(&buf), 0);
    }

    #[test]
    fn test_wide_stroke_uses_quad() {
        let mut buf = SampleBuffer::new(20, 20, 1).unwrap();
        rasterize_line(
            &mut buf,
            Point::new(2.0, 10.0),
            Point::new(18.0, 10.0),
            Color::BLACK,
            &Stroke::uniform(3.0, false),
            &TriangleOptions::default(),
        );
        // rows 7..13 between x = 2 and 18
        assert_eq!(buf.get_sample(10, 7), Some(Rgba::BLACK));
        assert_eq!(buf.get_sample(10, 12), Some(Rgba::BLACK));
        assert_eq!(buf.get_sample(10, 5), Some(Rgba::WHITE));
        assert_eq!(buf.get_sample(10, 14), Some(Rgba::WHITE));
        assert_eq!(buf.get_sample(0, 10), Some(Rgba::WHITE));
    }

    #[test]
    fn test_multisample_line_uses_quad() {
        let mut buf = SampleBuffer::new(10, 10, 4).unwrap();
        rasterize_line(
            &mut buf,
            Point::new(1.0, 5.0),
            Point::new(9.0, 5.0),
            Color::BLACK,
            &thin(),
            &TriangleOptions::default(),
        );
        // band of +-0.6 around y = 5 covers sample rows 18..22
        assert_eq!(buf.get_sample(20, 18), Some(Rgba::BLACK));
        assert_eq!(buf.get_sample(20, 21), Some(Rgba::BLACK));
        assert_eq!(buf.get_sample(20, 17), Some(Rgba::WHITE));
        assert_eq!(buf.get_sample(20, 22), Some(Rgba::WHITE));
    }

    #[test]
    fn test_antialiased_line_splits_coverage() {
        let mut buf = SampleBuffer::new(10, 5, 1).unwrap();
        rasterize_line(
            &mut buf,
            Point::new(1.0, 2.75),
            Point::new(8.0, 2.75),
            Color::BLACK,
            &Stroke::uniform(0.6, true),
            &TriangleOptions::default(),
        );
        // 75% in row 2, 25% in row 3
        let main = buf.get_sample(4, 2).unwrap();
        let side = buf.get_sample(4, 3).unwrap();
        assert_eq!(main.r, 64);
        assert_eq!(side.r, 191);
        assert_eq!(buf.get_sample(4, 1), Some(Rgba::WHITE));
    }

    #[test]
    fn test_long_offscreen_line_is_clipped() {
        let mut buf = SampleBuffer::new(10, 10, 1).unwrap();
        rasterize_line(
            &mut buf,
            Point::new(-1.0e9, 4.5),
            Point::new(1.0e9, 4.5),
            Color::BLACK,
            &thin(),
            &TriangleOptions::default(),
        );
        assert_eq!(covered(&buf), 10);
    }
}
