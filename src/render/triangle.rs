//! Triangle scan conversion by adaptive subdivision.
//!
//! Coverage is decided per sample with a half-space test at the sample
//! center. The adaptive path splits the triangle's sample-space bounding box
//! along its longer axis, accepting blocks whose four extreme sample centers
//! are all inside, rejecting blocks the triangle cannot touch, and scanning
//! small leaves exhaustively. Both shortcuts are conservative, so the covered
//! set always equals [`covered_spans_exhaustive`] over the same bounds.
//!
//! The subdivision itself is pure: it returns row [`Span`]s, and only
//! [`rasterize_triangle`] writes to the [`SampleBuffer`].

use crate::color::Color;
use crate::geometry::Point;
use crate::sample_buffer::SampleBuffer;
use serde::{Deserialize, Serialize};

/// Tolerance of the half-space sign test.
const EDGE_EPSILON: f64 = 1e-20;

/// Relative safety margin for trivial accept, scaled by the squared extent.
const ACCEPT_MARGIN: f64 = 1e-10;

/// Outset of a block's sample-center hull when testing for contact.
const TOUCH_MARGIN: f64 = 1e-6;

/// How triangle coverage is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriangleStrategy {
    /// Recursive subdivision with trivial accept/reject.
    #[default]
    Adaptive,
    /// Test every sample in the bounding box.
    Exhaustive,
}

/// A triangle in device (pixel) coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// First vertex.
    pub a: Point,
    /// Second vertex.
    pub b: Point,
    /// Third vertex.
    pub c: Point,
}

impl Triangle {
    /// Create a triangle from three vertices in either winding.
    #[must_use]
    pub const fn new(a: Point, b: Point, c: Point) -> Self {
        Self { a, b, c }
    }

    /// Half-space test of a device-space point.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        EdgeFunctions::new(self, 1).contains(f64::from(p.x), f64::from(p.y))
    }

    fn is_finite(&self) -> bool {
        [self.a, self.b, self.c]
            .iter()
            .all(|p| p.x.is_finite() && p.y.is_finite())
    }
}

/// Half-open rectangle of sample indices: `[x0, x1) x [y0, y1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SampleRect {
    /// First column.
    pub x0: i64,
    /// First row.
    pub y0: i64,
    /// One past the last column.
    pub x1: i64,
    /// One past the last row.
    pub y1: i64,
}

impl SampleRect {
    /// Width in samples.
    #[must_use]
    pub const fn width(&self) -> i64 {
        self.x1 - self.x0
    }

    /// Height in samples.
    #[must_use]
    pub const fn height(&self) -> i64 {
        self.y1 - self.y0
    }

    /// Whether the rectangle holds no samples.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.x1 <= self.x0 || self.y1 <= self.y0
    }

    /// Number of samples.
    #[must_use]
    pub const fn area(&self) -> i64 {
        if self.is_empty() {
            0
        } else {
            self.width() * self.height()
        }
    }

    /// Split at the midpoint of the longer axis.
    fn split(&self) -> (Self, Self) {
        if self.width() >= self.height() {
            let mid = self.x0 + self.width() / 2;
            (Self { x1: mid, ..*self }, Self { x0: mid, ..*self })
        } else {
            let mid = self.y0 + self.height() / 2;
            (Self { y1: mid, ..*self }, Self { y0: mid, ..*self })
        }
    }
}

/// A run of covered samples on one sample row: `[x0, x1)` at `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Sample row.
    pub y: i64,
    /// First covered column.
    pub x0: i64,
    /// One past the last covered column.
    pub x1: i64,
}

/// Edge functions of a triangle scaled into sample space.
struct EdgeFunctions {
    v: [(f64, f64); 3],
    accept_margin: f64,
}

impl EdgeFunctions {
    fn new(tri: &Triangle, rate: u32) -> Self {
        let r = f64::from(rate);
        let v = [tri.a, tri.b, tri.c].map(|p| (f64::from(p.x) * r, f64::from(p.y) * r));
        let extent = v
            .iter()
            .fold(1.0f64, |m, &(x, y)| m.max(x.abs()).max(y.abs()));
        Self {
            v,
            accept_margin: ACCEPT_MARGIN * extent * extent,
        }
    }

    #[inline]
    fn edges(&self, px: f64, py: f64) -> [f64; 3] {
        let [(x0, y0), (x1, y1), (x2, y2)] = self.v;
        [
            (px - x0) * (y1 - y0) - (py - y0) * (x1 - x0),
            (px - x1) * (y2 - y1) - (py - y1) * (x2 - x1),
            (px - x2) * (y0 - y2) - (py - y2) * (x0 - x2),
        ]
    }

    /// All three edge values non-negative, or all non-positive.
    #[inline]
    fn contains(&self, px: f64, py: f64) -> bool {
        let e = self.edges(px, py);
        e.iter().all(|&v| v >= -EDGE_EPSILON) || e.iter().all(|&v| v <= EDGE_EPSILON)
    }

    /// Every sample center of `rect` is inside, with margin to spare.
    fn contains_rect(&self, rect: &SampleRect) -> bool {
        let (lx, hx) = (rect.x0 as f64 + 0.5, rect.x1 as f64 - 0.5);
        let (ly, hy) = (rect.y0 as f64 + 0.5, rect.y1 as f64 - 0.5);
        let corners = [(lx, ly), (hx, ly), (lx, hy), (hx, hy)].map(|(x, y)| self.edges(x, y));
        let m = self.accept_margin;
        corners.iter().all(|e| e.iter().all(|&v| v >= m))
            || corners.iter().all(|e| e.iter().all(|&v| v <= -m))
    }

    /// Whether the triangle can reach any sample center of `rect`.
    fn touches_rect(&self, rect: &SampleRect) -> bool {
        let lx = rect.x0 as f64 + 0.5 - TOUCH_MARGIN;
        let hx = rect.x1 as f64 - 0.5 + TOUCH_MARGIN;
        let ly = rect.y0 as f64 + 0.5 - TOUCH_MARGIN;
        let hy = rect.y1 as f64 - 0.5 + TOUCH_MARGIN;

        // A vertex inside the block
        if self
            .v
            .iter()
            .any(|&(x, y)| lx <= x && x <= hx && ly <= y && y <= hy)
        {
            return true;
        }

        // An edge crossing one of the block's sides
        for i in 0..3 {
            let a = self.v[i];
            let b = self.v[(i + 1) % 3];
            if crosses_horizontal(a, b, ly, lx, hx)
                || crosses_horizontal(a, b, hy, lx, hx)
                || crosses_vertical(a, b, lx, ly, hy)
                || crosses_vertical(a, b, hx, ly, hy)
            {
                return true;
            }
        }

        // The block entirely inside the triangle
        self.contains(lx, ly)
    }
}

/// Segment `a-b` meets the horizontal segment at `y` spanning `[x_lo, x_hi]`.
fn crosses_horizontal(a: (f64, f64), b: (f64, f64), y: f64, x_lo: f64, x_hi: f64) -> bool {
    let (da, db) = (a.1 - y, b.1 - y);
    if da * db > 0.0 {
        return false;
    }
    if a.1 == b.1 {
        return a.0.max(b.0) >= x_lo && a.0.min(b.0) <= x_hi;
    }
    let x = a.0 + (y - a.1) * (b.0 - a.0) / (b.1 - a.1);
    x_lo <= x && x <= x_hi
}

/// Segment `a-b` meets the vertical segment at `x` spanning `[y_lo, y_hi]`.
fn crosses_vertical(a: (f64, f64), b: (f64, f64), x: f64, y_lo: f64, y_hi: f64) -> bool {
    crosses_horizontal((a.1, a.0), (b.1, b.0), x, y_lo, y_hi)
}

/// Sample-space bounding box of a triangle, outset by half a pixel and
/// clamped to a `width x height` pixel target at `rate`.
///
/// Non-finite vertices produce an empty rectangle.
#[must_use]
pub fn sample_bounds(tri: &Triangle, width: u32, height: u32, rate: u32) -> SampleRect {
    if !tri.is_finite() {
        return SampleRect::default();
    }
    let xs = [tri.a.x, tri.b.x, tri.c.x].map(f64::from);
    let ys = [tri.a.y, tri.b.y, tri.c.y].map(f64::from);
    let min = |v: [f64; 3]| v[0].min(v[1]).min(v[2]);
    let max = |v: [f64; 3]| v[0].max(v[1]).max(v[2]);

    let r = f64::from(rate);
    let grid_w = i64::from(width) * i64::from(rate);
    let grid_h = i64::from(height) * i64::from(rate);
    let lo = |v: f64, limit: i64| ((v - 0.5).max(0.0) * r).floor().min(limit as f64) as i64;
    let hi = |v: f64, limit: i64| ((v + 0.5) * r).ceil().clamp(0.0, limit as f64) as i64;

    SampleRect {
        x0: lo(min(xs), grid_w),
        y0: lo(min(ys), grid_h),
        x1: hi(max(xs), grid_w),
        y1: hi(max(ys), grid_h),
    }
}

/// Reference coverage: test every sample of `bounds`.
#[must_use]
pub fn covered_spans_exhaustive(tri: &Triangle, bounds: SampleRect, rate: u32) -> Vec<Span> {
    let mut spans = Vec::new();
    if bounds.is_empty() || !tri.is_finite() {
        return spans;
    }
    let edges = EdgeFunctions::new(tri, rate);
    scan(&edges, &bounds, &mut spans);
    spans
}

/// Adaptive coverage by recursive subdivision of `bounds`.
///
/// Blocks of at most `leaf_area` square pixels are scanned sample by sample.
#[must_use]
pub fn covered_spans(tri: &Triangle, bounds: SampleRect, rate: u32, leaf_area: f32) -> Vec<Span> {
    let mut spans = Vec::new();
    if bounds.is_empty() || !tri.is_finite() {
        return spans;
    }
    let edges = EdgeFunctions::new(tri, rate);
    let leaf_samples = (f64::from(leaf_area) * f64::from(rate * rate)).max(1.0);
    subdivide(&edges, bounds, leaf_samples, &mut spans);
    spans
}

fn subdivide(edges: &EdgeFunctions, rect: SampleRect, leaf_samples: f64, spans: &mut Vec<Span>) {
    if rect.is_empty() {
        return;
    }
    if edges.contains_rect(&rect) {
        spans.extend((rect.y0..rect.y1).map(|y| Span {
            y,
            x0: rect.x0,
            x1: rect.x1,
        }));
        return;
    }
    if !edges.touches_rect(&rect) {
        return;
    }
    if rect.area() as f64 <= leaf_samples || (rect.width() <= 1 && rect.height() <= 1) {
        scan(edges, &rect, spans);
        return;
    }
    let (first, second) = rect.split();
    subdivide(edges, first, leaf_samples, spans);
    subdivide(edges, second, leaf_samples, spans);
}

fn scan(edges: &EdgeFunctions, rect: &SampleRect, spans: &mut Vec<Span>) {
    for y in rect.y0..rect.y1 {
        let cy = y as f64 + 0.5;
        let mut run_start = None;
        for x in rect.x0..rect.x1 {
            let inside = edges.contains(x as f64 + 0.5, cy);
            match (inside, run_start) {
                (true, None) => run_start = Some(x),
                (false, Some(x0)) => {
                    spans.push(Span { y, x0, x1: x });
                    run_start = None;
                }
                _ => {}
            }
        }
        if let Some(x0) = run_start {
            spans.push(Span { y, x0, x1: rect.x1 });
        }
    }
}

/// Rasterize a filled triangle into the sample buffer.
pub fn rasterize_triangle(
    buf: &mut SampleBuffer,
    tri: &Triangle,
    color: Color,
    strategy: TriangleStrategy,
    leaf_area: f32,
) {
    let rate = buf.rate();
    let bounds = sample_bounds(tri, buf.width(), buf.height(), rate);
    let spans = match strategy {
        TriangleStrategy::Adaptive => covered_spans(tri, bounds, rate, leaf_area),
        TriangleStrategy::Exhaustive => covered_spans_exhaustive(tri, bounds, rate),
    };
    for span in spans {
        for x in span.x0..span.x1 {
            buf.composite(x, span.y, color);
        }
    }
}

/// Expand spans into a sorted list of sample coordinates.
#[must_use]
pub fn span_samples(spans: &[Span]) -> Vec<(i64, i64)> {
    let mut samples: Vec<(i64, i64)> = spans
        .iter()
        .flat_map(|s| (s.x0..s.x1).map(move |x| (x, s.y)))
        .collect();
    samples.sort_unstable();
    samples
}
