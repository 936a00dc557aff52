//! Rasterization of primitives into a [`SampleBuffer`](crate::sample_buffer::SampleBuffer).
//!
//! # Algorithms
//!
//! - **Adaptive triangle subdivision**: recursive block accept/reject over a
//!   half-space coverage test at sample centers
//! - **Major-axis line stepping**: thin single-sample lines, optionally with
//!   Wu style two-pixel coverage
//! - **Quad strokes**: wide or multi-sampled lines as two triangles
//! - **Ear clipping**: concave polygon fill
//!
//! # References
//!
//! - Pineda, J. (1988). "A Parallel Algorithm for Polygon Rasterization." SIGGRAPH '88.
//! - Wu, X. (1991). "An Efficient Antialiasing Technique." SIGGRAPH '91.

pub mod image;
pub mod primitives;
pub mod triangle;
pub mod triangulate;

pub use image::{rasterize_image, ImageFilter};
pub use primitives::{rasterize_line, rasterize_point, Stroke, TriangleOptions};
pub use triangle::{
    covered_spans, covered_spans_exhaustive, rasterize_triangle, sample_bounds, SampleRect, Span,
    Triangle, TriangleStrategy,
};
pub use triangulate::triangulate;
