//! # softraster
//!
//! CPU rasterizer for 2D vector scenes.
//!
//! A [`Scene`](scene::Scene) of points, lines, polylines, rectangles,
//! polygons, images and nested groups is scan-converted into a
//! supersampled buffer, then box-filtered down into an RGBA8
//! [`Framebuffer`](framebuffer::Framebuffer) ready for an image encoder or a
//! display surface.
//!
//! ## Features
//!
//! - **Multi-sample anti-aliasing**: 1 to 16 samples per axis with straight
//!   alpha "over" compositing
//! - **Adaptive triangle coverage**: recursive subdivision with trivial
//!   accept/reject, equal to brute-force per-sample testing
//! - **Strokes**: thin major-axis lines (optionally Wu split) and quad strokes
//! - **Textures**: box-filtered mip chains, nearest / bilinear / trilinear
//!   sampling, built on [trueno](https://crates.io/crates/trueno) vectors
//! - **Viewport**: pan/zoom from SVG coordinates to screen pixels
//!
//! ## Quick Start
//!
//! ```rust
//! use softraster::prelude::*;
//!
//! let scene = Scene::new(64.0, 64.0).with_element(
//!     Element::rect(Point::new(8.0, 8.0), Point::new(48.0, 48.0)).with_fill(Color::RED),
//! );
//!
//! let mut renderer = SoftwareRenderer::new(RenderConfig::new());
//! renderer.set_render_target(64, 64)?;
//! let fb = renderer.render(&scene)?;
//! assert_eq!(fb.get_pixel(32, 32), Some(Rgba::RED));
//!
//! let png = PngEncoder::to_bytes(&fb)?;
//! assert!(!png.is_empty());
//! # Ok::<(), softraster::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli`: the `softraster-demo` binary (`clap`, `env_logger`)
//!
//! ## Academic References
//!
//! - Pineda, J. (1988). "A Parallel Algorithm for Polygon Rasterization." SIGGRAPH '88.
//! - Wu, X. (1991). "An Efficient Antialiasing Technique." SIGGRAPH '91.
//! - Williams, L. (1983). "Pyramidal Parametrics." SIGGRAPH '83.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
// Allow common patterns in graphics code
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Core Modules
// ============================================================================

/// Color types and conversions.
pub mod color;

/// Geometric primitives (points, bounding boxes).
pub mod geometry;

/// 2D affine transforms.
pub mod transform;

/// Output framebuffer.
pub mod framebuffer;

/// Multi-sample buffer with compositing and resolve.
pub mod sample_buffer;

/// Textures, mip chains and samplers.
pub mod texture;

// ============================================================================
// Rendering Modules
// ============================================================================

pub mod render;

/// Scene description.
pub mod scene;

/// Scene renderer.
pub mod renderer;

/// Pan/zoom viewport.
pub mod viewport;

/// Renderer configuration.
pub mod config;

/// Output encoders.
pub mod output;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for softraster operations.
pub mod error;

pub use error::{Error, Result};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and traits for convenient imports.
///
/// ```rust
/// use softraster::prelude::*;
/// ```
pub mod prelude {
    pub use crate::color::{Color, Rgba};
    pub use crate::config::{PolylineMode, RenderConfig};
    pub use crate::error::{Error, Result};
    pub use crate::framebuffer::Framebuffer;
    pub use crate::geometry::{BoundingBox, Point};
    pub use crate::output::PngEncoder;
    pub use crate::render::{ImageFilter, TriangleStrategy};
    pub use crate::renderer::SoftwareRenderer;
    pub use crate::sample_buffer::SampleBuffer;
    pub use crate::scene::{Element, Scene, Shape, Style};
    pub use crate::texture::{MipSampler, Texture, TextureSampler};
    pub use crate::transform::Transform;
    pub use crate::viewport::Viewport;
}

// ============================================================================
// Re-exports
// ============================================================================

/// Re-export trueno for direct access to SIMD operations.
pub use trueno;
