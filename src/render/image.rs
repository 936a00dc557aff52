//! Textured rectangle drawing.

use crate::color::Color;
use crate::geometry::{BoundingBox, Point};
use crate::sample_buffer::SampleBuffer;
use crate::texture::{Texture, TextureSampler};
use serde::{Deserialize, Serialize};

/// Texture filter used for image elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFilter {
    /// Nearest texel of the base level.
    Nearest,
    /// Bilinear on the base level.
    Bilinear,
    /// Trilinear across mip levels when minifying, bilinear otherwise.
    #[default]
    Trilinear,
}

/// Texels per pixel along each axis when mapping `tex` onto a
/// `width x height` pixel rectangle.
#[must_use]
pub fn minification(tex: &Texture, width: f32, height: f32) -> f32 {
    ((tex.width as f32 * tex.height as f32) / (width * height)).sqrt()
}

/// Draw `tex` stretched over the axis-aligned device rectangle spanned by
/// `p0` and `p1`.
///
/// Every target pixel whose center lies inside the rectangle receives one
/// filtered texel composited over all of its samples. Degenerate rectangles
/// draw nothing.
pub fn rasterize_image(
    buf: &mut SampleBuffer,
    p0: Point,
    p1: Point,
    tex: &Texture,
    sampler: &dyn TextureSampler,
    filter: ImageFilter,
) {
    let bbox = BoundingBox::from_corners(p0, p1);
    let (w, h) = (bbox.width(), bbox.height());
    if !(w > 0.0 && h > 0.0 && w.is_finite() && h.is_finite()) {
        return;
    }

    let scale = minification(tex, w, h);
    let (x0, y0) = (bbox.min.x, bbox.min.y);

    let first = |lo: f32| (lo - 0.5).ceil().max(0.0) as i64;
    let last = |hi: f32, limit: u32| ((hi - 0.5).floor() as i64).min(i64::from(limit) - 1);

    for j in first(y0)..=last(bbox.max.y, buf.height()) {
        let v = (j as f32 + 0.5 - y0) / h;
        for i in first(x0)..=last(bbox.max.x, buf.width()) {
            let u = (i as f32 + 0.5 - x0) / w;
            let color = sample(tex, sampler, filter, u, v, scale);
            buf.composite_pixel(i, j, color);
        }
    }
}

fn sample(
    tex: &Texture,
    sampler: &dyn TextureSampler,
    filter: ImageFilter,
    u: f32,
    v: f32,
    scale: f32,
) -> Color {
    match filter {
        ImageFilter::Nearest => sampler.sample_nearest(tex, u, v, 0),
        ImageFilter::Bilinear => sampler.sample_bilinear(tex, u, v, 0),
        ImageFilter::Trilinear if scale > 1.0 => sampler.sample_trilinear(tex, u, v, scale, scale),
        ImageFilter::Trilinear => sampler.sample_bilinear(tex, u, v, 0),
    }
}
