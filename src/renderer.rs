//! Scene renderer.
//!
//! [`SoftwareRenderer`] owns the multi-sample buffer, the texture sampler and
//! the view transform. Each [`SoftwareRenderer::draw`] clears the samples,
//! walks the scene depth-first composing transforms, optionally outlines the
//! canvas, and resolves into the caller's [`Framebuffer`].

use crate::color::Color;
use crate::config::{PolylineMode, RenderConfig};
use crate::error::{Error, Result};
use crate::framebuffer::Framebuffer;
use crate::geometry::Point;
use crate::render::{
    rasterize_image, rasterize_line, rasterize_point, rasterize_triangle, triangulate, Stroke,
    Triangle, TriangleOptions,
};
use crate::sample_buffer::{SampleBuffer, MAX_SAMPLE_RATE};
use crate::scene::{Element, Scene, Shape};
use crate::texture::{MipSampler, TextureSampler};
use crate::transform::Transform;
use crate::viewport::Viewport;

/// CPU renderer for [`Scene`]s.
pub struct SoftwareRenderer {
    config: RenderConfig,
    samples: Option<SampleBuffer>,
    sampler: Box<dyn TextureSampler>,
    view: Transform,
}

impl std::fmt::Debug for SoftwareRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoftwareRenderer")
            .field("config", &self.config)
            .field("target", &self.target_size())
            .field("view", &self.view)
            .finish_non_exhaustive()
    }
}

impl Default for SoftwareRenderer {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

impl SoftwareRenderer {
    /// Create a renderer with no render target yet.
    ///
    /// An out-of-range `sample_rate` in `config` is clamped into range.
    #[must_use]
    pub fn new(mut config: RenderConfig) -> Self {
        config.sample_rate = config.sample_rate.clamp(1, MAX_SAMPLE_RATE);
        Self {
            config,
            samples: None,
            sampler: Box::new(MipSampler::new()),
            view: Transform::IDENTITY,
        }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Current supersampling factor.
    #[must_use]
    pub const fn sample_rate(&self) -> u32 {
        self.config.sample_rate
    }

    /// Pixel size of the render target, if one is set.
    #[must_use]
    pub fn target_size(&self) -> Option<(u32, u32)> {
        self.samples.as_ref().map(|s| (s.width(), s.height()))
    }

    /// The sample buffer of the last draw.
    #[must_use]
    pub const fn samples(&self) -> Option<&SampleBuffer> {
        self.samples.as_ref()
    }

    /// Current view transform.
    #[must_use]
    pub const fn view_transform(&self) -> Transform {
        self.view
    }

    /// Change the supersampling factor, reallocating the sample buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSampleRate`] if `rate` is 0 or above
    /// [`MAX_SAMPLE_RATE`]; the previous rate is kept.
    pub fn set_sample_rate(&mut self, rate: u32) -> Result<()> {
        if !(1..=MAX_SAMPLE_RATE).contains(&rate) {
            log::warn!("rejecting sample rate {rate}");
            return Err(Error::InvalidSampleRate(rate));
        }
        if let Some((width, height)) = self.target_size() {
            self.samples = Some(SampleBuffer::new(width, height, rate)?);
        }
        self.config.sample_rate = rate;
        Ok(())
    }

    /// Set the pixel size of the render target, reallocating the sample buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] for a zero dimension; the previous
    /// target is kept.
    pub fn set_render_target(&mut self, width: u32, height: u32) -> Result<()> {
        self.samples = Some(SampleBuffer::new(width, height, self.config.sample_rate)?);
        Ok(())
    }

    /// Replace the texture sampler used for images.
    pub fn set_texture_sampler(&mut self, sampler: Box<dyn TextureSampler>) {
        self.sampler = sampler;
    }

    /// Set the transform applied on top of every element transform.
    pub fn set_view_transform(&mut self, view: Transform) {
        self.view = view;
    }

    /// Set the view transform from a viewport and the current target size.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoRenderTarget`] if no target has been set.
    pub fn set_viewport(&mut self, viewport: &Viewport) -> Result<()> {
        let (width, height) = self.target_size().ok_or(Error::NoRenderTarget)?;
        self.view = viewport.svg_to_screen(width, height);
        Ok(())
    }

    /// Render `scene` into `target`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoRenderTarget`] if no target was set, or
    /// [`Error::TargetMismatch`] if `target` differs from the configured size.
    pub fn draw(&mut self, scene: &Scene, target: &mut Framebuffer) -> Result<()> {
        let Some(samples) = self.samples.as_mut() else {
            log::warn!("draw called without a render target");
            return Err(Error::NoRenderTarget);
        };
        if (target.width(), target.height()) != (samples.width(), samples.height()) {
            log::warn!(
                "framebuffer {}x{} does not match render target {}x{}",
                target.width(),
                target.height(),
                samples.width(),
                samples.height()
            );
            return Err(Error::TargetMismatch {
                expected_width: samples.width(),
                expected_height: samples.height(),
                width: target.width(),
                height: target.height(),
            });
        }

        log::debug!(
            "drawing {} elements on {}x{} canvas into {}x{} target at {}x sampling",
            scene.element_count(),
            scene.width,
            scene.height,
            samples.width(),
            samples.height(),
            samples.rate()
        );

        samples.clear();
        let mut walker = SceneWalker {
            samples: &mut *samples,
            sampler: &*self.sampler,
            config: &self.config,
            stroke: self.config.line_stroke(),
            triangles: self.config.triangle_options(),
        };
        for element in &scene.elements {
            walker.draw_element(element, &self.view);
        }
        if self.config.canvas_outline {
            walker.draw_canvas_outline(scene, &self.view);
        }

        samples.resolve(target)?;
        Ok(())
    }

    /// Render `scene` into a freshly allocated framebuffer of the target size.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoRenderTarget`] if no target was set.
    pub fn render(&mut self, scene: &Scene) -> Result<Framebuffer> {
        let (width, height) = self.target_size().ok_or(Error::NoRenderTarget)?;
        let mut fb = Framebuffer::new(width, height)?;
        self.draw(scene, &mut fb)?;
        Ok(fb)
    }
}

/// Depth-first scene traversal. The accumulated transform is passed down
/// explicitly, so siblings always see their parent's transform.
struct SceneWalker<'a> {
    samples: &'a mut SampleBuffer,
    sampler: &'a dyn TextureSampler,
    config: &'a RenderConfig,
    stroke: Stroke,
    triangles: TriangleOptions,
}

impl SceneWalker<'_> {
    fn draw_element(&mut self, element: &Element, parent: &Transform) {
        let t = *parent * element.transform;
        let style = element.style;

        match &element.shape {
            Shape::Point { position } => {
                if style.fill.is_visible() {
                    let p = t * *position;
                    rasterize_point(self.samples, p.x, p.y, style.fill);
                }
            }
            Shape::Line { from, to } => {
                if style.stroke.is_visible() {
                    self.line(t * *from, t * *to, style.stroke);
                }
            }
            Shape::Polyline { points } => {
                if style.stroke.is_visible() {
                    let pts: Vec<Point> = points.iter().map(|&p| t * p).collect();
                    let closed = self.config.polyline == PolylineMode::Closed;
                    self.outline(&pts, closed, style.stroke);
                }
            }
            Shape::Rect {
                position,
                dimension,
            } => {
                let p0 = t * *position;
                let p1 = t * Point::new(position.x + dimension.x, position.y);
                let p2 = t * Point::new(position.x, position.y + dimension.y);
                let p3 = t * (*position + *dimension);
                if style.fill.is_visible() {
                    self.triangle(Triangle::new(p0, p1, p2), style.fill);
                    self.triangle(Triangle::new(p2, p1, p3), style.fill);
                }
                if style.stroke.is_visible() {
                    self.outline(&[p0, p1, p3, p2], true, style.stroke);
                }
            }
            Shape::Polygon { points } => {
                let pts: Vec<Point> = points.iter().map(|&p| t * p).collect();
                if style.fill.is_visible() {
                    for tri in triangulate(&pts) {
                        self.triangle(tri, style.fill);
                    }
                }
                if style.stroke.is_visible() {
                    self.outline(&pts, true, style.stroke);
                }
            }
            Shape::Ellipse { center, radius } => {
                log::trace!("skipping ellipse at ({}, {}) radius ({}, {})", center.x, center.y, radius.x, radius.y);
            }
            Shape::Image {
                position,
                dimension,
                texture,
            } => {
                let p0 = t * *position;
                let p1 = t * (*position + *dimension);
                rasterize_image(
                    self.samples,
                    p0,
                    p1,
                    texture,
                    self.sampler,
                    self.config.image_filter,
                );
            }
            Shape::Group { children } => {
                for child in children {
                    self.draw_element(child, &t);
                }
            }
        }
    }

    /// One-pixel black border just outside the canvas.
    fn draw_canvas_outline(&mut self, scene: &Scene, view: &Transform) {
        let a = *view * Point::ORIGIN + Point::new(-1.0, -1.0);
        let b = *view * Point::new(scene.width, 0.0) + Point::new(1.0, -1.0);
        let c = *view * Point::new(0.0, scene.height) + Point::new(-1.0, 1.0);
        let d = *view * Point::new(scene.width, scene.height) + Point::new(1.0, 1.0);

        self.line(a, b, Color::BLACK);
        self.line(a, c, Color::BLACK);
        self.line(d, b, Color::BLACK);
        self.line(d, c, Color::BLACK);
    }

    fn line(&mut self, from: Point, to: Point, color: Color) {
        rasterize_line(self.samples, from, to, color, &self.stroke, &self.triangles);
    }

    fn triangle(&mut self, tri: Triangle, color: Color) {
        rasterize_triangle(
            self.samples,
            &tri,
            color,
            self.triangles.strategy,
            self.triangles.leaf_area,
        );
    }

    fn outline(&mut self, points: &[Point], closed: bool, color: Color) {
        for pair in points.windows(2) {
            self.line(pair[0], pair[1], color);
        }
        if closed && points.len() > 2 {
            self.line(points[points.len() - 1], points[0], color);
        }
    }
}
