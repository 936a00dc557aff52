//! Pan/zoom viewport over an SVG-style canvas.
//!
//! The viewport is a square window of half-extent `vspan` centered on
//! `(center_x, center_y)` in scene units. [`Viewport::svg_to_norm`] maps that
//! window onto the unit square, and [`Viewport::svg_to_screen`] scales the
//! unit square onto a pixel target.

use crate::error::{Error, Result};
use crate::transform::Transform;

/// Pan/zoom state and the transforms derived from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    center_x: f32,
    center_y: f32,
    vspan: f32,
}

impl Viewport {
    /// Create a viewport.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidViewbox`] for a non-positive or non-finite
    /// `vspan` or a non-finite center.
    pub fn new(center_x: f32, center_y: f32, vspan: f32) -> Result<Self> {
        validate(center_x, center_y, vspan)?;
        Ok(Self {
            center_x,
            center_y,
            vspan,
        })
    }

    /// A viewport that shows a whole `width x height` canvas.
    ///
    /// # Errors
    ///
    /// Returns an error if the canvas is empty or not finite.
    pub fn for_canvas(width: f32, height: f32) -> Result<Self> {
        Self::new(width / 2.0, height / 2.0, width.max(height) / 2.0)
    }

    /// Center of the window in scene units.
    #[must_use]
    pub const fn center(&self) -> (f32, f32) {
        (self.center_x, self.center_y)
    }

    /// Half-extent of the window in scene units.
    #[must_use]
    pub const fn vspan(&self) -> f32 {
        self.vspan
    }

    /// Replace the window.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidViewbox`] and leaves the viewport unchanged if
    /// the parameters are invalid.
    pub fn set_viewbox(&mut self, center_x: f32, center_y: f32, vspan: f32) -> Result<()> {
        *self = Self::new(center_x, center_y, vspan)?;
        Ok(())
    }

    /// Pan by `(-dx, -dy)` and multiply the span by `scale`.
    ///
    /// A `scale` above 1 zooms out.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidViewbox`] and leaves the viewport unchanged if
    /// the result would be invalid.
    pub fn update_viewbox(&mut self, dx: f32, dy: f32, scale: f32) -> Result<()> {
        self.set_viewbox(self.center_x - dx, self.center_y - dy, self.vspan * scale)
    }

    /// Map the window `[c - vspan, c + vspan]` onto `[0, 1]` on both axes.
    #[must_use]
    pub fn svg_to_norm(&self) -> Transform {
        let s = 1.0 / (2.0 * self.vspan);
        Transform::scale(s, s)
            * Transform::translate(-self.center_x + self.vspan, -self.center_y + self.vspan)
    }

    /// Map the window onto a `width x height` pixel target.
    #[must_use]
    pub fn svg_to_screen(&self, width: u32, height: u32) -> Transform {
        Transform::scale(width as f32, height as f32) * self.svg_to_norm()
    }
}

fn validate(center_x: f32, center_y: f32, vspan: f32) -> Result<()> {
    if !(center_x.is_finite() && center_y.is_finite()) {
        log::warn!("rejecting viewbox center ({center_x}, {center_y})");
        return Err(Error::InvalidViewbox(format!(
            "center ({center_x}, {center_y}) is not finite"
        )));
    }
    if !(vspan.is_finite() && vspan > 0.0) {
        log::warn!("rejecting viewbox span {vspan}");
        return Err(Error::InvalidViewbox(format!(
            "span must be positive and finite, got {vspan}"
        )));
    }
    Ok(())
}
