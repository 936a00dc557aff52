//! YAML configuration for the renderer.
//!
//! Every key is optional; missing keys take the documented defaults.
//!
//! ```yaml
//! sample_rate: 4
//! stroke:
//!   half_width: 0.6
//!   antialias: false
//! polyline: open
//! image_filter: trilinear
//! triangle:
//!   strategy: adaptive
//!   leaf_area: 16.0
//! canvas_outline: true
//! ```

use crate::error::{Error, Result};
use crate::render::{ImageFilter, Stroke, TriangleOptions, TriangleStrategy};
use crate::sample_buffer::MAX_SAMPLE_RATE;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How polyline vertices are connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolylineMode {
    /// `n - 1` segments between consecutive points.
    #[default]
    Open,
    /// Also connect the last point back to the first.
    Closed,
}

/// Stroke settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeConfig {
    /// Half-width in device pixels at both endpoints.
    #[serde(default = "default_half_width")]
    pub half_width: f32,

    /// Wu style coverage split for thin single-sample lines.
    #[serde(default)]
    pub antialias: bool,
}

fn default_half_width() -> f32 {
    0.6
}

impl Default for StrokeConfig {
    fn default() -> Self {
        Self {
            half_width: default_half_width(),
            antialias: false,
        }
    }
}

/// Triangle coverage settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TriangleConfig {
    /// Coverage strategy.
    #[serde(default)]
    pub strategy: TriangleStrategy,

    /// Blocks at or below this many square pixels are scanned per sample.
    #[serde(default = "default_leaf_area")]
    pub leaf_area: f32,
}

fn default_leaf_area() -> f32 {
    16.0
}

impl Default for TriangleConfig {
    fn default() -> Self {
        Self {
            strategy: TriangleStrategy::default(),
            leaf_area: default_leaf_area(),
        }
    }
}

/// Renderer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Supersampling factor per axis.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Stroke settings.
    #[serde(default)]
    pub stroke: StrokeConfig,

    /// Polyline connectivity.
    #[serde(default)]
    pub polyline: PolylineMode,

    /// Texture filter for images.
    #[serde(default)]
    pub image_filter: ImageFilter,

    /// Triangle coverage settings.
    #[serde(default)]
    pub triangle: TriangleConfig,

    /// Draw a one-pixel black border just outside the canvas.
    #[serde(default = "default_canvas_outline")]
    pub canvas_outline: bool,
}

fn default_sample_rate() -> u32 {
    1
}

fn default_canvas_outline() -> bool {
    true
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            stroke: StrokeConfig::default(),
            polyline: PolylineMode::default(),
            image_filter: ImageFilter::default(),
            triangle: TriangleConfig::default(),
            canvas_outline: default_canvas_outline(),
        }
    }
}

impl RenderConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .map_err(|_| Error::ConfigNotFound(path.display().to_string()))?;

        Self::parse(&content)
    }

    /// Parses configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error with line number if parsing fails, or
    /// [`Error::ConfigInvalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml).map_err(|e| {
            let line = e.location().map(|l| l.line()).unwrap_or(0);
            Error::ConfigParse {
                line,
                message: e.to_string(),
            }
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration with fallback to defaults.
    #[must_use]
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            log::warn!("{e}; using default configuration");
            Self::default()
        })
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigInvalid`] naming the first offending key.
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_SAMPLE_RATE).contains(&self.sample_rate) {
            return Err(invalid(
                "sample_rate",
                format!("must be between 1 and {MAX_SAMPLE_RATE}, got {}", self.sample_rate),
            ));
        }
        let half_width = self.stroke.half_width;
        if !(half_width.is_finite() && half_width > 0.0) {
            return Err(invalid(
                "stroke.half_width",
                format!("must be a positive number, got {half_width}"),
            ));
        }
        let leaf_area = self.triangle.leaf_area;
        if !(leaf_area.is_finite() && leaf_area > 0.0) {
            return Err(invalid(
                "triangle.leaf_area",
                format!("must be a positive number, got {leaf_area}"),
            ));
        }
        Ok(())
    }

    /// Line stroke derived from `stroke`.
    #[must_use]
    pub fn line_stroke(&self) -> Stroke {
        Stroke::uniform(self.stroke.half_width, self.stroke.antialias)
    }

    /// Triangle options derived from `triangle`.
    #[must_use]
    pub fn triangle_options(&self) -> TriangleOptions {
        TriangleOptions {
            strategy: self.triangle.strategy,
            leaf_area: self.triangle.leaf_area,
        }
    }
}

fn invalid(key: &str, message: String) -> Error {
    Error::ConfigInvalid {
        key: key.to_string(),
        message,
    }
}
