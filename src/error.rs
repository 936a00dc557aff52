//! Error types for softraster operations.

use std::io;
use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring or driving the rasterizer.
///
/// The rasterization hot path never produces these: out-of-bounds writes are
/// dropped and invalid texture lookups return [`Color::INVALID`]. Errors are
/// reserved for precondition violations reported once at call time.
///
/// [`Color::INVALID`]: crate::color::Color::INVALID
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error (file operations, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// PNG encoding error.
    #[error("PNG encoding error: {0}")]
    PngEncoding(#[from] png::EncodingError),

    /// Invalid dimensions for a framebuffer, sample buffer or texture.
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// Supersampling rate outside the supported range.
    #[error("Invalid sample rate: {0} (expected 1..={max})", max = crate::sample_buffer::MAX_SAMPLE_RATE)]
    InvalidSampleRate(u32),

    /// `draw` was called before `set_render_target`.
    #[error("No render target set")]
    NoRenderTarget,

    /// The buffer passed to `draw` does not match the configured render target.
    #[error("Render target mismatch: configured {expected_width}x{expected_height}, got {width}x{height}")]
    TargetMismatch {
        /// Configured width.
        expected_width: u32,
        /// Configured height.
        expected_height: u32,
        /// Width of the supplied buffer.
        width: u32,
        /// Height of the supplied buffer.
        height: u32,
    },

    /// Texel data does not match the declared texture dimensions.
    #[error("Invalid texture: {width}x{height} needs {expected} bytes, got {actual}")]
    InvalidTexture {
        /// Texture width.
        width: u32,
        /// Texture height.
        height: u32,
        /// Expected byte count (`4 * width * height`).
        expected: usize,
        /// Supplied byte count.
        actual: usize,
    },

    /// Mip level index outside the texture's chain.
    #[error("Invalid mip level {level} (texture has {levels} levels)")]
    InvalidMipLevel {
        /// Requested level.
        level: usize,
        /// Number of levels present.
        levels: usize,
    },

    /// Viewport parameters that cannot produce a transform.
    #[error("Invalid viewbox: {0}")]
    InvalidViewbox(String),

    /// Configuration parsing error with line number.
    #[error("configuration error at line {line}: {message}")]
    ConfigParse {
        /// Line number where the error occurred (1-indexed).
        line: usize,
        /// Error message describing the issue.
        message: String,
    },

    /// Configuration file not found.
    #[error("configuration file not found: {0}")]
    ConfigNotFound(String),

    /// Invalid configuration value.
    #[error("invalid configuration value for '{key}': {message}")]
    ConfigInvalid {
        /// The configuration key with invalid value.
        key: String,
        /// Error message describing why the value is invalid.
        message: String,
    },
}
