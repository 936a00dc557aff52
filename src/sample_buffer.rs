//! Multi-sample framebuffer.
//!
//! Stores `rate x rate` RGBA8 samples per output pixel. Samples are laid out
//! row-major over the full supersampled grid, so the samples of one pixel are
//! nested inside the pixel's row:
//!
//! ```text
//! index = 4 * ((px * rate + sx) + (py * rate + sy) * width * rate)
//! ```
//!
//! Every rasterization path writes through [`SampleBuffer::composite`]; the
//! only consumer is [`SampleBuffer::resolve`].

use crate::color::{Color, Rgba};
use crate::error::{Error, Result};
use crate::framebuffer::Framebuffer;

/// Largest supported linear supersampling factor.
pub const MAX_SAMPLE_RATE: u32 = 16;

/// Supersampled RGBA8 buffer owned by the renderer.
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    /// Output width in pixels.
    width: u32,
    /// Output height in pixels.
    height: u32,
    /// Linear supersampling factor.
    rate: u32,
    samples: Vec<u8>,
}

impl SampleBuffer {
    /// Allocate a buffer for a `width x height` target at the given rate,
    /// cleared to opaque white.
    ///
    /// # Errors
    ///
    /// Returns an error for zero dimensions or a rate outside
    /// `1..=MAX_SAMPLE_RATE`.
    pub fn new(width: u32, height: u32, rate: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }
        if rate == 0 || rate > MAX_SAMPLE_RATE {
            return Err(Error::InvalidSampleRate(rate));
        }

        let len = 4 * (width as usize * rate as usize) * (height as usize * rate as usize);
        Ok(Self {
            width,
            height,
            rate,
            samples: vec![255; len],
        })
    }

    /// Output width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Output height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Linear supersampling factor.
    #[must_use]
    pub const fn rate(&self) -> u32 {
        self.rate
    }

    /// Width of the sample grid.
    #[must_use]
    pub const fn sample_width(&self) -> u32 {
        self.width * self.rate
    }

    /// Height of the sample grid.
    #[must_use]
    pub const fn sample_height(&self) -> u32 {
        self.height * self.rate
    }

    /// Reset every byte to 255 (opaque white).
    pub fn clear(&mut self) {
        self.samples.fill(255);
    }

    /// Raw sample bytes.
    #[must_use]
    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    /// Read one sample, or `None` outside the sample grid.
    #[must_use]
    pub fn get_sample(&self, x: i64, y: i64) -> Option<Rgba> {
        let idx = self.sample_index(x, y)?;
        Some(Rgba::from_array([
            self.samples[idx],
            self.samples[idx + 1],
            self.samples[idx + 2],
            self.samples[idx + 3],
        ]))
    }

    /// Composite `color` over the sample at `(x, y)` in sample coordinates.
    ///
    /// Straight-alpha "over": color channels become `a*src + (1-a)*dst`, the
    /// alpha channel becomes `a + (1-a)*dst_a`. Writes outside the grid are
    /// dropped.
    #[inline]
    pub fn composite(&mut self, x: i64, y: i64, color: Color) {
        let Some(idx) = self.sample_index(x, y) else {
            return;
        };

        let a = color.a.clamp(0.0, 1.0);
        let inv = 1.0 - a;
        let px = &mut self.samples[idx..idx + 4];
        let blend = |src: f32, dst: u8| -> u8 {
            (src.clamp(0.0, 1.0) * 255.0 * a + f32::from(dst) * inv)
                .round()
                .clamp(0.0, 255.0) as u8
        };

        px[0] = blend(color.r, px[0]);
        px[1] = blend(color.g, px[1]);
        px[2] = blend(color.b, px[2]);
        px[3] = (a * 255.0 + f32::from(px[3]) * inv).round().clamp(0.0, 255.0) as u8;
    }

    /// Composite `color` into every sample of output pixel `(px, py)`.
    pub fn composite_pixel(&mut self, px: i64, py: i64, color: Color) {
        if px < 0 || py < 0 || px >= i64::from(self.width) || py >= i64::from(self.height) {
            return;
        }
        let rate = i64::from(self.rate);
        for sy in 0..rate {
            for sx in 0..rate {
                self.composite(px * rate + sx, py * rate + sy, color);
            }
        }
    }

    /// Average each pixel's samples into `target`.
    ///
    /// Color channels are averaged, then un-premultiplied by the averaged
    /// alpha. Output alpha is always 255. A pixel whose averaged alpha is zero
    /// cannot be un-premultiplied and is emitted as opaque white; the count of
    /// such pixels is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if `target` does not match this buffer's dimensions.
    pub fn resolve(&self, target: &mut Framebuffer) -> Result<usize> {
        if target.width() != self.width || target.height() != self.height {
            return Err(Error::TargetMismatch {
                expected_width: self.width,
                expected_height: self.height,
                width: target.width(),
                height: target.height(),
            });
        }

        let rate = self.rate as usize;
        let count = (rate * rate) as f32;
        let row_samples = self.sample_width() as usize;
        let out = target.pixels_mut();
        let mut zero_alpha = 0;

        for py in 0..self.height as usize {
            for px in 0..self.width as usize {
                let mut sum = [0u32; 4];
                for sy in 0..rate {
                    let row_start = 4 * ((py * rate + sy) * row_samples + px * rate);
                    for chunk in self.samples[row_start..row_start + 4 * rate].chunks_exact(4) {
                        for (acc, &v) in sum.iter_mut().zip(chunk) {
                            *acc += u32::from(v);
                        }
                    }
                }

                let alpha = sum[3] as f32 / count;
                let dst = 4 * (py * self.width as usize + px);
                if alpha <= 0.0 {
                    zero_alpha += 1;
                    out[dst..dst + 4].copy_from_slice(&Rgba::WHITE.to_array());
                    continue;
                }

                for c in 0..3 {
                    let avg = sum[c] as f32 / count;
                    out[dst + c] = (avg * 255.0 / alpha).round().min(255.0) as u8;
                }
                out[dst + 3] = 255;
            }
        }

        if zero_alpha > 0 {
            log::warn!("resolve: {zero_alpha} pixel(s) had zero alpha, emitted as background");
        }
        Ok(zero_alpha)
    }

    #[inline]
    fn sample_index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= i64::from(self.sample_width()) || y >= i64::from(self.sample_height()) {
            return None;
        }
        Some(4 * (x as usize + y as usize * self.sample_width() as usize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_cleared_to_white() {
        let buf = SampleBuffer::new(4, 3, 2).unwrap();
        assert_eq!(buf.sample_width(), 8);
        assert_eq!(buf.sample_height(), 6);
        assert_eq!(buf.samples().len(), 4 * 8 * 6);
        assert!(buf.samples().iter().all(|&b| b == 255));
    }

    #[test]
    fn test_invalid_construction() {
        assert!(SampleBuffer::new(0, 10, 1).is_err());
        assert!(SampleBuffer::new(10, 10, 0).is_err());
        assert!(SampleBuffer::new(10, 10, MAX_SAMPLE_RATE + 1).is_err());
        assert!(SampleBuffer::new(10, 10, MAX_SAMPLE_RATE).is_ok());
    }

    #[test]
    fn test_addressing_nests_samples_in_pixel_rows() {
        let mut buf = SampleBuffer::new(3, 2, 2).unwrap();
        // pixel (1, 1), sub-sample (1, 0)
        let (x, y) = (1 * 2 + 1, 1 * 2 + 0);
        buf.composite(x, y, Color::BLACK);
        let idx = 4 * (x as usize + y as usize * 3 * 2);
        assert_eq!(&buf.samples()[idx..idx + 4], &[0, 0, 0, 255]);
    }

    #[test]
    fn test_out_of_bounds_dropped() {
        let mut buf = SampleBuffer::new(2, 2, 2).unwrap();
        buf.composite(-1, 0, Color::BLACK);
        buf.composite(0, 4, Color::BLACK);
        buf.composite(4, 0, Color::BLACK);
        buf.composite_pixel(2, 0, Color::BLACK);
        assert!(buf.samples().iter().all(|&b| b == 255));
        assert_eq!(buf.get_sample(4, 0), None);
    }

    #[test]
    fn test_opaque_composite_replaces() {
        let mut buf = SampleBuffer::new(1, 1, 1).unwrap();
        buf.composite(0, 0, Color::new(0.2, 0.4, 0.6, 1.0));
        assert_eq!(buf.get_sample(0, 0), Some(Color::new(0.2, 0.4, 0.6, 1.0).to_rgba()));
        buf.composite(0, 0, Color::BLUE);
        assert_eq!(buf.get_sample(0, 0), Some(Rgba::BLUE));
    }

    #[test]
    fn test_zero_alpha_composite_is_noop() {
        let mut buf = SampleBuffer::new(1, 1, 1).unwrap();
        buf.composite(0, 0, Color::new(0.3, 0.3, 0.3, 1.0));
        let before = buf.get_sample(0, 0);
        buf.composite(0, 0, Color::RED.with_alpha(0.0));
        assert_eq!(buf.get_sample(0, 0), before);
    }

    #[test]
    fn test_half_alpha_over_white() {
        let mut buf = SampleBuffer::new(1, 1, 1).unwrap();
        buf.composite(0, 0, Color::RED.with_alpha(0.5));
        let s = buf.get_sample(0, 0).unwrap();
        assert_eq!(s.r, 255);
        assert_eq!(s.g, 128);
        assert_eq!(s.b, 128);
        assert_eq!(s.a, 255);
    }

    #[test]
    fn test_composite_pixel_fills_all_samples() {
        let mut buf = SampleBuffer::new(2, 2, 3).unwrap();
        buf.composite_pixel(1, 0, Color::BLACK);
        for sy in 0..3 {
            for sx in 0..3 {
                assert_eq!(buf.get_sample(3 + sx, sy), Some(Rgba::BLACK));
                assert_eq!(buf.get_sample(sx, sy), Some(Rgba::WHITE));
            }
        }
    }

    #[test]
    fn test_resolve_uniform_color_is_exact() {
        for rate in 1..=4 {
            let mut buf = SampleBuffer::new(3, 2, rate).unwrap();
            let c = Color::from(Rgba::new(13, 200, 77, 255));
            for y in 0..2 {
                for x in 0..3 {
                    buf.composite_pixel(x, y, c);
                }
            }
            let mut fb = Framebuffer::new(3, 2).unwrap();
            assert_eq!(buf.resolve(&mut fb).unwrap(), 0);
            for y in 0..2 {
                for x in 0..3 {
                    assert_eq!(fb.get_pixel(x, y), Some(Rgba::new(13, 200, 77, 255)));
                }
            }
        }
    }

    #[test]
    fn test_resolve_averages_samples() {
        let mut buf = SampleBuffer::new(1, 1, 2).unwrap();
        buf.composite(0, 0, Color::BLACK);
        buf.composite(1, 1, Color::BLACK);
        let mut fb = Framebuffer::new(1, 1).unwrap();
        buf.resolve(&mut fb).unwrap();
        let px = fb.get_pixel(0, 0).unwrap();
        assert!(px.r == 127 || px.r == 128);
        assert_eq!(px.a, 255);
    }

    #[test]
    fn test_resolve_zero_alpha_falls_back_to_background() {
        let mut buf = SampleBuffer::new(2, 1, 1).unwrap();
        buf.samples[0..4].copy_from_slice(&[10, 20, 30, 0]);
        let mut fb = Framebuffer::new(2, 1).unwrap();
        fb.pixels_mut().fill(0);
        assert_eq!(buf.resolve(&mut fb).unwrap(), 1);
        assert_eq!(fb.get_pixel(0, 0), Some(Rgba::WHITE));
        assert_eq!(fb.get_pixel(1, 0), Some(Rgba::WHITE));
    }

    #[test]
    fn test_resolve_rejects_mismatched_target() {
        let buf = SampleBuffer::new(2, 2, 1).unwrap();
        let mut fb = Framebuffer::new(3, 2).unwrap();
        assert!(buf.resolve(&mut fb).is_err());
    }

    #[test]
    fn test_clear_restores_white() {
        let mut buf = SampleBuffer::new(2, 2, 2).unwrap();
        buf.composite_pixel(0, 0, Color::BLACK);
        buf.clear();
        assert!(buf.samples().iter().all(|&b| b == 255));
    }
}
