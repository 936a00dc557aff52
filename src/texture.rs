//! Textures, mip chains and filtered sampling.
//!
//! A [`Texture`] holds a chain of [`MipLevel`]s: level 0 is the base image and
//! each following level halves both dimensions (rounding down, never below
//! one). [`MipSampler`] builds the chain with a 2x2 box filter and answers
//! nearest, bilinear and trilinear lookups in normalized `(u, v)` space.
//!
//! Lookups never fail: an out-of-range level or coordinate yields
//! [`Color::INVALID`] (opaque magenta) so problems stay visible in the output.
//!
//! # SIMD Acceleration
//!
//! The box filter sums rows of texels with trueno vectors.

use crate::color::{Color, Rgba};
use crate::error::{Error, Result};
use trueno::Vector;

/// Upper bound on the number of levels in a mip chain (base included).
pub const MAX_MIP_LEVELS: usize = 14;

/// One resolution of a texture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MipLevel {
    /// Width in texels.
    pub width: u32,
    /// Height in texels.
    pub height: u32,
    /// RGBA8 texels, row-major, `4 * width * height` bytes.
    pub texels: Vec<u8>,
}

impl MipLevel {
    /// Read a texel. Coordinates must be in range.
    #[inline]
    fn texel(&self, x: u32, y: u32) -> Color {
        let i = 4 * (y as usize * self.width as usize + x as usize);
        Color::from(Rgba::from_array([
            self.texels[i],
            self.texels[i + 1],
            self.texels[i + 2],
            self.texels[i + 3],
        ]))
    }
}

/// A texture asset: base dimensions plus its mip chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    /// Base width in texels.
    pub width: u32,
    /// Base height in texels.
    pub height: u32,
    /// Level 0 is the base image.
    pub mipmap: Vec<MipLevel>,
}

impl Texture {
    /// Wrap raw RGBA8 bytes and build the box-filtered mip chain, ready for
    /// any filter.
    ///
    /// # Errors
    ///
    /// Returns an error for zero dimensions or when `texels` is not exactly
    /// `4 * width * height` bytes.
    pub fn from_rgba(width: u32, height: u32, texels: Vec<u8>) -> Result<Self> {
        let mut tex = Self::base_level(width, height, texels)?;
        MipSampler.generate_mips(&mut tex, 0)?;
        Ok(tex)
    }

    /// Wrap raw RGBA8 bytes as a single-level texture.
    ///
    /// Minified trilinear lookups need the chain; build it with
    /// [`TextureSampler::generate_mips`] before drawing.
    ///
    /// # Errors
    ///
    /// Returns an error for zero dimensions or when `texels` is not exactly
    /// `4 * width * height` bytes.
    pub fn base_level(width: u32, height: u32, texels: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }
        let expected = 4 * width as usize * height as usize;
        if texels.len() != expected {
            return Err(Error::InvalidTexture {
                width,
                height,
                expected,
                actual: texels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            mipmap: vec![MipLevel {
                width,
                height,
                texels,
            }],
        })
    }

    /// A texture filled with one color, with its mip chain built.
    ///
    /// # Errors
    ///
    /// Returns an error for zero dimensions.
    pub fn solid(width: u32, height: u32, color: Rgba) -> Result<Self> {
        let texels = color.to_array().repeat(width as usize * height as usize);
        Self::from_rgba(width, height, texels)
    }

    /// Number of levels currently in the chain.
    #[must_use]
    pub fn level_count(&self) -> usize {
        self.mipmap.len()
    }
}

/// Texture filtering used by image primitives.
pub trait TextureSampler {
    /// Rebuild every level above `start_level` from `start_level` downward.
    ///
    /// # Errors
    ///
    /// Returns an error if `start_level` is not present in the chain.
    fn generate_mips(&self, tex: &mut Texture, start_level: usize) -> Result<()>;

    /// Nearest-texel lookup at `level`.
    fn sample_nearest(&self, tex: &Texture, u: f32, v: f32, level: usize) -> Color;

    /// Bilinear lookup at `level`; texel centers sit at `(i + 0.5) / width`.
    fn sample_bilinear(&self, tex: &Texture, u: f32, v: f32, level: usize) -> Color;

    /// Trilinear lookup. `u_scale` and `v_scale` are texels per screen pixel
    /// along each axis; the larger one selects the fractional level.
    fn sample_trilinear(&self, tex: &Texture, u: f32, v: f32, u_scale: f32, v_scale: f32) -> Color;
}

/// Box-filtered mip chain sampler.
#[derive(Debug, Clone, Copy, Default)]
pub struct MipSampler;

impl MipSampler {
    /// Create a new sampler.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl TextureSampler for MipSampler {
    fn generate_mips(&self, tex: &mut Texture, start_level: usize) -> Result<()> {
        if start_level >= tex.mipmap.len() {
            log::warn!(
                "generate_mips: start level {start_level} out of range ({} levels)",
                tex.mipmap.len()
            );
            return Err(Error::InvalidMipLevel {
                level: start_level,
                levels: tex.mipmap.len(),
            });
        }

        let base = &tex.mipmap[start_level];
        let longest = base.width.max(base.height);
        let sub_levels = (longest.ilog2() as usize).min(MAX_MIP_LEVELS.saturating_sub(start_level + 1));
        tex.mipmap.truncate(start_level + 1);

        for _ in 0..sub_levels {
            let prev = &tex.mipmap[tex.mipmap.len() - 1];
            let next = downsample(prev);
            tex.mipmap.push(next);
        }

        log::debug!(
            "generate_mips: {}x{} -> {} levels",
            tex.width,
            tex.height,
            tex.mipmap.len()
        );
        Ok(())
    }

    fn sample_nearest(&self, tex: &Texture, u: f32, v: f32, level: usize) -> Color {
        let Some(mip) = tex.mipmap.get(level) else {
            return Color::INVALID;
        };
        if !in_unit_range(u) || !in_unit_range(v) {
            return Color::INVALID;
        }
        let x = ((u * mip.width as f32) as u32).min(mip.width - 1);
        let y = ((v * mip.height as f32) as u32).min(mip.height - 1);
        mip.texel(x, y)
    }

    fn sample_bilinear(&self, tex: &Texture, u: f32, v: f32, level: usize) -> Color {
        let Some(mip) = tex.mipmap.get(level) else {
            return Color::INVALID;
        };
        if !in_unit_range(u) || !in_unit_range(v) {
            return Color::INVALID;
        }

        let sx = u * mip.width as f32 - 0.5;
        let sy = v * mip.height as f32 - 0.5;
        let fx = sx.floor();
        let fy = sy.floor();
        let t = sx - fx;
        let s = sy - fy;

        let clamp_x = |x: f32| x.clamp(0.0, (mip.width - 1) as f32) as u32;
        let clamp_y = |y: f32| y.clamp(0.0, (mip.height - 1) as f32) as u32;
        let (x0, x1) = (clamp_x(fx), clamp_x(fx + 1.0));
        let (y0, y1) = (clamp_y(fy), clamp_y(fy + 1.0));

        let top = mip.texel(x0, y0).lerp(mip.texel(x1, y0), t);
        let bottom = mip.texel(x0, y1).lerp(mip.texel(x1, y1), t);
        top.lerp(bottom, s)
    }

    fn sample_trilinear(&self, tex: &Texture, u: f32, v: f32, u_scale: f32, v_scale: f32) -> Color {
        let scale = u_scale.max(v_scale);
        if scale.is_nan() {
            return Color::INVALID;
        }
        // Magnification: the base level is already the finest available.
        let level = if scale <= 1.0 { 0.0 } else { scale.log2() };
        if level >= tex.mipmap.len() as f32 {
            return Color::INVALID;
        }

        let lower = level.floor() as usize;
        let frac = level - lower as f32;
        let upper = (lower + 1).min(tex.mipmap.len() - 1);
        if upper == lower || frac == 0.0 {
            return self.sample_bilinear(tex, u, v, lower);
        }
        self.sample_bilinear(tex, u, v, lower)
            .lerp(self.sample_bilinear(tex, u, v, upper), frac)
    }
}

#[inline]
fn in_unit_range(c: f32) -> bool {
    (0.0..=1.0).contains(&c)
}

/// Halve a level with a 2x2 box filter. Odd edges reuse the last texel.
fn downsample(prev: &MipLevel) -> MipLevel {
    let width = (prev.width / 2).max(1);
    let height = (prev.height / 2).max(1);
    let row_len = 4 * width as usize;
    let mut texels = Vec::with_capacity(row_len * height as usize);

    let src_x = |x: u32| x.min(prev.width - 1) as usize;
    let src_y = |y: u32| y.min(prev.height - 1) as usize;
    let gather = |dx: u32, dy: u32, y: u32| -> Vec<f32> {
        let row = src_y(2 * y + dy) * prev.width as usize;
        (0..width)
            .flat_map(|x| {
                let i = 4 * (row + src_x(2 * x + dx));
                prev.texels[i..i + 4].iter().map(|&b| f32::from(b))
            })
            .collect()
    };

    for y in 0..height {
        let corners = [gather(0, 0, y), gather(1, 0, y), gather(0, 1, y), gather(1, 1, y)];
        let averaged = box_average(&corners, row_len);
        texels.extend(averaged.iter().map(|&v| v.round().clamp(0.0, 255.0) as u8));
    }

    MipLevel {
        width,
        height,
        texels,
    }
}

/// Average four equally sized rows element-wise.
fn box_average(corners: &[Vec<f32>; 4], len: usize) -> Vec<f32> {
    let [a, b, c, d] = corners;
    let va = Vector::from_vec(a.clone());
    let vb = Vector::from_vec(b.clone());
    let vc = Vector::from_vec(c.clone());
    let vd = Vector::from_vec(d.clone());
    let quarter = Vector::from_vec(vec![0.25; len]);

    let summed = va
        .add(&vb)
        .and_then(|ab| ab.add(&vc))
        .and_then(|abc| abc.add(&vd))
        .and_then(|sum| sum.mul(&quarter));

    match summed {
        Ok(result) => result.as_slice().to_vec(),
        Err(_) => (0..len).map(|i| (a[i] + b[i] + c[i] + d[i]) * 0.25).collect(),
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Each level halves both dimensions, never below one texel.
        #[test]
        fn prop_mip_dimensions_halve(width in 1u32..300, height in 1u32..300) {
            let mut tex = Texture::solid(width, height, Rgba::GREEN).unwrap();
            MipSampler::new().generate_mips(&mut tex, 0).unwrap();

            prop_assert!(tex.level_count() <= MAX_MIP_LEVELS);
            for pair in tex.mipmap.windows(2) {
                prop_assert_eq!(pair[1].width, (pair[0].width / 2).max(1));
                prop_assert_eq!(pair[1].height, (pair[0].height / 2).max(1));
            }
            let last = &tex.mipmap[tex.level_count() - 1];
            prop_assert_eq!((last.width, last.height), (1, 1));
        }

        /// Sampling a solid texture anywhere in range returns its color.
        #[test]
        fn prop_solid_texture_samples_exactly(
            u in 0.0f32..=1.0,
            v in 0.0f32..=1.0,
            scale in 0.1f32..40.0,
        ) {
            let color = Rgba::new(30, 60, 90, 255);
            let mut tex = Texture::solid(37, 21, color).unwrap();
            let sampler = MipSampler::new();
            sampler.generate_mips(&mut tex, 0).unwrap();

            let c = sampler.sample_trilinear(&tex, u, v, scale, scale);
            prop_assert_eq!(c.to_rgba(), color);
            prop_assert_eq!(sampler.sample_bilinear(&tex, u, v, 0).to_rgba(), color);
        }
    }
}
