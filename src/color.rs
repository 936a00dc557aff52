//! Color types.
//!
//! [`Color`] is the floating-point paint and compositing operand used by every
//! rasterization path (straight, non-premultiplied alpha). [`Rgba`] is the
//! 8-bit pixel stored in output buffers and texels.

/// RGBA color with 8-bit components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(C)]
pub struct Rgba {
    /// Red component (0-255).
    pub r: u8,
    /// Green component (0-255).
    pub g: u8,
    /// Blue component (0-255).
    pub b: u8,
    /// Alpha component (0-255, 255 = fully opaque).
    pub a: u8,
}

impl Rgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    /// Opaque red.
    pub const RED: Self = Self::new(255, 0, 0, 255);
    /// Opaque green.
    pub const GREEN: Self = Self::new(0, 255, 0, 255);
    /// Opaque blue.
    pub const BLUE: Self = Self::new(0, 0, 255, 255);

    /// Create a new RGBA color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color (alpha = 255).
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Convert to array representation.
    #[must_use]
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Create from array representation.
    #[must_use]
    pub const fn from_array(arr: [u8; 4]) -> Self {
        Self::new(arr[0], arr[1], arr[2], arr[3])
    }
}

/// Floating-point color with straight alpha.
///
/// Components are nominally in `[0, 1]`. An alpha of exactly `0.0` in a
/// [`Style`](crate::scene::Style) channel means "skip this pass", not
/// "transparent paint".
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    /// Red (0.0-1.0).
    pub r: f32,
    /// Green (0.0-1.0).
    pub g: f32,
    /// Blue (0.0-1.0).
    pub b: f32,
    /// Alpha (0.0-1.0, 1.0 = fully opaque).
    pub a: f32,
}

impl Color {
    /// Fully transparent black. Used as the "no paint" style value.
    pub const NONE: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    /// Opaque red.
    pub const RED: Self = Self::new(1.0, 0.0, 0.0, 1.0);
    /// Opaque green.
    pub const GREEN: Self = Self::new(0.0, 1.0, 0.0, 1.0);
    /// Opaque blue.
    pub const BLUE: Self = Self::new(0.0, 0.0, 1.0, 1.0);
    /// Sentinel returned by texture lookups that cannot be answered.
    pub const INVALID: Self = Self::new(1.0, 0.0, 1.0, 1.0);

    /// Create a new color.
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color (alpha = 1.0).
    #[must_use]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Create a color with modified alpha.
    #[must_use]
    pub const fn with_alpha(self, a: f32) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// Whether this paint layer should be drawn at all.
    #[must_use]
    pub fn is_visible(self) -> bool {
        self.a != 0.0
    }

    /// Linear interpolation between two colors, all channels including alpha.
    ///
    /// `t` is not clamped; trilinear filtering relies on exact weights.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let inv_t = 1.0 - t;
        Self::new(
            self.r * inv_t + other.r * t,
            self.g * inv_t + other.g * t,
            self.b * inv_t + other.b * t,
            self.a * inv_t + other.a * t,
        )
    }

    /// Convert to 8-bit channels, clamping and rounding.
    #[must_use]
    pub fn to_rgba(self) -> Rgba {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        Rgba::new(q(self.r), q(self.g), q(self.b), q(self.a))
    }
}

impl From<Rgba> for Color {
    fn from(rgba: Rgba) -> Self {
        Self::new(
            f32::from(rgba.r) / 255.0,
            f32::from(rgba.g) / 255.0,
            f32::from(rgba.b) / 255.0,
            f32::from(rgba.a) / 255.0,
        )
    }
}

impl From<Color> for Rgba {
    fn from(color: Color) -> Self {
        color.to_rgba()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_constants() {
        assert_eq!(Rgba::BLACK, Rgba::rgb(0, 0, 0));
        assert_eq!(Rgba::WHITE, Rgba::rgb(255, 255, 255));
        assert_eq!(Rgba::RED.r, 255);
        assert_eq!(Rgba::GREEN.g, 255);
        assert_eq!(Rgba::BLUE.b, 255);
    }

    #[test]
    fn test_rgba_array_roundtrip() {
        let c = Rgba::new(1, 2, 3, 4);
        assert_eq!(Rgba::from_array(c.to_array()), c);
    }

    #[test]
    fn test_color_to_rgba() {
        assert_eq!(Color::RED.to_rgba(), Rgba::RED);
        assert_eq!(Color::new(0.5, 0.0, 0.0, 1.0).to_rgba().r, 128);
        // Out-of-range components clamp
        assert_eq!(Color::new(2.0, -1.0, 0.0, 1.0).to_rgba(), Rgba::RED);
    }

    #[test]
    fn test_color_from_rgba_exact_for_bytes() {
        for v in [0u8, 1, 17, 128, 254, 255] {
            let c = Color::from(Rgba::new(v, v, v, v));
            assert_eq!(c.to_rgba(), Rgba::new(v, v, v, v));
        }
    }

    #[test]
    fn test_color_lerp() {
        let mid = Color::BLACK.lerp(Color::WHITE, 0.5);
        assert!((mid.r - 0.5).abs() < 1e-6);
        assert!((mid.a - 1.0).abs() < 1e-6);

        // Endpoints are exact
        assert_eq!(Color::RED.lerp(Color::BLUE, 0.0), Color::RED);
        assert_eq!(Color::RED.lerp(Color::BLUE, 1.0), Color::BLUE);
    }

    #[test]
    fn test_visibility_sentinel() {
        assert!(!Color::NONE.is_visible());
        assert!(!Color::RED.with_alpha(0.0).is_visible());
        assert!(Color::RED.with_alpha(0.01).is_visible());
    }

    #[test]
    fn test_invalid_is_opaque_magenta() {
        assert_eq!(Color::INVALID.to_rgba(), Rgba::new(255, 0, 255, 255));
    }
}
