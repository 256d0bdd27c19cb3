//! Pixel encoding: from a traced color to something that can be stored.
//!
//! The float back-end hands out raw `[f32; 3]` colors and leaves quantization
//! to the caller. The fixed back-end quantizes itself, entirely in integer
//! arithmetic, so a fixed-point frame never passes through a float.

use bytemuck::{Pod, Zeroable};
use qtrace_math::{Fixed, Scalar, Vec3};

/// 8-bit RGB pixel, laid out so a slice of them can be viewed as bytes.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const BLACK: Rgb8 = Rgb8::new(0, 0, 0);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Largest per-channel absolute difference.
    pub fn max_channel_diff(self, other: Rgb8) -> u8 {
        self.r
            .abs_diff(other.r)
            .max(self.g.abs_diff(other.g))
            .max(self.b.abs_diff(other.b))
    }
}

/// Quantize a fixed-point channel to 0..=255.
///
/// Clamps to [0, 1], scales by 255 with a half-unit rounding offset and
/// shifts the fraction away.
#[inline]
pub fn quantize_fixed(channel: Fixed) -> u8 {
    let bits = i64::from(channel.to_bits().clamp(0, Fixed::SCALE));
    let scaled = (bits * 255 + (1 << (Fixed::FRAC_BITS - 1))) >> Fixed::FRAC_BITS;
    scaled.clamp(0, 255) as u8
}

/// Quantize a float channel to 0..=255 with the same rounding as [`quantize_fixed`].
#[inline]
pub fn quantize_f32(channel: f32) -> u8 {
    if channel.is_nan() {
        return 0;
    }
    (channel.clamp(0.0, 1.0) * 255.0 + 0.5).floor() as u8
}

/// How a back-end emits finished pixels.
pub trait PixelFormat: Scalar {
    type Pixel: Copy + std::fmt::Debug + PartialEq;

    fn encode(color: Vec3<Self>) -> Self::Pixel;

    fn to_rgb8(pixel: Self::Pixel) -> Rgb8;
}

impl PixelFormat for f32 {
    /// Unclamped linear color.
    type Pixel = [f32; 3];

    #[inline]
    fn encode(color: Vec3<f32>) -> [f32; 3] {
        [color.x, color.y, color.z]
    }

    fn to_rgb8(pixel: [f32; 3]) -> Rgb8 {
        Rgb8::new(
            quantize_f32(pixel[0]),
            quantize_f32(pixel[1]),
            quantize_f32(pixel[2]),
        )
    }
}

impl PixelFormat for Fixed {
    type Pixel = Rgb8;

    #[inline]
    fn encode(color: Vec3<Fixed>) -> Rgb8 {
        Rgb8::new(
            quantize_fixed(color.x),
            quantize_fixed(color.y),
            quantize_fixed(color.z),
        )
    }

    #[inline]
    fn to_rgb8(pixel: Rgb8) -> Rgb8 {
        pixel
    }
}
