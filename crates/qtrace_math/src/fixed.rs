//! Q16.16 fixed-point numbers.
//!
//! Values are stored as `i32` with 16 fractional bits, giving a range of about
//! ±32768.0 with a resolution of 1/65536. Products and quotients go through an
//! `i64` intermediate and are narrowed with saturation, so no operation wraps
//! or panics.

use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

use bytemuck::{Pod, Zeroable};

use crate::Scalar;

/// A signed Q16.16 fixed-point number.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Hash, Pod, Zeroable)]
#[repr(transparent)]
pub struct Fixed(i32);

impl Fixed {
    /// Number of fractional bits.
    pub const FRAC_BITS: u32 = 16;
    /// Raw value of 1.0.
    pub const SCALE: i32 = 1 << Self::FRAC_BITS;

    pub const ZERO: Fixed = Fixed(0);
    pub const ONE: Fixed = Fixed(Self::SCALE);
    pub const HALF: Fixed = Fixed(Self::SCALE / 2);
    pub const MAX: Fixed = Fixed(i32::MAX);
    pub const MIN: Fixed = Fixed(i32::MIN);

    /// Wrap raw Q16.16 bits.
    #[inline]
    pub const fn from_bits(bits: i32) -> Self {
        Fixed(bits)
    }

    /// The raw Q16.16 bits.
    #[inline]
    pub const fn to_bits(self) -> i32 {
        self.0
    }

    #[inline]
    pub const fn from_int(value: i32) -> Self {
        Fixed(saturate((value as i64) << Self::FRAC_BITS))
    }

    /// Round to the nearest representable value. Out-of-range input saturates,
    /// NaN becomes zero.
    #[inline]
    pub fn from_f32(value: f32) -> Self {
        Fixed((value * Self::SCALE as f32).round() as i32)
    }

    /// Integer part, truncated toward zero.
    #[inline]
    pub const fn to_int(self) -> i32 {
        self.0 / Self::SCALE
    }

    #[inline]
    pub fn to_f32(self) -> f32 {
        self.0 as f32 / Self::SCALE as f32
    }

    /// Square root via binary search over the pre-shifted 64-bit value.
    pub fn sqrt(self) -> Self {
        if self.0 <= 0 {
            return Fixed::ZERO;
        }
        let root = isqrt((self.0 as u64) << Self::FRAC_BITS);
        Fixed(saturate(root as i64))
    }
}

/// Narrow an `i64` intermediate back to `i32`, clamping at the bounds.
#[inline]
const fn saturate(wide: i64) -> i32 {
    if wide > i32::MAX as i64 {
        i32::MAX
    } else if wide < i32::MIN as i64 {
        i32::MIN
    } else {
        wide as i32
    }
}

/// Floor of the square root of `value`.
fn isqrt(value: u64) -> u64 {
    // Inputs are at most 2^47, so the root fits well below 2^24.
    let mut lo: u64 = 0;
    let mut hi: u64 = 1 << 24;
    while lo < hi {
        let mid = (lo + hi + 1) / 2;
        if mid * mid <= value {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }
    lo
}

impl Add for Fixed {
    type Output = Fixed;

    #[inline]
    fn add(self, rhs: Fixed) -> Fixed {
        Fixed(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Fixed {
    type Output = Fixed;

    #[inline]
    fn sub(self, rhs: Fixed) -> Fixed {
        Fixed(self.0.saturating_sub(rhs.0))
    }
}

impl Neg for Fixed {
    type Output = Fixed;

    #[inline]
    fn neg(self) -> Fixed {
        Fixed(self.0.saturating_neg())
    }
}

impl Mul for Fixed {
    type Output = Fixed;

    #[inline]
    fn mul(self, rhs: Fixed) -> Fixed {
        Fixed(saturate((self.0 as i64 * rhs.0 as i64) >> Self::FRAC_BITS))
    }
}

impl Div for Fixed {
    type Output = Fixed;

    #[inline]
    fn div(self, rhs: Fixed) -> Fixed {
        if rhs.0 == 0 {
            return match self.0 {
                0 => Fixed::ZERO,
                n if n > 0 => Fixed::MAX,
                _ => Fixed::MIN,
            };
        }
        Fixed(saturate(((self.0 as i64) << Self::FRAC_BITS) / rhs.0 as i64))
    }
}

impl AddAssign for Fixed {
    #[inline]
    fn add_assign(&mut self, rhs: Fixed) {
        *self = *self + rhs;
    }
}

impl SubAssign for Fixed {
    #[inline]
    fn sub_assign(&mut self, rhs: Fixed) {
        *self = *self - rhs;
    }
}

impl fmt::Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_f32())
    }
}

impl Scalar for Fixed {
    const ZERO: Self = Fixed::ZERO;
    const ONE: Self = Fixed::ONE;
    const HALF: Self = Fixed::HALF;
    const BIG: Self = Fixed::MAX;
    // 655 / 65536 ~= 0.01, well above the error of a hit point at scene distances
    const SURFACE_BIAS: Self = Fixed(655);
    // 66 / 65536 ~= 0.001
    const PARALLEL_EPSILON: Self = Fixed(66);
    const MAX_MAGNITUDE: f64 = i32::MAX as f64 / Fixed::SCALE as f64;
    const NAME: &'static str = "fixed";

    #[inline]
    fn from_int(value: i32) -> Self {
        Fixed::from_int(value)
    }

    #[inline]
    fn from_f32(value: f32) -> Self {
        Fixed::from_f32(value)
    }

    #[inline]
    fn to_int(self) -> i32 {
        Fixed::to_int(self)
    }

    #[inline]
    fn to_f32(self) -> f32 {
        Fixed::to_f32(self)
    }

    #[inline]
    fn sqrt(self) -> Self {
        Fixed::sqrt(self)
    }
}
