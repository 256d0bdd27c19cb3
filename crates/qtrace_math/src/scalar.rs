//! Numeric abstraction shared by every layer above it.
//!
//! Geometry and shading are written once against [`Scalar`] and instantiated
//! for both `f32` and [`Fixed`](crate::Fixed). Nothing above this module knows
//! which back-end is active.

use std::fmt::Debug;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// The operation set a numeric back-end must provide.
pub trait Scalar:
    Copy
    + Debug
    + Default
    + PartialEq
    + PartialOrd
    + Send
    + Sync
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + AddAssign
    + SubAssign
{
    const ZERO: Self;
    const ONE: Self;
    const HALF: Self;

    /// Distance used before anything has been hit. Never reached by real geometry.
    const BIG: Self;

    /// Offset applied along the normal to secondary ray origins. Must exceed the
    /// back-end's error in a hit point, or secondary rays re-hit their own surface.
    const SURFACE_BIAS: Self;

    /// Rays with `|direction.y|` at or below this are treated as parallel to the floor.
    const PARALLEL_EPSILON: Self;

    /// Largest magnitude the back-end can hold. Only used by validation code.
    const MAX_MAGNITUDE: f64;

    /// Short human-readable back-end name.
    const NAME: &'static str;

    fn from_int(value: i32) -> Self;

    /// Convert a float literal. Meant for scene construction, not per-pixel work.
    fn from_f32(value: f32) -> Self;

    /// Truncate toward zero.
    fn to_int(self) -> i32;

    fn to_f32(self) -> f32;

    /// Square root. Non-positive input yields zero instead of NaN.
    fn sqrt(self) -> Self;

    #[inline]
    fn abs(self) -> Self {
        if self < Self::ZERO {
            -self
        } else {
            self
        }
    }

    #[inline]
    fn min(self, other: Self) -> Self {
        if self < other {
            self
        } else {
            other
        }
    }

    #[inline]
    fn max(self, other: Self) -> Self {
        if self > other {
            self
        } else {
            other
        }
    }

    #[inline]
    fn clamp(self, lo: Self, hi: Self) -> Self {
        self.max(lo).min(hi)
    }

    /// Integer power by repeated squaring.
    fn pow_int(self, exponent: u32) -> Self {
        let mut result = Self::ONE;
        let mut base = self;
        let mut e = exponent;
        while e > 0 {
            if e & 1 == 1 {
                result = result * base;
            }
            base = base * base;
            e >>= 1;
        }
        result
    }
}

impl Scalar for f32 {
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;
    const HALF: Self = 0.5;
    const BIG: Self = 1e30;
    const SURFACE_BIAS: Self = 1e-2;
    const PARALLEL_EPSILON: Self = 1e-3;
    const MAX_MAGNITUDE: f64 = f32::MAX as f64;
    const NAME: &'static str = "float";

    #[inline]
    fn from_int(value: i32) -> Self {
        value as f32
    }

    #[inline]
    fn from_f32(value: f32) -> Self {
        value
    }

    #[inline]
    fn to_int(self) -> i32 {
        self as i32
    }

    #[inline]
    fn to_f32(self) -> f32 {
        self
    }

    #[inline]
    fn sqrt(self) -> Self {
        if self > 0.0 {
            f32::sqrt(self)
        } else {
            0.0
        }
    }
}
