//! Small vector types generic over [`Scalar`].

use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use crate::Scalar;

/// A 3-component vector used for points, directions and colors.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec3<S> {
    pub x: S,
    pub y: S,
    pub z: S,
}

impl<S: Scalar> Vec3<S> {
    pub const ZERO: Self = Self::new(S::ZERO, S::ZERO, S::ZERO);
    pub const ONE: Self = Self::new(S::ONE, S::ONE, S::ONE);
    pub const X: Self = Self::new(S::ONE, S::ZERO, S::ZERO);
    pub const Y: Self = Self::new(S::ZERO, S::ONE, S::ZERO);

    #[inline]
    pub const fn new(x: S, y: S, z: S) -> Self {
        Self { x, y, z }
    }

    /// Build from float literals (scene construction only).
    pub fn from_f32(x: f32, y: f32, z: f32) -> Self {
        Self::new(S::from_f32(x), S::from_f32(y), S::from_f32(z))
    }

    #[inline]
    pub fn dot(self, other: Self) -> S {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[inline]
    pub fn length_squared(self) -> S {
        self.dot(self)
    }

    #[inline]
    pub fn length(self) -> S {
        self.length_squared().sqrt()
    }

    /// Unit vector in the same direction. A zero-length vector comes back unchanged.
    #[inline]
    pub fn normalize(self) -> Self {
        let len = self.length();
        if len == S::ZERO {
            return self;
        }
        Self::new(self.x / len, self.y / len, self.z / len)
    }

    pub fn to_f32_array(self) -> [f32; 3] {
        [self.x.to_f32(), self.y.to_f32(), self.z.to_f32()]
    }
}

impl<S: Scalar> Add for Vec3<S> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl<S: Scalar> Sub for Vec3<S> {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl<S: Scalar> Neg for Vec3<S> {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl<S: Scalar> Mul<S> for Vec3<S> {
    type Output = Self;

    #[inline]
    fn mul(self, s: S) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s)
    }
}

impl<S: Scalar> AddAssign for Vec3<S> {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<S: Scalar> SubAssign for Vec3<S> {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl From<Vec3<f32>> for glam::Vec3 {
    fn from(v: Vec3<f32>) -> Self {
        glam::Vec3::new(v.x, v.y, v.z)
    }
}

impl From<glam::Vec3> for Vec3<f32> {
    fn from(v: glam::Vec3) -> Self {
        Vec3::new(v.x, v.y, v.z)
    }
}

/// A 4-component vector. Only used for material albedo weights.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec4<S> {
    pub x: S,
    pub y: S,
    pub z: S,
    pub w: S,
}

impl<S: Scalar> Vec4<S> {
    #[inline]
    pub const fn new(x: S, y: S, z: S, w: S) -> Self {
        Self { x, y, z, w }
    }

    pub fn from_f32(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self::new(S::from_f32(x), S::from_f32(y), S::from_f32(z), S::from_f32(w))
    }
}
