//! Surface material description.

use qtrace_math::{Scalar, Vec3, Vec4};

/// Phong-style material with independent weights for each light path.
///
/// The four albedo weights are used exactly as given. They are not
/// normalized, so a material may reflect more light than it receives.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material<S> {
    /// Index of refraction (1.0 = vacuum)
    pub refractive_index: S,

    /// Weights for (diffuse, specular, reflection, refraction)
    pub albedo: Vec4<S>,

    /// Base color for the diffuse term (RGB, 0-1)
    pub diffuse_color: Vec3<S>,

    /// Phong exponent for the specular highlight. Zero disables the highlight.
    pub specular_exponent: u32,
}

impl<S: Scalar> Default for Material<S> {
    fn default() -> Self {
        Self {
            refractive_index: S::ONE,
            albedo: Vec4::new(S::ONE, S::ZERO, S::ZERO, S::ZERO),
            diffuse_color: Vec3::ZERO,
            specular_exponent: 0,
        }
    }
}

impl<S: Scalar> Material<S> {
    pub fn new(
        refractive_index: S,
        albedo: Vec4<S>,
        diffuse_color: Vec3<S>,
        specular_exponent: u32,
    ) -> Self {
        Self {
            refractive_index,
            albedo,
            diffuse_color,
            specular_exponent,
        }
    }

    /// Purely diffuse material of the given color.
    pub fn matte(diffuse_color: Vec3<S>) -> Self {
        Self {
            diffuse_color,
            ..Default::default()
        }
    }

    pub fn ivory() -> Self {
        Self::new(
            S::ONE,
            Vec4::from_f32(0.6, 0.3, 0.1, 0.0),
            Vec3::from_f32(0.4, 0.4, 0.3),
            50,
        )
    }

    pub fn glass() -> Self {
        Self::new(
            S::from_f32(1.5),
            Vec4::from_f32(0.0, 0.5, 0.1, 0.8),
            Vec3::from_f32(0.6, 0.7, 0.8),
            125,
        )
    }

    pub fn red_rubber() -> Self {
        Self::new(
            S::ONE,
            Vec4::from_f32(0.9, 0.1, 0.0, 0.0),
            Vec3::from_f32(0.3, 0.1, 0.1),
            10,
        )
    }

    /// Mirror. The specular weight of 10 saturates its highlights.
    pub fn mirror() -> Self {
        Self::new(
            S::ONE,
            Vec4::from_f32(0.0, 10.0, 0.8, 0.0),
            Vec3::ONE,
            142,
        )
    }
}
