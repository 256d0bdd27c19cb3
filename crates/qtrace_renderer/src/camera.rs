//! Pinhole camera for primary ray generation.

use qtrace_math::{Ray, Scalar, Vec3};

use crate::renderer::RenderConfig;

/// Fixed pinhole camera at the origin looking down -Z.
///
/// Everything that needs a float (the tangent of the field of view) is
/// evaluated once here, so per-pixel work stays in the back-end's scalar type.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera<S> {
    pub image_width: u32,
    pub image_height: u32,

    // Cached in scalar form
    half_width: S,
    half_height: S,
    focal: S,
}

impl<S: Scalar> Camera<S> {
    pub fn from_config(config: &RenderConfig) -> Self {
        Self {
            image_width: config.width,
            image_height: config.height,
            half_width: S::from_int(to_i32(config.width)) * S::HALF,
            half_height: S::from_int(to_i32(config.height)) * S::HALF,
            focal: S::from_f32(config.focal_length()),
        }
    }

    /// Image-plane z coordinate (negative, in pixel units).
    pub fn focal(&self) -> S {
        self.focal
    }

    /// Unit direction through the center of pixel (x, y), y counted from the top row.
    pub fn direction(&self, x: u32, y: u32) -> Vec3<S> {
        let px = S::from_int(to_i32(x)) + S::HALF - self.half_width;
        let py = self.half_height - (S::from_int(to_i32(y)) + S::HALF);
        Vec3::new(px, py, self.focal).normalize()
    }

    pub fn primary_ray(&self, x: u32, y: u32) -> Ray<S> {
        Ray::new(Vec3::ZERO, self.direction(x, y))
    }
}

#[inline]
fn to_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qtrace_math::Fixed;

    #[test]
    fn test_focal_from_fov() {
        // 90 degrees: focal distance is half the image height.
        let config = RenderConfig::default()
            .with_resolution(64, 32)
            .with_fov(std::f32::consts::FRAC_PI_2);
        let camera = Camera::<f32>::from_config(&config);
        assert!((camera.focal() + 16.0).abs() < 1e-4);
    }

    #[test]
    fn test_center_pixels_are_symmetric() {
        let config = RenderConfig::default().with_resolution(4, 4);
        let camera = Camera::<f32>::from_config(&config);

        let top_left = camera.direction(1, 1);
        let bottom_right = camera.direction(2, 2);
        assert!((top_left.x + bottom_right.x).abs() < 1e-6);
        assert!((top_left.y + bottom_right.y).abs() < 1e-6);
        assert!(top_left.x < 0.0 && top_left.y > 0.0);
        assert!(top_left.z < 0.0);
    }

    #[test]
    fn test_primary_ray_starts_at_eye() {
        let camera = Camera::<Fixed>::from_config(&RenderConfig::default());
        let ray = camera.primary_ray(10, 20);
        assert_eq!(ray.origin, Vec3::ZERO);
        let len = ray.direction.length().to_f32();
        assert!((len - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_fixed_directions_track_float() {
        let config = RenderConfig::default();
        let float = Camera::<f32>::from_config(&config);
        let fixed = Camera::<Fixed>::from_config(&config);

        for (x, y) in [(0, 0), (79, 0), (40, 25), (0, 49), (79, 49)] {
            let a = float.direction(x, y);
            let b = fixed.direction(x, y).to_f32_array();
            assert!((a.x - b[0]).abs() < 1e-3, "x mismatch at ({x}, {y})");
            assert!((a.y - b[1]).abs() < 1e-3, "y mismatch at ({x}, {y})");
            assert!((a.z - b[2]).abs() < 1e-3, "z mismatch at ({x}, {y})");
        }
    }
}
