//! Recursive Whitted tracer and frame driver.
//!
//! Implements:
//! - Mirror reflection and dielectric refraction, bounded by a depth cap
//! - Diffuse and Phong specular terms with hard shadows
//! - Row-major, single-threaded frame rendering into an 8-bit buffer

use std::io::Write;
use std::path::Path;
use std::time::Instant;

use qtrace_core::Scene;
use qtrace_math::{Ray, Scalar, Vec3};

use crate::camera::Camera;
use crate::error::{RenderError, RenderResult};
use crate::hittable::scene_intersect;
use crate::output::{PixelFormat, Rgb8};
use crate::shading::{direct_lighting, offset_origin, reflect, refract, sky_gradient};

/// Default recursion depth for reflection and refraction.
pub const MAX_DEPTH: u32 = 2;

/// Largest accepted `max_depth`. Each level doubles the number of rays per pixel.
pub const MAX_DEPTH_LIMIT: u32 = 10;

/// Render configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Field of view in radians
    pub fov: f32,
    /// Maximum reflection/refraction depth
    pub max_depth: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 80,
            height: 50,
            fov: std::f32::consts::FRAC_PI_3,
            max_depth: MAX_DEPTH,
        }
    }
}

impl RenderConfig {
    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the field of view in radians.
    pub fn with_fov(mut self, fov: f32) -> Self {
        self.fov = fov;
        self
    }

    pub fn with_fov_degrees(self, degrees: f32) -> Self {
        self.with_fov(degrees.to_radians())
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Signed distance from the eye to the image plane, in pixels.
    pub fn focal_length(&self) -> f32 {
        -(self.height as f32) / (2.0 * (self.fov / 2.0).tan())
    }

    /// Check the configuration against the limits of back-end `S`.
    ///
    /// The corner ray of the frame has the largest unnormalized direction, so
    /// its squared length must be representable before it can be normalized.
    pub fn validate<S: Scalar>(&self) -> RenderResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidResolution {
                width: self.width,
                height: self.height,
            });
        }
        if !(self.fov > 0.0 && self.fov < std::f32::consts::PI) {
            return Err(RenderError::InvalidFov { fov: self.fov });
        }
        if self.max_depth > MAX_DEPTH_LIMIT {
            return Err(RenderError::DepthTooLarge {
                depth: self.max_depth,
                limit: MAX_DEPTH_LIMIT,
            });
        }

        let half_w = f64::from(self.width) / 2.0;
        let half_h = f64::from(self.height) / 2.0;
        let focal = f64::from(self.focal_length());
        let extent = half_w * half_w + half_h * half_h + focal * focal;
        if extent >= S::MAX_MAGNITUDE {
            return Err(RenderError::FrameOutOfRange {
                width: self.width,
                height: self.height,
                extent,
                limit: S::MAX_MAGNITUDE,
                backend: S::NAME,
            });
        }

        Ok(())
    }
}

/// Compute the color seen by a ray.
///
/// Past the depth cap, or when nothing is hit, the sky gradient is returned.
/// Otherwise reflection and refraction are traced one level deeper (in that
/// order, whatever the material's weights) and combined with the local
/// diffuse and specular terms. The result is not clamped.
pub fn ray_color<S: Scalar>(
    ray: &Ray<S>,
    scene: &Scene<S>,
    depth: u32,
    config: &RenderConfig,
) -> Vec3<S> {
    if depth > config.max_depth {
        return sky_gradient(ray.direction);
    }

    let Some(hit) = scene_intersect(scene, ray) else {
        return sky_gradient(ray.direction);
    };
    let material = hit.material;

    let reflect_dir = reflect(ray.direction, hit.normal).normalize();
    let reflect_origin = offset_origin(hit.point, reflect_dir, hit.normal);
    let reflect_color = ray_color(&Ray::new(reflect_origin, reflect_dir), scene, depth + 1, config);

    let refract_dir =
        refract(ray.direction, hit.normal, material.refractive_index, S::ONE).normalize();
    let refract_origin = offset_origin(hit.point, refract_dir, hit.normal);
    let refract_color = ray_color(&Ray::new(refract_origin, refract_dir), scene, depth + 1, config);

    let light = direct_lighting(scene, &hit, ray.direction);
    let albedo = material.albedo;

    material.diffuse_color * (light.diffuse * albedo.x)
        + Vec3::ONE * (light.specular * albedo.y)
        + reflect_color * albedo.z
        + refract_color * albedo.w
}

/// Trace the primary ray through pixel (x, y) and encode the result.
pub fn render_pixel<S: PixelFormat>(
    camera: &Camera<S>,
    scene: &Scene<S>,
    x: u32,
    y: u32,
    config: &RenderConfig,
) -> S::Pixel {
    let ray = camera.primary_ray(x, y);
    S::encode(ray_color(&ray, scene, 0, config))
}

/// 8-bit RGB frame, row-major from the top-left pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Rgb8>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgb8::BLACK; width as usize * height as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Rgb8 {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Rgb8) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Packed RGB bytes, three per pixel.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn to_image(&self) -> image::RgbImage {
        image::RgbImage::from_fn(self.width, self.height, |x, y| {
            let p = self.get(x, y);
            image::Rgb([p.r, p.g, p.b])
        })
    }

    /// Save to disk. The format follows the file extension (png, ppm, ...).
    pub fn save(&self, path: impl AsRef<Path>) -> RenderResult<()> {
        self.to_image().save(path.as_ref())?;
        Ok(())
    }

    /// Write a binary PPM (P6) to any writer.
    pub fn write_ppm<W: Write>(&self, mut writer: W) -> RenderResult<()> {
        write!(writer, "P6\n{} {}\n255\n", self.width, self.height)?;
        writer.write_all(self.as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}

/// Render the entire scene to an image buffer.
///
/// Pixels are visited row-major on the calling thread. The configuration is
/// not validated here; see [`RenderConfig::validate`].
pub fn render<S: PixelFormat>(
    camera: &Camera<S>,
    scene: &Scene<S>,
    config: &RenderConfig,
) -> ImageBuffer {
    log::debug!(
        "Rendering {}x{} ({} back-end, max depth {})",
        camera.image_width,
        camera.image_height,
        S::NAME,
        config.max_depth
    );
    let start = Instant::now();

    let mut image = ImageBuffer::new(camera.image_width, camera.image_height);
    for y in 0..camera.image_height {
        for x in 0..camera.image_width {
            let pixel = render_pixel(camera, scene, x, y, config);
            image.set(x, y, S::to_rgb8(pixel));
        }
    }

    log::info!(
        "Rendered {}x{} frame with {} back-end in {:.2?}",
        image.width,
        image.height,
        S::NAME,
        start.elapsed()
    );
    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use qtrace_core::{Light, Material, Sphere};
    use qtrace_math::Fixed;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_render_config_default() {
        let config = RenderConfig::default();
        assert_eq!((config.width, config.height), (80, 50));
        assert_eq!(config.max_depth, MAX_DEPTH);
        assert!(config.validate::<f32>().is_ok());
        assert!(config.validate::<Fixed>().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_config() {
        let zero = RenderConfig::default().with_resolution(0, 10);
        assert!(matches!(
            zero.validate::<f32>(),
            Err(RenderError::InvalidResolution { width: 0, height: 10 })
        ));

        let flat = RenderConfig::default().with_fov(0.0);
        assert!(matches!(flat.validate::<f32>(), Err(RenderError::InvalidFov { .. })));
        let wide = RenderConfig::default().with_fov_degrees(200.0);
        assert!(matches!(wide.validate::<f32>(), Err(RenderError::InvalidFov { .. })));

        let deep = RenderConfig::default().with_max_depth(MAX_DEPTH_LIMIT + 1);
        assert!(matches!(
            deep.validate::<Fixed>(),
            Err(RenderError::DepthTooLarge { depth: 11, limit: 10 })
        ));
    }

    #[test]
    fn test_large_frame_only_fits_float() {
        let config = RenderConfig::default().with_resolution(640, 480);
        assert!(config.validate::<f32>().is_ok());
        let err = config.validate::<Fixed>().unwrap_err();
        assert!(matches!(err, RenderError::FrameOutOfRange { backend: "fixed", .. }));
    }

    fn check_depth_cap_returns_sky<S: Scalar>() {
        let mut rng = StdRng::seed_from_u64(7);
        let scene = Scene::<S>::reference();
        let config = RenderConfig::default();

        for _ in 0..50 {
            let origin = Vec3::from_f32(
                rng.gen_range(-5.0..5.0),
                rng.gen_range(-3.0..3.0),
                rng.gen_range(-20.0..0.0),
            );
            let dir = Vec3::<f32>::new(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..-0.1),
            )
            .normalize();
            let ray = Ray::new(origin, Vec3::from_f32(dir.x, dir.y, dir.z));
            assert_eq!(
                ray_color(&ray, &scene, config.max_depth + 1, &config),
                sky_gradient(ray.direction)
            );
        }
    }

    #[test]
    fn test_depth_cap_returns_sky() {
        check_depth_cap_returns_sky::<f32>();
        check_depth_cap_returns_sky::<Fixed>();
    }

    #[test]
    fn test_miss_returns_sky() {
        let scene = Scene::<f32>::reference();
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0));
        let color = ray_color(&ray, &scene, 0, &RenderConfig::default());
        assert_eq!(color, sky_gradient(Vec3::Y));
    }

    #[test]
    fn test_unlit_matte_sphere_is_black() {
        let sphere = Sphere::new(
            Vec3::new(0.0, 0.0, -5.0),
            1.0,
            Material::matte(Vec3::new(1.0, 0.0, 0.0)),
        );
        let scene = Scene::new(vec![sphere], vec![]).unwrap();
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(ray_color(&ray, &scene, 0, &RenderConfig::default()), Vec3::ZERO);
    }

    #[test]
    fn test_lit_matte_sphere_uses_diffuse_color() {
        let sphere = Sphere::new(
            Vec3::new(0.0, 0.0, -5.0),
            1.0,
            Material::matte(Vec3::new(1.0, 0.0, 0.0)),
        );
        // Light straight behind the eye: L.N = 1 at the front of the sphere.
        let light = Light::new(Vec3::new(0.0, 0.0, 10.0), 0.5);
        let scene = Scene::new(vec![sphere], vec![light]).unwrap();
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let color = ray_color(&ray, &scene, 0, &RenderConfig::default());
        assert!((color.x - 0.5).abs() < 1e-6);
        assert_eq!(color.y, 0.0);
        assert_eq!(color.z, 0.0);
    }

    fn check_center_pixel_hits_glass<S: Scalar>() {
        let config = RenderConfig::default();
        let camera = Camera::<S>::from_config(&config);
        let scene = Scene::<S>::reference();

        let hit = scene_intersect(&scene, &camera.primary_ray(40, 25)).unwrap();
        assert_eq!(hit.material, Material::glass());
        assert!((hit.t.to_f32() - 11.082).abs() < 1e-2);
    }

    #[test]
    fn test_center_pixel_hits_glass() {
        check_center_pixel_hits_glass::<f32>();
        check_center_pixel_hits_glass::<Fixed>();
    }

    #[test]
    fn test_render_is_deterministic() {
        let config = RenderConfig::default().with_resolution(32, 20);
        let scene = Scene::<Fixed>::reference();
        let camera = Camera::from_config(&config);

        let a = render(&camera, &scene, &config);
        let b = render(&camera, &scene, &config);
        assert_eq!(a, b);
        assert_eq!(a.pixels.len(), 32 * 20);

        let scene = Scene::<f32>::reference();
        let camera = Camera::from_config(&config);
        assert_eq!(render(&camera, &scene, &config), render(&camera, &scene, &config));
    }

    #[test]
    fn test_image_buffer() {
        let mut image = ImageBuffer::new(3, 2);
        assert_eq!(image.get(2, 1), Rgb8::BLACK);

        image.set(2, 1, Rgb8::new(9, 8, 7));
        assert_eq!(image.get(2, 1), Rgb8::new(9, 8, 7));
        assert_eq!(image.as_bytes().len(), 18);
        assert_eq!(&image.as_bytes()[15..], &[9, 8, 7]);
        assert_eq!(image.to_image().get_pixel(2, 1), &image::Rgb([9, 8, 7]));
    }

    #[test]
    fn test_write_ppm() {
        let mut image = ImageBuffer::new(2, 1);
        image.set(0, 0, Rgb8::new(255, 0, 0));

        let mut out = Vec::new();
        image.write_ppm(&mut out).unwrap();
        assert!(out.starts_with(b"P6\n2 1\n255\n"));
        assert_eq!(&out[out.len() - 6..], &[255, 0, 0, 0, 0, 0]);
    }
}
