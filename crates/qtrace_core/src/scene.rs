//! Scene description: spheres, point lights and an optional checkerboard floor.
//!
//! A scene is built once before rendering and is read-only afterwards. All
//! values are stored in the back-end's scalar type, so the fixed-point path
//! never touches floats after construction.

use qtrace_math::{Interval, Scalar, Vec3};
use thiserror::Error;

use crate::material::Material;

/// Errors raised while validating a scene.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("sphere {index} has non-positive radius {radius}")]
    NonPositiveRadius { index: usize, radius: f32 },

    #[error("light {index} has non-positive intensity {intensity}")]
    NonPositiveIntensity { index: usize, intensity: f32 },

    #[error("sphere {index} has non-positive refractive index {refractive_index}")]
    NonPositiveRefractiveIndex { index: usize, refractive_index: f32 },

    #[error("{what} {index} at distance {distance} is outside the {backend} range (limit {limit})")]
    OutOfRange {
        what: &'static str,
        index: usize,
        distance: f64,
        limit: f64,
        backend: &'static str,
    },
}

pub type SceneResult<T> = Result<T, SceneError>;

/// A sphere primitive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere<S> {
    pub center: Vec3<S>,
    pub radius: S,
    pub material: Material<S>,
}

impl<S: Scalar> Sphere<S> {
    pub fn new(center: Vec3<S>, radius: S, material: Material<S>) -> Self {
        Self {
            center,
            radius,
            material,
        }
    }
}

/// A point light.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Light<S> {
    pub position: Vec3<S>,
    pub intensity: S,
}

impl<S: Scalar> Light<S> {
    pub fn new(position: Vec3<S>, intensity: S) -> Self {
        Self {
            position,
            intensity,
        }
    }
}

/// Horizontal checkerboard plane, clipped to a rectangle.
///
/// The bounds and colors are fixed configuration, not derived from the rest
/// of the scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CheckerFloor<S> {
    /// Plane height (y coordinate)
    pub height: S,
    /// Open range of x where the floor exists
    pub x_bounds: Interval<S>,
    /// Open range of z where the floor exists
    pub z_bounds: Interval<S>,
    /// World units to checker cells
    pub cell_scale: S,
    /// Added to x before truncation so cells do not mirror around x = 0
    pub x_offset: S,
    pub odd_color: Vec3<S>,
    pub even_color: Vec3<S>,
}

impl<S: Scalar> Default for CheckerFloor<S> {
    fn default() -> Self {
        Self {
            height: S::from_int(-4),
            x_bounds: Interval::from_f32(-10.0, 10.0),
            z_bounds: Interval::from_f32(-30.0, -10.0),
            cell_scale: S::HALF,
            x_offset: S::from_int(1000),
            odd_color: Vec3::from_f32(0.3, 0.3, 0.3),
            even_color: Vec3::from_f32(0.3, 0.2, 0.1),
        }
    }
}

impl<S: Scalar> CheckerFloor<S> {
    /// Whether a point on the plane lies inside the visible rectangle.
    pub fn in_bounds(&self, point: Vec3<S>) -> bool {
        self.x_bounds.surrounds(point.x) && self.z_bounds.surrounds(point.z)
    }

    /// Checker color at a point on the plane.
    pub fn color_at(&self, point: Vec3<S>) -> Vec3<S> {
        let cx = (point.x * self.cell_scale + self.x_offset).to_int();
        let cz = (point.z * self.cell_scale).to_int();
        if cx.wrapping_add(cz) & 1 == 1 {
            self.odd_color
        } else {
            self.even_color
        }
    }

    /// Material synthesized for a hit at `point`.
    pub fn material_at(&self, point: Vec3<S>) -> Material<S> {
        Material::matte(self.color_at(point))
    }
}

/// Immutable collection of everything the tracer can hit or be lit by.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene<S> {
    spheres: Vec<Sphere<S>>,
    lights: Vec<Light<S>>,
    floor: Option<CheckerFloor<S>>,
}

impl<S: Scalar> Scene<S> {
    /// Build a scene without a floor, validating every primitive.
    pub fn new(spheres: Vec<Sphere<S>>, lights: Vec<Light<S>>) -> SceneResult<Self> {
        let scene = Self {
            spheres,
            lights,
            floor: None,
        };
        scene.validate()?;
        Ok(scene)
    }

    /// Add (or replace) the checkerboard floor.
    pub fn with_floor(mut self, floor: CheckerFloor<S>) -> Self {
        self.floor = Some(floor);
        self
    }

    /// The fixed demo scene: ivory, glass, red rubber and mirror spheres,
    /// three lights and the checker floor.
    pub fn reference() -> Self {
        let spheres = vec![
            Sphere::new(Vec3::from_f32(-3.0, 0.0, -16.0), S::from_int(2), Material::ivory()),
            Sphere::new(Vec3::from_f32(-1.0, -1.5, -12.0), S::from_int(2), Material::glass()),
            Sphere::new(Vec3::from_f32(1.5, -0.5, -18.0), S::from_int(3), Material::red_rubber()),
            Sphere::new(Vec3::from_f32(7.0, 5.0, -18.0), S::from_int(4), Material::mirror()),
        ];
        let lights = vec![
            Light::new(Vec3::from_f32(-20.0, 20.0, 20.0), S::from_f32(1.5)),
            Light::new(Vec3::from_f32(30.0, 50.0, -25.0), S::from_f32(1.8)),
            Light::new(Vec3::from_f32(30.0, 20.0, 30.0), S::from_f32(1.7)),
        ];
        log::debug!(
            "Built reference scene ({} back-end): {} spheres, {} lights",
            S::NAME,
            spheres.len(),
            lights.len()
        );
        Self {
            spheres,
            lights,
            floor: Some(CheckerFloor::default()),
        }
    }

    pub fn spheres(&self) -> &[Sphere<S>] {
        &self.spheres
    }

    pub fn lights(&self) -> &[Light<S>] {
        &self.lights
    }

    pub fn floor(&self) -> Option<&CheckerFloor<S>> {
        self.floor.as_ref()
    }

    /// Largest squared distance from the origin a center or light may have.
    ///
    /// Keeping every position below this bound guarantees that the difference
    /// of any two positions still has a representable squared length.
    pub fn position_limit() -> f64 {
        S::MAX_MAGNITUDE / 4.0
    }

    /// Check radii, intensities, refractive indices and coordinate range.
    pub fn validate(&self) -> SceneResult<()> {
        let limit = Self::position_limit();

        for (index, sphere) in self.spheres.iter().enumerate() {
            if sphere.radius <= S::ZERO {
                return Err(SceneError::NonPositiveRadius {
                    index,
                    radius: sphere.radius.to_f32(),
                });
            }
            if sphere.material.refractive_index <= S::ZERO {
                return Err(SceneError::NonPositiveRefractiveIndex {
                    index,
                    refractive_index: sphere.material.refractive_index.to_f32(),
                });
            }
            let r = f64::from(sphere.radius.to_f32());
            check_range("sphere", index, sphere.center, r * r, limit)?;
        }

        for (index, light) in self.lights.iter().enumerate() {
            if light.intensity <= S::ZERO {
                return Err(SceneError::NonPositiveIntensity {
                    index,
                    intensity: light.intensity.to_f32(),
                });
            }
            check_range("light", index, light.position, 0.0, limit)?;
        }

        Ok(())
    }
}

fn check_range<S: Scalar>(
    what: &'static str,
    index: usize,
    position: Vec3<S>,
    extra: f64,
    limit: f64,
) -> SceneResult<()> {
    let distance = position
        .to_f32_array()
        .iter()
        .map(|c| f64::from(*c) * f64::from(*c))
        .sum::<f64>()
        + extra;
    if distance >= limit {
        return Err(SceneError::OutOfRange {
            what,
            index,
            distance,
            limit,
            backend: S::NAME,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use qtrace_math::Fixed;

    #[test]
    fn test_reference_scene_layout() {
        let scene = Scene::<f32>::reference();
        assert_eq!(scene.spheres().len(), 4);
        assert_eq!(scene.lights().len(), 3);
        assert!(scene.floor().is_some());
        assert_eq!(scene.spheres()[1].material, Material::glass());
    }

    #[test]
    fn test_reference_scene_is_valid_on_both_backends() {
        assert_eq!(Scene::<f32>::reference().validate(), Ok(()));
        assert_eq!(Scene::<Fixed>::reference().validate(), Ok(()));
    }

    #[test]
    fn test_rejects_non_positive_radius() {
        let sphere = Sphere::new(Vec3::<f32>::ZERO, 0.0, Material::default());
        let err = Scene::new(vec![sphere], vec![]).unwrap_err();
        assert_eq!(err, SceneError::NonPositiveRadius { index: 0, radius: 0.0 });
    }

    #[test]
    fn test_rejects_non_positive_intensity() {
        let light = Light::new(Vec3::<Fixed>::ZERO, Fixed::from_int(-1));
        let err = Scene::new(vec![], vec![light]).unwrap_err();
        assert!(matches!(err, SceneError::NonPositiveIntensity { index: 0, .. }));
    }

    #[test]
    fn test_rejects_non_positive_refractive_index() {
        let mut material = Material::<f32>::glass();
        material.refractive_index = 0.0;
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0, material);
        let err = Scene::new(vec![sphere], vec![]).unwrap_err();
        assert!(matches!(err, SceneError::NonPositiveRefractiveIndex { index: 0, .. }));
    }

    #[test]
    fn test_fixed_range_is_enforced() {
        // Fine for f32, but 100^2 is beyond what Q16.16 can difference safely.
        let light = Light::new(Vec3::from_f32(100.0, 0.0, 0.0), 1.0);
        assert!(Scene::<f32>::new(vec![], vec![light]).is_ok());

        let light = Light::new(Vec3::<Fixed>::from_f32(100.0, 0.0, 0.0), Fixed::ONE);
        let err = Scene::new(vec![], vec![light]).unwrap_err();
        assert!(matches!(err, SceneError::OutOfRange { what: "light", backend: "fixed", .. }));
        assert!(err.to_string().contains("fixed range"));
    }

    #[test]
    fn test_with_floor() {
        let scene = Scene::<f32>::new(vec![], vec![]).unwrap();
        assert!(scene.floor().is_none());
        let scene = scene.with_floor(CheckerFloor::default());
        assert_eq!(scene.floor().map(|f| f.height), Some(-4.0));
    }

    #[test]
    fn test_checker_bounds_are_exclusive() {
        let floor = CheckerFloor::<f32>::default();
        assert!(floor.in_bounds(Vec3::new(0.0, -4.0, -20.0)));
        assert!(!floor.in_bounds(Vec3::new(10.0, -4.0, -20.0)));
        assert!(!floor.in_bounds(Vec3::new(-10.0, -4.0, -20.0)));
        assert!(!floor.in_bounds(Vec3::new(0.0, -4.0, -10.0)));
        assert!(!floor.in_bounds(Vec3::new(0.0, -4.0, -30.0)));
    }

    fn check_checker_colors<S: Scalar>() {
        let floor = CheckerFloor::<S>::default();
        // x: trunc(0.5 * 0.5 + 1000) = 1000, z: trunc(0.5 * -20.5) = -10 -> even
        let even = floor.color_at(Vec3::from_f32(0.5, -4.0, -20.5));
        // x: trunc(0.5 * 2.5 + 1000) = 1001 -> odd
        let odd = floor.color_at(Vec3::from_f32(2.5, -4.0, -20.5));
        assert_eq!(even, floor.even_color);
        assert_eq!(odd, floor.odd_color);

        let material = floor.material_at(Vec3::from_f32(2.5, -4.0, -20.5));
        assert_eq!(material.diffuse_color, floor.odd_color);
        assert_eq!(material.specular_exponent, 0);
        assert_eq!(material.albedo.x, S::ONE);
    }

    #[test]
    fn test_checker_colors_both_backends() {
        check_checker_colors::<f32>();
        check_checker_colors::<Fixed>();
    }

    #[test]
    fn test_checker_parity_truncates_negative_z_toward_zero() {
        let floor = CheckerFloor::<f32>::default();
        // trunc(-10.25) = -10 and trunc(-10.75) = -10: same cell.
        let a = floor.color_at(Vec3::new(0.5, -4.0, -20.5));
        let b = floor.color_at(Vec3::new(0.5, -4.0, -21.5));
        assert_eq!(a, b);
    }
}
