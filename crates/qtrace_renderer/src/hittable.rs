//! Hittable trait and HitRecord for ray-object intersection.

use qtrace_core::{Material, Scene};
use qtrace_math::{Ray, Scalar, Vec3};

/// Hits at or beyond this distance count as misses, so far-away geometry
/// falls through to the sky instead of being shaded.
pub const MAX_HIT_DISTANCE: i32 = 1000;

/// Record of a ray-object intersection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitRecord<S> {
    /// Distance along the ray
    pub t: S,
    /// Point of intersection
    pub point: Vec3<S>,
    /// Outward surface normal (not flipped toward the ray)
    pub normal: Vec3<S>,
    /// Material at the intersection point
    pub material: Material<S>,
}

/// Trait for objects that can be hit by rays.
pub trait Hittable<S: Scalar> {
    /// Intersect `ray` with this object, accepting only hits strictly closer than `t_max`.
    fn hit(&self, ray: &Ray<S>, t_max: S) -> Option<HitRecord<S>>;
}

impl<S: Scalar> Hittable<S> for Scene<S> {
    fn hit(&self, ray: &Ray<S>, t_max: S) -> Option<HitRecord<S>> {
        let mut closest_so_far = t_max;
        let mut record = None;

        for sphere in self.spheres() {
            if let Some(rec) = sphere.hit(ray, closest_so_far) {
                closest_so_far = rec.t;
                record = Some(rec);
            }
        }

        // The floor only wins when strictly closer than every sphere.
        if let Some(rec) = self.floor().and_then(|floor| floor.hit(ray, closest_so_far)) {
            record = Some(rec);
        }

        record
    }
}

/// Nearest hit in the scene, or `None` if nothing lies within [`MAX_HIT_DISTANCE`].
pub fn scene_intersect<S: Scalar>(scene: &Scene<S>, ray: &Ray<S>) -> Option<HitRecord<S>> {
    scene
        .hit(ray, S::BIG)
        .filter(|rec| rec.t < S::from_int(MAX_HIT_DISTANCE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use qtrace_core::{CheckerFloor, Sphere};
    use qtrace_math::Fixed;

    fn down_the_z_axis<S: Scalar>() -> Ray<S> {
        Ray::new(Vec3::ZERO, Vec3::from_f32(0.0, 0.0, -1.0))
    }

    fn check_nearest_sphere_wins<S: Scalar>() {
        let far = Sphere::new(Vec3::from_f32(0.0, 0.0, -20.0), S::ONE, Material::red_rubber());
        let near = Sphere::new(Vec3::from_f32(0.0, 0.0, -10.0), S::ONE, Material::ivory());
        // Listed far-first so the loop has to replace the first hit.
        let scene = Scene::new(vec![far, near], vec![]).unwrap();

        let rec = scene_intersect(&scene, &down_the_z_axis()).unwrap();
        assert_eq!(rec.t, S::from_int(9));
        assert_eq!(rec.material, Material::ivory());
        assert_eq!(rec.normal, Vec3::from_f32(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_nearest_sphere_wins() {
        check_nearest_sphere_wins::<f32>();
        check_nearest_sphere_wins::<Fixed>();
    }

    #[test]
    fn test_empty_scene_misses() {
        let scene = Scene::<f32>::new(vec![], vec![]).unwrap();
        assert!(scene_intersect(&scene, &down_the_z_axis()).is_none());
    }

    #[test]
    fn test_hits_beyond_cutoff_are_misses() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1500.0), 10.0, Material::ivory());
        let scene = Scene::<f32>::new(vec![sphere], vec![]).unwrap();
        assert!(scene.hit(&down_the_z_axis(), f32::BIG).is_some());
        assert!(scene_intersect(&scene, &down_the_z_axis()).is_none());
    }

    #[test]
    fn test_floor_in_front_of_sphere_wins() {
        // Sphere behind the floor patch seen from above.
        let sphere = Sphere::new(Vec3::new(0.0, -8.0, -20.0), 2.0, Material::ivory());
        let scene = Scene::<f32>::new(vec![sphere], vec![])
            .unwrap()
            .with_floor(CheckerFloor::default());

        let ray = Ray::new(Vec3::new(0.0, 0.0, -20.0), Vec3::new(0.0, -1.0, 0.0));
        let rec = scene_intersect(&scene, &ray).unwrap();
        assert_eq!(rec.t, 4.0);
        assert_eq!(rec.normal, Vec3::Y);
        assert_eq!(rec.material.specular_exponent, 0);
    }

    #[test]
    fn test_sphere_in_front_of_floor_wins() {
        let sphere = Sphere::new(Vec3::new(0.0, -1.0, -20.0), 1.0, Material::glass());
        let scene = Scene::<f32>::new(vec![sphere], vec![])
            .unwrap()
            .with_floor(CheckerFloor::default());

        let ray = Ray::new(Vec3::new(0.0, 0.0, -20.0), Vec3::new(0.0, -1.0, 0.0));
        let rec = scene_intersect(&scene, &ray).unwrap();
        assert_eq!(rec.material, Material::glass());
        assert_eq!(rec.point, Vec3::new(0.0, 0.0, -20.0) + Vec3::new(0.0, -1.0, 0.0) * rec.t);
    }
}
