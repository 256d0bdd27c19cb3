//! Sphere intersection.

use qtrace_core::Sphere;
use qtrace_math::{Ray, Scalar};

use crate::hittable::{HitRecord, Hittable};

/// Distance to the first surface of `sphere` along `ray`.
///
/// Uses the projected-center form: `tca` is the projection of the center on
/// the ray and `d2` the squared distance of the center from the ray. The near
/// root is taken if it lies beyond the surface bias, then the far root, so
/// rays leaving a surface do not re-hit the sphere they started on and rays
/// starting inside a sphere hit its far wall.
///
/// `d2` is the squared length of the perpendicular from the center to the
/// ray rather than `l.l - tca^2`. The difference of two large squares loses
/// most of its bits in Q16.16 and pushes hit points inside the sphere.
pub fn sphere_intersect<S: Scalar>(sphere: &Sphere<S>, ray: &Ray<S>) -> Option<S> {
    let l = sphere.center - ray.origin;
    let tca = l.dot(ray.direction);
    let d2 = (l - ray.direction * tca).length_squared();
    let r2 = sphere.radius * sphere.radius;
    if d2 > r2 {
        return None;
    }

    let thc = (r2 - d2).sqrt();
    let t0 = tca - thc;
    if t0 > S::SURFACE_BIAS {
        return Some(t0);
    }
    let t1 = tca + thc;
    if t1 > S::SURFACE_BIAS {
        return Some(t1);
    }
    None
}

impl<S: Scalar> Hittable<S> for Sphere<S> {
    fn hit(&self, ray: &Ray<S>, t_max: S) -> Option<HitRecord<S>> {
        let t = sphere_intersect(self, ray)?;
        if t >= t_max {
            return None;
        }

        let point = ray.at(t);
        Some(HitRecord {
            t,
            point,
            normal: (point - self.center).normalize(),
            material: self.material,
        })
    }
}
