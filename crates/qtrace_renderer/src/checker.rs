//! Checkerboard floor intersection.

use qtrace_core::CheckerFloor;
use qtrace_math::{Ray, Scalar, Vec3};

use crate::hittable::{HitRecord, Hittable};

/// Distance to the floor along `ray`, if the crossing lies in front of the
/// origin and inside the floor rectangle.
///
/// Rays nearly parallel to the plane are rejected outright to keep the
/// division well away from zero.
pub fn plane_intersect<S: Scalar>(floor: &CheckerFloor<S>, ray: &Ray<S>) -> Option<S> {
    if ray.direction.y.abs() <= S::PARALLEL_EPSILON {
        return None;
    }

    let t = -(ray.origin.y - floor.height) / ray.direction.y;
    if t <= S::ZERO {
        return None;
    }

    if !floor.in_bounds(ray.at(t)) {
        return None;
    }
    Some(t)
}

impl<S: Scalar> Hittable<S> for CheckerFloor<S> {
    fn hit(&self, ray: &Ray<S>, t_max: S) -> Option<HitRecord<S>> {
        let t = plane_intersect(self, ray)?;
        if t >= t_max {
            return None;
        }

        let point = ray.at(t);
        Some(HitRecord {
            t,
            point,
            normal: Vec3::Y,
            material: self.material_at(point),
        })
    }
}
