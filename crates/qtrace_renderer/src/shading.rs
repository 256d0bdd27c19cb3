//! Local shading: mirror and Snell directions, shadow rays and the
//! diffuse/specular light sums.

use qtrace_core::{Light, Scene};
use qtrace_math::{Ray, Scalar, Vec3};

use crate::hittable::{scene_intersect, HitRecord};

/// Accumulated light intensities at a surface point.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LightTerms<S> {
    pub diffuse: S,
    pub specular: S,
}

/// Reflect `incident` about `normal`.
#[inline]
pub fn reflect<S: Scalar>(incident: Vec3<S>, normal: Vec3<S>) -> Vec3<S> {
    incident - normal * (S::from_int(2) * incident.dot(normal))
}

/// Refract `incident` through a surface with outward `normal`.
///
/// `eta_t` is the index on the far side of the surface and `eta_i` the index
/// on the incident side. A ray arriving from inside (negative cosine) is
/// handled by flipping the normal and swapping the indices. On total internal
/// reflection the result is the placeholder direction (1, 0, 0).
pub fn refract<S: Scalar>(incident: Vec3<S>, normal: Vec3<S>, eta_t: S, eta_i: S) -> Vec3<S> {
    let cosi = -incident.dot(normal).clamp(-S::ONE, S::ONE);
    if cosi < S::ZERO {
        return refract(incident, -normal, eta_i, eta_t);
    }

    let eta = eta_i / eta_t;
    let k = S::ONE - eta * eta * (S::ONE - cosi * cosi);
    if k < S::ZERO {
        return Vec3::X;
    }
    incident * eta + normal * (eta * cosi - k.sqrt())
}

/// Nudge `point` off the surface along the normal, to the side `direction` leaves on.
#[inline]
pub fn offset_origin<S: Scalar>(point: Vec3<S>, direction: Vec3<S>, normal: Vec3<S>) -> Vec3<S> {
    if direction.dot(normal) < S::ZERO {
        point - normal * S::SURFACE_BIAS
    } else {
        point + normal * S::SURFACE_BIAS
    }
}

/// Whether `light` reaches `point` without anything in between.
pub fn light_visible<S: Scalar>(
    scene: &Scene<S>,
    point: Vec3<S>,
    normal: Vec3<S>,
    light: &Light<S>,
) -> bool {
    let to_light = light.position - point;
    let light_dir = to_light.normalize();
    let light_distance = to_light.length();

    let shadow_origin = offset_origin(point, light_dir, normal);
    match scene_intersect(scene, &Ray::new(shadow_origin, light_dir)) {
        Some(blocker) => (blocker.point - shadow_origin).length() >= light_distance,
        None => true,
    }
}

/// Sum diffuse and specular intensity over all unshadowed lights.
///
/// `view_dir` is the direction of the incoming ray. A light in shadow
/// contributes nothing at all. The specular term is skipped when its base is
/// zero or the exponent is zero, so neither case adds a spurious 1.
pub fn direct_lighting<S: Scalar>(
    scene: &Scene<S>,
    hit: &HitRecord<S>,
    view_dir: Vec3<S>,
) -> LightTerms<S> {
    let mut terms = LightTerms::default();
    let exponent = hit.material.specular_exponent;

    for light in scene.lights() {
        if !light_visible(scene, hit.point, hit.normal, light) {
            continue;
        }

        let light_dir = (light.position - hit.point).normalize();
        terms.diffuse += light.intensity * light_dir.dot(hit.normal).max(S::ZERO);

        let base = (-reflect(-light_dir, hit.normal)).dot(view_dir).max(S::ZERO);
        if base > S::ZERO && exponent > 0 {
            terms.specular += base.pow_int(exponent) * light.intensity;
        }
    }

    terms
}

/// Background color: a vertical gradient driven by the ray's y component.
pub fn sky_gradient<S: Scalar>(direction: Vec3<S>) -> Vec3<S> {
    let s = S::HALF * (direction.y + S::ONE);
    let low = Vec3::from_f32(0.2, 0.7, 0.8);
    let high = Vec3::from_f32(0.0, 0.0, 0.5);
    low * s + high * s
}
