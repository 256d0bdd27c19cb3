use crate::{Scalar, Vec3};

/// A ray in 3D space with an origin and a direction.
///
/// Directions produced by the camera and the tracer are unit length, but
/// nothing here depends on that.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray<S> {
    pub origin: Vec3<S>,
    pub direction: Vec3<S>,
}

impl<S: Scalar> Ray<S> {
    /// Create a new ray.
    pub fn new(origin: Vec3<S>, direction: Vec3<S>) -> Self {
        Self { origin, direction }
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + direction * t
    #[inline]
    pub fn at(&self, t: S) -> Vec3<S> {
        self.origin + self.direction * t
    }
}
