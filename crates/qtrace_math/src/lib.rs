//! Arithmetic and vector layer for qtrace.
//!
//! Everything is generic over [`Scalar`], which is implemented for `f32` and
//! for the Q16.16 [`Fixed`] type.

// Re-export glam for interop with the f32 instantiation
pub use glam;

mod fixed;
mod interval;
mod ray;
mod scalar;
mod vec;

pub use fixed::Fixed;
pub use interval::Interval;
pub use ray::Ray;
pub use scalar::Scalar;
pub use vec::{Vec3, Vec4};
