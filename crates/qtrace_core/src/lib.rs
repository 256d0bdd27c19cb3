//! qtrace Core - scene model for the Whitted tracer.
//!
//! This crate provides:
//!
//! - **Materials**: `Material` with the ivory / glass / rubber / mirror presets
//! - **Scene types**: `Sphere`, `Light`, `CheckerFloor`, `Scene`
//!
//! All types are generic over the scalar back-end.
//!
//! # Example
//!
//! ```
//! use qtrace_core::Scene;
//! use qtrace_math::Fixed;
//!
//! let scene = Scene::<Fixed>::reference();
//! assert_eq!(scene.spheres().len(), 4);
//! ```

pub mod material;
pub mod scene;

// Re-export commonly used types
pub use material::Material;
pub use scene::{CheckerFloor, Light, Scene, SceneError, SceneResult, Sphere};
