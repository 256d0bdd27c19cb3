//! qtrace Renderer - recursive Whitted ray tracing
//!
//! One tracer, written against [`qtrace_math::Scalar`], instantiated for
//! `f32` and for Q16.16 [`Fixed`](qtrace_math::Fixed) integers:
//! - Analytic sphere and checker-floor intersection
//! - Mirror reflection, dielectric refraction and hard shadows
//! - 8-bit output with integer-only quantization on the fixed back-end
//!
//! # Example
//!
//! ```no_run
//! use qtrace_renderer::{render_reference, Backend, RenderConfig};
//!
//! let config = RenderConfig::default();
//! let image = render_reference(Backend::Fixed, &config)?;
//! image.save("reference.png")?;
//! # Ok::<(), qtrace_renderer::RenderError>(())
//! ```

mod backend;
mod camera;
mod checker;
mod error;
mod hittable;
mod output;
mod renderer;
mod shading;
mod sphere;

pub use backend::{
    compare_backends, compare_frames, primary_surface, render_reference, render_scene,
    surface_mismatches, Backend, ParityReport, Surface, PARITY_TOLERANCE,
};
pub use camera::Camera;
pub use checker::plane_intersect;
pub use error::{RenderError, RenderResult};
pub use hittable::{scene_intersect, HitRecord, Hittable, MAX_HIT_DISTANCE};
pub use output::{quantize_f32, quantize_fixed, PixelFormat, Rgb8};
pub use renderer::{
    ray_color, render, render_pixel, ImageBuffer, RenderConfig, MAX_DEPTH, MAX_DEPTH_LIMIT,
};
pub use shading::{
    direct_lighting, light_visible, offset_origin, reflect, refract, sky_gradient, LightTerms,
};
pub use sphere::sphere_intersect;

/// Re-export the scene and math types the renderer is generic over
pub use qtrace_core::{CheckerFloor, Light, Material, Scene, SceneError, Sphere};
pub use qtrace_math::{Fixed, Ray, Scalar, Vec3};
