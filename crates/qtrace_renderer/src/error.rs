//! Errors raised at the render boundary (configuration, scene, file output).
//!
//! Nothing in the per-pixel path returns an error: numeric corner cases are
//! absorbed there (saturation, placeholder directions, misses).

use qtrace_core::SceneError;
use thiserror::Error;

/// Errors that can occur while setting up or writing a render.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid resolution {width}x{height}: both dimensions must be positive")]
    InvalidResolution { width: u32, height: u32 },

    #[error("Invalid field of view {fov} rad: must lie strictly between 0 and pi")]
    InvalidFov { fov: f32 },

    #[error("Max depth {depth} exceeds the limit of {limit}")]
    DepthTooLarge { depth: u32, limit: u32 },

    #[error(
        "{width}x{height} frame is outside the {backend} range: \
         squared corner ray length {extent} must stay below {limit}"
    )]
    FrameOutOfRange {
        width: u32,
        height: u32,
        extent: f64,
        limit: f64,
        backend: &'static str,
    },

    #[error("Frame size mismatch: {left_width}x{left_height} vs {right_width}x{right_height}")]
    SizeMismatch {
        left_width: u32,
        left_height: u32,
        right_width: u32,
        right_height: u32,
    },

    #[error("Unknown backend '{0}' (expected 'float' or 'fixed')")]
    UnknownBackend(String),

    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type RenderResult<T> = Result<T, RenderError>;
