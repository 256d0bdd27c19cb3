//! Runtime back-end selection and float/fixed parity checking.

use std::fmt;
use std::str::FromStr;

use qtrace_core::Scene;
use qtrace_math::{Fixed, Scalar};

use crate::camera::Camera;
use crate::error::{RenderError, RenderResult};
use crate::hittable::{Hittable, MAX_HIT_DISTANCE};
use crate::output::PixelFormat;
use crate::renderer::{render, ImageBuffer, RenderConfig};

/// Channel difference (out of 255) the two back-ends are expected to stay within.
pub const PARITY_TOLERANCE: u8 = 2;

/// Numeric back-end used for the whole frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Backend {
    /// Native `f32`
    #[default]
    Float,
    /// Q16.16 integers
    Fixed,
}

impl Backend {
    pub const ALL: [Backend; 2] = [Backend::Float, Backend::Fixed];

    pub fn name(self) -> &'static str {
        match self {
            Backend::Float => <f32 as Scalar>::NAME,
            Backend::Fixed => <Fixed as Scalar>::NAME,
        }
    }

    /// The other back-end.
    pub fn other(self) -> Backend {
        match self {
            Backend::Float => Backend::Fixed,
            Backend::Fixed => Backend::Float,
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Backend {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "float" | "f32" => Ok(Backend::Float),
            "fixed" | "q16.16" => Ok(Backend::Fixed),
            _ => Err(RenderError::UnknownBackend(s.to_string())),
        }
    }
}

/// Validate and render `scene` with the back-end it was built for.
pub fn render_scene<S: PixelFormat>(
    scene: &Scene<S>,
    config: &RenderConfig,
) -> RenderResult<ImageBuffer> {
    config.validate::<S>()?;
    scene.validate()?;
    let camera = Camera::from_config(config);
    Ok(render(&camera, scene, config))
}

/// Render the reference scene with the chosen back-end.
pub fn render_reference(backend: Backend, config: &RenderConfig) -> RenderResult<ImageBuffer> {
    match backend {
        Backend::Float => render_scene(&Scene::<f32>::reference(), config),
        Backend::Fixed => render_scene(&Scene::<Fixed>::reference(), config),
    }
}

/// What a primary ray sees first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    Sky,
    /// Index into [`Scene::spheres`]
    Sphere(usize),
    /// Checker floor, with the parity of the cell that was hit
    Floor { odd: bool },
}

/// Surface seen through pixel (x, y), with the same precedence and cutoff as
/// [`scene_intersect`](crate::scene_intersect).
pub fn primary_surface<S: Scalar>(scene: &Scene<S>, camera: &Camera<S>, x: u32, y: u32) -> Surface {
    let ray = camera.primary_ray(x, y);
    let mut closest_so_far = S::BIG;
    let mut surface = Surface::Sky;

    for (index, sphere) in scene.spheres().iter().enumerate() {
        if let Some(rec) = sphere.hit(&ray, closest_so_far) {
            closest_so_far = rec.t;
            surface = Surface::Sphere(index);
        }
    }
    if let Some(floor) = scene.floor() {
        if let Some(rec) = floor.hit(&ray, closest_so_far) {
            closest_so_far = rec.t;
            surface = Surface::Floor {
                odd: rec.material.diffuse_color == floor.odd_color,
            };
        }
    }

    if closest_so_far < S::from_int(MAX_HIT_DISTANCE) {
        surface
    } else {
        Surface::Sky
    }
}

/// Per-pixel flags, row-major: true where the two back-ends see different
/// primary surfaces in the reference scene.
///
/// These are the pixels sitting on a silhouette or checker edge, where a
/// rounding difference legitimately lands the ray on the other side.
pub fn surface_mismatches(config: &RenderConfig) -> Vec<bool> {
    let float_scene = Scene::<f32>::reference();
    let fixed_scene = Scene::<Fixed>::reference();
    let float_camera = Camera::<f32>::from_config(config);
    let fixed_camera = Camera::<Fixed>::from_config(config);

    let mut mismatches = Vec::with_capacity(config.width as usize * config.height as usize);
    for y in 0..config.height {
        for x in 0..config.width {
            let a = primary_surface(&float_scene, &float_camera, x, y);
            let b = primary_surface(&fixed_scene, &fixed_camera, x, y);
            mismatches.push(a != b);
        }
    }
    mismatches
}

/// Per-pixel comparison of a float frame against a fixed frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ParityReport {
    pub width: u32,
    pub height: u32,
    /// Largest channel difference over the whole frame
    pub max_diff: u8,
    /// Mean of the per-pixel largest channel difference
    pub mean_diff: f64,
    diffs: Vec<u8>,
    /// Pixels whose primary surface differs between the back-ends
    edges: Vec<bool>,
}

impl ParityReport {
    /// Compare two frames pixel by pixel. Both must have the same dimensions.
    ///
    /// No pixel is marked as an edge; see [`compare_frames`] for that.
    pub fn between(float: &ImageBuffer, fixed: &ImageBuffer) -> RenderResult<Self> {
        check_same_size((float.width, float.height), (fixed.width, fixed.height))?;

        let diffs: Vec<u8> = float
            .pixels
            .iter()
            .zip(&fixed.pixels)
            .map(|(a, b)| a.max_channel_diff(*b))
            .collect();

        let max_diff = diffs.iter().copied().max().unwrap_or(0);
        let mean_diff = if diffs.is_empty() {
            0.0
        } else {
            diffs.iter().map(|&d| f64::from(d)).sum::<f64>() / diffs.len() as f64
        };

        Ok(Self {
            width: float.width,
            height: float.height,
            max_diff,
            mean_diff,
            edges: vec![false; diffs.len()],
            diffs,
        })
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Largest channel difference at pixel (x, y).
    pub fn diff_at(&self, x: u32, y: u32) -> Option<u8> {
        self.index(x, y).map(|i| self.diffs[i])
    }

    /// Whether the back-ends see different primary surfaces at (x, y).
    pub fn is_edge(&self, x: u32, y: u32) -> bool {
        self.index(x, y).is_some_and(|i| self.edges[i])
    }

    pub fn edge_count(&self) -> usize {
        self.edges.iter().filter(|&&edge| edge).count()
    }

    /// Largest channel difference over pixels where both back-ends see the same surface.
    pub fn max_interior_diff(&self) -> u8 {
        self.diffs
            .iter()
            .zip(&self.edges)
            .filter(|&(_, &edge)| !edge)
            .map(|(&d, _)| d)
            .max()
            .unwrap_or(0)
    }

    /// Fraction of pixels whose channels all agree within `tolerance`.
    pub fn fraction_within(&self, tolerance: u8) -> f64 {
        if self.diffs.is_empty() {
            return 1.0;
        }
        let within = self.diffs.iter().filter(|&&d| d <= tolerance).count();
        within as f64 / self.diffs.len() as f64
    }

    pub fn pixel_count(&self) -> usize {
        self.diffs.len()
    }

    /// Every pixel off a surface edge agrees within [`PARITY_TOLERANCE`].
    pub fn is_acceptable(&self) -> bool {
        self.max_interior_diff() <= PARITY_TOLERANCE
    }
}

fn check_same_size(left: (u32, u32), right: (u32, u32)) -> RenderResult<()> {
    if left != right {
        return Err(RenderError::SizeMismatch {
            left_width: left.0,
            left_height: left.1,
            right_width: right.0,
            right_height: right.1,
        });
    }
    Ok(())
}

/// Compare float and fixed frames of the reference scene rendered with `config`.
///
/// Pixels where the back-ends see different primary surfaces are marked as
/// edges and left out of [`ParityReport::is_acceptable`].
pub fn compare_frames(
    float: &ImageBuffer,
    fixed: &ImageBuffer,
    config: &RenderConfig,
) -> RenderResult<ParityReport> {
    let mut report = ParityReport::between(float, fixed)?;
    check_same_size((report.width, report.height), (config.width, config.height))?;
    report.edges = surface_mismatches(config);

    log::info!(
        "Parity over {} pixels: max diff {}, mean diff {:.3}, {} edge pixels, max off-edge diff {}",
        report.pixel_count(),
        report.max_diff,
        report.mean_diff,
        report.edge_count(),
        report.max_interior_diff()
    );
    if !report.is_acceptable() {
        log::warn!(
            "Back-ends diverge off surface edges: max diff {} exceeds {}",
            report.max_interior_diff(),
            PARITY_TOLERANCE
        );
    }

    Ok(report)
}

/// Render the reference scene with both back-ends and compare the frames.
pub fn compare_backends(config: &RenderConfig) -> RenderResult<ParityReport> {
    let float = render_reference(Backend::Float, config)?;
    let fixed = render_reference(Backend::Fixed, config)?;
    compare_frames(&float, &fixed, config)
}
