use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use qtrace_renderer::{
    compare_frames, render_reference, Backend, RenderConfig, MAX_DEPTH, PARITY_TOLERANCE,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BackendArg {
    Float,
    Fixed,
}

impl From<BackendArg> for Backend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Float => Backend::Float,
            BackendArg::Fixed => Backend::Fixed,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => log::LevelFilter::Trace,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
        }
    }
}

#[derive(Parser)]
#[command(name = "qtrace")]
#[command(version)]
#[command(about = "Render the reference scene with a float or Q16.16 fixed-point tracer")]
struct Cli {
    /// Numeric back-end
    #[arg(short, long, value_enum, default_value = "float")]
    backend: BackendArg,

    /// Image width in pixels
    #[arg(long, default_value_t = 80)]
    width: u32,

    /// Image height in pixels
    #[arg(long, default_value_t = 50)]
    height: u32,

    /// Field of view in degrees
    #[arg(long, default_value_t = 60.0)]
    fov: f32,

    /// Reflection/refraction recursion depth
    #[arg(long, default_value_t = MAX_DEPTH)]
    max_depth: u32,

    /// Output image; the extension picks the format (png, ppm, ...)
    #[arg(short, long, default_value = "qtrace.png")]
    output: PathBuf,

    /// Also render with the other back-end and report how far they differ
    #[arg(long)]
    compare: bool,

    #[arg(long, value_name = "LEVEL", default_value = "info")]
    log_level: LogLevel,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_default_env()
        .filter_level(cli.log_level.into())
        .init();

    let backend = Backend::from(cli.backend);
    let config = RenderConfig::default()
        .with_resolution(cli.width, cli.height)
        .with_fov_degrees(cli.fov)
        .with_max_depth(cli.max_depth);

    log::info!("Starting qtrace ({} back-end)", backend);

    let image = render_reference(backend, &config)
        .with_context(|| format!("Failed to render with the {backend} back-end"))?;
    image
        .save(&cli.output)
        .with_context(|| format!("Failed to save {}", cli.output.display()))?;
    log::info!("Saved {}", cli.output.display());

    if cli.compare {
        let other = backend.other();
        let other_image = render_reference(other, &config)
            .with_context(|| format!("Failed to render with the {other} back-end"))?;
        let (float, fixed) = match backend {
            Backend::Float => (&image, &other_image),
            Backend::Fixed => (&other_image, &image),
        };
        let report =
            compare_frames(float, fixed, &config).context("Failed to compare back-ends")?;
        println!(
            "float vs fixed: max diff {}, mean diff {:.3}, {:.1}% of pixels within {}",
            report.max_diff,
            report.mean_diff,
            report.fraction_within(PARITY_TOLERANCE) * 100.0,
            PARITY_TOLERANCE
        );
        println!(
            "{} edge pixels, max diff elsewhere {}",
            report.edge_count(),
            report.max_interior_diff()
        );
    }

    Ok(())
}
