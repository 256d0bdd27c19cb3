//! Reference scene example.
//!
//! Renders the demo scene with both back-ends, saves each frame as PPM and
//! prints how closely they agree.

use qtrace_renderer::{
    compare_frames, render_reference, Backend, ImageBuffer, RenderConfig, RenderResult,
    PARITY_TOLERANCE,
};
use std::fs::File;
use std::io::BufWriter;

fn main() -> RenderResult<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    println!("qtrace - Reference Scene");
    println!("========================");

    let config = RenderConfig::default().with_resolution(160, 100);

    let mut frames = Vec::with_capacity(Backend::ALL.len());
    for backend in Backend::ALL {
        println!(
            "Rendering {}x{} with the {} back-end...",
            config.width, config.height, backend
        );

        let start = std::time::Instant::now();
        let image = render_reference(backend, &config)?;
        println!("Rendered in {:?}", start.elapsed());

        let filename = format!("reference_{backend}.ppm");
        save_ppm(&image, &filename)?;
        println!("Saved to {}", filename);
        frames.push(image);
    }

    let report = compare_frames(&frames[0], &frames[1], &config)?;
    println!(
        "Parity: max diff {}, mean diff {:.3}, {:.1}% within {}",
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

    Ok(())
}

fn save_ppm(image: &ImageBuffer, filename: &str) -> RenderResult<()> {
    let file = File::create(filename)?;
    image.write_ppm(BufWriter::new(file))
}
