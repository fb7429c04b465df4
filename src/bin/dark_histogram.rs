//! Dark-frame histogram plotter.
//!
//! Simulates one complete dark exposure (bias + dark current + read noise)
//! and renders the pixel-value distribution to a PNG. The bias pedestal
//! shows up as the peak, dark current as the Poisson tail to its right.
//!
//! Usage:
//! ```
//! cargo run --release --bin dark_histogram -- [OPTIONS]
//! ```

use anyhow::{bail, Result};
use clap::Parser;
use darkfield::sensor::models;
use darkfield::{dark_frame, stats, FrameShape};
use plotters::prelude::*;
use std::time::Duration;

/// Command-line arguments for the histogram plot
#[derive(Parser, Debug)]
#[command(
    name = "dark_histogram",
    about = "Render a pixel-value histogram of a simulated dark frame"
)]
struct Args {
    /// Sensor model to use (kaf1603, imx290)
    #[arg(short = 's', long, default_value = "kaf1603")]
    sensor: String,

    /// Exposure time in seconds
    #[arg(short = 'e', long, default_value_t = 100.0)]
    exposure_s: f64,

    /// Image size (will simulate NxN patch)
    #[arg(short = 'i', long, default_value_t = 512)]
    image_size: usize,

    /// Number of histogram bins
    #[arg(short = 'b', long, default_value_t = 200)]
    bins: usize,

    /// Output PNG path
    #[arg(short = 'o', long, default_value = "dark_histogram.png")]
    output: String,

    /// Random seed for reproducibility (optional)
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let Some(sensor) = models::by_name(&args.sensor) else {
        bail!("unknown sensor '{}'; available: kaf1603, imx290", args.sensor);
    };
    let patch = sensor.with_shape(FrameShape::new(args.image_size, args.image_size));

    let exposure = Duration::from_secs_f64(args.exposure_s);
    let frame = dark_frame(&patch, &exposure, args.seed)?;
    let values: Vec<f64> = frame.iter().copied().collect();

    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let span = (max - min).max(f64::EPSILON);

    let mut counts = vec![0u32; args.bins];
    for &v in &values {
        let idx = (((v - min) / span) * args.bins as f64) as usize;
        counts[idx.min(args.bins - 1)] += 1;
    }
    let peak = counts.iter().copied().max().unwrap_or(1);

    println!(
        "Simulated {} dark frame: {} s exposure, mean {:.2} ADU, sigma {:.2} ADU",
        patch.name,
        args.exposure_s,
        stats::mean(&values),
        stats::sample_std(&values)
    );

    let root = BitMapBackend::new(&args.output, (1024, 768)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("{} dark frame, {} s", patch.name, args.exposure_s),
            ("sans-serif", 30),
        )
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(min..max, 0u32..(peak + peak / 10 + 1))?;

    chart
        .configure_mesh()
        .x_desc("Pixel value (ADU)")
        .y_desc("Pixels per bin")
        .axis_desc_style(("sans-serif", 20))
        .draw()?;

    let bin_width = span / args.bins as f64;
    chart.draw_series(counts.iter().enumerate().map(|(i, &count)| {
        let x0 = min + i as f64 * bin_width;
        Rectangle::new([(x0, 0), (x0 + bin_width, count)], BLUE.mix(0.5).filled())
    }))?;

    root.present()?;
    println!("Histogram saved to: {}", args.output);

    Ok(())
}
