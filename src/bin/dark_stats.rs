//! Dark-frame statistics summary tool.
//!
//! Simulates dark exposures across a set of exposure times and prints a
//! markdown table comparing measured statistics against theory:
//! - Measured mean vs. the expected rate * exposure / gain
//! - Variance-to-mean ratio (close to 1 for Poisson counts)
//! - Hot-pixel count when injection is enabled
//!
//! A read-noise section checks that the Gaussian generator produces the
//! requested sigma and passes a KS normality test.
//!
//! Usage:
//! ```
//! cargo run --release --bin dark_stats -- [OPTIONS]
//! ```

use anyhow::{bail, Result};
use clap::Parser;
use darkfield::sensor::{models, SensorSpec};
use darkfield::{dark_current, dark_current_with_hot_pixels, read_noise, stats, FrameShape};
use indicatif::ProgressBar;
use ndarray::Array2;
use std::time::Duration;

/// Command-line arguments for dark-frame statistics
#[derive(Parser, Debug)]
#[command(
    name = "dark_stats",
    about = "Summarize simulated dark-frame statistics across exposure times"
)]
struct Args {
    /// Sensor model to use (kaf1603, imx290, custom)
    #[arg(short = 's', long, default_value = "kaf1603")]
    sensor: String,

    /// Dark current for --sensor custom (e-/pixel/s)
    #[arg(long, default_value_t = 0.1)]
    dark_current: f64,

    /// Read noise for --sensor custom (e- RMS)
    #[arg(long, default_value_t = 5.0)]
    read_noise: f64,

    /// Gain for --sensor custom (e-/ADU)
    #[arg(long, default_value_t = 1.5)]
    gain: f64,

    /// Exposure times in seconds
    #[arg(short = 'e', long, value_delimiter = ',', default_values_t = [10.0, 50.0, 100.0, 300.0])]
    exposures: Vec<f64>,

    /// Image size (will simulate NxN patch)
    #[arg(short = 'i', long, default_value_t = 256)]
    image_size: usize,

    /// Number of frames to generate per exposure time
    #[arg(short = 'n', long, default_value_t = 10)]
    num_trials: usize,

    /// Random seed for reproducibility (optional)
    #[arg(long)]
    seed: Option<u64>,

    /// Inject a hot-pixel outlier population
    #[arg(long)]
    hot_pixels: bool,

    /// Verbose per-trial output
    #[arg(short = 'v', long)]
    verbose: bool,
}

/// Resolve the sensor parameters from a preset name or the custom flags
fn resolve_sensor(args: &Args) -> Result<SensorSpec> {
    if args.sensor.eq_ignore_ascii_case("custom") {
        return Ok(SensorSpec::new(
            "custom",
            FrameShape::new(args.image_size, args.image_size),
            args.dark_current,
            args.read_noise,
            args.gain,
            0.0,
            16,
        ));
    }

    match models::by_name(&args.sensor) {
        Some(spec) => Ok(spec.with_shape(FrameShape::new(args.image_size, args.image_size))),
        None => bail!(
            "unknown sensor '{}'; available: kaf1603, imx290, custom",
            args.sensor
        ),
    }
}

/// Per-exposure aggregate over the trial frames
struct ExposureRow {
    exposure_s: f64,
    expected_mean: f64,
    measured_mean: f64,
    dispersion: f64,
    hot_count: usize,
}

fn measure_exposure(
    sensor: &SensorSpec,
    exposure_s: f64,
    args: &Args,
    progress: &ProgressBar,
) -> Result<ExposureRow> {
    let exposure = Duration::from_secs_f64(exposure_s);
    let base = Array2::<f64>::zeros(sensor.shape.to_dim());

    let mut trial_means = Vec::with_capacity(args.num_trials);
    let mut trial_dispersions = Vec::with_capacity(args.num_trials);
    let mut hot_count = 0;

    for trial in 0..args.num_trials {
        let seed = args.seed.map(|s| s + trial as u64);

        let frame = if args.hot_pixels {
            let (frame, map) = dark_current_with_hot_pixels(
                &base,
                sensor.dark_current_e_per_s,
                &exposure,
                sensor.gain_e_per_adu,
                seed,
            )?;
            hot_count = map.len();
            frame
        } else {
            dark_current(
                &base,
                sensor.dark_current_e_per_s,
                &exposure,
                sensor.gain_e_per_adu,
                seed,
            )?
        };

        let values: Vec<f64> = frame.iter().copied().collect();
        let mean = stats::mean(&values);
        trial_means.push(mean);
        trial_dispersions.push(stats::dispersion_ratio(&values));

        if args.verbose {
            progress.println(format!(
                "  {exposure_s} s trial {}: mean = {mean:.3} ADU",
                trial + 1
            ));
        }
        progress.inc(1);
    }

    Ok(ExposureRow {
        exposure_s,
        expected_mean: sensor.expected_dark_adu(&exposure),
        measured_mean: stats::mean(&trial_means),
        dispersion: stats::mean(&trial_dispersions),
        hot_count,
    })
}

/// Validate the read-noise generator: sigma and normality
fn report_read_noise(sensor: &SensorSpec, args: &Args) -> Result<()> {
    let base = Array2::<f64>::zeros(sensor.shape.to_dim());
    let frame = read_noise(
        &base,
        sensor.read_noise_e,
        sensor.gain_e_per_adu,
        args.seed,
    )?;
    let values: Vec<f64> = frame.iter().copied().collect();

    let expected_sigma = sensor.read_noise_e / sensor.gain_e_per_adu;
    let measured_sigma = stats::sample_std(&values);
    let ks_stat = stats::ks_test_normal(&values);
    let ks_critical = stats::ks_critical_value(values.len(), 0.05);

    println!("Read noise check");
    println!("----------------");
    println!("  Expected sigma: {expected_sigma:.3} ADU");
    println!("  Measured sigma: {measured_sigma:.3} ADU");
    println!(
        "  KS statistic: {ks_stat:.5} (5% critical value {ks_critical:.5}) -> {}",
        if ks_stat < ks_critical {
            "consistent with Gaussian"
        } else {
            "NOT consistent with Gaussian"
        }
    );

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let sensor = resolve_sensor(&args)?;

    println!("Dark-Frame Statistics");
    println!("=====================");
    println!("Sensor: {}", sensor.name);
    println!(
        "Dark current: {} e-/px/s, read noise: {} e-, gain: {} e-/ADU",
        sensor.dark_current_e_per_s, sensor.read_noise_e, sensor.gain_e_per_adu
    );
    println!("Patch: {} pixels", sensor.shape);
    println!("Trials per exposure: {}", args.num_trials);
    if args.hot_pixels {
        println!("Hot pixels: enabled");
    }
    println!();

    let progress = ProgressBar::new((args.exposures.len() * args.num_trials) as u64);
    let mut rows = Vec::with_capacity(args.exposures.len());
    for &exposure_s in &args.exposures {
        rows.push(measure_exposure(&sensor, exposure_s, &args, &progress)?);
    }
    progress.finish_and_clear();

    println!("| Exposure (s) | Expected mean (ADU) | Measured mean (ADU) | Var/mean | Hot pixels |");
    println!("|--------------|---------------------|---------------------|----------|------------|");
    for row in &rows {
        println!(
            "| {:.0} | {:.3} | {:.3} | {:.3} | {} |",
            row.exposure_s, row.expected_mean, row.measured_mean, row.dispersion, row.hot_count
        );
    }
    println!();

    report_read_noise(&sensor, &args)
}
