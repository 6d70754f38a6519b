//! Inlet analysis tool
//!
//! Loads an image, finds the circular inlet, unwarps it into polar coordinates
//! and writes the angulagram (mean intensity vs. angle) as CSV.
//!
//! # Usage
//!
//! ```bash
//! # Full-turn angulagram, inlet found from the intensity centroid
//! cargo run --release --bin inlet_analyze -- pattern.png -o angulagram.csv
//!
//! # Explicit start point, clockwise angles from 12 o'clock, outer ring only
//! cargo run --release --bin inlet_analyze -- pattern.png \
//!     --center-x 312 --center-y 240 --zero-angle 90 --clockwise \
//!     --inner-fraction 0.5 --outer-fraction 1.0
//!
//! # Keep the polar image and frame, list peaks of the smoothed curve
//! cargo run --release --bin inlet_analyze -- pattern.png \
//!     --polar-image polar.png --frame-json frame.json --smooth-sigma 2
//! ```
//!
//! Set `RUST_LOG=debug` to see per-direction edge probing details.

use std::path::PathBuf;

use angulagram::image_proc::profile::{find_extrema, gaussian_smooth, ExtremumKind};
use angulagram::image_proc::radial_unwarp::{Reduction, Sampling};
use angulagram::image_proc::raster::{desaturate, DesaturationMode};
use angulagram::{analyze_inlet, AnalysisError, AnalysisParams, UnwarpConfig};
use clap::Parser;
use image::DynamicImage;
use nalgebra::Point2;

#[derive(Parser, Debug)]
#[command(
    name = "inlet_analyze",
    about = "Finds the circular inlet in an image and writes its angulagram",
    long_about = None
)]
struct Args {
    /// Input image (any format the image crate reads)
    image: PathBuf,

    /// Output CSV for the angulagram (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Edge search start x in pixels (default: intensity centroid)
    #[arg(long, requires = "center_y")]
    center_x: Option<f64>,

    /// Edge search start y in pixels (default: intensity centroid)
    #[arg(long, requires = "center_x")]
    center_y: Option<f64>,

    /// Lower bound of the angle window in degrees
    #[arg(long, default_value_t = -180.0, allow_hyphen_values = true)]
    min_angle: f64,

    /// Upper bound of the angle window in degrees
    #[arg(long, default_value_t = 180.0, allow_hyphen_values = true)]
    max_angle: f64,

    /// Direction of angle 0 in degrees counterclockwise from 3 o'clock
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    zero_angle: f64,

    /// Report angles growing clockwise
    #[arg(long)]
    clockwise: bool,

    /// Inner sampling radius as a fraction of the inlet radius
    #[arg(long, default_value_t = 0.0)]
    inner_fraction: f64,

    /// Outer sampling radius as a fraction of the inlet radius
    #[arg(long, default_value_t = 1.0)]
    outer_fraction: f64,

    /// Angular step in degrees
    #[arg(long, default_value_t = 1.0)]
    angle_step: f64,

    /// Radial step in pixels
    #[arg(long, default_value_t = 1.0)]
    radius_step: f64,

    /// Reduction over the radial samples of one angle
    #[arg(long, value_enum, default_value_t = Reduction::Mean)]
    reduction: Reduction,

    /// Sub-pixel sampling method
    #[arg(long, value_enum, default_value_t = Sampling::Bilinear)]
    sampling: Sampling,

    /// Conversion of colour input to grayscale
    #[arg(long, value_enum, default_value_t = DesaturationMode::Luminosity)]
    desaturation: DesaturationMode,

    /// Save the polar image (rows = angles, columns = radii)
    #[arg(long)]
    polar_image: Option<PathBuf>,

    /// Save the polar frame placed on the inlet as JSON
    #[arg(long)]
    frame_json: Option<PathBuf>,

    /// Gaussian sigma in samples; when set, extrema of the smoothed curve are listed
    #[arg(long)]
    smooth_sigma: Option<f64>,
}

impl Args {
    fn analysis_params(&self) -> AnalysisParams {
        AnalysisParams {
            center: self.center_x.zip(self.center_y).map(|(x, y)| Point2::new(x, y)),
            min_angle: self.min_angle,
            max_angle: self.max_angle,
            zero_angle_deg: self.zero_angle,
            counter_clockwise: !self.clockwise,
            inner_radius_fraction: self.inner_fraction,
            outer_radius_fraction: self.outer_fraction,
            unwarp: UnwarpConfig {
                angle_step_deg: self.angle_step,
                radius_step: self.radius_step,
                reduction: self.reduction,
                sampling: self.sampling,
            },
        }
    }
}

fn main() -> Result<(), AnalysisError> {
    env_logger::init();
    let args = Args::parse();

    let params = args.analysis_params();
    params.validate()?;

    let loaded = image::open(&args.image)?;
    let gray = DynamicImage::ImageLuma8(desaturate(&loaded, args.desaturation));
    log::info!(
        "Loaded {} ({}x{})",
        args.image.display(),
        gray.width(),
        gray.height()
    );

    let analysis = analyze_inlet(&gray, &params)?;
    let inlet = &analysis.inlet;
    eprintln!(
        "Inlet center: ({:.2}, {:.2}) px, radius: {:.2} px, edge points: {}",
        inlet.center.x,
        inlet.center.y,
        inlet.radius,
        analysis.edge_points.len()
    );

    let shown = analysis.angulagram.for_display(&analysis.frame);
    match &args.output {
        Some(path) => {
            std::fs::write(path, shown.to_csv())?;
            eprintln!("Angulagram ({} samples) written to {}", shown.len(), path.display());
        }
        None => print!("{}", shown.to_csv()),
    }

    if let Some(path) = &args.polar_image {
        analysis.polar_image.save(path)?;
        eprintln!("Polar image written to {}", path.display());
    }

    if let Some(path) = &args.frame_json {
        analysis.frame.save_to_file(path)?;
        eprintln!("Polar frame written to {}", path.display());
    }

    if let Some(sigma) = args.smooth_sigma {
        let smoothed = gaussian_smooth(&shown.points, sigma);
        let extrema = find_extrema(&smoothed);
        eprintln!("Extrema of the smoothed angulagram (sigma = {sigma} samples):");
        for extremum in extrema {
            let label = match extremum.kind {
                ExtremumKind::Maximum => "max",
                ExtremumKind::Minimum => "min",
            };
            eprintln!(
                "  {label} at {:8.2} deg: {:.2}",
                extremum.angle_deg, extremum.intensity
            );
        }
    }

    Ok(())
}
