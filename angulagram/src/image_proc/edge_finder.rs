//! Radial edge probing for inlet boundary candidates.
//!
//! From a start point, eight lines of length `side / 2` are cast in the compass
//! directions. Each line is sampled once per pixel of length from the start
//! point through its far end, differenced, and
//! scanned from the far end inward for the outermost step that stands out of
//! the noise. The position of that step is one boundary candidate.
//!
//! The raster must be square and `Luma8`. Anything else yields an empty result,
//! as does a line without a clear step, so callers must handle fewer than eight
//! (including zero) points.

use image::DynamicImage;
use inlet_math::Circle;
use nalgebra::{Point2, Vector2};
use ndarray::ArrayView2;

use super::raster::gray_view;

/// Edge threshold in units of the slope standard deviation
pub const NOISE_SIGMA_MULTIPLIER: f64 = 3.0;

/// The eight probe directions, clockwise from north
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompassDirection {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl CompassDirection {
    pub const ALL: [CompassDirection; 8] = [
        CompassDirection::North,
        CompassDirection::NorthEast,
        CompassDirection::East,
        CompassDirection::SouthEast,
        CompassDirection::South,
        CompassDirection::SouthWest,
        CompassDirection::West,
        CompassDirection::NorthWest,
    ];

    /// Unit vector in image coordinates (y grows downward)
    pub fn unit_vector(self) -> Vector2<f64> {
        let (dx, dy): (f64, f64) = match self {
            CompassDirection::North => (0.0, -1.0),
            CompassDirection::NorthEast => (1.0, -1.0),
            CompassDirection::East => (1.0, 0.0),
            CompassDirection::SouthEast => (1.0, 1.0),
            CompassDirection::South => (0.0, 1.0),
            CompassDirection::SouthWest => (-1.0, 1.0),
            CompassDirection::West => (-1.0, 0.0),
            CompassDirection::NorthWest => (-1.0, -1.0),
        };
        Vector2::new(dx, dy) / dx.hypot(dy)
    }
}

/// Outcome of probing one direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionProbe {
    pub direction: CompassDirection,
    /// Line parameter of the edge in `[0, 1)`, 0 when no edge stood out
    pub t: f64,
    /// Position at `t`
    pub point: Point2<f64>,
    /// Noise threshold used for this line
    pub noise: f64,
    /// Whether `point` is a usable boundary candidate
    pub accepted: bool,
}

/// Parametric segment `start + t * (end - start)`
#[derive(Debug, Clone, Copy)]
struct RadialLine {
    start: Point2<f64>,
    end: Point2<f64>,
}

impl RadialLine {
    fn point_at(&self, t: f64) -> Point2<f64> {
        self.start + (self.end - self.start) * t
    }
}

/// Boundary candidates around `center`, at most one per direction.
///
/// Empty for a non-`Luma8`, empty or non-square raster.
pub fn find_edge_points(image: &DynamicImage, center: &Point2<f64>) -> Vec<Point2<f64>> {
    probe_directions(image, center)
        .into_iter()
        .filter(|probe| probe.accepted)
        .map(|probe| probe.point)
        .collect()
}

/// Probe all eight directions and report each one, accepted or not
pub fn probe_directions(image: &DynamicImage, center: &Point2<f64>) -> Vec<DirectionProbe> {
    let Some(view) = gray_view(image) else {
        log::warn!("find_edge_points: raster is not single-channel 8-bit");
        return Vec::new();
    };

    let (height, width) = view.dim();
    if width == 0 || width != height {
        log::warn!("find_edge_points: raster must be square and non-empty, got {width}x{height}");
        return Vec::new();
    }

    let radius = width as f64 / 2.0;
    // i = 0..=floor(radius), so an integral radius reaches t = 1
    let sample_count = radius.floor() as usize + 1;
    let bounds = Circle::new(*center, radius);

    CompassDirection::ALL
        .iter()
        .map(|&direction| {
            let line = RadialLine {
                start: *center,
                end: *center + direction.unit_vector() * radius,
            };

            let samples = sample_line(&view, &line, radius, sample_count);
            let slopes = slope_sequence(&samples);
            let noise = NOISE_SIGMA_MULTIPLIER * sample_std_dev(&slopes);
            let t = outermost_edge_parameter(&slopes, noise);
            let point = line.point_at(t);

            let accepted = t > 0.0
                && point.x >= 0.0
                && point.y >= 0.0
                && point.x < width as f64
                && point.y < height as f64
                && bounds.contains(&point);

            log::debug!(
                "{direction:?}: t = {t:.4}, point = ({:.2}, {:.2}), noise = {noise:.2}, accepted = {accepted}",
                point.x,
                point.y
            );

            DirectionProbe {
                direction,
                t,
                point,
                noise,
                accepted,
            }
        })
        .collect()
}

/// Intensities at `t = i / radius` for `i` in `0..count`, `t` never above 1.
///
/// Each position reads the pixel containing it; positions past the raster read
/// the nearest edge pixel.
fn sample_line(view: &ArrayView2<u8>, line: &RadialLine, radius: f64, count: usize) -> Vec<f64> {
    let (height, width) = view.dim();
    (0..count)
        .map(|i| {
            let p = line.point_at(i as f64 / radius);
            let x = (p.x.floor().max(0.0) as usize).min(width - 1);
            let y = (p.y.floor().max(0.0) as usize).min(height - 1);
            view[[y, x]] as f64
        })
        .collect()
}

/// Forward differences with a trailing 0, same length as the input
fn slope_sequence(samples: &[f64]) -> Vec<f64> {
    let mut slopes: Vec<f64> = samples.windows(2).map(|w| w[1] - w[0]).collect();
    if !samples.is_empty() {
        slopes.push(0.0);
    }
    slopes
}

/// Sample standard deviation (`n - 1` denominator), 0 for fewer than 2 values
fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let sum_sq: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
    (sum_sq / (n - 1.0)).sqrt()
}

/// Line parameter of the outermost slope whose magnitude exceeds `noise`.
///
/// With `quiet` trailing entries below the threshold the result is
/// `1 - quiet / len`, i.e. the position of the sample just after the step.
/// Returns 0 when nothing exceeds the threshold.
fn outermost_edge_parameter(slopes: &[f64], noise: f64) -> f64 {
    match slopes.iter().rev().position(|s| s.abs() > noise) {
        Some(quiet) => 1.0 - quiet as f64 / slopes.len() as f64,
        None => 0.0,
    }
}
