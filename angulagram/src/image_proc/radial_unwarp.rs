//! Polar resampling and the angulagram.
//!
//! For every angle in the frame's window, the raster is sampled along the ray
//! from `inner_radius` to `outer_radius`. The samples of one angle form one row
//! of the polar image and reduce to one angulagram point.
//!
//! Angles are frame-internal (counterclockwise-positive). Flipping them for a
//! clockwise display is left to the presentation side, see
//! [`Angulagram::for_display`].

use clap::ValueEnum;
use image::{DynamicImage, GrayImage};
use inlet_math::PolarFrame;
use nalgebra::Point2;
use ndarray::{Array2, ArrayView2};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::profile::{interp, InterpError};
use super::raster::{array2_to_gray_image, gray_view};
use crate::error::AnalysisError;

/// Slack for the last angle/radius sample landing exactly on the upper bound
const GRID_TOLERANCE: f64 = 1e-9;

/// Largest number of samples along either axis of the polar grid
pub const MAX_GRID_SAMPLES: usize = 1 << 20;

/// Largest polar image, in pixels
pub const MAX_POLAR_PIXELS: usize = 1 << 26;

/// How the radial samples of one angle become one intensity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum Reduction {
    /// Mean of the in-bounds samples
    #[default]
    Mean,
    /// Sum of the in-bounds samples
    Sum,
}

/// How a sub-pixel position is read from the raster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum Sampling {
    /// Weighted mean of the four nearest pixel centers
    #[default]
    Bilinear,
    /// The pixel containing the position
    Nearest,
}

/// Sampling grid and reduction settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnwarpConfig {
    /// Angular step in degrees
    pub angle_step_deg: f64,
    /// Radial step in pixels
    pub radius_step: f64,
    pub reduction: Reduction,
    pub sampling: Sampling,
}

impl Default for UnwarpConfig {
    fn default() -> Self {
        Self {
            angle_step_deg: 1.0,
            radius_step: 1.0,
            reduction: Reduction::Mean,
            sampling: Sampling::Bilinear,
        }
    }
}

impl UnwarpConfig {
    pub fn validate(&self) -> Result<(), AnalysisError> {
        for step in [self.angle_step_deg, self.radius_step] {
            if !(step.is_finite() && step > 0.0) {
                return Err(AnalysisError::InvalidStep(step));
            }
        }
        Ok(())
    }
}

/// One angulagram sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngulagramPoint {
    /// Angle in degrees, frame-internal convention
    pub angle_deg: f64,
    pub intensity: f64,
}

impl AngulagramPoint {
    pub fn new(angle_deg: f64, intensity: f64) -> Self {
        Self {
            angle_deg,
            intensity,
        }
    }
}

/// Intensity against angle, sorted by increasing angle
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Angulagram {
    pub points: Vec<AngulagramPoint>,
}

impl Angulagram {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn angles(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.angle_deg).collect()
    }

    pub fn intensities(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.intensity).collect()
    }

    /// Largest angle, which is the last point's
    pub fn max_angle(&self) -> Option<f64> {
        self.points.last().map(|p| p.angle_deg)
    }

    /// Linearly interpolated intensity at `angle_deg`
    pub fn intensity_at(&self, angle_deg: f64) -> Result<f64, InterpError> {
        interp(angle_deg, &self.angles(), &self.intensities())
    }

    /// Copy with angles in the frame's display convention, re-sorted ascending
    pub fn for_display(&self, frame: &PolarFrame) -> Angulagram {
        let mut points: Vec<_> = self
            .points
            .iter()
            .map(|p| AngulagramPoint::new(frame.to_display_angle(p.angle_deg), p.intensity))
            .collect();
        points.sort_by(|a, b| a.angle_deg.total_cmp(&b.angle_deg));
        Angulagram { points }
    }

    /// Two-column CSV with a header row
    pub fn to_csv(&self) -> String {
        let mut csv = String::from("angle_deg,intensity\n");
        for p in &self.points {
            csv.push_str(&format!("{},{}\n", p.angle_deg, p.intensity));
        }
        csv
    }
}

/// Output of [`radial_unwarp`]
#[derive(Debug, Clone)]
pub struct PolarUnwarp {
    /// One row per angle sample, one column per radius sample
    pub polar_image: GrayImage,
    pub angulagram: Angulagram,
    /// Radius of each polar image column
    pub radii: Vec<f64>,
}

/// Evenly spaced values from `start` up to and including `end` (with tolerance).
///
/// `None` when the count is not finite or exceeds [`MAX_GRID_SAMPLES`].
fn grid(start: f64, end: f64, step: f64) -> Option<Vec<f64>> {
    let steps = ((end - start) / step + GRID_TOLERANCE).floor();
    if !(steps >= 0.0 && steps < MAX_GRID_SAMPLES as f64) {
        return None;
    }
    let count = (steps as usize).checked_add(1)?;
    Some((0..count).map(|k| start + k as f64 * step).collect())
}

/// Read the raster at a sub-pixel position, `None` outside the raster area.
///
/// Pixel `(i, j)` covers `[i, i + 1) x [j, j + 1)`; bilinear sampling places
/// its value at the pixel center and replicates border pixels.
fn sample(view: &ArrayView2<u8>, p: &Point2<f64>, sampling: Sampling) -> Option<f64> {
    let (height, width) = view.dim();
    if !(p.x >= 0.0 && p.y >= 0.0 && p.x < width as f64 && p.y < height as f64) {
        return None;
    }

    match sampling {
        Sampling::Nearest => Some(view[[p.y as usize, p.x as usize]] as f64),
        Sampling::Bilinear => {
            let u = (p.x - 0.5).clamp(0.0, (width - 1) as f64);
            let v = (p.y - 0.5).clamp(0.0, (height - 1) as f64);
            let x0 = u.floor() as usize;
            let y0 = v.floor() as usize;
            let x1 = (x0 + 1).min(width - 1);
            let y1 = (y0 + 1).min(height - 1);
            let fx = u - x0 as f64;
            let fy = v - y0 as f64;

            let p00 = view[[y0, x0]] as f64;
            let p10 = view[[y0, x1]] as f64;
            let p01 = view[[y1, x0]] as f64;
            let p11 = view[[y1, x1]] as f64;
            Some(
                (1.0 - fx) * (1.0 - fy) * p00
                    + fx * (1.0 - fy) * p10
                    + (1.0 - fx) * fy * p01
                    + fx * fy * p11,
            )
        }
    }
}

/// Resample `image` in `frame` between two radii.
///
/// Angles run from `frame.min_angle` to `frame.max_angle` in steps of
/// `config.angle_step_deg`; radii from `inner_radius` to `outer_radius` in steps
/// of `config.radius_step`. Both grids include the upper bound when the span is
/// a whole number of steps.
///
/// Polar image pixels outside the raster are 0. An angle with no in-bounds
/// sample gets intensity 0.
///
/// # Errors
/// * `AnalysisError::FormatMismatch` - image is not `Luma8`
/// * `AnalysisError::InvalidAngleRange` - non-finite bounds or `min_angle >= max_angle`
/// * `AnalysisError::InvalidRadiusRange` - not `0 <= inner < outer`, or `outer` infinite
/// * `AnalysisError::InvalidStep` - non-positive or non-finite step, or a grid
///   beyond [`MAX_GRID_SAMPLES`] per axis or [`MAX_POLAR_PIXELS`] in total
pub fn radial_unwarp(
    image: &DynamicImage,
    frame: &PolarFrame,
    inner_radius: f64,
    outer_radius: f64,
    config: &UnwarpConfig,
) -> Result<PolarUnwarp, AnalysisError> {
    config.validate()?;
    if !frame.has_valid_window() {
        return Err(AnalysisError::InvalidAngleRange {
            min: frame.min_angle,
            max: frame.max_angle,
        });
    }
    if !(inner_radius >= 0.0 && inner_radius < outer_radius && outer_radius.is_finite()) {
        return Err(AnalysisError::InvalidRadiusRange {
            inner: inner_radius,
            outer: outer_radius,
        });
    }
    let view = gray_view(image).ok_or(AnalysisError::FormatMismatch)?;

    let angles = grid(frame.min_angle, frame.max_angle, config.angle_step_deg)
        .ok_or(AnalysisError::InvalidStep(config.angle_step_deg))?;
    let radii = grid(inner_radius, outer_radius, config.radius_step)
        .ok_or(AnalysisError::InvalidStep(config.radius_step))?;
    if angles
        .len()
        .checked_mul(radii.len())
        .is_none_or(|pixels| pixels > MAX_POLAR_PIXELS)
    {
        return Err(AnalysisError::InvalidStep(config.radius_step));
    }
    log::debug!(
        "Unwarping {} angles x {} radii around ({:.2}, {:.2})",
        angles.len(),
        radii.len(),
        frame.origin.x,
        frame.origin.y
    );

    let rows: Vec<(Vec<u8>, AngulagramPoint)> = angles
        .par_iter()
        .map(|&angle| {
            let mut row = Vec::with_capacity(radii.len());
            let mut total = 0.0;
            let mut in_bounds = 0usize;

            for &radius in &radii {
                let p = frame.to_cartesian(angle, radius);
                match sample(&view, &p, config.sampling) {
                    Some(value) => {
                        total += value;
                        in_bounds += 1;
                        row.push(value.round().clamp(0.0, 255.0) as u8);
                    }
                    None => row.push(0),
                }
            }

            let intensity = match (config.reduction, in_bounds) {
                (_, 0) => 0.0,
                (Reduction::Sum, _) => total,
                (Reduction::Mean, n) => total / n as f64,
            };
            (row, AngulagramPoint::new(angle, intensity))
        })
        .collect();

    let mut polar = Array2::<u8>::zeros((angles.len(), radii.len()));
    let mut points = Vec::with_capacity(angles.len());
    for (k, (row, point)) in rows.into_iter().enumerate() {
        for (j, value) in row.into_iter().enumerate() {
            polar[[k, j]] = value;
        }
        points.push(point);
    }

    Ok(PolarUnwarp {
        polar_image: array2_to_gray_image(&polar),
        angulagram: Angulagram { points },
        radii,
    })
}
