//! One-dimensional curve utilities for angulagram evaluation.
//!
//! - **Gaussian smoothing** of intensities over angle
//! - **Local extrema** for peak and valley picking
//! - **Linear interpolation** on a sorted curve

use thiserror::Error;

use super::radial_unwarp::AngulagramPoint;

/// Why a curve could not be evaluated
#[derive(Error, Debug, PartialEq)]
pub enum InterpError {
    #[error("{0} lies outside the curve's range [{1}, {2}]")]
    OutOfBounds(f64, f64, f64),
    #[error("Curve needs at least two points")]
    InsufficientData,
    #[error("Curve x and y lengths differ")]
    MismatchedLengths,
    #[error("Curve x values are not strictly increasing")]
    UnsortedData,
}

/// Piecewise-linear value of the curve `(xs, ys)` at `x`.
///
/// Extrapolation is an error: `x` must lie within `[xs[0], xs[n - 1]]`.
pub fn interp(x: f64, xs: &[f64], ys: &[f64]) -> Result<f64, InterpError> {
    if xs.len() != ys.len() {
        return Err(InterpError::MismatchedLengths);
    }
    let (first, last) = match xs {
        [first, .., last] => (*first, *last),
        _ => return Err(InterpError::InsufficientData),
    };
    if xs.windows(2).any(|w| w[1] <= w[0]) {
        return Err(InterpError::UnsortedData);
    }
    if !(first..=last).contains(&x) {
        return Err(InterpError::OutOfBounds(x, first, last));
    }

    // First knot at or past x; never beyond the last knot since x <= last
    let hi = xs.partition_point(|&knot| knot < x);
    if xs[hi] == x {
        return Ok(ys[hi]);
    }
    let lo = hi - 1;
    let t = (x - xs[lo]) / (xs[hi] - xs[lo]);
    Ok(ys[lo] + t * (ys[hi] - ys[lo]))
}

/// Normalized 1D Gaussian kernel with half-width `ceil(3 * sigma)`.
///
/// A non-positive sigma gives the identity kernel `[1.0]`.
pub fn gaussian_kernel_1d(sigma: f64) -> Vec<f64> {
    if !(sigma > 0.0) {
        return vec![1.0];
    }

    let half = (3.0 * sigma).ceil() as i64;
    let kernel: Vec<f64> = (-half..=half)
        .map(|i| (-((i * i) as f64) / (2.0 * sigma * sigma)).exp())
        .collect();
    let sum: f64 = kernel.iter().sum();
    kernel.into_iter().map(|k| k / sum).collect()
}

/// Smooth intensities with a Gaussian of `sigma_samples` (in samples, not degrees).
///
/// Samples beyond either end replicate the end value. Angles are unchanged.
pub fn gaussian_smooth(points: &[AngulagramPoint], sigma_samples: f64) -> Vec<AngulagramPoint> {
    let kernel = gaussian_kernel_1d(sigma_samples);
    let half = (kernel.len() / 2) as i64;
    let last = points.len() as i64 - 1;

    points
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let intensity = kernel
                .iter()
                .enumerate()
                .map(|(k, weight)| {
                    let j = (i as i64 + k as i64 - half).clamp(0, last) as usize;
                    weight * points[j].intensity
                })
                .sum();
            AngulagramPoint::new(point.angle_deg, intensity)
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtremumKind {
    Maximum,
    Minimum,
}

/// A local extremum of a curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extremum {
    pub kind: ExtremumKind,
    /// Index into the input slice
    pub index: usize,
    pub angle_deg: f64,
    pub intensity: f64,
}

/// Local maxima and minima of the interior samples, in angle order.
///
/// A plateau counts once, at its first sample, when the values on both sides
/// are lower (maximum) or higher (minimum). End points are never reported.
pub fn find_extrema(points: &[AngulagramPoint]) -> Vec<Extremum> {
    let mut extrema = Vec::new();
    if points.len() < 3 {
        return extrema;
    }

    let mut i = 1;
    while i < points.len() - 1 {
        let value = points[i].intensity;
        let before = points[i - 1].intensity;

        // Walk to the end of a plateau starting here
        let mut end = i;
        while end + 1 < points.len() && points[end + 1].intensity == value {
            end += 1;
        }
        if end + 1 >= points.len() {
            break;
        }
        let after = points[end + 1].intensity;

        let kind = if value > before && value > after {
            Some(ExtremumKind::Maximum)
        } else if value < before && value < after {
            Some(ExtremumKind::Minimum)
        } else {
            None
        };

        if let Some(kind) = kind {
            extrema.push(Extremum {
                kind,
                index: i,
                angle_deg: points[i].angle_deg,
                intensity: value,
            });
        }
        i = end + 1;
    }

    extrema
}
