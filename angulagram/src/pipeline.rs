//! End-to-end inlet analysis: edge probing, circle fit, polar frame, unwarp.

use image::{DynamicImage, GrayImage};
use inlet_math::{smallest_enclosing_circle_with_rng, Circle, PolarFrame};
use nalgebra::{Point2, Vector2};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::image_proc::edge_finder::find_edge_points;
use crate::image_proc::pixel_stats::centroid;
use crate::image_proc::radial_unwarp::{radial_unwarp, Angulagram, UnwarpConfig};
use crate::image_proc::raster::centered_square_crop;

/// Parameters for [`analyze_inlet`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisParams {
    /// Edge probing start point; `None` uses the intensity centroid
    pub center: Option<Point2<f64>>,
    pub min_angle: f64,
    pub max_angle: f64,
    pub zero_angle_deg: f64,
    pub counter_clockwise: bool,
    /// Inner sampling radius as a fraction of the inlet radius
    pub inner_radius_fraction: f64,
    /// Outer sampling radius as a fraction of the inlet radius
    pub outer_radius_fraction: f64,
    pub unwarp: UnwarpConfig,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            center: None,
            min_angle: -180.0,
            max_angle: 180.0,
            zero_angle_deg: 0.0,
            counter_clockwise: true,
            inner_radius_fraction: 0.0,
            outer_radius_fraction: 1.0,
            unwarp: UnwarpConfig::default(),
        }
    }
}

impl AnalysisParams {
    pub fn validate(&self) -> Result<(), AnalysisError> {
        self.unwarp.validate()?;
        if !self.frame_at(Point2::origin()).has_valid_window() {
            return Err(AnalysisError::InvalidAngleRange {
                min: self.min_angle,
                max: self.max_angle,
            });
        }
        if !(self.inner_radius_fraction >= 0.0
            && self.inner_radius_fraction < self.outer_radius_fraction
            && self.outer_radius_fraction.is_finite())
        {
            return Err(AnalysisError::InvalidRadiusRange {
                inner: self.inner_radius_fraction,
                outer: self.outer_radius_fraction,
            });
        }
        Ok(())
    }

    /// Frame placed on `origin` with these parameters' angle settings
    pub fn frame_at(&self, origin: Point2<f64>) -> PolarFrame {
        PolarFrame::new(origin)
            .with_zero_angle(self.zero_angle_deg)
            .with_counter_clockwise(self.counter_clockwise)
            .with_angle_range(self.min_angle, self.max_angle)
    }
}

/// Everything produced by one analysis run
#[derive(Debug, Clone)]
pub struct InletAnalysis {
    /// Boundary candidates in full-image pixel coordinates
    pub edge_points: Vec<Point2<f64>>,
    pub inlet: Circle,
    pub frame: PolarFrame,
    pub polar_image: GrayImage,
    pub angulagram: Angulagram,
}

/// Run the full analysis on a `Luma8` image
pub fn analyze_inlet(
    image: &DynamicImage,
    params: &AnalysisParams,
) -> Result<InletAnalysis, AnalysisError> {
    analyze_inlet_with_rng(image, params, &mut rand::rng())
}

/// [`analyze_inlet`] with the circle fit's shuffle driven by `rng`
pub fn analyze_inlet_with_rng<R: Rng + ?Sized>(
    image: &DynamicImage,
    params: &AnalysisParams,
    rng: &mut R,
) -> Result<InletAnalysis, AnalysisError> {
    params.validate()?;
    let gray = image.as_luma8().ok_or(AnalysisError::FormatMismatch)?;

    let start = params.center.unwrap_or_else(|| centroid(image));
    log::info!("Probing for inlet edges from ({:.2}, {:.2})", start.x, start.y);

    let (crop, (x0, y0)) = centered_square_crop(gray, &start).ok_or(
        AnalysisError::CenterOutsideImage {
            x: start.x,
            y: start.y,
        },
    )?;
    let offset = Vector2::new(x0 as f64, y0 as f64);
    log::debug!(
        "Edge search window {}x{} at offset ({x0}, {y0})",
        crop.width(),
        crop.height()
    );

    let edge_points: Vec<Point2<f64>> =
        find_edge_points(&DynamicImage::ImageLuma8(crop), &(start - offset))
            .into_iter()
            .map(|p| p + offset)
            .collect();
    if edge_points.is_empty() {
        return Err(AnalysisError::NoEdgePoints);
    }

    let inlet = smallest_enclosing_circle_with_rng(&edge_points, rng);
    if !inlet.is_valid() || inlet.radius <= 0.0 {
        log::warn!(
            "Circle fit over {} edge points is degenerate (radius {})",
            edge_points.len(),
            inlet.radius
        );
        return Err(AnalysisError::DegenerateCircle);
    }
    log::info!(
        "Inlet at ({:.2}, {:.2}), radius {:.2}, from {} edge points",
        inlet.center.x,
        inlet.center.y,
        inlet.radius,
        edge_points.len()
    );

    let frame = params.frame_at(inlet.center);
    let unwarp = radial_unwarp(
        image,
        &frame,
        params.inner_radius_fraction * inlet.radius,
        params.outer_radius_fraction * inlet.radius,
        &params.unwarp,
    )?;

    Ok(InletAnalysis {
        edge_points,
        inlet,
        frame,
        polar_image: unwarp.polar_image,
        angulagram: unwarp.angulagram,
    })
}
