//! Polar frame over image pixel coordinates.
//!
//! A [`PolarFrame`] places an origin on the image and measures angles from a
//! zero-angle reference given relative to the 3 o'clock axis. Internally angles
//! always increase counterclockwise as seen on screen; because image rows grow
//! downward, a positive angle therefore points "up" (negative y).
//!
//! The `counter_clockwise` flag does not enter the mapping. It only decides
//! the sign of angles shown to a user, see [`PolarFrame::to_display_angle`].

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Substitute for a zero x component in the arctangent
const ZERO_X_SUBSTITUTE: f64 = 1e-5;

/// Wrap an angle in degrees into `(-180, 180]`
pub fn normalize_angle_deg(angle_deg: f64) -> f64 {
    let wrapped = angle_deg.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// A point expressed in a polar frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolarCoord {
    /// Angle in degrees, in `(-180, 180]`
    pub angle_deg: f64,
    /// Distance from the frame origin in pixels
    pub radius: f64,
}

/// Origin, zero-angle reference, rotation sense and angular window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolarFrame {
    /// Frame origin in pixel coordinates
    pub origin: Point2<f64>,
    /// Direction of angle 0, in degrees counterclockwise from the 3 o'clock axis
    pub zero_angle_deg: f64,
    /// Whether displayed angles grow counterclockwise
    pub counter_clockwise: bool,
    /// Lower bound of the angular window in degrees
    pub min_angle: f64,
    /// Upper bound of the angular window in degrees
    pub max_angle: f64,
}

impl PolarFrame {
    /// Frame at `origin` with zero angle at 3 o'clock and a full-turn window
    pub fn new(origin: Point2<f64>) -> Self {
        Self {
            origin,
            zero_angle_deg: 0.0,
            counter_clockwise: true,
            min_angle: -180.0,
            max_angle: 180.0,
        }
    }

    pub fn with_zero_angle(mut self, zero_angle_deg: f64) -> Self {
        self.zero_angle_deg = zero_angle_deg;
        self
    }

    pub fn with_counter_clockwise(mut self, counter_clockwise: bool) -> Self {
        self.counter_clockwise = counter_clockwise;
        self
    }

    pub fn with_angle_range(mut self, min_angle: f64, max_angle: f64) -> Self {
        self.min_angle = min_angle;
        self.max_angle = max_angle;
        self
    }

    /// True when the window can be sampled: finite bounds, `min_angle < max_angle`
    pub fn has_valid_window(&self) -> bool {
        self.min_angle.is_finite() && self.max_angle.is_finite() && self.min_angle < self.max_angle
    }

    /// Width of the angular window in degrees
    pub fn angle_span(&self) -> f64 {
        self.max_angle - self.min_angle
    }

    /// Pixel position at `angle_deg` and `radius` in this frame
    pub fn to_cartesian(&self, angle_deg: f64, radius: f64) -> Point2<f64> {
        let angle = (self.zero_angle_deg + angle_deg).to_radians();
        Point2::new(
            self.origin.x + radius * angle.cos(),
            self.origin.y - radius * angle.sin(),
        )
    }

    /// Polar coordinates of a pixel position.
    ///
    /// The origin itself maps to angle 0, radius 0. Inverse of
    /// [`to_cartesian`](Self::to_cartesian) up to round-off; an x component of
    /// exactly zero is replaced by a tiny positive value before the arctangent.
    pub fn to_polar(&self, point: &Point2<f64>) -> PolarCoord {
        let rel = point - self.origin;
        // Flip y so the math below is in the usual y-up orientation
        let (mx, my) = (rel.x, -rel.y);

        let (sin_z, cos_z) = self.zero_angle_deg.to_radians().sin_cos();
        let x = mx * cos_z + my * sin_z;
        let y = -mx * sin_z + my * cos_z;

        let radius = x.hypot(y);
        let x = if x == 0.0 { ZERO_X_SUBSTITUTE } else { x };
        let mut angle_deg = (y / x).atan().to_degrees();
        if x < 0.0 {
            angle_deg += 180.0;
        }

        PolarCoord {
            angle_deg: normalize_angle_deg(angle_deg),
            radius,
        }
    }

    /// Angle as presented to a user: sign flipped for clockwise frames
    pub fn to_display_angle(&self, angle_deg: f64) -> f64 {
        if self.counter_clockwise {
            angle_deg
        } else {
            -angle_deg
        }
    }

    /// Inverse of [`to_display_angle`](Self::to_display_angle)
    pub fn from_display_angle(&self, display_deg: f64) -> f64 {
        self.to_display_angle(display_deg)
    }

    /// Whether `angle_deg` falls inside `[min_angle, max_angle]`.
    ///
    /// Angles are compared modulo 360, so a window such as `[170, 190]` or
    /// `[-200, -160]` accepts angles on both sides of the 180° seam.
    pub fn angle_in_range(&self, angle_deg: f64) -> bool {
        let span = self.angle_span();
        if span < 0.0 {
            return false;
        }
        if span >= 360.0 {
            return true;
        }
        (angle_deg - self.min_angle).rem_euclid(360.0) <= span
    }

    /// Save to JSON file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, json)
    }

    /// Load from JSON file
    pub fn load_from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}

/// Annular sector selection: a ring between two radii, cut to the frame's window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnularSector {
    pub frame: PolarFrame,
    pub inner_radius: f64,
    pub outer_radius: f64,
}

impl AnnularSector {
    pub fn new(frame: PolarFrame, inner_radius: f64, outer_radius: f64) -> Self {
        Self {
            frame,
            inner_radius,
            outer_radius,
        }
    }

    /// Whether a pixel position lies inside the sector (bounds inclusive)
    pub fn contains(&self, point: &Point2<f64>) -> bool {
        let polar = self.frame.to_polar(point);
        polar.radius >= self.inner_radius
            && polar.radius <= self.outer_radius
            && self.frame.angle_in_range(polar.angle_deg)
    }
}
