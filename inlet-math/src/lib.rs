//! Geometry for inlet analysis.
//!
//! Two independent pieces live here:
//!
//! - [`circle`]: the smallest circle enclosing a set of boundary points, used to
//!   turn edge-finder output into a single inlet circle.
//! - [`polar`]: the polar frame (origin, zero-angle reference, rotation sense)
//!   and the Cartesian/polar mappings built on it.
//!
//! Coordinates are image pixel coordinates: x grows to the right, y grows
//! downward.

pub mod circle;
pub mod polar;

pub use circle::{smallest_enclosing_circle, smallest_enclosing_circle_with_rng, Circle};
pub use polar::{normalize_angle_deg, AnnularSector, PolarCoord, PolarFrame};
