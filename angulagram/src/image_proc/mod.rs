//! Raster-level operations on single-channel 8-bit images
//!
//! - [`raster`]: grayscale views, array conversions, desaturation
//! - [`pixel_stats`]: moments, centroid, extrema, summed-area table
//! - [`edge_finder`]: radial edge probing for boundary candidates
//! - [`radial_unwarp`]: polar resampling and the angulagram
//! - [`profile`]: smoothing, extrema and interpolation on 1D curves

pub mod edge_finder;
pub mod pixel_stats;
pub mod profile;
pub mod radial_unwarp;
pub mod raster;

pub use edge_finder::find_edge_points;
pub use pixel_stats::{centroid, moment, ImageMoments};
pub use radial_unwarp::{radial_unwarp, PolarUnwarp};
pub use raster::{desaturate, gray_view, DesaturationMode};
