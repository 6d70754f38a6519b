//! Inlet detection and angular intensity profiles for radially symmetric images.
//!
//! The usual flow, packaged by [`pipeline::analyze_inlet`]:
//!
//! 1. [`image_proc::edge_finder`] probes eight directions from a start point and
//!    returns sub-pixel boundary candidates.
//! 2. [`inlet_math::smallest_enclosing_circle`] turns them into the inlet circle.
//! 3. An [`inlet_math::PolarFrame`] is placed on the inlet center.
//! 4. [`image_proc::radial_unwarp`] resamples the image in that frame into a
//!    polar image and an angulagram (intensity vs. angle).
//!
//! Everything operates on single-channel 8-bit rasters. Colour input is
//! converted at the boundary with [`image_proc::raster::desaturate`].

pub mod error;
pub mod image_proc;
pub mod pipeline;

pub use error::AnalysisError;
pub use image_proc::radial_unwarp::{Angulagram, AngulagramPoint, UnwarpConfig};
pub use pipeline::{analyze_inlet, analyze_inlet_with_rng, AnalysisParams, InletAnalysis};
