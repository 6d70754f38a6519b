use thiserror::Error;

/// Errors from parameter validation, the analysis pipeline and file I/O.
///
/// The per-pixel and geometric primitives never return these; they fall back
/// to documented sentinel values instead.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Angle range [{min}, {max}] is empty: min must be below max")]
    InvalidAngleRange { min: f64, max: f64 },

    #[error("Radius range [{inner}, {outer}] is invalid: need 0 <= inner < outer")]
    InvalidRadiusRange { inner: f64, outer: f64 },

    #[error("Sampling step {0} is not positive and finite, or gives too many samples")]
    InvalidStep(f64),

    #[error("Raster is not single-channel 8-bit grayscale")]
    FormatMismatch,

    #[error("Start point ({x:.2}, {y:.2}) is not inside the image")]
    CenterOutsideImage { x: f64, y: f64 },

    #[error("No edge points found around the start point")]
    NoEdgePoints,

    #[error("Edge points do not define an inlet circle")]
    DegenerateCircle,

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
