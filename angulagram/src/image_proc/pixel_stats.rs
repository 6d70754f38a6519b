//! Pixel statistics over single-channel 8-bit rasters.
//!
//! Every function here checks the raster format first. On anything other than
//! `Luma8` it logs a warning and returns a fixed sentinel instead of failing:
//!
//! | function              | sentinel                 |
//! |-----------------------|--------------------------|
//! | [`moment`]            | `0.0`                    |
//! | [`centroid`]          | geometric image center   |
//! | [`summed_area_table`] | empty (0x0) image        |
//! | [`min_value`]         | `0`                      |
//! | [`max_value`]         | `255`                    |
//! | [`points_with_value`] | empty vector             |
//!
//! Sentinels mean "not computable"; a returned 0 or 255 is not a measurement.

use image::{DynamicImage, GenericImageView, GrayImage};
use nalgebra::Point2;
use ndarray::{Array2, ArrayView2};

use super::raster::{array2_to_gray_image, gray_view};

/// Raw image moments up to second order.
///
/// Pixel `(x, y)` is weighted by its intensity; x is the column index and y the
/// row index.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ImageMoments {
    /// Total intensity (zeroth moment)
    pub m00: f64,
    /// First moment in x direction
    pub m10: f64,
    /// First moment in y direction
    pub m01: f64,
    /// Second moment xy (cross term)
    pub m11: f64,
    /// Second moment in x direction (x^2)
    pub m20: f64,
    /// Second moment in y direction (y^2)
    pub m02: f64,
}

impl ImageMoments {
    /// Calculate all moments in a single pass
    pub fn from_view(data: &ArrayView2<u8>) -> Self {
        let mut moments = Self::default();

        for ((y, x), &value) in data.indexed_iter() {
            if value == 0 {
                continue;
            }
            let v = value as f64;
            let x = x as f64;
            let y = y as f64;

            moments.m00 += v;
            moments.m10 += x * v;
            moments.m01 += y * v;
            moments.m11 += x * y * v;
            moments.m20 += x * x * v;
            moments.m02 += y * y * v;
        }

        moments
    }

    /// Intensity-weighted centroid, `None` when the total intensity is zero
    pub fn centroid(&self) -> Option<Point2<f64>> {
        if self.m00 <= 0.0 {
            return None;
        }
        Some(Point2::new(self.m10 / self.m00, self.m01 / self.m00))
    }
}

fn warn_format(operation: &str) {
    log::warn!("{operation}: raster is not single-channel 8-bit, returning sentinel");
}

/// Raw moment `M_pq = sum I(x, y) * x^p * y^q` over all pixels
pub fn moment(image: &DynamicImage, p: i32, q: i32) -> f64 {
    let Some(view) = gray_view(image) else {
        warn_format("moment");
        return 0.0;
    };

    view.indexed_iter()
        .filter(|(_, &value)| value != 0)
        .map(|((y, x), &value)| value as f64 * (x as f64).powi(p) * (y as f64).powi(q))
        .sum()
}

/// Intensity centroid `(M10 / M00, M01 / M00)`.
///
/// An all-black raster (and a format mismatch) gives the geometric center
/// `(width / 2, height / 2)`.
pub fn centroid(image: &DynamicImage) -> Point2<f64> {
    let (width, height) = image.dimensions();
    let geometric_center = Point2::new(width as f64 / 2.0, height as f64 / 2.0);

    let Some(view) = gray_view(image) else {
        warn_format("centroid");
        return geometric_center;
    };

    ImageMoments::from_view(&view)
        .centroid()
        .unwrap_or_else(|| {
            log::debug!("centroid: zero total intensity, using image center");
            geometric_center
        })
}

/// Saturating summed-area table.
///
/// Each output pixel is its input value plus the table values to the left and
/// above, minus the one diagonally above-left (0 outside the raster), clamped
/// to `0..=255` at every step. This is a visualization aid: once a prefix sum
/// reaches 255 it stays there, so it is only exact for small or dark rasters.
pub fn summed_area_table(image: &DynamicImage) -> GrayImage {
    let Some(view) = gray_view(image) else {
        warn_format("summed_area_table");
        return GrayImage::new(0, 0);
    };

    let (height, width) = view.dim();
    let mut table = Array2::<u8>::zeros((height, width));

    for y in 0..height {
        for x in 0..width {
            let left = if x > 0 { table[[y, x - 1]] as i32 } else { 0 };
            let top = if y > 0 { table[[y - 1, x]] as i32 } else { 0 };
            let top_left = if x > 0 && y > 0 {
                table[[y - 1, x - 1]] as i32
            } else {
                0
            };
            let sum = view[[y, x]] as i32 + left + top - top_left;
            table[[y, x]] = sum.clamp(0, 255) as u8;
        }
    }

    array2_to_gray_image(&table)
}

/// Smallest pixel value; `0` on format mismatch, `255` for an empty raster
pub fn min_value(image: &DynamicImage) -> u8 {
    let Some(view) = gray_view(image) else {
        warn_format("min_value");
        return 0;
    };
    view.iter().copied().fold(u8::MAX, u8::min)
}

/// Largest pixel value; `255` on format mismatch, `0` for an empty raster
pub fn max_value(image: &DynamicImage) -> u8 {
    let Some(view) = gray_view(image) else {
        warn_format("max_value");
        return 255;
    };
    view.iter().copied().fold(u8::MIN, u8::max)
}

/// Coordinates of every pixel equal to `value`, in row-major scan order
pub fn points_with_value(image: &DynamicImage, value: u8) -> Vec<Point2<f64>> {
    let Some(view) = gray_view(image) else {
        warn_format("points_with_value");
        return Vec::new();
    };

    view.indexed_iter()
        .filter(|(_, &v)| v == value)
        .map(|((y, x), _)| Point2::new(x as f64, y as f64))
        .collect()
}

/// Arithmetic mean of a point set, `(0, 0)` when empty
pub fn mass_center(points: &[Point2<f64>]) -> Point2<f64> {
    if points.is_empty() {
        return Point2::origin();
    }
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Point2::new(sx / n, sy / n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use image::{Luma, RgbImage};

    fn gray(width: u32, height: u32, f: impl Fn(u32, u32) -> u8) -> DynamicImage {
        DynamicImage::ImageLuma8(GrayImage::from_fn(width, height, |x, y| Luma([f(x, y)])))
    }

    fn colour() -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::new(4, 4))
    }

    #[test]
    fn test_moments_of_small_raster() {
        // 2x2: [[1, 2], [3, 4]]
        let img = gray(2, 2, |x, y| (1 + x + 2 * y) as u8);
        assert_relative_eq!(moment(&img, 0, 0), 10.0);
        // x-weighted: 2 + 4
        assert_relative_eq!(moment(&img, 1, 0), 6.0);
        // y-weighted: 3 + 4
        assert_relative_eq!(moment(&img, 0, 1), 7.0);
        assert_relative_eq!(moment(&img, 1, 1), 4.0);
        assert_relative_eq!(moment(&img, 2, 0), 6.0);
    }

    #[test]
    fn test_image_moments_match_moment() {
        let img = gray(7, 5, |x, y| ((x * 31 + y * 17) % 256) as u8);
        let moments = ImageMoments::from_view(&gray_view(&img).unwrap());
        assert_relative_eq!(moments.m00, moment(&img, 0, 0));
        assert_relative_eq!(moments.m10, moment(&img, 1, 0));
        assert_relative_eq!(moments.m01, moment(&img, 0, 1));
        assert_relative_eq!(moments.m11, moment(&img, 1, 1));
        assert_relative_eq!(moments.m20, moment(&img, 2, 0));
        assert_relative_eq!(moments.m02, moment(&img, 0, 2));
    }

    #[test]
    fn test_centroid_single_pixel() {
        let img = gray(20, 15, |x, y| if (x, y) == (13, 4) { 77 } else { 0 });
        let c = centroid(&img);
        assert_eq!(c, Point2::new(13.0, 4.0));
    }

    #[test]
    fn test_centroid_of_black_raster_is_center() {
        let img = gray(10, 6, |_, _| 0);
        assert_eq!(centroid(&img), Point2::new(5.0, 3.0));
    }

    #[test]
    fn test_centroid_symmetric_blob() {
        let img = gray(11, 11, |x, y| {
            let (dx, dy) = (x as i32 - 5, y as i32 - 5);
            if dx * dx + dy * dy <= 9 {
                200
            } else {
                0
            }
        });
        let c = centroid(&img);
        assert_relative_eq!(c.x, 5.0, epsilon = 1e-12);
        assert_relative_eq!(c.y, 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_summed_area_table_exact_when_small() {
        let img = gray(3, 3, |_, _| 1);
        let table = summed_area_table(&img);
        assert_eq!(table.dimensions(), (3, 3));
        assert_eq!(table.get_pixel(0, 0)[0], 1);
        assert_eq!(table.get_pixel(2, 0)[0], 3);
        assert_eq!(table.get_pixel(1, 1)[0], 4);
        assert_eq!(table.get_pixel(2, 2)[0], 9);
    }

    #[test]
    fn test_summed_area_table_saturates() {
        let img = gray(6, 6, |_, _| 255);
        let table = summed_area_table(&img);
        assert!(table.pixels().all(|p| p[0] == 255));
    }

    #[test]
    fn test_min_max() {
        let img = gray(4, 4, |x, y| (10 + x * 3 + y * 20) as u8);
        assert_eq!(min_value(&img), 10);
        assert_eq!(max_value(&img), 79);
    }

    #[test]
    fn test_points_with_value_row_major() {
        let img = gray(3, 3, |x, y| if x == y || (x, y) == (2, 0) { 9 } else { 0 });
        let points = points_with_value(&img, 9);
        assert_eq!(
            points,
            vec![
                Point2::new(0.0, 0.0),
                Point2::new(2.0, 0.0),
                Point2::new(1.0, 1.0),
                Point2::new(2.0, 2.0),
            ]
        );
        assert!(points_with_value(&img, 200).is_empty());
    }

    #[test]
    fn test_mass_center() {
        assert_eq!(mass_center(&[]), Point2::origin());
        let c = mass_center(&[
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(2.0, 6.0),
        ]);
        assert_relative_eq!(c.x, 2.0);
        assert_relative_eq!(c.y, 2.0);
    }

    #[test]
    fn test_format_mismatch_sentinels() {
        let img = colour();
        assert_eq!(moment(&img, 0, 0), 0.0);
        assert_eq!(centroid(&img), Point2::new(2.0, 2.0));
        assert_eq!(summed_area_table(&img).dimensions(), (0, 0));
        assert_eq!(min_value(&img), 0);
        assert_eq!(max_value(&img), 255);
        assert!(points_with_value(&img, 0).is_empty());
    }
}
