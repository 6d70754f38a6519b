//! Grayscale raster access and conversions.
//!
//! All analysis runs on `image::GrayImage` data (one 8-bit channel). Public
//! operations accept a `DynamicImage` and check the format through
//! [`gray_view`]; anything that is not `Luma8` is a format mismatch.

use clap::ValueEnum;
use image::{DynamicImage, GrayImage, Luma};
use nalgebra::Point2;
use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

/// Borrow a `Luma8` image as a `(rows, cols)` array view.
///
/// Returns `None` when the image is not single-channel 8-bit. Callers treat
/// that as "not computable" and fall back to their sentinel value.
pub fn gray_view(image: &DynamicImage) -> Option<ArrayView2<'_, u8>> {
    let gray = image.as_luma8()?;
    let (width, height) = gray.dimensions();
    ArrayView2::from_shape((height as usize, width as usize), gray.as_raw().as_slice()).ok()
}

/// Converts an ndarray Array2<u8> to an image::GrayImage
///
/// Array indices `[y, x]` map to pixel coordinates `(x, y)`; the array shape is
/// `(height, width)` while image dimensions are `(width, height)`.
pub fn array2_to_gray_image(arr: &Array2<u8>) -> GrayImage {
    let (height, width) = arr.dim();
    let mut img = GrayImage::new(width as u32, height as u32);

    for ((y, x), &value) in arr.indexed_iter() {
        img.put_pixel(x as u32, y as u32, Luma([value]));
    }

    img
}

/// How colour pixels are reduced to a single 8-bit channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum DesaturationMode {
    /// ITU-R BT.601 luma weights (0.299, 0.587, 0.114)
    #[default]
    Luminosity,
    /// Plain mean of R, G and B
    Average,
    /// Midpoint of the largest and smallest channel
    Lightness,
    /// Red channel only
    Red,
    /// Green channel only
    Green,
    /// Blue channel only
    Blue,
}

impl DesaturationMode {
    /// Gray value for one RGB pixel
    pub fn apply(self, [r, g, b]: [u8; 3]) -> u8 {
        let (rf, gf, bf) = (r as f64, g as f64, b as f64);
        let value = match self {
            DesaturationMode::Luminosity => 0.299 * rf + 0.587 * gf + 0.114 * bf,
            DesaturationMode::Average => (rf + gf + bf) / 3.0,
            DesaturationMode::Lightness => {
                let max = r.max(g).max(b) as f64;
                let min = r.min(g).min(b) as f64;
                (max + min) / 2.0
            }
            DesaturationMode::Red => rf,
            DesaturationMode::Green => gf,
            DesaturationMode::Blue => bf,
        };
        value.round().clamp(0.0, 255.0) as u8
    }
}

/// Reduce any image to a single 8-bit channel.
///
/// `Luma8` input is returned as is, whatever the mode.
pub fn desaturate(image: &DynamicImage, mode: DesaturationMode) -> GrayImage {
    if let Some(gray) = image.as_luma8() {
        return gray.clone();
    }

    let rgb = image.to_rgb8();
    let (width, height) = rgb.dimensions();
    GrayImage::from_fn(width, height, |x, y| {
        Luma([mode.apply(rgb.get_pixel(x, y).0)])
    })
}

/// Largest square crop centered on the pixel containing `center`.
///
/// Returns the crop and the pixel offset of its top-left corner, or `None` when
/// `center` lies outside the image or on its outer border row/column.
pub fn centered_square_crop(
    image: &GrayImage,
    center: &Point2<f64>,
) -> Option<(GrayImage, (u32, u32))> {
    let (width, height) = image.dimensions();
    if !(center.x >= 0.0 && center.y >= 0.0) {
        return None;
    }
    let cx = center.x.floor() as u64;
    let cy = center.y.floor() as u64;
    if cx >= width as u64 || cy >= height as u64 {
        return None;
    }

    let half = cx
        .min(cy)
        .min(width as u64 - cx)
        .min(height as u64 - cy) as u32;
    if half == 0 {
        return None;
    }

    let x0 = cx as u32 - half;
    let y0 = cy as u32 - half;
    let side = 2 * half;
    let crop = image::imageops::crop_imm(image, x0, y0, side, side).to_image();
    Some((crop, (x0, y0)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_gray_view_shape_and_values() {
        let img = GrayImage::from_fn(4, 3, |x, y| Luma([(10 * y + x) as u8]));
        let dynamic = DynamicImage::ImageLuma8(img);

        let view = gray_view(&dynamic).unwrap();
        assert_eq!(view.dim(), (3, 4));
        assert_eq!(view[[0, 0]], 0);
        assert_eq!(view[[2, 3]], 23);
        assert_eq!(view[[1, 2]], 12);
    }

    #[test]
    fn test_gray_view_rejects_colour() {
        let dynamic = DynamicImage::ImageRgb8(RgbImage::new(2, 2));
        assert!(gray_view(&dynamic).is_none());

        let wide = DynamicImage::ImageLuma16(image::ImageBuffer::new(2, 2));
        assert!(gray_view(&wide).is_none());
    }

    #[test]
    fn test_array_to_image_layout() {
        let arr = Array2::from_shape_fn((3, 5), |(y, x)| (y * 5 + x) as u8);
        let img = array2_to_gray_image(&arr);
        assert_eq!(img.dimensions(), (5, 3));
        assert_eq!(img.get_pixel(4, 2)[0], 14);

        // Back through the zero-copy view
        let dynamic = DynamicImage::ImageLuma8(img);
        assert_eq!(gray_view(&dynamic).unwrap(), arr.view());
    }

    #[test]
    fn test_desaturation_modes() {
        let px = [200, 100, 50];
        assert_eq!(DesaturationMode::Luminosity.apply(px), 124);
        assert_eq!(DesaturationMode::Average.apply(px), 117);
        assert_eq!(DesaturationMode::Lightness.apply(px), 125);
        assert_eq!(DesaturationMode::Red.apply(px), 200);
        assert_eq!(DesaturationMode::Green.apply(px), 100);
        assert_eq!(DesaturationMode::Blue.apply(px), 50);
    }

    #[test]
    fn test_desaturate_colour_image() {
        let rgb = RgbImage::from_pixel(3, 2, Rgb([30, 60, 90]));
        let gray = desaturate(&DynamicImage::ImageRgb8(rgb), DesaturationMode::Average);
        assert_eq!(gray.dimensions(), (3, 2));
        assert!(gray.pixels().all(|p| p[0] == 60));
    }

    #[test]
    fn test_desaturate_keeps_gray_input() {
        let img = GrayImage::from_fn(2, 2, |x, y| Luma([(x + 2 * y) as u8 * 40]));
        let out = desaturate(&DynamicImage::ImageLuma8(img.clone()), DesaturationMode::Red);
        assert_eq!(out, img);
    }

    #[test]
    fn test_centered_square_crop() {
        let img = GrayImage::from_fn(40, 30, |x, y| Luma([((x + y) % 256) as u8]));

        let (crop, offset) = centered_square_crop(&img, &Point2::new(20.5, 10.2)).unwrap();
        assert_eq!(offset, (10, 0));
        assert_eq!(crop.dimensions(), (20, 20));
        assert_eq!(crop.get_pixel(0, 0), img.get_pixel(10, 0));

        assert!(centered_square_crop(&img, &Point2::new(0.0, 10.0)).is_none());
        assert!(centered_square_crop(&img, &Point2::new(-1.0, 10.0)).is_none());
        assert!(centered_square_crop(&img, &Point2::new(45.0, 10.0)).is_none());
    }
}
