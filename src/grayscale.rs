//! Image files to sample matrices and back.
//!
//! - `load_matrix`: decode a PNG/JPEG/BMP/PNM file into a `SampleMatrix`
//! - `save_matrix`: render a `SampleMatrix` as a grayscale image file
//!
//! How color pixels become one intensity is fixed by a `GrayscaleRule`, so a
//! given source image always yields the same matrix.

use std::path::Path;
use std::str::FromStr;

use image::{DynamicImage, GrayImage, RgbaImage};
use log::debug;

use crate::usize;
use crate::error::{CodecError, Result};
use crate::matrix::SampleMatrix;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GrayscaleRule {
    /// Gray pixels (R = G = B) keep their level, colored pixels become 0.
    /// Alpha is ignored.
    #[default]
    Exact,
    /// Rec. 709 luma, as computed by the `image` crate
    Luma,
}

impl FromStr for GrayscaleRule {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "exact" => Ok(Self::Exact),
            "luma" => Ok(Self::Luma),
            _ => Err(format!("unknown grayscale rule '{s}', expected 'exact' or 'luma'")),
        }
    }
}

pub fn load_matrix(path: &Path, rule: GrayscaleRule) -> Result<SampleMatrix> {
    let image = image::open(path)?;
    debug!("loaded {} ({}x{}, {:?})", path.display(), image.width(), image.height(), image.color());
    to_matrix(&image, rule)
}

pub fn to_matrix(image: &DynamicImage, rule: GrayscaleRule) -> Result<SampleMatrix> {
    if image.width() == 0 || image.height() == 0 {
        return Err(CodecError::EmptyInput);
    }
    match rule {
        GrayscaleRule::Exact => Ok(exact_gray(&image.to_rgba8())),
        GrayscaleRule::Luma => {
            let gray = image.to_luma8();
            let (width, height) = (usize!(gray.width()), usize!(gray.height()));
            SampleMatrix::from_raw(width, height, gray.into_raw())
        }
    }
}

fn exact_gray(image: &RgbaImage) -> SampleMatrix {
    let data = image
        .pixels()
        .map(|pixel| match pixel.0 {
            [r, g, b, _] if r == g && g == b => r,
            _ => 0,
        })
        .collect();
    let (width, height) = (usize!(image.width()), usize!(image.height()));
    SampleMatrix::from_raw(width, height, data).unwrap_or_else(|_| unreachable!("one sample per pixel"))
}

/// Each sample becomes a gray pixel of the same level
pub fn to_image(matrix: &SampleMatrix) -> Result<GrayImage> {
    if matrix.is_empty() {
        return Err(CodecError::EmptyInput);
    }
    let too_large = || CodecError::TooLarge { width: matrix.width(), height: matrix.height() };
    let width = u32::try_from(matrix.width()).map_err(|_| too_large())?;
    let height = u32::try_from(matrix.height()).map_err(|_| too_large())?;
    GrayImage::from_raw(width, height, matrix.samples().to_vec()).ok_or_else(too_large)
}

/// Writes the matrix as a grayscale image, format chosen by the file extension
pub fn save_matrix(matrix: &SampleMatrix, path: &Path) -> Result<()> {
    to_image(matrix)?.save(path)?;
    debug!("saved {}x{} image to {}", matrix.width(), matrix.height(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use image::{DynamicImage, Rgba, RgbaImage};

    use super::{load_matrix, save_matrix, to_image, to_matrix, GrayscaleRule};
    use crate::error::CodecError;
    use crate::matrix::SampleMatrix;

    fn sample_image() -> DynamicImage {
        let mut image = RgbaImage::new(3, 2);
        image.put_pixel(0, 0, Rgba([10, 10, 10, 255]));
        image.put_pixel(1, 0, Rgba([200, 200, 200, 0]));
        image.put_pixel(2, 0, Rgba([255, 0, 0, 255]));
        image.put_pixel(0, 1, Rgba([0, 0, 0, 255]));
        image.put_pixel(1, 1, Rgba([255, 255, 255, 255]));
        image.put_pixel(2, 1, Rgba([1, 2, 3, 255]));
        DynamicImage::ImageRgba8(image)
    }

    #[test]
    fn exact_rule_zeroes_colored_pixels() {
        let matrix = to_matrix(&sample_image(), GrayscaleRule::Exact).unwrap();
        assert_eq!(matrix, SampleMatrix::from_rows(&[[10u8, 200, 0], [0, 255, 0]]).unwrap());
    }

    #[test]
    fn luma_rule_keeps_gray_levels() {
        let matrix = to_matrix(&sample_image(), GrayscaleRule::Luma).unwrap();
        assert_eq!((matrix.width(), matrix.height()), (3, 2));
        assert_eq!(matrix.get(0, 0), Some(10));
        assert_eq!(matrix.get(1, 1), Some(255));
        // pure red is dim but not black
        assert!(matrix.get(2, 0).unwrap() > 0);
    }

    #[test]
    fn empty_image() {
        let image = DynamicImage::ImageRgba8(RgbaImage::new(0, 0));
        assert!(matches!(to_matrix(&image, GrayscaleRule::Exact), Err(CodecError::EmptyInput)));
        assert!(matches!(to_image(&SampleMatrix::default()), Err(CodecError::EmptyInput)));
    }

    #[test]
    fn rule_names() {
        assert_eq!("exact".parse::<GrayscaleRule>(), Ok(GrayscaleRule::Exact));
        assert_eq!("luma".parse::<GrayscaleRule>(), Ok(GrayscaleRule::Luma));
        assert!("rgb".parse::<GrayscaleRule>().is_err());
    }

    #[test]
    fn png_round_trip() {
        let matrix = SampleMatrix::from_rows(&[[0u8, 64, 128], [192, 255, 7]]).unwrap();
        let path = Path::new("grayscale_png_round_trip.png");
        save_matrix(&matrix, path).unwrap();
        let loaded = load_matrix(path, GrayscaleRule::Exact);
        std::fs::remove_file(path).unwrap();
        assert_eq!(loaded.unwrap(), matrix);
    }
}
