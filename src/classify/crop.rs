//! Crop boxes and crop encoding.

use crate::error::{Error, Result};
use crate::vision::NormalizedVertex;
use image::{DynamicImage, GenericImageView, ImageFormat};
use serde::{Deserialize, Serialize};
use std::io::Cursor;

/// Rectangle in pixel coordinates, edges as `(left, upper, right, lower)`.
///
/// Always has a positive area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CropBox {
    left: u32,
    upper: u32,
    right: u32,
    lower: u32,
}

impl CropBox {
    /// Create a box, rejecting boxes without area.
    pub fn new(left: u32, upper: u32, right: u32, lower: u32) -> Result<Self> {
        if right <= left || lower <= upper {
            return Err(Error::InvalidCropBox {
                left,
                upper,
                right,
                lower,
            });
        }
        Ok(Self {
            left,
            upper,
            right,
            lower,
        })
    }

    /// Scale a normalized bounding polygon to a `width` x `height` image.
    ///
    /// Coordinates are rounded to the nearest pixel and clamped to the image.
    /// Returns `None` when the polygon is empty or collapses to no area.
    pub fn from_normalized(vertices: &[NormalizedVertex], width: u32, height: u32) -> Option<Self> {
        if vertices.is_empty() {
            return None;
        }

        let (min_x, max_x, min_y, max_y) = vertices.iter().fold(
            (f32::MAX, f32::MIN, f32::MAX, f32::MIN),
            |(min_x, max_x, min_y, max_y), v| {
                (min_x.min(v.x), max_x.max(v.x), min_y.min(v.y), max_y.max(v.y))
            },
        );

        Self::new(
            scale(min_x, width),
            scale(min_y, height),
            scale(max_x, width),
            scale(max_y, height),
        )
        .ok()
    }

    /// Left edge.
    pub const fn left(&self) -> u32 {
        self.left
    }

    /// Upper edge.
    pub const fn upper(&self) -> u32 {
        self.upper
    }

    /// Right edge (exclusive).
    pub const fn right(&self) -> u32 {
        self.right
    }

    /// Lower edge (exclusive).
    pub const fn lower(&self) -> u32 {
        self.lower
    }

    /// Width in pixels.
    pub const fn width(&self) -> u32 {
        self.right - self.left
    }

    /// Height in pixels.
    pub const fn height(&self) -> u32 {
        self.lower - self.upper
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn scale(normalized: f32, extent: u32) -> u32 {
    let px = (f64::from(normalized) * f64::from(extent)).round();
    px.clamp(0.0, f64::from(extent)) as u32
}

/// Something that can produce encoded image bytes for a crop box.
pub trait CropSource {
    /// Encode the region under `crop` as a compressed image.
    fn encode_crop(&self, crop: CropBox) -> Result<Vec<u8>>;
}

impl CropSource for DynamicImage {
    fn encode_crop(&self, crop: CropBox) -> Result<Vec<u8>> {
        let (width, height) = self.dimensions();
        let right = crop.right.min(width);
        let lower = crop.lower.min(height);
        let bounded = CropBox::new(crop.left, crop.upper, right, lower)?;

        let region = self.crop_imm(
            bounded.left,
            bounded.upper,
            bounded.width(),
            bounded.height(),
        );
        // JPEG has no alpha channel.
        let rgb = DynamicImage::ImageRgb8(region.to_rgb8());

        let mut buf = Cursor::new(Vec::new());
        rgb.write_to(&mut buf, ImageFormat::Jpeg)
            .map_err(|e| Error::ImageEncode { source: e })?;
        Ok(buf.into_inner())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use image::RgbaImage;

    fn v(x: f32, y: f32) -> NormalizedVertex {
        NormalizedVertex { x, y }
    }

    #[test]
    fn test_new_rejects_empty_boxes() {
        assert!(CropBox::new(10, 10, 10, 50).is_err());
        assert!(CropBox::new(10, 50, 40, 20).is_err());
        assert!(CropBox::new(10, 10, 50, 50).is_ok());
    }

    #[test]
    fn test_from_normalized_scales_and_rounds() {
        let verts = [v(0.1, 0.2), v(0.5, 0.2), v(0.5, 0.75), v(0.1, 0.75)];
        let b = CropBox::from_normalized(&verts, 1024, 683).unwrap();
        // 0.1 * 1024 = 102.4, 0.2 * 683 = 136.6, 0.5 * 1024 = 512, 0.75 * 683 = 512.25
        assert_eq!((b.left(), b.upper(), b.right(), b.lower()), (102, 137, 512, 512));
    }

    #[test]
    fn test_from_normalized_clamps_to_image() {
        let verts = [v(-0.1, 0.0), v(1.2, 0.0), v(1.2, 1.0), v(-0.1, 1.0)];
        let b = CropBox::from_normalized(&verts, 100, 50).unwrap();
        assert_eq!((b.left(), b.upper(), b.right(), b.lower()), (0, 0, 100, 50));
    }

    #[test]
    fn test_from_normalized_degenerate_is_none() {
        let verts = [v(0.3, 0.3), v(0.3, 0.3), v(0.3, 0.3), v(0.3, 0.3)];
        assert!(CropBox::from_normalized(&verts, 100, 100).is_none());
        assert!(CropBox::from_normalized(&[], 100, 100).is_none());
    }

    #[test]
    fn test_crop_encodes_jpeg_of_expected_size() {
        let img = DynamicImage::ImageRgba8(RgbaImage::new(64, 48));
        let bytes = img.encode_crop(CropBox::new(8, 4, 40, 36).unwrap()).unwrap();
        assert_eq!(&bytes[..2], &[0xFF_u8, 0xD8]);
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.dimensions(), (32, 32));
    }

    #[test]
    fn test_crop_outside_image_is_error() {
        let img = DynamicImage::ImageRgba8(RgbaImage::new(16, 16));
        assert!(img.encode_crop(CropBox::new(20, 20, 30, 30).unwrap()).is_err());
    }
}
