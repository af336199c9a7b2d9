//! Decoded equirectangular source image.

use std::path::Path;

use image::{ImageReader, Rgba, RgbaImage};
use tracing::info;

use crate::error::{ConvertError, Result};

/// One RGBA8 pixel
pub type Pixel = Rgba<u8>;

/// Equirectangular panorama, width exactly twice its height.
///
/// Columns map linearly to azimuth and rows to zenith angle. Immutable once
/// built; workers share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct SourcePanorama {
    pixels: RgbaImage,
}

impl SourcePanorama {
    /// Wrap an already decoded image.
    ///
    /// # Errors
    /// Returns [`ConvertError::AspectRatio`] unless width == 2 × height.
    pub fn from_image(pixels: RgbaImage) -> Result<Self> {
        let (width, height) = pixels.dimensions();
        if height == 0 || u64::from(width) != 2 * u64::from(height) {
            return Err(ConvertError::AspectRatio { width, height });
        }
        Ok(Self { pixels })
    }

    /// Decode a panorama from disk, guessing the format from its contents.
    ///
    /// # Errors
    /// - [`ConvertError::InputNotFound`] if the path does not exist
    /// - [`ConvertError::Decode`] / [`ConvertError::Io`] if it cannot be read
    /// - [`ConvertError::AspectRatio`] if the decoded image is not 2:1
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConvertError::InputNotFound(path.to_path_buf()));
        }

        info!(path = %path.display(), "Read file --> started");
        let image = ImageReader::open(path)?.with_guessed_format()?.decode()?;
        info!(path = %path.display(), "Read file --> finished");

        Self::from_image(image.into_rgba8())
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.pixels.width() as usize
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.pixels.height() as usize
    }

    /// Pixel at (row, col), or `None` outside the image
    #[inline]
    #[must_use]
    pub fn pixel(&self, row: usize, col: usize) -> Option<Pixel> {
        let x = u32::try_from(col).ok()?;
        let y = u32::try_from(row).ok()?;
        self.pixels.get_pixel_checked(x, y).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_two_to_one() {
        let pano = SourcePanorama::from_image(RgbaImage::new(128, 64)).unwrap();
        assert_eq!((pano.width(), pano.height()), (128, 64));
    }

    #[test]
    fn test_rejects_other_aspect_ratios() {
        for (w, h) in [(100, 64), (129, 64), (64, 64), (0, 0), (64, 128)] {
            let err = SourcePanorama::from_image(RgbaImage::new(w, h)).unwrap_err();
            assert!(
                matches!(err, ConvertError::AspectRatio { width, height } if width == w && height == h),
                "{w}x{h} should be rejected"
            );
        }
    }

    #[test]
    fn test_pixel_lookup_is_checked() {
        let mut img = RgbaImage::new(4, 2);
        img.put_pixel(3, 1, Rgba([1, 2, 3, 4]));
        let pano = SourcePanorama::from_image(img).unwrap();
        assert_eq!(pano.pixel(1, 3), Some(Rgba([1, 2, 3, 4])));
        assert_eq!(pano.pixel(2, 0), None);
        assert_eq!(pano.pixel(0, 4), None);
    }

    #[test]
    fn test_open_missing_file() {
        let err = SourcePanorama::open("/definitely/not/here.jpg").unwrap_err();
        assert!(matches!(err, ConvertError::InputNotFound(_)));
    }
}
