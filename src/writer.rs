//! Persistence of rendered cube faces.
//!
//! [`TileWriter`] encodes each [`TileResult`] into `<face>.<ext>` inside an
//! output directory, creating the directory on first use. JPEG is the default
//! and is written at maximum quality; PNG and TIFF are lossless.
//!
//! # Example
//!
//! ```rust,no_run
//! use sphere2cube::{OutputFormat, TileWriter, TiffCompression};
//!
//! let writer = TileWriter::new("./build")
//!     .format(OutputFormat::Tiff(TiffCompression::Lzw));
//! ```

use std::fs::{self, File};
use std::io::{BufWriter, Seek, Write};
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder, Rgb, RgbImage};
use tiff::encoder::colortype::RGBA8;
use tiff::encoder::{Compression, DeflateLevel, TiffEncoder};
use tracing::debug;

use crate::error::{ConvertError, Result};
use crate::tile::TileResult;

/// Highest JPEG quality, used unless configured otherwise
pub const MAX_JPEG_QUALITY: u8 = 100;

/// Receives each finished face exactly once
pub trait TileSink {
    /// Persist (or otherwise consume) one rendered face.
    ///
    /// # Errors
    /// Any error aborts the whole conversion.
    fn save(&mut self, result: &TileResult) -> Result<()>;
}

/// Compression method for TIFF output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TiffCompression {
    /// No compression - fastest but largest files
    #[default]
    None,
    /// LZW compression - good balance of speed and size
    Lzw,
    /// Deflate (zlib) compression - better compression, slower
    Deflate,
}

/// Encoding used for tile files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Baseline JPEG at the given quality (1..=100); alpha is dropped
    Jpeg { quality: u8 },
    /// Lossless RGBA PNG
    Png,
    /// Lossless RGBA TIFF
    Tiff(TiffCompression),
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Jpeg {
            quality: MAX_JPEG_QUALITY,
        }
    }
}

impl OutputFormat {
    /// File extension without the dot
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg { .. } => "jpg",
            OutputFormat::Png => "png",
            OutputFormat::Tiff(_) => "tif",
        }
    }

    /// # Errors
    /// Returns [`ConvertError::InvalidQuality`] for a JPEG quality outside 1..=100.
    pub fn validate(&self) -> Result<()> {
        match *self {
            OutputFormat::Jpeg { quality } if !(1..=MAX_JPEG_QUALITY).contains(&quality) => {
                Err(ConvertError::InvalidQuality(quality))
            }
            _ => Ok(()),
        }
    }
}

/// Writes tiles as individual files inside one directory
#[derive(Debug, Clone)]
pub struct TileWriter {
    output_dir: PathBuf,
    format: OutputFormat,
}

impl TileWriter {
    /// Create a writer targeting `output_dir` with the default (JPEG) format
    #[must_use]
    pub fn new<P: Into<PathBuf>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.into(),
            format: OutputFormat::default(),
        }
    }

    /// Set the output format
    #[must_use]
    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Full path the given tile is written to
    #[must_use]
    pub fn path_for(&self, result: &TileResult) -> PathBuf {
        self.output_dir
            .join(result.tile.file_name(self.format.extension()))
    }

    /// Encode one tile into any writer that implements Write + Seek
    ///
    /// # Errors
    /// Returns [`ConvertError::Encode`] / [`ConvertError::TiffEncode`] on
    /// encoder failure and [`ConvertError::Io`] on write failure.
    pub fn encode_to<W: Write + Seek>(&self, result: &TileResult, mut writer: W) -> Result<()> {
        let raster = &result.raster;
        let (width, height) = raster.dimensions();

        match self.format {
            OutputFormat::Jpeg { quality } => {
                // Baseline JPEG has no alpha channel
                let rgb = RgbImage::from_fn(width, height, |x, y| {
                    let [r, g, b, _] = raster.get_pixel(x, y).0;
                    Rgb([r, g, b])
                });
                JpegEncoder::new_with_quality(&mut writer, quality)
                    .write_image(rgb.as_raw(), width, height, ColorType::Rgb8.into())
                    .map_err(ConvertError::Encode)?;
            }
            OutputFormat::Png => {
                PngEncoder::new(&mut writer)
                    .write_image(raster.as_raw(), width, height, ColorType::Rgba8.into())
                    .map_err(ConvertError::Encode)?;
            }
            OutputFormat::Tiff(compression) => {
                let compression = match compression {
                    TiffCompression::None => Compression::Uncompressed,
                    TiffCompression::Lzw => Compression::Lzw,
                    TiffCompression::Deflate => Compression::Deflate(DeflateLevel::Fast),
                };
                TiffEncoder::new(&mut writer)?
                    .with_compression(compression)
                    .write_image::<RGBA8>(width, height, raster.as_raw())?;
            }
        }

        writer.flush()?;
        Ok(())
    }
}

impl TileSink for TileWriter {
    fn save(&mut self, result: &TileResult) -> Result<()> {
        self.format.validate()?;
        fs::create_dir_all(&self.output_dir)?;

        let path = self.path_for(result);
        let file = File::create(&path)?;
        self.encode_to(result, BufWriter::new(file))?;

        debug!(face = %result.tile.face, path = %path.display(), "Wrote tile");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::face::Face;
    use crate::tile::Tile;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn create_test_tile(face: Face, size: u32) -> TileResult {
        let mut raster = RgbaImage::new(size, size);
        for (x, y, p) in raster.enumerate_pixels_mut() {
            *p = Rgba([(x * 16) as u8, (y * 16) as u8, 128, 255]);
        }
        TileResult {
            tile: Tile::new(face, size as usize),
            raster,
        }
    }

    fn encode(format: OutputFormat, result: &TileResult) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        TileWriter::new("unused")
            .format(format)
            .encode_to(result, &mut cursor)
            .unwrap();
        cursor.into_inner()
    }

    #[test]
    fn test_extensions() {
        assert_eq!(OutputFormat::default().extension(), "jpg");
        assert_eq!(OutputFormat::Png.extension(), "png");
        assert_eq!(OutputFormat::Tiff(TiffCompression::Lzw).extension(), "tif");
    }

    #[test]
    fn test_default_is_max_quality_jpeg() {
        assert_eq!(OutputFormat::default(), OutputFormat::Jpeg { quality: 100 });
    }

    #[test]
    fn test_quality_validation() {
        assert!(OutputFormat::Jpeg { quality: 1 }.validate().is_ok());
        assert!(OutputFormat::Jpeg { quality: 100 }.validate().is_ok());
        assert!(matches!(
            OutputFormat::Jpeg { quality: 0 }.validate(),
            Err(ConvertError::InvalidQuality(0))
        ));
        assert!(OutputFormat::Jpeg { quality: 101 }.validate().is_err());
    }

    #[test]
    fn test_png_is_lossless() {
        let tile = create_test_tile(Face::Up, 8);
        let bytes = encode(OutputFormat::Png, &tile);
        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Png)
            .unwrap()
            .into_rgba8();
        assert_eq!(decoded, tile.raster);
    }

    #[test]
    fn test_jpeg_decodes_to_tile_size() {
        let tile = create_test_tile(Face::Left, 16);
        let bytes = encode(OutputFormat::default(), &tile);
        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Jpeg).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (16, 16));
    }

    #[test]
    fn test_tiff_roundtrip() {
        use tiff::decoder::{Decoder, DecodingResult};

        for compression in [TiffCompression::None, TiffCompression::Lzw, TiffCompression::Deflate] {
            let tile = create_test_tile(Face::Back, 8);
            let bytes = encode(OutputFormat::Tiff(compression), &tile);

            let mut decoder = Decoder::new(Cursor::new(bytes)).unwrap();
            assert_eq!(decoder.dimensions().unwrap(), (8, 8));
            match decoder.read_image().unwrap() {
                DecodingResult::U8(data) => assert_eq!(data, tile.raster.as_raw().as_slice()),
                _ => panic!("expected 8-bit samples for {compression:?}"),
            }
        }
    }

    #[test]
    fn test_save_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("tiles");
        let mut writer = TileWriter::new(&out).format(OutputFormat::Png);

        let tile = create_test_tile(Face::Front, 4);
        writer.save(&tile).unwrap();

        let path = out.join("front.png");
        assert_eq!(writer.path_for(&tile), path);
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_save_rejects_invalid_quality() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = TileWriter::new(dir.path()).format(OutputFormat::Jpeg { quality: 0 });
        let tile = create_test_tile(Face::Up, 4);
        assert!(writer.save(&tile).is_err());
        assert!(!dir.path().join("up.jpg").exists());
    }
}
