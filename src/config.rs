//! Immutable conversion settings.

use std::path::{Path, PathBuf};

use crate::error::{ConvertError, Result};
use crate::writer::OutputFormat;

/// Default side length of each face, in pixels
pub const DEFAULT_TILE_SIZE: usize = 1024;

/// Default output directory
pub const DEFAULT_OUTPUT_DIR: &str = "./build";

/// Settings for one panorama-to-cube-map conversion.
///
/// Built up front and handed to [`crate::CubeMapConverter::new`]; nothing
/// reads configuration from globals.
///
/// # Example
///
/// ```rust
/// use sphere2cube::{ConvertConfig, OutputFormat};
///
/// let config = ConvertConfig::new("pano.jpg")
///     .with_tile_size(512)
///     .with_output_dir("tiles")
///     .with_format(OutputFormat::Png);
/// assert_eq!(config.tile_size(), 512);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertConfig {
    input: PathBuf,
    output_dir: PathBuf,
    tile_size: usize,
    format: OutputFormat,
}

impl ConvertConfig {
    /// Settings for `input` with default size, directory and format
    #[must_use]
    pub fn new<P: Into<PathBuf>>(input: P) -> Self {
        Self {
            input: input.into(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            tile_size: DEFAULT_TILE_SIZE,
            format: OutputFormat::default(),
        }
    }

    /// Set the side length of each face in pixels
    #[must_use]
    pub fn with_tile_size(mut self, tile_size: usize) -> Self {
        self.tile_size = tile_size;
        self
    }

    /// Set the directory the six faces are written to
    #[must_use]
    pub fn with_output_dir<P: Into<PathBuf>>(mut self, output_dir: P) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Set the tile file format
    #[must_use]
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn input(&self) -> &Path {
        &self.input
    }

    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    #[must_use]
    pub fn tile_size(&self) -> usize {
        self.tile_size
    }

    #[must_use]
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Check everything that can be checked before touching the input file.
    ///
    /// # Errors
    /// - [`ConvertError::InvalidTileSize`] for a tile size below 2
    /// - [`ConvertError::InvalidQuality`] for a JPEG quality outside 1..=100
    pub fn validate(&self) -> Result<()> {
        if self.tile_size < 2 {
            return Err(ConvertError::InvalidTileSize(self.tile_size));
        }
        self.format.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConvertConfig::new("in.jpg");
        assert_eq!(config.input(), Path::new("in.jpg"));
        assert_eq!(config.output_dir(), Path::new("./build"));
        assert_eq!(config.tile_size(), 1024);
        assert_eq!(config.format(), OutputFormat::Jpeg { quality: 100 });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_setters() {
        let config = ConvertConfig::new("in.png")
            .with_tile_size(256)
            .with_output_dir("faces")
            .with_format(OutputFormat::Png);
        assert_eq!(config.input(), Path::new("in.png"));
        assert_eq!(config.output_dir(), Path::new("faces"));
        assert_eq!(config.tile_size(), 256);
        assert_eq!(config.format(), OutputFormat::Png);
    }

    #[test]
    fn test_validate() {
        assert!(matches!(
            ConvertConfig::new("in.jpg").with_tile_size(1).validate(),
            Err(ConvertError::InvalidTileSize(1))
        ));
        assert!(matches!(
            ConvertConfig::new("in.jpg")
                .with_format(OutputFormat::Jpeg { quality: 0 })
                .validate(),
            Err(ConvertError::InvalidQuality(0))
        ));
        assert!(ConvertConfig::new("in.jpg").with_tile_size(2).validate().is_ok());
    }
}
