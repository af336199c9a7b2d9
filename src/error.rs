//! Error type shared by every stage of a conversion.
//!
//! All variants are fatal for the run: there is no partial-success mode, so a
//! single failing face aborts the conversion of all six.

use std::path::PathBuf;

use crate::face::Face;

/// Errors raised while converting a panorama into cube faces
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// Input path does not exist
    #[error("{} not found", .0.display())]
    InputNotFound(PathBuf),

    /// Tile size below the 2px minimum
    #[error("tile size must be at least 2px, got {0}")]
    InvalidTileSize(usize),

    /// JPEG quality outside 1..=100
    #[error("JPEG quality must be within 1..=100, got {0}")]
    InvalidQuality(u8),

    /// Panorama could not be decoded
    #[error("failed to decode panorama: {0}")]
    Decode(#[from] image::ImageError),

    /// Panorama width is not exactly twice its height
    #[error("panorama should have a 2:1 aspect ratio, got {width}x{height}")]
    AspectRatio { width: u32, height: u32 },

    /// A mapped source coordinate fell outside the panorama
    #[error("{face} tile sampled ({row}, {col}) outside the {width}x{height} panorama")]
    SampleOutOfBounds {
        face: Face,
        row: usize,
        col: usize,
        width: usize,
        height: usize,
    },

    /// A face worker panicked or never delivered its tile
    #[error("face worker failed: {0}")]
    Worker(String),

    /// Tile raster could not be encoded
    #[error("failed to encode tile: {0}")]
    Encode(image::ImageError),

    /// I/O error while persisting tiles
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TIFF encoding error
    #[error("TIFF encoding error: {0}")]
    TiffEncode(#[from] tiff::TiffError),
}

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, ConvertError>;
