#![doc = include_str!("../README.md")]
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`angle_cache`]: Per-tile-coordinate angle tables and their shared LRU store
//! - [`mapping`]: Face pixel to panorama pixel mapping, including seam stitching
//! - [`tile`]: Tile identity and the single-face render pass
//! - [`converter`]: Concurrent six-face orchestration via [`CubeMapConverter`]
//! - [`panorama`]: Decoded 2:1 source image ([`SourcePanorama`])
//! - [`writer`]: Tile persistence ([`TileWriter`], [`TileSink`])
//! - [`config`]: Immutable conversion settings ([`ConvertConfig`])
//! - [`casting`]: Angle-space to pixel-space conversions

// ============================================================================
// Public modules
// ============================================================================

pub mod angle_cache;
pub mod casting;
pub mod config;
pub mod converter;
pub mod error;
pub mod face;
pub mod mapping;
pub mod panorama;
pub mod tile;
pub mod writer;

// ============================================================================
// Projection Engine
// ============================================================================

pub use angle_cache::{AngleCache, AngleGrid};
pub use face::Face;
pub use mapping::{azimuth_correct, face_angles, phi_to_column, theta_to_row, Seam};
pub use tile::{render_face, Tile, TileResult};

// ============================================================================
// Orchestration
// ============================================================================
// Primary API: CubeMapConverter::new(config)?.convert().await

pub use config::ConvertConfig;
pub use converter::{CubeMapConverter, RunReport};

// ============================================================================
// Input & Output
// ============================================================================

pub use panorama::{Pixel, SourcePanorama};
pub use writer::{OutputFormat, TiffCompression, TileSink, TileWriter};

// ============================================================================
// Errors
// ============================================================================

pub use error::{ConvertError, Result};
