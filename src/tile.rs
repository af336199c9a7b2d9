//! Cube face tiles and the per-face render pass.

use image::RgbaImage;

use crate::angle_cache::AngleCache;
use crate::casting::usize_to_u32;
use crate::error::{ConvertError, Result};
use crate::face::Face;
use crate::mapping;
use crate::panorama::SourcePanorama;

/// One output unit: a face at a given square size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub face: Face,
    pub size: usize,
}

impl Tile {
    #[must_use]
    pub fn new(face: Face, size: usize) -> Self {
        Self { face, size }
    }

    /// Output file name for this tile with the given extension
    #[must_use]
    pub fn file_name(&self, extension: &str) -> String {
        format!("{}.{extension}", self.face.name())
    }
}

/// A fully rendered face
#[derive(Debug, Clone)]
pub struct TileResult {
    pub tile: Tile,
    /// Size × size RGBA8 raster
    pub raster: RgbaImage,
}

/// Render every pixel of `tile` from the shared cache and panorama.
///
/// Reads only the shared inputs and writes only the returned raster, so faces
/// can render concurrently without coordination.
///
/// # Errors
/// - [`ConvertError::InvalidTileSize`] if the cache was built for another size
/// - [`ConvertError::SampleOutOfBounds`] if a pixel maps outside the panorama
pub fn render_face(tile: Tile, cache: &AngleCache, panorama: &SourcePanorama) -> Result<TileResult> {
    if cache.tile_size() != tile.size {
        return Err(ConvertError::InvalidTileSize(tile.size));
    }
    let side = usize_to_u32(tile.size).map_err(|_| ConvertError::InvalidTileSize(tile.size))?;

    let mut raster = RgbaImage::new(side, side);
    for (tile_y, row) in (0..tile.size).zip(0..side) {
        for (tile_x, col) in (0..tile.size).zip(0..side) {
            let pixel = mapping::sample(tile.face, cache, panorama, tile_x, tile_y)?;
            raster.put_pixel(col, row, pixel);
        }
    }

    Ok(TileResult { tile, raster })
}
