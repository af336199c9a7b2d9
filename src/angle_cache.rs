//! Precomputed per-tile-coordinate angles.
//!
//! Every face samples the same four tables, indexed by in-tile (row, col):
//!
//! - `ZP`: zenith of the ray through the pixel on the top face
//! - `ZM`: zenith of the ray through the pixel on the bottom face
//! - `XYPM`: zenith of the ray through the pixel on a side face
//! - `PHI`: azimuth within a face, before seam correction
//!
//! Tables are built once per tile size and shared read-only. [`shared`] keeps
//! recently built tables in a process-wide LRU store so repeated conversions
//! at the same size skip the O(N²) build.

use lru::LruCache;
use std::cmp::max;
use std::sync::{Arc, LazyLock, Mutex, PoisonError};

use tracing::debug;

use crate::error::{ConvertError, Result};

const STORE_CAPACITY_BYTES: usize = 256 * 1024 * 1024; // 256 MB upper bound

/// Square grid of angles in row-major order
#[derive(Debug, Clone, PartialEq)]
pub struct AngleGrid {
    size: usize,
    values: Vec<f64>,
}

impl AngleGrid {
    fn zeros(size: usize) -> Self {
        Self {
            size,
            values: vec![0.0; size * size],
        }
    }

    /// Side length of the grid
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Angle at (row, col). Panics if either index is out of range.
    #[inline]
    #[must_use]
    pub fn at(&self, row: usize, col: usize) -> f64 {
        assert!(
            row < self.size && col < self.size,
            "({row}, {col}) out of range for {} grid",
            self.size
        );
        self.values[row * self.size + col]
    }

    fn set(&mut self, row: usize, col: usize, value: f64) {
        self.values[row * self.size + col] = value;
    }
}

/// The four angle tables for one tile size
#[derive(Debug, Clone, PartialEq)]
pub struct AngleCache {
    tile_size: usize,
    pub zp: AngleGrid,
    pub zm: AngleGrid,
    pub xypm: AngleGrid,
    pub phi: AngleGrid,
}

impl AngleCache {
    /// Build the tables for an N×N tile.
    ///
    /// # Errors
    /// Returns [`ConvertError::InvalidTileSize`] for N < 2, where the half-size
    /// normalization would divide by zero.
    pub fn new(tile_size: usize) -> Result<Self> {
        if tile_size < 2 {
            return Err(ConvertError::InvalidTileSize(tile_size));
        }

        let half_size = half_size(tile_size);
        let mut zp = AngleGrid::zeros(tile_size);
        let mut zm = AngleGrid::zeros(tile_size);
        let mut xypm = AngleGrid::zeros(tile_size);
        let mut phi = AngleGrid::zeros(tile_size);

        for tile_y in 0..tile_size {
            let y = tile_y as f64 / half_size - 1.0;

            for tile_x in 0..tile_size {
                let x = tile_x as f64 / half_size - 1.0;
                let root = (x * x + y * y + 1.0).sqrt();

                zp.set(tile_y, tile_x, (1.0 / root).acos());
                zm.set(tile_y, tile_x, (-1.0 / root).acos());
                xypm.set(tile_y, tile_x, (y / root).acos());
                // Azimuth is undefined on the center column; it stays 0
                if x != 0.0 {
                    phi.set(tile_y, tile_x, (y / x).atan());
                }
            }
        }

        Ok(Self {
            tile_size,
            zp,
            zm,
            xypm,
            phi,
        })
    }

    /// Side length N of the tile these tables describe
    #[must_use]
    pub fn tile_size(&self) -> usize {
        self.tile_size
    }

    /// (N − 1) / 2, the midline used by the seam tie-break
    #[must_use]
    pub fn half_size(&self) -> f64 {
        half_size(self.tile_size)
    }

    fn size_bytes(&self) -> usize {
        4 * self.tile_size * self.tile_size * std::mem::size_of::<f64>()
    }
}

fn half_size(tile_size: usize) -> f64 {
    (tile_size - 1) as f64 / 2.0
}

/// Byte-bounded LRU of built tables keyed by tile size
struct AngleStore {
    current_bytes: usize,
    capacity_bytes: usize,
    entries: LruCache<usize, Arc<AngleCache>>,
}

impl AngleStore {
    fn new(capacity_bytes: usize) -> Self {
        AngleStore {
            current_bytes: 0,
            capacity_bytes,
            entries: LruCache::unbounded(),
        }
    }

    fn get(&mut self, tile_size: usize) -> Option<Arc<AngleCache>> {
        self.entries.get(&tile_size).map(Arc::clone)
    }

    fn insert(&mut self, cache: Arc<AngleCache>) {
        let size_bytes = cache.size_bytes();
        if size_bytes > self.capacity_bytes {
            return;
        }

        if let Some(old) = self.entries.pop(&cache.tile_size()) {
            self.current_bytes = self.current_bytes.saturating_sub(old.size_bytes());
        }

        while self.current_bytes + size_bytes > self.capacity_bytes {
            if let Some((_size, evicted)) = self.entries.pop_lru() {
                self.current_bytes = self.current_bytes.saturating_sub(evicted.size_bytes());
            } else {
                break;
            }
        }

        self.current_bytes = self.current_bytes.saturating_add(size_bytes);
        self.entries.put(cache.tile_size(), cache);
    }
}

static ANGLE_STORE: LazyLock<Mutex<AngleStore>> = LazyLock::new(|| {
    let cap = max(STORE_CAPACITY_BYTES, 16 * 1024 * 1024); // never below 16MB
    Mutex::new(AngleStore::new(cap))
});

/// Get the tables for `tile_size`, building and storing them on a miss.
///
/// Tables larger than the store capacity are built and returned but not kept.
///
/// # Errors
/// Same as [`AngleCache::new`].
pub fn shared(tile_size: usize) -> Result<Arc<AngleCache>> {
    if let Some(cache) = lock_store().get(tile_size) {
        debug!(tile_size, "angle cache hit");
        return Ok(cache);
    }

    // Built outside the lock; a concurrent miss at the same size just rebuilds
    debug!(tile_size, "angle cache miss, building tables");
    let cache = Arc::new(AngleCache::new(tile_size)?);
    lock_store().insert(Arc::clone(&cache));
    Ok(cache)
}

fn lock_store() -> std::sync::MutexGuard<'static, AngleStore> {
    ANGLE_STORE.lock().unwrap_or_else(PoisonError::into_inner)
}
