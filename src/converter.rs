//! Fan-out of the six face renders and fan-in of their results.
//!
//! # Example
//!
//! ```rust,no_run
//! use sphere2cube::{ConvertConfig, CubeMapConverter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConvertConfig::new("pano.jpg").with_tile_size(512).with_output_dir("tiles");
//!     let report = CubeMapConverter::new(config)?.convert().await?;
//!     println!("rendered {} faces in {:?}", report.faces.len(), report.elapsed);
//!     Ok(())
//! }
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::{self, JoinSet};
use tracing::info;

use crate::angle_cache;
use crate::config::ConvertConfig;
use crate::error::{ConvertError, Result};
use crate::face::Face;
use crate::panorama::SourcePanorama;
use crate::tile::{render_face, Tile, TileResult};
use crate::writer::{TileSink, TileWriter};

/// Summary of a finished conversion
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub tile_size: usize,
    /// Faces in the order they completed
    pub faces: Vec<Face>,
    /// Wall-clock time of the whole operation, decode included
    pub elapsed: Duration,
    /// Wall-clock time from fan-out to the last saved face
    pub render_elapsed: Duration,
}

/// Collects results in memory
impl TileSink for Vec<TileResult> {
    fn save(&mut self, result: &TileResult) -> Result<()> {
        self.push(result.clone());
        Ok(())
    }
}

/// Renders all six faces of a panorama concurrently
#[derive(Debug, Clone)]
pub struct CubeMapConverter {
    config: ConvertConfig,
}

impl CubeMapConverter {
    /// # Errors
    /// Returns the first configuration problem found by [`ConvertConfig::validate`].
    pub fn new(config: ConvertConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    /// Decode the configured input, render it and write six tiles.
    ///
    /// # Errors
    /// Any configuration, decode, aspect-ratio, render or persistence error.
    /// Nothing is written if the panorama fails to load.
    pub async fn convert(&self) -> Result<RunReport> {
        let started = Instant::now();

        let input = self.config.input().to_path_buf();
        let panorama = task::spawn_blocking(move || SourcePanorama::open(input))
            .await
            .map_err(|e| ConvertError::Worker(e.to_string()))??;

        let mut writer = TileWriter::new(self.config.output_dir()).format(self.config.format());
        let report = self.run(Arc::new(panorama), &mut writer).await?;

        let elapsed = started.elapsed();
        info!(elapsed_secs = elapsed.as_secs_f64(), "Time to render");

        Ok(RunReport { elapsed, ..report })
    }

    /// Render every face and return them in canonical face order.
    ///
    /// # Errors
    /// Any render error from a face worker.
    pub async fn render(&self, panorama: Arc<SourcePanorama>) -> Result<Vec<TileResult>> {
        let mut tiles = Vec::with_capacity(Face::ALL.len());
        self.run(panorama, &mut tiles).await?;
        tiles.sort_by_key(|result| result.tile.face);
        Ok(tiles)
    }

    /// Render every face concurrently, handing each one to `sink` as it completes.
    ///
    /// One blocking task per face shares the angle tables and the panorama;
    /// each owns only its raster. The run completes once all six are saved.
    ///
    /// # Errors
    /// The first worker failure, panic or sink error aborts the run.
    pub async fn run<S: TileSink>(&self, panorama: Arc<SourcePanorama>, sink: &mut S) -> Result<RunReport> {
        let started = Instant::now();
        let tile_size = self.config.tile_size();
        let cache = angle_cache::shared(tile_size)?;

        info!(
            tile_size,
            width = panorama.width(),
            height = panorama.height(),
            "Rendering cube faces"
        );

        let mut workers = JoinSet::new();
        for face in Face::ALL {
            let cache = Arc::clone(&cache);
            let panorama = Arc::clone(&panorama);
            workers.spawn_blocking(move || {
                info!(%face, "Process for tile --> started");
                render_face(Tile::new(face, tile_size), &cache, &panorama)
            });
        }

        let mut faces = Vec::with_capacity(Face::ALL.len());
        while let Some(joined) = workers.join_next().await {
            let result = joined.map_err(|e| ConvertError::Worker(e.to_string()))??;
            sink.save(&result)?;

            info!(face = %result.tile.face, tile_size, "Process for tile --> finished");
            faces.push(result.tile.face);
        }

        if faces.len() != Face::ALL.len() {
            return Err(ConvertError::Worker(format!(
                "expected {} tiles, collected {}",
                Face::ALL.len(),
                faces.len()
            )));
        }

        let elapsed = started.elapsed();
        info!(render_secs = elapsed.as_secs_f64(), "Faces rendered");

        Ok(RunReport {
            tile_size,
            faces,
            elapsed,
            render_elapsed: elapsed,
        })
    }
}
