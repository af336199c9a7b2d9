use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use sphere2cube::config::{DEFAULT_OUTPUT_DIR, DEFAULT_TILE_SIZE};
use sphere2cube::writer::MAX_JPEG_QUALITY;
use sphere2cube::{ConvertConfig, CubeMapConverter, OutputFormat, TiffCompression};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliFormat {
    Jpeg,
    Png,
    #[value(name = "tiff")]
    Tiff,
    #[value(name = "tiff-lzw")]
    TiffLzw,
    #[value(name = "tiff-deflate")]
    TiffDeflate,
}

/// sphere2cube - Equirectangular panorama to cube map tiles
#[derive(Parser, Debug)]
#[command(name = "sphere2cube", version, about)]
struct Cli {
    /// Path to input equirectangular panorama (width must be twice the height)
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,

    /// Size in px of final tile
    #[arg(short = 's', long = "size", default_value_t = DEFAULT_TILE_SIZE)]
    tile_size: usize,

    /// Path to output directory
    #[arg(short, long, value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    output: PathBuf,

    /// Tile file format
    #[arg(long, value_enum, default_value_t = CliFormat::Jpeg)]
    format: CliFormat,

    /// JPEG quality (1-100)
    #[arg(long, default_value_t = MAX_JPEG_QUALITY)]
    quality: u8,
}

impl Cli {
    fn output_format(&self) -> OutputFormat {
        match self.format {
            CliFormat::Jpeg => OutputFormat::Jpeg {
                quality: self.quality,
            },
            CliFormat::Png => OutputFormat::Png,
            CliFormat::Tiff => OutputFormat::Tiff(TiffCompression::None),
            CliFormat::TiffLzw => OutputFormat::Tiff(TiffCompression::Lzw),
            CliFormat::TiffDeflate => OutputFormat::Tiff(TiffCompression::Deflate),
        }
    }

    fn into_config(self) -> ConvertConfig {
        let format = self.output_format();
        ConvertConfig::new(self.input)
            .with_tile_size(self.tile_size)
            .with_output_dir(self.output)
            .with_format(format)
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.into_config();
    let input = config.input().display().to_string();

    let converter = CubeMapConverter::new(config).context("invalid configuration")?;
    let report = converter
        .convert()
        .await
        .with_context(|| format!("failed to convert {input}"))?;

    info!(
        tile_size = report.tile_size,
        faces = report.faces.len(),
        "Cube map written"
    );
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::from(2)
        }
    }
}
