/// Command-line front end: PPM image in, ASCII STL relief out
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use relief_core::{
    heightmap_to_mesh, resample_nearest, write_ascii_stl, CancelToken, Mesh, PixelFormat,
    ReliefError, ReliefParams, DEFAULT_SOLID_NAME,
};
use thiserror::Error;

pub mod ppm;

pub use ppm::{parse_ppm, RgbImage};

/// Errors surfaced by the command-line tool
#[derive(Debug, Error)]
pub enum CliError {
    #[error("invalid PPM image: {message}")]
    Ppm { message: String },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Relief(#[from] ReliefError),
}

/// Convert a binary PPM image into a printable STL relief
#[derive(Debug, Clone, Parser)]
#[command(name = "relief", version, long_about = None)]
pub struct Options {
    /// Input image (binary PPM, 8-bit)
    pub input: PathBuf,

    /// Output STL file [default: input with an .stl extension]
    pub output: Option<PathBuf>,

    /// Grid samples per side
    #[arg(long, default_value_t = 100)]
    pub resolution: usize,

    /// Footprint edge length in millimetres
    #[arg(long, default_value_t = 100.0)]
    pub width: f32,

    /// Relief height at full brightness in millimetres
    #[arg(long, default_value_t = 10.0)]
    pub height: f32,

    /// Base plate thickness in millimetres
    #[arg(long, default_value_t = 2.0)]
    pub base: f32,

    /// Dark pixels are high
    #[arg(long)]
    pub invert: bool,

    /// Solid name written to the STL
    #[arg(long, default_value = DEFAULT_SOLID_NAME)]
    pub name: String,
}

impl Options {
    /// Validated relief parameters from the parsed flags.
    pub fn params(&self) -> Result<ReliefParams, CliError> {
        let params = ReliefParams::default()
            .with_resolution(self.resolution)
            .with_width_mm(self.width)
            .with_height_scale_mm(self.height)
            .with_base_thickness_mm(self.base)
            .with_invert(self.invert);
        params.validate()?;
        Ok(params)
    }

    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| self.input.with_extension("stl"))
    }
}

/// Convert an in-memory image to a relief mesh.
pub fn image_to_mesh(
    image: &RgbImage,
    params: &ReliefParams,
    cancel: &CancelToken,
) -> Result<Mesh, CliError> {
    let samples = resample_nearest(
        &image.pixels,
        image.width,
        image.height,
        PixelFormat::Rgb,
        params.resolution,
    )?;
    Ok(heightmap_to_mesh(&samples, PixelFormat::Rgb, params, cancel)?)
}

/// Read the input image, build the relief and write the STL file.
///
/// Returns the number of facets written. A failed write removes the
/// partial output file.
pub fn run(options: &Options) -> Result<usize, CliError> {
    let params = options.params()?;
    let data = fs::read(&options.input).map_err(|source| io_error(&options.input, source))?;
    let image = parse_ppm(&data)?;
    let cancel = CancelToken::none();
    let mesh = image_to_mesh(&image, &params, &cancel)?;

    let output = options.output_path();
    let file = File::create(&output).map_err(|source| io_error(&output, source))?;
    if let Err(e) = write_stl(&mesh, &options.name, file, &output, &cancel) {
        let _ = fs::remove_file(&output);
        return Err(e);
    }

    Ok(mesh.faces().len())
}

fn write_stl(
    mesh: &Mesh,
    name: &str,
    file: File,
    path: &Path,
    cancel: &CancelToken,
) -> Result<(), CliError> {
    let mut writer = BufWriter::new(file);
    write_ascii_stl(mesh, name, &mut writer, cancel)?;
    writer.flush().map_err(|source| io_error(path, source))
}

fn io_error(path: &Path, source: std::io::Error) -> CliError {
    CliError::Io {
        path: path.to_path_buf(),
        source,
    }
}
