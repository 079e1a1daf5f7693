/// Height field extraction from 8-bit color samples
use tracing::debug;

use crate::error::{ReliefError, Result};

/// Channel layout of an interleaved 8-bit pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Gray,
    Rgb,
    Rgba,
}

impl PixelFormat {
    pub fn channels(self) -> usize {
        match self {
            PixelFormat::Gray => 1,
            PixelFormat::Rgb => 3,
            PixelFormat::Rgba => 4,
        }
    }

    /// Rec. 601 luma of the pixel starting at `px`, in 0..=255.
    fn luminance(self, px: &[u8]) -> f32 {
        match self {
            PixelFormat::Gray => f32::from(px[0]),
            PixelFormat::Rgb | PixelFormat::Rgba => {
                0.299 * f32::from(px[0]) + 0.587 * f32::from(px[1]) + 0.114 * f32::from(px[2])
            }
        }
    }
}

/// Square grid of normalized elevations, stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct ElevationGrid {
    size: usize,
    values: Vec<f32>,
}

impl ElevationGrid {
    /// Wrap `size * size` row-major samples.
    ///
    /// Values are taken as-is; non-finite samples are rejected later by the
    /// mesh builder.
    pub fn from_values(size: usize, values: Vec<f32>) -> Result<Self> {
        if size == 0 {
            return Err(ReliefError::configuration("grid size must be at least 1"));
        }
        let expected = size
            .checked_mul(size)
            .ok_or_else(|| ReliefError::configuration(format!("grid size {size} overflows")))?;
        if values.len() != expected {
            return Err(ReliefError::BufferSizeMismatch {
                expected,
                actual: values.len(),
            });
        }
        Ok(Self { size, values })
    }

    /// Grid filled with a single elevation.
    pub fn uniform(size: usize, value: f32) -> Result<Self> {
        let len = size.saturating_mul(size);
        Self::from_values(size, vec![value; len])
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.values[y * self.size + x]
    }

    pub fn row(&self, y: usize) -> &[f32] {
        &self.values[y * self.size..(y + 1) * self.size]
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }
}

/// Convert a `resolution x resolution` pixel buffer into an elevation grid.
///
/// Each pixel maps to `luma / 255`, or `1 - luma / 255` when `invert` is set.
/// No filtering is applied.
pub fn extract(
    pixels: &[u8],
    resolution: usize,
    format: PixelFormat,
    invert: bool,
) -> Result<ElevationGrid> {
    if resolution < 1 {
        return Err(ReliefError::configuration("resolution must be at least 1"));
    }
    let channels = format.channels();
    let expected = buffer_len(resolution, resolution, channels)?;
    if pixels.len() != expected {
        return Err(ReliefError::BufferSizeMismatch {
            expected,
            actual: pixels.len(),
        });
    }

    let values: Vec<f32> = pixels
        .chunks_exact(channels)
        .map(|px| {
            let v = format.luminance(px) / 255.0;
            if invert {
                1.0 - v
            } else {
                v
            }
        })
        .collect();

    debug!(resolution, ?format, invert, "extracted elevation grid");
    ElevationGrid::from_values(resolution, values)
}

/// Nearest-neighbor resample of a `width x height` buffer to `target x target`.
///
/// The aspect ratio is not preserved: the image is stretched onto the square
/// sampling grid.
pub fn resample_nearest(
    pixels: &[u8],
    width: usize,
    height: usize,
    format: PixelFormat,
    target: usize,
) -> Result<Vec<u8>> {
    if width == 0 || height == 0 {
        return Err(ReliefError::configuration(format!(
            "source image must be non-empty, got {width}x{height}"
        )));
    }
    if target == 0 {
        return Err(ReliefError::configuration("target resolution must be at least 1"));
    }
    let channels = format.channels();
    let expected = buffer_len(width, height, channels)?;
    if pixels.len() != expected {
        return Err(ReliefError::BufferSizeMismatch {
            expected,
            actual: pixels.len(),
        });
    }

    let mut out = Vec::with_capacity(buffer_len(target, target, channels)?);
    for ty in 0..target {
        let sy = nearest_source(ty, height, target);
        for tx in 0..target {
            let sx = nearest_source(tx, width, target);
            let start = (sy * width + sx) * channels;
            out.extend_from_slice(&pixels[start..start + channels]);
        }
    }
    Ok(out)
}

fn nearest_source(i: usize, src: usize, target: usize) -> usize {
    let pos = (i as f64 + 0.5) * src as f64 / target as f64;
    (pos.floor() as usize).min(src - 1)
}

fn buffer_len(width: usize, height: usize, channels: usize) -> Result<usize> {
    width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(channels))
        .ok_or_else(|| ReliefError::configuration(format!("{width}x{height} image is too large")))
}
