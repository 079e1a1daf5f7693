/// End-to-end conversion: pixels to mesh to STL bytes
use crate::builder::MeshBuilder;
use crate::cancel::CancelToken;
use crate::error::Result;
use crate::geometry::Mesh;
use crate::heightfield::{extract, PixelFormat};
use crate::params::ReliefParams;
use crate::stl::to_ascii_stl_cancellable;

/// Build the relief solid for a square `params.resolution` pixel buffer.
pub fn heightmap_to_mesh(
    pixels: &[u8],
    format: PixelFormat,
    params: &ReliefParams,
    cancel: &CancelToken,
) -> Result<Mesh> {
    params.validate()?;
    let grid = extract(pixels, params.resolution, format, params.invert)?;
    cancel.check()?;
    MeshBuilder::from_params(params)?.build_cancellable(&grid, cancel)
}

/// Build the relief solid and serialize it as ASCII STL.
pub fn heightmap_to_stl(
    pixels: &[u8],
    format: PixelFormat,
    params: &ReliefParams,
    name: &str,
    cancel: &CancelToken,
) -> Result<Vec<u8>> {
    let mesh = heightmap_to_mesh(pixels, format, params, cancel)?;
    to_ascii_stl_cancellable(&mesh, name, cancel)
}
