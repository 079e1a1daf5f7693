/// Example: build a dome relief from a generated height field
///
/// Usage: cargo run --example dome -- [output.stl] [resolution]

use std::env;
use std::fs;
use std::io;

use relief_core::{heightmap_to_stl, CancelToken, PixelFormat, ReliefParams};

fn main() -> io::Result<()> {
    let args: Vec<String> = env::args().collect();
    let output = args.get(1).map_or("dome.stl", String::as_str);
    let resolution = match args.get(2) {
        Some(value) => value
            .parse()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, format!("bad resolution: {e}")))?,
        None => 64,
    };

    let params = ReliefParams::default()
        .with_resolution(resolution)
        .with_width_mm(80.0)
        .with_height_scale_mm(15.0);
    params
        .validate()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;

    // Bright in the middle, dark at the rim
    let center = (resolution - 1) as f32 / 2.0;
    let pixels: Vec<u8> = (0..resolution * resolution)
        .map(|i| {
            let dx = (i % resolution) as f32 - center;
            let dy = (i / resolution) as f32 - center;
            let r = (dx * dx + dy * dy).sqrt() / center;
            (255.0 * (1.0 - r * r).max(0.0)) as u8
        })
        .collect();

    let stl = heightmap_to_stl(&pixels, PixelFormat::Gray, &params, "dome", &CancelToken::none())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;

    fs::write(output, &stl)?;
    println!("Wrote {} bytes to {}", stl.len(), output);
    Ok(())
}
