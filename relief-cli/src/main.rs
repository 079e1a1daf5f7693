/// Relief - convert a PPM image into a printable STL relief
///
/// Usage: relief <input.ppm> [output.stl] [--resolution N] [--width MM]
///        [--height MM] [--base MM] [--invert] [--name NAME]

use clap::Parser;
use relief_cli::{run, Options};

fn main() {
    let options = Options::parse();

    eprintln!(
        "Converting {} at {}x{} samples...",
        options.input.display(),
        options.resolution,
        options.resolution
    );

    match run(&options) {
        Ok(facets) => eprintln!(
            "Wrote {facets} facets to {}",
            options.output_path().display()
        ),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
