//! Relief Core Library - heightmap to printable solid
//!
//! This library turns a grayscale elevation field into a closed, consistently
//! wound triangle mesh and serializes it as ASCII STL. Every stage is a pure
//! function of its inputs.

pub mod builder;
pub mod cancel;
pub mod error;
pub mod geometry;
pub mod heightfield;
pub mod normal;
pub mod params;
pub mod pipeline;
pub mod stl;

// Re-export commonly used types
pub use builder::MeshBuilder;
pub use cancel::CancelToken;
pub use error::{ReliefError, Result};
pub use geometry::{Bounds, Face, Mesh, Triangle, Vertex};
pub use heightfield::{extract, resample_nearest, ElevationGrid, PixelFormat};
pub use normal::{face_normal, face_normals};
pub use params::{ReliefParams, DEFAULT_SOLID_NAME};
pub use pipeline::{heightmap_to_mesh, heightmap_to_stl};
pub use stl::{parse_ascii_stl, to_ascii_stl, write_ascii_stl, StlDocument};
