/// Closed solid construction from an elevation grid
use nalgebra::Point3;
use tracing::debug;

use crate::cancel::CancelToken;
use crate::error::{ReliefError, Result};
use crate::geometry::{Face, Mesh, Vertex};
use crate::heightfield::ElevationGrid;
use crate::params::{validate_dimensions, ReliefParams};

/// Number of vertices of the solid built from an `n x n` grid.
pub fn vertex_count(n: usize) -> usize {
    2 * n * n
}

/// Number of faces of the solid built from an `n x n` grid: two triangles
/// per cell on top and bottom, two per boundary segment on each wall.
pub fn face_count(n: usize) -> usize {
    let cells = n.saturating_sub(1);
    4 * cells * cells + 8 * cells
}

/// Builds a watertight relief solid: the elevation surface on top, a flat
/// plate at `z = 0` below, and four walls joining their boundaries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshBuilder {
    width: f32,
    height_scale: f32,
    base_thickness: f32,
}

impl MeshBuilder {
    pub fn new(width: f32, height_scale: f32, base_thickness: f32) -> Result<Self> {
        validate_dimensions(width, height_scale, base_thickness)?;
        Ok(Self {
            width,
            height_scale,
            base_thickness,
        })
    }

    pub fn from_params(params: &ReliefParams) -> Result<Self> {
        Self::new(
            params.width_mm,
            params.height_scale_mm,
            params.base_thickness_mm,
        )
    }

    pub fn build(&self, grid: &ElevationGrid) -> Result<Mesh> {
        self.build_cancellable(grid, &CancelToken::none())
    }

    /// Build the solid, polling `cancel` once per grid row and once per wall.
    pub fn build_cancellable(&self, grid: &ElevationGrid, cancel: &CancelToken) -> Result<Mesh> {
        let n = grid.size();
        if n < 2 {
            return Err(ReliefError::invalid_geometry(format!(
                "a {n}x{n} grid cannot be triangulated; need at least 2x2"
            )));
        }
        if u32::try_from(vertex_count(n)).is_err() {
            return Err(ReliefError::invalid_geometry(format!(
                "a {n}x{n} grid exceeds the 32-bit vertex index range"
            )));
        }

        let vertices = self.vertices(grid, cancel)?;
        let faces = surface_and_wall_faces(n as u32, cancel)?;
        debug_assert_eq!(faces.len(), face_count(n));

        debug!(
            resolution = n,
            vertices = vertices.len(),
            faces = faces.len(),
            "built relief mesh"
        );
        Mesh::new(vertices, faces)
    }

    fn vertices(&self, grid: &ElevationGrid, cancel: &CancelToken) -> Result<Vec<Vertex>> {
        let n = grid.size();
        let half = self.width / 2.0;
        // Square footprint: both axes share the same spacing.
        let cell = self.width / (n - 1) as f32;
        let mut vertices = Vec::with_capacity(vertex_count(n));

        for y in 0..n {
            cancel.check()?;
            let py = y as f32 * cell - half;
            for (x, &elevation) in grid.row(y).iter().enumerate() {
                let z = elevation * self.height_scale + self.base_thickness;
                if !z.is_finite() {
                    return Err(ReliefError::invalid_geometry(format!(
                        "elevation {elevation} at ({x}, {y}) gives non-finite height {z}"
                    )));
                }
                vertices.push(Point3::new(x as f32 * cell - half, py, z));
            }
        }

        // The bottom plate repeats the top footprint at z = 0.
        for y in 0..n {
            cancel.check()?;
            let start = y * n;
            for i in start..start + n {
                let top = vertices[i];
                vertices.push(Point3::new(top.x, top.y, 0.0));
            }
        }

        Ok(vertices)
    }
}

/// Side walls in emission order.
#[derive(Debug, Clone, Copy)]
enum Wall {
    /// y = 0
    Front,
    /// y = n - 1
    Back,
    /// x = 0
    Left,
    /// x = n - 1
    Right,
}

impl Wall {
    const ALL: [Wall; 4] = [Wall::Front, Wall::Back, Wall::Left, Wall::Right];

    /// Top-surface indices of boundary segment `i`, ordered the way the top
    /// boundary runs (counter-clockwise seen from +z). Walls stitched along
    /// this direction stay opposed to the surfaces and to each other at the
    /// shared corner edges.
    fn segment(self, i: u32, n: u32) -> (u32, u32) {
        let last = n - 1;
        match self {
            Wall::Front => (i, i + 1),
            Wall::Back => (last * n + i + 1, last * n + i),
            Wall::Left => ((i + 1) * n, i * n),
            Wall::Right => (i * n + last, (i + 1) * n + last),
        }
    }
}

fn surface_and_wall_faces(n: u32, cancel: &CancelToken) -> Result<Vec<Face>> {
    let offset = n * n;
    let last = n - 1;
    let mut faces = Vec::with_capacity(face_count(n as usize));

    // Top surface, normals +z. "bottom" in the names means grid row y + 1.
    for y in 0..last {
        cancel.check()?;
        for x in 0..last {
            let top_left = y * n + x;
            let top_right = top_left + 1;
            let bottom_left = top_left + n;
            let bottom_right = bottom_left + 1;
            faces.push([top_left, top_right, bottom_left]);
            faces.push([top_right, bottom_right, bottom_left]);
        }
    }

    // Bottom plate, winding reversed so normals face -z.
    for y in 0..last {
        cancel.check()?;
        for x in 0..last {
            let top_left = offset + y * n + x;
            let top_right = top_left + 1;
            let bottom_left = top_left + n;
            let bottom_right = bottom_left + 1;
            faces.push([top_left, bottom_left, top_right]);
            faces.push([top_right, bottom_left, bottom_right]);
        }
    }

    for wall in Wall::ALL {
        cancel.check()?;
        for i in 0..last {
            let (a, b) = wall.segment(i, n);
            let (a_bottom, b_bottom) = (a + offset, b + offset);
            faces.push([b, a, a_bottom]);
            faces.push([b, a_bottom, b_bottom]);
        }
    }

    Ok(faces)
}
