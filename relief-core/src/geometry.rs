/// Indexed triangle mesh and its topology checks
use std::collections::HashMap;

use nalgebra::{Point3, Vector3};

use crate::error::{ReliefError, Result};
use crate::normal::face_normal;

/// A point in model space, in millimeters.
pub type Vertex = Point3<f32>;

/// Three vertex indices, counter-clockwise when seen from outside the solid.
pub type Face = [u32; 3];

/// A triangle resolved to its corner positions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Outward unit normal, or zero for a degenerate triangle
    pub fn normal(&self) -> Vector3<f32> {
        face_normal(&self.vertices[0], &self.vertices[1], &self.vertices[2])
    }

    pub fn centroid(&self) -> Vertex {
        let [a, b, c] = self.vertices;
        Point3::from((a.coords + b.coords + c.coords) / 3.0)
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vertex,
    pub max: Vertex,
}

impl Bounds {
    pub fn size(&self) -> Vector3<f32> {
        self.max - self.min
    }
}

/// Vertex and face buffers of a solid.
///
/// A mesh is never mutated after construction; building with different
/// parameters produces a new one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    faces: Vec<Face>,
}

impl Mesh {
    /// Assemble a mesh, rejecting faces that reference missing vertices.
    pub fn new(vertices: Vec<Vertex>, faces: Vec<Face>) -> Result<Self> {
        let count = vertices.len();
        if let Some((i, face)) = faces
            .iter()
            .enumerate()
            .find(|(_, face)| face.iter().any(|&v| v as usize >= count))
        {
            return Err(ReliefError::invalid_geometry(format!(
                "face {i} {face:?} references a vertex outside 0..{count}"
            )));
        }
        Ok(Self { vertices, faces })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    pub fn triangle(&self, face: usize) -> Triangle {
        let [a, b, c] = self.faces[face];
        Triangle::new(
            self.vertices[a as usize],
            self.vertices[b as usize],
            self.vertices[c as usize],
        )
    }

    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        (0..self.faces.len()).map(move |i| self.triangle(i))
    }

    pub fn bounds(&self) -> Option<Bounds> {
        let first = *self.vertices.first()?;
        let (min, max) = self
            .vertices
            .iter()
            .fold((first, first), |(min, max), v| (min.inf(v), max.sup(v)));
        Some(Bounds { min, max })
    }

    /// Enclosed volume by the divergence theorem.
    ///
    /// Positive when faces wind outward; only meaningful for closed meshes.
    pub fn signed_volume(&self) -> f64 {
        self.triangles()
            .map(|t| {
                let [a, b, c] = t.vertices.map(|v| v.coords.cast::<f64>());
                a.dot(&b.cross(&c)) / 6.0
            })
            .sum()
    }

    /// Whether every edge is shared by exactly two faces walking it in
    /// opposite directions.
    pub fn is_closed_manifold(&self) -> bool {
        let mut directed: HashMap<(u32, u32), u32> = HashMap::with_capacity(self.faces.len() * 3);
        for &[a, b, c] in &self.faces {
            for edge in [(a, b), (b, c), (c, a)] {
                *directed.entry(edge).or_insert(0) += 1;
            }
        }
        directed
            .iter()
            .all(|(&(a, b), &count)| count == 1 && directed.get(&(b, a)) == Some(&1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Unit tetrahedron with outward windings
    fn tetrahedron() -> Mesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
        ];
        let faces = vec![[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]];
        Mesh::new(vertices, faces).unwrap()
    }

    #[test]
    fn test_rejects_dangling_index() {
        let result = Mesh::new(vec![Point3::origin(); 3], vec![[0, 1, 3]]);
        assert!(matches!(result, Err(ReliefError::InvalidGeometry { .. })));
    }

    #[test]
    fn test_tetrahedron_is_closed() {
        let mesh = tetrahedron();
        assert!(mesh.is_closed_manifold());
        assert_relative_eq!(mesh.signed_volume(), 1.0 / 6.0, epsilon = 1e-9);
    }

    #[test]
    fn test_flipped_face_breaks_manifold() {
        let vertices = tetrahedron().vertices().to_vec();
        let faces = vec![[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 3, 2]];
        let mesh = Mesh::new(vertices, faces).unwrap();
        assert!(!mesh.is_closed_manifold());
    }

    #[test]
    fn test_open_surface_is_not_closed() {
        let vertices = tetrahedron().vertices().to_vec();
        let mesh = Mesh::new(vertices, vec![[0, 2, 1], [0, 1, 3]]).unwrap();
        assert!(!mesh.is_closed_manifold());
    }

    #[test]
    fn test_bounds_and_centroid() {
        let mesh = tetrahedron();
        let bounds = mesh.bounds().unwrap();
        assert_eq!(bounds.min, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(bounds.size(), Vector3::new(1.0, 1.0, 1.0));

        let centroid = mesh.triangle(3).centroid();
        assert_relative_eq!(centroid.x, 1.0 / 3.0, epsilon = 1e-6);
        assert!(Mesh::empty().bounds().is_none());
    }

    #[test]
    fn test_empty_mesh() {
        let mesh = Mesh::empty();
        assert!(mesh.is_empty());
        assert!(mesh.is_closed_manifold());
        assert_eq!(mesh.signed_volume(), 0.0);
    }
}
