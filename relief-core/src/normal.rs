/// Per-face normals, computed on demand
use nalgebra::{Point3, Vector3};
use tracing::trace;

use crate::geometry::Mesh;

/// Unit normal of triangle `(a, b, c)` by the right-hand rule.
///
/// Collinear or coincident corners have no direction; they yield the zero
/// vector instead of an error, matching what STL consumers accept.
pub fn face_normal(a: &Point3<f32>, b: &Point3<f32>, c: &Point3<f32>) -> Vector3<f32> {
    let u = b - a;
    let w = c - a;
    match u.cross(&w).try_normalize(0.0) {
        Some(n) => n,
        None => {
            trace!(?a, ?b, ?c, "degenerate triangle, emitting zero normal");
            Vector3::zeros()
        }
    }
}

/// Normals of every face of `mesh`, in face order.
pub fn face_normals(mesh: &Mesh) -> impl Iterator<Item = Vector3<f32>> + '_ {
    mesh.triangles().map(|t| t.normal())
}
