//! Mesh construction utilities.
//!
//! This module builds a [`MeshModel`] from face-vertex lists as commonly found
//! in mesh file formats, and converts a model back into that form.

use nalgebra::Point3;

use super::index::VertexId;
use super::model::MeshModel;
use super::update::{refresh_all, UpdateOptions};
use crate::error::MeshError;

/// Build a mesh from vertex positions and triangle faces.
///
/// Every face index is validated and degenerate faces are rejected. Normals
/// and the bounding box are computed, so the returned mesh has no stale
/// attributes.
///
/// # Example
/// ```
/// use meshfilter::mesh::build_from_triangles;
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.5, 1.0, 0.0),
/// ];
/// let faces = vec![[0, 1, 2]];
///
/// let mesh = build_from_triangles(&vertices, &faces).unwrap();
/// assert_eq!(mesh.num_vertices(), 3);
/// assert_eq!(mesh.num_faces(), 1);
/// ```
pub fn build_from_triangles(
    vertices: &[Point3<f64>],
    faces: &[[usize; 3]],
) -> Result<MeshModel, MeshError> {
    if faces.is_empty() {
        return Err(MeshError::EmptyMesh);
    }

    for (fi, face) in faces.iter().enumerate() {
        for &vi in face {
            if vi >= vertices.len() {
                return Err(MeshError::InvalidVertexIndex { face: fi, vertex: vi });
            }
        }
        if face[0] == face[1] || face[1] == face[2] || face[0] == face[2] {
            return Err(MeshError::DegenerateFace { face: fi });
        }
    }

    let mut mesh = MeshModel::with_capacity(vertices.len(), faces.len());
    for &pos in vertices {
        mesh.add_vertex(pos);
    }
    for face in faces {
        mesh.add_face((*face).map(VertexId::new));
    }

    refresh_all(&mut mesh, &UpdateOptions::default());
    Ok(mesh)
}

/// Convert a mesh back to a face-vertex representation.
///
/// Returns (vertices, faces) tuple.
pub fn to_face_vertex(mesh: &MeshModel) -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
    let vertices = mesh.vertex_ids().map(|v| *mesh.position(v)).collect();
    let faces = mesh
        .face_ids()
        .map(|f| mesh.face_vertices(f).map(VertexId::index))
        .collect();
    (vertices, faces)
}
