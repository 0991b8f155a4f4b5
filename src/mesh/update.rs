//! Recomputation of derived mesh attributes.
//!
//! After a filter runs, the host passes the filter's [`AttributeMask`] to
//! [`refresh`] and only the attributes that can actually be stale are rebuilt.
//!
//! # Example
//!
//! ```
//! use meshfilter::prelude::*;
//! use meshfilter::mesh::update::{refresh, UpdateOptions};
//! use nalgebra::Point3;
//!
//! let positions = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let mut mesh = build_from_triangles(&positions, &[[0, 1, 2]]).unwrap();
//! mesh.set_position(VertexId::new(2), Point3::new(0.0, 1.0, 1.0));
//!
//! refresh(&mut mesh, AttributeMask::FACE_NORMAL, &UpdateOptions::default());
//! ```

use nalgebra::{Point3, Vector3};
use rayon::prelude::*;

use super::mask::AttributeMask;
use super::model::{BoundingBox, Face, MeshModel, Vertex};

/// Options for attribute recomputation.
#[derive(Debug, Clone)]
pub struct UpdateOptions {
    /// Whether to use parallel execution (default: true).
    pub parallel: bool,
}

impl Default for UpdateOptions {
    fn default() -> Self {
        Self { parallel: true }
    }
}

impl UpdateOptions {
    /// Enable or disable parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// Recompute the derived attributes implied by `mask`.
///
/// - `FACE_NORMAL`: face normals
/// - `VERT_NORMAL`: vertex normals (uses the current face geometry, not the
///   cached face normals, so order does not matter)
/// - `VERT_COORD` or `BBOX`: bounding box
///
/// Other classes carry no derived data in [`MeshModel`] and are ignored.
pub fn refresh(mesh: &mut MeshModel, mask: AttributeMask, options: &UpdateOptions) {
    if mask.contains(AttributeMask::FACE_NORMAL) {
        update_face_normals(mesh, options);
    }
    if mask.contains(AttributeMask::VERT_NORMAL) {
        update_vertex_normals(mesh);
    }
    if mask.intersects(AttributeMask::VERT_COORD | AttributeMask::BBOX) {
        update_bounding_box(mesh);
    }
}

/// Recompute every derived attribute.
pub fn refresh_all(mesh: &mut MeshModel, options: &UpdateOptions) {
    refresh(
        mesh,
        AttributeMask::FACE_NORMAL | AttributeMask::VERT_NORMAL | AttributeMask::BBOX,
        options,
    );
}

/// Recompute the unit normal of every face.
pub fn update_face_normals(mesh: &mut MeshModel, options: &UpdateOptions) {
    let vertices = &mesh.vertices;
    let compute = |face: &mut Face| {
        face.normal = normalize_or_zero(area_vector(vertices, face));
    };

    if options.parallel {
        mesh.faces.par_iter_mut().for_each(compute);
    } else {
        mesh.faces.iter_mut().for_each(compute);
    }
}

/// Recompute area-weighted vertex normals.
///
/// Vertices that belong to no face, or only to degenerate faces, get a zero
/// normal.
pub fn update_vertex_normals(mesh: &mut MeshModel) {
    let mut sums = vec![Vector3::zeros(); mesh.vertices.len()];
    for face in &mesh.faces {
        let weighted = area_vector(&mesh.vertices, face);
        for v in face.vertices {
            sums[v.index()] += weighted;
        }
    }

    for (vertex, sum) in mesh.vertices.iter_mut().zip(sums) {
        vertex.normal = normalize_or_zero(sum);
    }
}

/// Recompute the bounding box from the vertex positions.
pub fn update_bounding_box(mesh: &mut MeshModel) {
    mesh.bbox = compute_bounding_box(&mesh.vertices);
}

fn compute_bounding_box(vertices: &[Vertex]) -> Option<BoundingBox> {
    let first = vertices.first()?.position;
    let mut min = first;
    let mut max = first;

    for v in vertices {
        for i in 0..3 {
            min[i] = min[i].min(v.position[i]);
            max[i] = max[i].max(v.position[i]);
        }
    }

    Some(BoundingBox { min, max })
}

/// Cross product of two triangle edges: twice the area, along the normal.
fn area_vector(vertices: &[Vertex], face: &Face) -> Vector3<f64> {
    let [p0, p1, p2]: [Point3<f64>; 3] = face.vertices.map(|v| vertices[v.index()].position);
    (p1 - p0).cross(&(p2 - p0))
}

fn normalize_or_zero(v: Vector3<f64>) -> Vector3<f64> {
    v.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::zeros)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{build_from_triangles, FaceId, VertexId};

    fn create_tent() -> MeshModel {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let faces = vec![[0, 1, 2], [0, 2, 3]];
        build_from_triangles(&positions, &faces).unwrap()
    }

    #[test]
    fn test_face_normals_after_move() {
        let mut mesh = create_tent();
        assert!((mesh.face_normal(FaceId::new(0)) - Vector3::z()).norm() < 1e-12);

        // Tilt the first triangle out of the plane
        mesh.set_position(VertexId::new(1), Point3::new(1.0, 0.0, 1.0));
        refresh(&mut mesh, AttributeMask::FACE_NORMAL, &UpdateOptions::default());

        let n0 = mesh.face_normal(FaceId::new(0));
        let n1 = mesh.face_normal(FaceId::new(1));
        assert!((n0.norm() - 1.0).abs() < 1e-12);
        assert!(n0.x < 0.0, "tilted face should lean away from +x: {:?}", n0);
        assert!((n1 - Vector3::z()).norm() < 1e-12, "untouched face keeps +z");
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mut a = create_tent();
        a.set_position(VertexId::new(2), Point3::new(1.0, 1.0, 0.5));
        let mut b = a.clone();

        update_face_normals(&mut a, &UpdateOptions::default());
        update_face_normals(&mut b, &UpdateOptions::default().with_parallel(false));
        assert_eq!(a, b);
    }

    #[test]
    fn test_mask_limits_work() {
        let mut mesh = create_tent();
        let stale_normal = *mesh.vertex_normal(VertexId::new(1));
        mesh.set_position(VertexId::new(1), Point3::new(3.0, 0.0, 2.0));

        refresh(&mut mesh, AttributeMask::FACE_NORMAL, &UpdateOptions::default());

        // Vertex normals and bounding box were not requested
        assert_eq!(*mesh.vertex_normal(VertexId::new(1)), stale_normal);
        assert_eq!(mesh.bounding_box().unwrap().max, Point3::new(1.0, 1.0, 0.0));

        refresh(&mut mesh, AttributeMask::VERT_COORD, &UpdateOptions::default());
        assert_eq!(mesh.bounding_box().unwrap().max, Point3::new(3.0, 1.0, 2.0));
    }

    #[test]
    fn test_degenerate_face_gets_zero_normal() {
        let mut mesh = create_tent();
        // Collapse the second triangle onto a line
        mesh.set_position(VertexId::new(3), Point3::new(0.5, 0.5, 0.0));
        refresh_all(&mut mesh, &UpdateOptions::default());

        assert_eq!(*mesh.face_normal(FaceId::new(1)), Vector3::zeros());
        assert!(mesh.vertex_normal(VertexId::new(3)).norm() < 1e-12);
        assert!(mesh.face_normal(FaceId::new(1)).iter().all(|c| c.is_finite()));
    }
}
