//! Face-vertex mesh model.
//!
//! [`MeshModel`] is the mesh a host hands to a filter: ordered vertices with a
//! position and a normal, ordered triangles with a normal, and a cached
//! bounding box. Positions and connectivity are the raw data; normals and the
//! box are derived and may go stale after an edit until the host refreshes
//! them (see [`crate::mesh::update`]).

use nalgebra::{Point3, Vector3};

use super::index::{FaceId, VertexId};

/// A vertex with its position and (derived) normal.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    /// The 3D position of this vertex.
    pub position: Point3<f64>,

    /// Area-weighted unit normal. Derived from the incident faces.
    pub normal: Vector3<f64>,
}

impl Vertex {
    /// Create a new vertex at the given position with a zero normal.
    pub fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            normal: Vector3::zeros(),
        }
    }
}

/// A triangular face with its (derived) normal.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    /// The three corners, counter-clockwise.
    pub vertices: [VertexId; 3],

    /// Unit normal of the triangle. Derived from the corner positions.
    pub normal: Vector3<f64>,
}

impl Face {
    /// Create a new face over the given corners with a zero normal.
    pub fn new(vertices: [VertexId; 3]) -> Self {
        Self {
            vertices,
            normal: Vector3::zeros(),
        }
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum corner.
    pub min: Point3<f64>,
    /// Maximum corner.
    pub max: Point3<f64>,
}

impl BoundingBox {
    /// Length of the box diagonal.
    pub fn diagonal(&self) -> f64 {
        (self.max - self.min).norm()
    }
}

/// A triangle mesh in face-vertex form.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeshModel {
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) faces: Vec<Face>,
    pub(crate) bbox: Option<BoundingBox>,
}

impl MeshModel {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mesh with pre-allocated capacity.
    pub fn with_capacity(num_vertices: usize, num_faces: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(num_vertices),
            faces: Vec::with_capacity(num_faces),
            bbox: None,
        }
    }

    // ==================== Accessors ====================

    /// Get the number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Check whether `v` addresses an existing vertex.
    #[inline]
    pub fn contains_vertex(&self, v: VertexId) -> bool {
        v.index() < self.vertices.len()
    }

    /// Get a vertex by ID.
    #[inline]
    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.index()]
    }

    /// Get a face by ID.
    #[inline]
    pub fn face(&self, id: FaceId) -> &Face {
        &self.faces[id.index()]
    }

    /// Get the position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId) -> &Point3<f64> {
        &self.vertex(v).position
    }

    /// Set the position of a vertex.
    ///
    /// Only the raw coordinate changes; normals and the bounding box are left
    /// as they were.
    #[inline]
    pub fn set_position(&mut self, v: VertexId, pos: Point3<f64>) {
        self.vertices[v.index()].position = pos;
    }

    /// Get the cached normal of a vertex.
    #[inline]
    pub fn vertex_normal(&self, v: VertexId) -> &Vector3<f64> {
        &self.vertex(v).normal
    }

    /// Get the cached normal of a face.
    #[inline]
    pub fn face_normal(&self, f: FaceId) -> &Vector3<f64> {
        &self.face(f).normal
    }

    /// Get the three corners of a face.
    #[inline]
    pub fn face_vertices(&self, f: FaceId) -> [VertexId; 3] {
        self.face(f).vertices
    }

    /// Get the positions of the three corners of a face.
    pub fn face_positions(&self, f: FaceId) -> [Point3<f64>; 3] {
        let [v0, v1, v2] = self.face_vertices(f);
        [*self.position(v0), *self.position(v1), *self.position(v2)]
    }

    /// Get the cached bounding box, `None` for a mesh without vertices.
    #[inline]
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.bbox
    }

    /// Iterate over all vertex IDs.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        (0..self.vertices.len()).map(VertexId::new)
    }

    /// Iterate over all face IDs.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId> + '_ {
        (0..self.faces.len()).map(FaceId::new)
    }

    // ==================== Construction ====================

    /// Add a new vertex and return its ID.
    pub fn add_vertex(&mut self, position: Point3<f64>) -> VertexId {
        let id = VertexId::new(self.vertices.len());
        self.vertices.push(Vertex::new(position));
        id
    }

    /// Add a new face and return its ID. Corners are not validated here; use
    /// [`crate::mesh::build_from_triangles`] for checked construction.
    pub fn add_face(&mut self, vertices: [VertexId; 3]) -> FaceId {
        let id = FaceId::new(self.faces.len());
        self.faces.push(Face::new(vertices));
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_mesh() {
        let mesh = MeshModel::new();
        assert_eq!(mesh.num_vertices(), 0);
        assert_eq!(mesh.num_faces(), 0);
        assert!(mesh.bounding_box().is_none());
    }

    #[test]
    fn test_add_vertex() {
        let mut mesh = MeshModel::new();
        let v0 = mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
        let v1 = mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));

        assert_eq!(mesh.num_vertices(), 2);
        assert_eq!(v0.index(), 0);
        assert_eq!(v1.index(), 1);
        assert!(mesh.contains_vertex(v1));
        assert!(!mesh.contains_vertex(VertexId::new(2)));
    }

    #[test]
    fn test_set_position_leaves_normals() {
        let mut mesh = MeshModel::new();
        let v = mesh.add_vertex(Point3::origin());
        mesh.vertices[0].normal = Vector3::z();

        mesh.set_position(v, Point3::new(1.0, 2.0, 3.0));
        assert_eq!(*mesh.position(v), Point3::new(1.0, 2.0, 3.0));
        assert_eq!(*mesh.vertex_normal(v), Vector3::z());
    }
}
