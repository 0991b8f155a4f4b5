//! Core mesh data structures.
//!
//! This module provides the mesh a filter operates on and the host-side
//! machinery around it.
//!
//! # Overview
//!
//! The primary type is [`MeshModel`], a triangle mesh in face-vertex form.
//! Positions and connectivity are its raw data; vertex normals, face normals
//! and the bounding box are derived attributes cached alongside them.
//!
//! Filters edit raw data and declare, through an [`AttributeMask`], which
//! derived attributes they leave stale. [`update::refresh`] rebuilds exactly
//! those.
//!
//! # Construction
//!
//! ```
//! use meshfilter::mesh::{MeshModel, build_from_triangles};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ];
//! let faces = vec![[0, 1, 2]];
//!
//! let mesh: MeshModel = build_from_triangles(&vertices, &faces).unwrap();
//! ```

mod builder;
mod index;
mod mask;
mod model;
pub mod update;

pub use builder::{build_from_triangles, to_face_vertex};
pub use index::{FaceId, VertexId};
pub use mask::AttributeMask;
pub use model::{BoundingBox, Face, MeshModel, Vertex};
