//! # meshfilter
//!
//! The filter side of a mesh editing host: a catalog of named, parameterized
//! mesh operations a host can list, configure and invoke.
//!
//! Each filter declares
//!
//! - a display name, a description and a menu class
//! - a [`ParameterSchema`](filter::ParameterSchema) the host fills in
//! - an [`AttributeMask`](mesh::AttributeMask) of derived attributes it leaves
//!   stale, fixed per filter so the host can plan the minimum recomputation
//!
//! Execution is synchronous and atomic: a filter either applies its whole edit
//! or leaves the mesh untouched and returns a [`FilterError`](error::FilterError).
//!
//! ## Quick Start
//!
//! ```
//! use meshfilter::prelude::*;
//! use meshfilter::mesh::update::{refresh, UpdateOptions};
//! use nalgebra::{Point3, Vector3};
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//!     Point3::new(0.5, 0.5, 1.0),
//! ];
//! let faces = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
//! let mut mesh = build_from_triangles(&vertices, &faces).unwrap();
//!
//! let catalog = FilterCatalog::with_builtin();
//! for id in catalog.filters() {
//!     println!("{}: {}", catalog.classify(id).unwrap(), catalog.name(id).unwrap());
//! }
//!
//! let params = ParameterSet::new()
//!     .with("target", ParamValue::Vertex(3))
//!     .with("offset", ParamValue::Vec3(Vector3::new(0.0, 0.0, 0.5)));
//! catalog
//!     .execute(FilterId::MoveVertex, &mut mesh, &params, &mut Progress::none())
//!     .unwrap();
//!
//! let mask = catalog.invalidation_mask(FilterId::MoveVertex).unwrap();
//! refresh(&mut mesh, mask, &UpdateOptions::default());
//! assert_eq!(*mesh.position(VertexId::new(3)), Point3::new(0.5, 0.5, 1.5));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod filter;
pub mod io;
pub mod mesh;

/// Prelude module for convenient imports.
///
/// ```
/// use meshfilter::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{FilterError, MeshError, Result};
    pub use crate::filter::{
        FilterCatalog, FilterClass, FilterId, FilterPlugin, ParamSpec, ParamType, ParamValue,
        ParameterSchema, ParameterSet, Progress,
    };
    pub use crate::mesh::{build_from_triangles, AttributeMask, FaceId, MeshModel, VertexId};
}

// Re-export nalgebra types for convenience
pub use nalgebra;

#[cfg(test)]
mod tests {
    use super::mesh::update::{refresh, UpdateOptions};
    use super::prelude::*;
    use nalgebra::{Point3, Vector3};

    #[test]
    fn test_move_then_refresh_matches_rebuild() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];
        let faces = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
        let mut mesh = build_from_triangles(&vertices, &faces).unwrap();

        let catalog = FilterCatalog::with_builtin();
        let offset = Vector3::new(0.2, -0.1, 0.7);
        let params = ParameterSet::new()
            .with("target", ParamValue::Vertex(3))
            .with("offset", ParamValue::Vec3(offset));
        catalog
            .execute(FilterId::MoveVertex, &mut mesh, &params, &mut Progress::none())
            .unwrap();

        let mask = catalog.invalidation_mask(FilterId::MoveVertex).unwrap();
        refresh(&mut mesh, mask, &UpdateOptions::default());

        // The declared mask is enough to bring every derived attribute up to date
        let mut moved = vertices.clone();
        moved[3] += offset;
        let rebuilt = build_from_triangles(&moved, &faces).unwrap();
        assert_eq!(mesh, rebuilt);
    }
}
