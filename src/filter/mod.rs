//! Filter identifiers, the plugin interface and the catalog.
//!
//! A filter is a named, parameterized edit applied to a [`MeshModel`]. Filters
//! are grouped into plugins implementing [`FilterPlugin`]; a host collects
//! plugins in a [`FilterCatalog`] and only ever talks to them through it.
//!
//! # Filters
//!
//! - [`FilterId::MoveVertex`]: displace one vertex by a fixed offset
//!
//! # Example
//!
//! ```
//! use meshfilter::prelude::*;
//! use nalgebra::{Point3, Vector3};
//!
//! let positions = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let mut mesh = build_from_triangles(&positions, &[[0, 1, 2]]).unwrap();
//!
//! let catalog = FilterCatalog::with_builtin();
//! let id = catalog.resolve("move_vertex").unwrap();
//! let params = ParameterSet::new()
//!     .with("target", ParamValue::Vertex(2))
//!     .with("offset", ParamValue::Vec3(Vector3::new(0.0, 0.0, 1.0)));
//!
//! catalog.execute(id, &mut mesh, &params, &mut Progress::none()).unwrap();
//! assert_eq!(*mesh.position(VertexId::new(2)), Point3::new(0.0, 1.0, 1.0));
//!
//! // Only the attributes the filter declares need rebuilding
//! let mask = catalog.invalidation_mask(id).unwrap();
//! meshfilter::mesh::update::refresh(&mut mesh, mask, &Default::default());
//! ```

mod catalog;
mod params;
mod progress;
pub mod vertex_edit;

use std::fmt;
use std::str::FromStr;

pub use catalog::FilterCatalog;
pub use params::{ParamSpec, ParamType, ParamValue, ParameterSchema, ParameterSet};
pub use progress::Progress;

use crate::error::{FilterError, Result};
use crate::mesh::{AttributeMask, MeshModel};

/// Stable identifier of a filter.
///
/// Keys and codes are part of the published interface: a value is never
/// reassigned to a different filter once released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[non_exhaustive]
pub enum FilterId {
    /// Displace a single vertex.
    MoveVertex,
}

impl FilterId {
    /// Every identifier defined by this crate.
    pub const ALL: &'static [FilterId] = &[FilterId::MoveVertex];

    /// Stable string key, used by hosts and on the command line.
    pub const fn key(self) -> &'static str {
        match self {
            FilterId::MoveVertex => "move_vertex",
        }
    }

    /// Stable numeric code.
    pub const fn code(self) -> u32 {
        match self {
            FilterId::MoveVertex => 0,
        }
    }

    /// Attribute classes this filter leaves stale.
    ///
    /// A property of the filter type alone: it never depends on the mesh or
    /// the parameters of a particular call.
    pub const fn invalidation_mask(self) -> AttributeMask {
        match self {
            FilterId::MoveVertex => AttributeMask::VERT_COORD
                .union(AttributeMask::FACE_NORMAL)
                .union(AttributeMask::VERT_NORMAL),
        }
    }

    /// Look up an identifier by its key.
    pub fn from_key(key: &str) -> Option<FilterId> {
        FilterId::ALL.iter().copied().find(|id| id.key() == key)
    }
}

impl fmt::Display for FilterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for FilterId {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self> {
        FilterId::from_key(s).ok_or_else(|| FilterError::unknown(s))
    }
}

/// Menu category of a filter. Organizational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterClass {
    /// Uncategorized.
    Generic,
    /// Direct edits of vertex data.
    VertexEditing,
    /// Selection manipulation.
    Selection,
    /// Removal of duplicated or degenerate elements.
    Cleaning,
    /// Changes to mesh resolution or connectivity.
    Remeshing,
    /// Noise removal and fairing.
    Smoothing,
    /// Normal computation and orientation.
    Normals,
    /// Per-vertex or per-face color.
    Colorization,
}

impl FilterClass {
    /// Human-readable menu label.
    pub fn label(self) -> &'static str {
        match self {
            FilterClass::Generic => "Generic",
            FilterClass::VertexEditing => "Vertex Editing",
            FilterClass::Selection => "Selection",
            FilterClass::Cleaning => "Cleaning and Repairing",
            FilterClass::Remeshing => "Remeshing",
            FilterClass::Smoothing => "Smoothing",
            FilterClass::Normals => "Normals",
            FilterClass::Colorization => "Color Creation and Processing",
        }
    }
}

impl fmt::Display for FilterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Interface a family of filters exposes to the catalog.
///
/// The catalog only calls a method with an identifier the plugin listed in
/// [`FilterPlugin::filters`], and only calls [`FilterPlugin::execute`] with a
/// parameter set that already passed [`ParameterSchema::validate`].
///
/// The invalidation mask is deliberately absent: it is a fixed table keyed by
/// [`FilterId`] (see [`FilterId::invalidation_mask`]).
pub trait FilterPlugin: Send + Sync {
    /// Identifiers this plugin serves.
    fn filters(&self) -> &'static [FilterId];

    /// Display name.
    fn name(&self, id: FilterId) -> &'static str;

    /// What the filter does and when to use it.
    fn description(&self, id: FilterId) -> &'static str;

    /// Parameters the filter accepts.
    fn parameter_schema(&self, id: FilterId) -> ParameterSchema;

    /// Menu category.
    fn classify(&self, id: FilterId) -> FilterClass;

    /// Whether the host should build the input dialog from the schema alone.
    fn auto_dialog(&self, _id: FilterId) -> bool {
        true
    }

    /// Starting parameter values for running the filter on `mesh`.
    ///
    /// Defaults to the schema defaults. Plugins override this when a sensible
    /// starting value depends on the mesh, such as its size. The result must
    /// pass [`ParameterSchema::validate`].
    fn init_parameters(&self, id: FilterId, _mesh: &MeshModel) -> ParameterSet {
        self.parameter_schema(id).defaults()
    }

    /// Apply the filter to `mesh`.
    ///
    /// Must either apply the whole edit and return `Ok`, or leave `mesh`
    /// untouched and return an error.
    fn execute(
        &self,
        id: FilterId,
        mesh: &mut MeshModel,
        params: &ParameterSet,
        progress: &mut Progress<'_>,
    ) -> Result<()>;
}
