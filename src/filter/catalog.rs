//! The filter catalog.
//!
//! [`FilterCatalog`] owns a set of [`FilterPlugin`]s and routes every lookup and
//! execution to the plugin registered for an identifier. Identifiers that no
//! registered plugin serves fail with [`FilterError::UnknownOperation`].

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use super::vertex_edit::VertexEditPlugin;
use super::{FilterClass, FilterId, FilterPlugin, ParameterSchema, ParameterSet, Progress};
use crate::error::{FilterError, Result};
use crate::mesh::{AttributeMask, MeshModel};

/// Registry of filter plugins keyed by [`FilterId`].
#[derive(Default)]
pub struct FilterCatalog {
    plugins: Vec<Box<dyn FilterPlugin>>,
    index: BTreeMap<FilterId, usize>,
    order: Vec<FilterId>,
}

impl FilterCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog with every plugin this crate ships.
    pub fn with_builtin() -> Self {
        let mut catalog = Self::new();
        let registered = catalog.register(Box::new(VertexEditPlugin));
        debug_assert!(registered.is_ok(), "builtin plugins overlap: {:?}", registered);
        catalog
    }

    /// Register a plugin.
    ///
    /// Fails with [`FilterError::DuplicateOperation`] if the plugin claims an
    /// identifier that is already served; the catalog is unchanged in that case.
    pub fn register(&mut self, plugin: Box<dyn FilterPlugin>) -> Result<()> {
        let ids = plugin.filters();
        for (i, &id) in ids.iter().enumerate() {
            if self.index.contains_key(&id) || ids[..i].contains(&id) {
                return Err(FilterError::DuplicateOperation(id));
            }
        }

        let slot = self.plugins.len();
        for &id in ids {
            debug!(filter = %id, "registering filter");
            self.index.insert(id, slot);
            self.order.push(id);
        }
        self.plugins.push(plugin);
        Ok(())
    }

    /// Resolve a string key to a registered identifier.
    pub fn resolve(&self, key: &str) -> Result<FilterId> {
        let id: FilterId = key.parse()?;
        self.plugin(id)?;
        Ok(id)
    }

    /// Whether `id` is served by this catalog.
    pub fn contains(&self, id: FilterId) -> bool {
        self.index.contains_key(&id)
    }

    /// Registered identifiers, in registration order.
    pub fn filters(&self) -> impl Iterator<Item = FilterId> + '_ {
        self.order.iter().copied()
    }

    /// Number of registered filters.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether no filter is registered.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn plugin(&self, id: FilterId) -> Result<&dyn FilterPlugin> {
        self.index
            .get(&id)
            .map(|&slot| self.plugins[slot].as_ref())
            .ok_or_else(|| FilterError::unknown(id))
    }

    /// Display name of a filter.
    pub fn name(&self, id: FilterId) -> Result<&'static str> {
        Ok(self.plugin(id)?.name(id))
    }

    /// Description of a filter.
    pub fn description(&self, id: FilterId) -> Result<&'static str> {
        Ok(self.plugin(id)?.description(id))
    }

    /// Parameter schema of a filter.
    pub fn parameter_schema(&self, id: FilterId) -> Result<ParameterSchema> {
        Ok(self.plugin(id)?.parameter_schema(id))
    }

    /// Menu category of a filter.
    pub fn classify(&self, id: FilterId) -> Result<FilterClass> {
        Ok(self.plugin(id)?.classify(id))
    }

    /// Whether a host can generate the filter's input dialog from its schema.
    pub fn auto_dialog(&self, id: FilterId) -> Result<bool> {
        Ok(self.plugin(id)?.auto_dialog(id))
    }

    /// Starting parameter values for running a filter on `mesh`.
    pub fn init_parameters(&self, id: FilterId, mesh: &MeshModel) -> Result<ParameterSet> {
        Ok(self.plugin(id)?.init_parameters(id, mesh))
    }

    /// Attribute classes the filter leaves stale after a successful run.
    pub fn invalidation_mask(&self, id: FilterId) -> Result<AttributeMask> {
        self.plugin(id)?;
        Ok(id.invalidation_mask())
    }

    /// Run a filter against `mesh`.
    ///
    /// Parameters are validated against the filter's schema before the plugin
    /// runs. Each call starts a fresh progress run, so one [`Progress`] can be
    /// reused across calls. On success the progress sequence ends with 100. On
    /// any error the mesh is unchanged.
    pub fn execute(
        &self,
        id: FilterId,
        mesh: &mut MeshModel,
        params: &ParameterSet,
        progress: &mut Progress<'_>,
    ) -> Result<()> {
        progress.begin();
        let plugin = self.plugin(id)?;
        plugin.parameter_schema(id).validate(params)?;

        debug!(
            filter = %id,
            vertices = mesh.num_vertices(),
            faces = mesh.num_faces(),
            "executing filter"
        );

        match plugin.execute(id, mesh, params, progress) {
            Ok(()) => {
                progress.finish(plugin.name(id));
                info!(filter = %id, invalidated = %id.invalidation_mask(), "filter completed");
                Ok(())
            }
            Err(e @ FilterError::OperationAborted { .. }) => {
                warn!(filter = %id, error = %e, "filter cancelled");
                Err(e)
            }
            Err(e) => {
                debug!(filter = %id, error = %e, "filter failed");
                Err(e)
            }
        }
    }
}

impl std::fmt::Debug for FilterCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterCatalog")
            .field("filters", &self.order)
            .finish_non_exhaustive()
    }
}
