//! Vertex editing filters.
//!
//! [`VertexEditPlugin`] serves [`FilterId::MoveVertex`], which displaces a
//! single vertex by a fixed offset. Connectivity is never touched and the
//! vertex and face collections keep their order and size.
//!
//! Execution is split into a planning phase, which validates every index and
//! computes the final positions without touching the mesh, and a commit
//! phase, which writes them in one pass and cannot fail. Cancellation is only
//! honoured during planning, so a stopped run leaves the mesh as it was.

use nalgebra::{Point3, Vector3};

use super::{
    FilterClass, FilterId, FilterPlugin, ParamSpec, ParamType, ParamValue, ParameterSchema,
    ParameterSet, Progress,
};
use crate::error::{FilterError, Result};
use crate::mesh::{MeshModel, VertexId};

/// Parameter key of the vertex to move.
pub const PARAM_TARGET: &str = "target";

/// Parameter key of the displacement vector.
pub const PARAM_OFFSET: &str = "offset";

/// Planned moves between two cancellation checks.
pub const CANCEL_CHECK_INTERVAL: usize = 1024;

/// Progress value reserved for the end of planning; the commit follows it.
const COMMIT_PERCENT: u8 = 95;

/// Initial offset length as a fraction of the bounding box diagonal.
const INITIAL_OFFSET_FRACTION: f64 = 0.01;

/// Plugin providing vertex editing filters.
#[derive(Debug, Clone, Copy, Default)]
pub struct VertexEditPlugin;

impl FilterPlugin for VertexEditPlugin {
    fn filters(&self) -> &'static [FilterId] {
        &[FilterId::MoveVertex]
    }

    fn name(&self, id: FilterId) -> &'static str {
        match id {
            FilterId::MoveVertex => "Move Vertex",
        }
    }

    fn description(&self, id: FilterId) -> &'static str {
        match id {
            FilterId::MoveVertex => {
                "Moves one vertex by a given offset and leaves the rest of the mesh, \
                 including its connectivity, untouched. Use it to hand-correct a \
                 misplaced vertex without re-importing or remeshing the model."
            }
        }
    }

    fn parameter_schema(&self, id: FilterId) -> ParameterSchema {
        match id {
            FilterId::MoveVertex => ParameterSchema::new()
                .with(
                    ParamSpec::new(PARAM_TARGET, ParamType::Vertex)
                        .with_label("Vertex")
                        .with_tooltip("Index of the vertex to move")
                        .with_default(ParamValue::Vertex(0)),
                )
                .with(
                    ParamSpec::new(PARAM_OFFSET, ParamType::Vec3)
                        .with_label("Offset")
                        .with_tooltip("Displacement added to the vertex position")
                        .with_default(ParamValue::Vec3(Vector3::zeros())),
                ),
        }
    }

    fn classify(&self, id: FilterId) -> FilterClass {
        match id {
            FilterId::MoveVertex => FilterClass::VertexEditing,
        }
    }

    fn init_parameters(&self, id: FilterId, mesh: &MeshModel) -> ParameterSet {
        let mut params = self.parameter_schema(id).defaults();
        match id {
            FilterId::MoveVertex => {
                // Nudge vertex 0 outwards by 1% of the model size
                let first = VertexId::new(0);
                if let Some(bbox) = mesh.bounding_box().filter(|_| mesh.contains_vertex(first)) {
                    let direction = mesh
                        .vertex_normal(first)
                        .try_normalize(f64::EPSILON)
                        .unwrap_or_else(Vector3::z);
                    let offset = direction * bbox.diagonal() * INITIAL_OFFSET_FRACTION;
                    params.set(PARAM_OFFSET, ParamValue::Vec3(offset));
                }
            }
        }
        params
    }

    fn execute(
        &self,
        id: FilterId,
        mesh: &mut MeshModel,
        params: &ParameterSet,
        progress: &mut Progress<'_>,
    ) -> Result<()> {
        match id {
            FilterId::MoveVertex => move_vertex(mesh, params, progress),
        }
    }
}

fn move_vertex(
    mesh: &mut MeshModel,
    params: &ParameterSet,
    progress: &mut Progress<'_>,
) -> Result<()> {
    let target = params.get_vertex(PARAM_TARGET)?;
    let offset = params.get_vec3(PARAM_OFFSET)?;

    let plan = Displacement::plan(mesh, &[(target, offset)], progress)?;
    progress.report(COMMIT_PERCENT, "Applying displacement")?;
    plan.commit(mesh);
    Ok(())
}

/// Validated vertex moves, ready to be written to the mesh they were planned on.
#[derive(Debug, Clone, PartialEq)]
pub struct Displacement {
    targets: Vec<(VertexId, Point3<f64>)>,
}

impl Displacement {
    /// Validate `moves` against `mesh` and compute the resulting positions.
    ///
    /// Offsets are added to the positions the mesh has now; a vertex listed
    /// twice ends up with its last offset only. Polls `progress` for
    /// cancellation every [`CANCEL_CHECK_INTERVAL`] moves.
    pub fn plan(
        mesh: &MeshModel,
        moves: &[(usize, Vector3<f64>)],
        progress: &mut Progress<'_>,
    ) -> Result<Self> {
        let len = mesh.num_vertices();
        let mut targets = Vec::with_capacity(moves.len());

        for (i, &(index, offset)) in moves.iter().enumerate() {
            if i % CANCEL_CHECK_INTERVAL == 0 {
                let end = COMMIT_PERCENT - 5;
                progress.report_step(i, moves.len(), 0, end, "Planning displacement")?;
            }
            if index >= len {
                return Err(FilterError::IndexOutOfRange { index, len });
            }
            if !offset.iter().all(|c| c.is_finite()) {
                return Err(FilterError::invalid_param(PARAM_OFFSET, "value must be finite"));
            }

            let v = VertexId::new(index);
            targets.push((v, *mesh.position(v) + offset));
        }

        Ok(Self { targets })
    }

    /// Number of planned moves.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Whether nothing is planned.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Write the planned positions.
    ///
    /// Must be applied to the mesh the plan was built from, unmodified since.
    pub fn commit(self, mesh: &mut MeshModel) {
        for (v, pos) in self.targets {
            mesh.set_position(v, pos);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::update::{refresh_all, UpdateOptions};
    use crate::mesh::{build_from_triangles, to_face_vertex};
    use std::ops::ControlFlow;

    fn create_grid_mesh(n: usize) -> MeshModel {
        let mut vertices = Vec::with_capacity((n + 1) * (n + 1));
        let mut faces = Vec::with_capacity(n * n * 2);

        for j in 0..=n {
            for i in 0..=n {
                vertices.push(Point3::new(i as f64, j as f64, 0.0));
            }
        }

        for j in 0..n {
            for i in 0..n {
                let v00 = j * (n + 1) + i;
                let v10 = v00 + 1;
                let v01 = v00 + (n + 1);
                let v11 = v01 + 1;

                faces.push([v00, v10, v11]);
                faces.push([v00, v11, v01]);
            }
        }

        build_from_triangles(&vertices, &faces).unwrap()
    }

    fn params(target: usize, offset: Vector3<f64>) -> ParameterSet {
        ParameterSet::new()
            .with(PARAM_TARGET, ParamValue::Vertex(target))
            .with(PARAM_OFFSET, ParamValue::Vec3(offset))
    }

    fn run(mesh: &mut MeshModel, params: &ParameterSet) -> Result<()> {
        VertexEditPlugin.execute(FilterId::MoveVertex, mesh, params, &mut Progress::none())
    }

    #[test]
    fn test_moves_only_target() {
        let mut mesh = create_grid_mesh(3);
        let before = mesh.clone();
        let offset = Vector3::new(0.25, -0.5, 2.0);

        run(&mut mesh, &params(5, offset)).unwrap();

        for v in mesh.vertex_ids() {
            let expected = if v.index() == 5 {
                *before.position(v) + offset
            } else {
                *before.position(v)
            };
            assert_eq!(*mesh.position(v), expected, "vertex {:?}", v);
        }

        let (_, faces_before) = to_face_vertex(&before);
        let (_, faces_after) = to_face_vertex(&mesh);
        assert_eq!(faces_before, faces_after);
        assert_eq!(mesh.num_vertices(), before.num_vertices());
    }

    #[test]
    fn test_derived_attributes_left_stale() {
        let mut mesh = create_grid_mesh(2);
        let before = mesh.clone();

        run(&mut mesh, &params(4, Vector3::z())).unwrap();

        // Refreshing is the host's job; the filter only declares it
        for f in mesh.face_ids() {
            assert_eq!(mesh.face_normal(f), before.face_normal(f));
        }
        assert_eq!(mesh.bounding_box(), before.bounding_box());
    }

    #[test]
    fn test_out_of_range_leaves_mesh() {
        let mut mesh = create_grid_mesh(2);
        let before = mesh.clone();
        let len = mesh.num_vertices();

        let err = run(&mut mesh, &params(len, Vector3::x())).unwrap_err();
        assert_eq!(err, FilterError::IndexOutOfRange { index: len, len });
        assert_eq!(mesh, before);
    }

    #[test]
    fn test_empty_mesh_has_no_target() {
        let mut mesh = MeshModel::new();
        let err = run(&mut mesh, &params(0, Vector3::x())).unwrap_err();
        assert_eq!(err, FilterError::IndexOutOfRange { index: 0, len: 0 });
    }

    #[test]
    fn test_missing_parameter_leaves_mesh() {
        let mut mesh = create_grid_mesh(2);
        let before = mesh.clone();

        let only_target = ParameterSet::new().with(PARAM_TARGET, ParamValue::Vertex(0));
        assert!(matches!(
            run(&mut mesh, &only_target),
            Err(FilterError::InvalidParameter { .. })
        ));
        assert_eq!(mesh, before);
    }

    #[test]
    fn test_cancel_before_commit() {
        let mut mesh = create_grid_mesh(2);
        let before = mesh.clone();

        // Let planning through, stop at the commit checkpoint
        let mut progress = Progress::new(|p, _| {
            if p >= COMMIT_PERCENT {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        let params = params(1, Vector3::x());
        let err = VertexEditPlugin
            .execute(FilterId::MoveVertex, &mut mesh, &params, &mut progress)
            .unwrap_err();

        assert_eq!(err, FilterError::OperationAborted { percent: COMMIT_PERCENT });
        assert_eq!(mesh, before);
    }

    #[test]
    fn test_plan_polls_at_interval() {
        let mesh = create_grid_mesh(2);
        let moves = vec![(0, Vector3::x()); CANCEL_CHECK_INTERVAL * 2 + 1];

        let mut polls = 0;
        {
            let mut progress = Progress::new(|_, _| {
                polls += 1;
                ControlFlow::Continue(())
            });
            let plan = Displacement::plan(&mesh, &moves, &mut progress).unwrap();
            assert_eq!(plan.len(), moves.len());
        }
        assert_eq!(polls, 3);
    }

    #[test]
    fn test_plan_rejects_late_bad_index() {
        let mut mesh = create_grid_mesh(2);
        let before = mesh.clone();
        let moves = [(0, Vector3::x()), (1, Vector3::y()), (99, Vector3::z())];

        let err = Displacement::plan(&mesh, &moves, &mut Progress::none()).unwrap_err();
        assert!(matches!(err, FilterError::IndexOutOfRange { index: 99, .. }));
        // Nothing was committed for the valid leading moves either
        assert_eq!(mesh, before);

        let plan = Displacement::plan(&mesh, &moves[..2], &mut Progress::none()).unwrap();
        plan.commit(&mut mesh);
        assert_eq!(*mesh.position(VertexId::new(0)), Point3::new(1.0, 0.0, 0.0));
        assert_eq!(*mesh.position(VertexId::new(1)), Point3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_schema_defaults_are_a_no_op() {
        let mut mesh = create_grid_mesh(1);
        let before = mesh.clone();
        let defaults = VertexEditPlugin.parameter_schema(FilterId::MoveVertex).defaults();

        run(&mut mesh, &defaults).unwrap();
        assert_eq!(mesh, before);
    }

    #[test]
    fn test_init_parameters_scale_with_mesh() {
        let small = create_grid_mesh(2);
        let mut large = create_grid_mesh(2);
        let ids: Vec<VertexId> = large.vertex_ids().collect();
        for v in ids {
            let scaled = large.position(v).coords * 10.0;
            large.set_position(v, Point3::from(scaled));
        }
        refresh_all(&mut large, &UpdateOptions::default());

        let schema = VertexEditPlugin.parameter_schema(FilterId::MoveVertex);
        let small_params = VertexEditPlugin.init_parameters(FilterId::MoveVertex, &small);
        let large_params = VertexEditPlugin.init_parameters(FilterId::MoveVertex, &large);
        schema.validate(&small_params).unwrap();
        schema.validate(&large_params).unwrap();

        let small_offset = small_params.get_vec3(PARAM_OFFSET).unwrap();
        let large_offset = large_params.get_vec3(PARAM_OFFSET).unwrap();
        let diagonal = small.bounding_box().unwrap().diagonal();
        assert!((small_offset.norm() - diagonal * INITIAL_OFFSET_FRACTION).abs() < 1e-12);
        assert!((large_offset.norm() - small_offset.norm() * 10.0).abs() < 1e-9);
        // A flat grid facing +z is pushed along its normal
        assert!(small_offset.x.abs() < 1e-12 && small_offset.y.abs() < 1e-12);
        assert_eq!(small_params.get_vertex(PARAM_TARGET).unwrap(), 0);
    }

    #[test]
    fn test_init_parameters_on_empty_mesh_are_defaults() {
        let mesh = MeshModel::new();
        let params = VertexEditPlugin.init_parameters(FilterId::MoveVertex, &mesh);
        assert_eq!(params, VertexEditPlugin.parameter_schema(FilterId::MoveVertex).defaults());
    }

    #[test]
    fn test_auto_dialog() {
        assert!(VertexEditPlugin.auto_dialog(FilterId::MoveVertex));
    }
}
