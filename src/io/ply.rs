//! PLY (Stanford polygon) format support.
//!
//! Loading accepts ASCII and binary files and fan-triangulates polygons.
//! Stored normals are ignored on load; they are recomputed from geometry.
//! Saving writes ASCII with per-vertex normals.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;
use ply_rs::parser::Parser;
use ply_rs::ply::{DefaultElement, Property};

use crate::error::MeshError;
use crate::mesh::{build_from_triangles, MeshModel};

/// Load a mesh from a PLY file.
///
/// # Example
///
/// ```no_run
/// use meshfilter::io::ply;
///
/// let mesh = ply::load("model.ply").unwrap();
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<MeshModel, MeshError> {
    let path = path.as_ref();
    let load_error = |message: &str| MeshError::LoadError {
        path: path.to_path_buf(),
        message: message.to_string(),
    };

    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let parser = Parser::<DefaultElement>::new();
    let ply = parser
        .read_ply(&mut reader)
        .map_err(|e| load_error(&e.to_string()))?;

    let vertex_element = ply
        .payload
        .get("vertex")
        .ok_or_else(|| load_error("PLY file has no vertex element"))?;

    let mut vertices: Vec<Point3<f64>> = Vec::with_capacity(vertex_element.len());
    for vertex in vertex_element {
        let coord = |name: &str| {
            get_float_property(vertex, name)
                .ok_or_else(|| load_error(&format!("vertex missing {} coordinate", name)))
        };
        vertices.push(Point3::new(coord("x")?, coord("y")?, coord("z")?));
    }

    let face_element = ply
        .payload
        .get("face")
        .ok_or_else(|| load_error("PLY file has no face element"))?;

    let mut faces: Vec<[usize; 3]> = Vec::with_capacity(face_element.len());
    for face in face_element {
        let indices = get_list_property(face, "vertex_indices")
            .or_else(|| get_list_property(face, "vertex_index"))
            .ok_or_else(|| load_error("face missing vertex_indices property"))?;

        // Fan triangulation for polygons
        for i in 1..indices.len().saturating_sub(1) {
            faces.push([indices[0], indices[i], indices[i + 1]]);
        }
    }

    if faces.is_empty() {
        return Err(load_error("PLY file contains no faces"));
    }

    build_from_triangles(&vertices, &faces)
}

fn get_float_property(element: &DefaultElement, name: &str) -> Option<f64> {
    match element.get(name)? {
        Property::Float(v) => Some(*v as f64),
        Property::Double(v) => Some(*v),
        Property::Int(v) => Some(*v as f64),
        Property::UInt(v) => Some(*v as f64),
        Property::Short(v) => Some(*v as f64),
        Property::UShort(v) => Some(*v as f64),
        Property::Char(v) => Some(*v as f64),
        Property::UChar(v) => Some(*v as f64),
        _ => None,
    }
}

fn get_list_property(element: &DefaultElement, name: &str) -> Option<Vec<usize>> {
    match element.get(name)? {
        Property::ListInt(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUInt(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListShort(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUShort(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListChar(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUChar(v) => Some(v.iter().map(|&x| x as usize).collect()),
        _ => None,
    }
}

/// Save a mesh to a PLY file (ASCII format) with vertex normals.
///
/// Normals are written as cached on the mesh; refresh them first if the mesh
/// was edited. Any write failure is reported as [`MeshError::SaveError`].
pub fn save<P: AsRef<Path>>(mesh: &MeshModel, path: P) -> Result<(), MeshError> {
    let path = path.as_ref();
    File::create(path)
        .and_then(|file| write_ascii(mesh, BufWriter::new(file)))
        .map_err(|e| MeshError::SaveError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

fn write_ascii<W: Write>(mesh: &MeshModel, mut writer: W) -> std::io::Result<()> {
    writeln!(writer, "ply")?;
    writeln!(writer, "format ascii 1.0")?;
    writeln!(writer, "comment Generated by meshfilter")?;
    writeln!(writer, "element vertex {}", mesh.num_vertices())?;
    for prop in ["x", "y", "z", "nx", "ny", "nz"] {
        writeln!(writer, "property double {}", prop)?;
    }
    writeln!(writer, "element face {}", mesh.num_faces())?;
    writeln!(writer, "property list uchar int vertex_indices")?;
    writeln!(writer, "end_header")?;

    for v in mesh.vertex_ids() {
        let p = mesh.position(v);
        let n = mesh.vertex_normal(v);
        writeln!(writer, "{} {} {} {} {} {}", p.x, p.y, p.z, n.x, n.y, n.z)?;
    }

    for f in mesh.face_ids() {
        let [a, b, c] = mesh.face_vertices(f);
        writeln!(writer, "3 {} {} {}", a.index(), b.index(), c.index())?;
    }

    writer.flush()?;
    Ok(())
}
