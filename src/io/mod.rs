//! Mesh file I/O.
//!
//! Hosts own their file formats; this module exists so the command-line host
//! can read and write meshes around a filter run.
//!
//! # Supported Formats
//!
//! | Format | Extension | Load | Save | Notes |
//! |--------|-----------|------|------|-------|
//! | PLY | `.ply` | ✓ | ✓ | ASCII and binary load, ASCII save with normals |
//!
//! ```no_run
//! use meshfilter::io::{load, save};
//!
//! let mesh = load("model.ply").unwrap();
//! save(&mesh, "output.ply").unwrap();
//! ```

pub mod ply;

use std::path::Path;

use crate::error::MeshError;
use crate::mesh::MeshModel;

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// PLY (Stanford polygon) format.
    Ply,
}

impl Format {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "ply" => Some(Format::Ply),
            _ => None,
        }
    }

    /// Detect format from file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }
}

fn detect(path: &Path) -> Result<Format, MeshError> {
    Format::from_path(path).ok_or_else(|| MeshError::UnsupportedFormat {
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)")
            .to_string(),
    })
}

/// Load a mesh from a file with automatic format detection.
pub fn load<P: AsRef<Path>>(path: P) -> Result<MeshModel, MeshError> {
    let path = path.as_ref();
    match detect(path)? {
        Format::Ply => ply::load(path),
    }
}

/// Save a mesh to a file with automatic format detection.
pub fn save<P: AsRef<Path>>(mesh: &MeshModel, path: P) -> Result<(), MeshError> {
    let path = path.as_ref();
    match detect(path)? {
        Format::Ply => ply::save(mesh, path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(Format::from_path("a/b/model.PLY"), Some(Format::Ply));
        assert_eq!(Format::from_path("model.obj"), None);
        assert_eq!(Format::from_path("model"), None);
    }

    #[test]
    fn test_unsupported_extension() {
        let mesh = MeshModel::new();
        assert!(matches!(
            save(&mesh, "out.stl"),
            Err(MeshError::UnsupportedFormat { extension }) if extension == "stl"
        ));
        assert!(matches!(
            load("noext"),
            Err(MeshError::UnsupportedFormat { extension }) if extension == "(none)"
        ));
    }
}
