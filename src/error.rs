//! Error types for meshfilter.
//!
//! Two families are kept apart: [`FilterError`] is what the filter contract
//! returns to a host, [`MeshError`] covers building and loading the mesh model
//! that the filters run against.

use std::path::PathBuf;
use thiserror::Error;

use crate::filter::FilterId;

/// Result type alias using [`FilterError`].
pub type Result<T> = std::result::Result<T, FilterError>;

/// Errors surfaced by catalog lookups and filter execution.
///
/// Whenever `execute` returns one of these, the mesh it was given is left
/// exactly as it was.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    /// The identifier is not registered in this catalog.
    #[error("unknown operation: {key}")]
    UnknownOperation {
        /// The identifier key that failed to resolve.
        key: String,
    },

    /// A parameter is missing, has the wrong type, or holds an unusable value.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// Reason the parameter was rejected.
        reason: String,
    },

    /// A referenced vertex does not exist in the mesh.
    #[error("vertex index {index} out of range (mesh has {len} vertices)")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of vertices in the mesh.
        len: usize,
    },

    /// The progress callback asked the operation to stop.
    #[error("operation aborted by caller at {percent}%")]
    OperationAborted {
        /// Last progress value reported before the stop.
        percent: u8,
    },

    /// A plugin tried to register an identifier the catalog already serves.
    #[error("operation {0:?} is already registered")]
    DuplicateOperation(FilterId),
}

impl FilterError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(name: &str, reason: T) -> Self {
        FilterError::InvalidParameter {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create an unknown operation error for an identifier or key.
    pub fn unknown<T: std::fmt::Display>(key: T) -> Self {
        FilterError::UnknownOperation {
            key: key.to_string(),
        }
    }
}

/// Errors that can occur while building, loading or saving a mesh.
#[derive(Error, Debug)]
pub enum MeshError {
    /// The mesh has no faces.
    #[error("mesh has no faces")]
    EmptyMesh,

    /// A face references an invalid vertex index.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A face has duplicate vertex indices (degenerate triangle).
    #[error("face {face} is degenerate (has duplicate vertices)")]
    DegenerateFace {
        /// The face index.
        face: usize,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error loading mesh from file.
    #[error("failed to load mesh from {path}: {message}")]
    LoadError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Error writing mesh to file.
    #[error("failed to save mesh to {path}: {message}")]
    SaveError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Unsupported file format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension.
        extension: String,
    },
}
