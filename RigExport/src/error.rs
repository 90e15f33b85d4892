//! Error types for `RigExport`

use std::path::PathBuf;

use thiserror::Error;

/// Kind of scene object looked up by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Scene,
    Armature,
    Mesh,
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Scene => "scene",
            Self::Armature => "armature",
            Self::Mesh => "mesh",
        };
        f.write_str(s)
    }
}

/// Failure of a single per-vertex weight query.
///
/// Distinct from "no membership", which hosts report as `Ok(None)`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WeightLookupError {
    /// The vertex group data is malformed for this vertex.
    #[error("malformed vertex group data: {0}")]
    Malformed(String),

    /// The host returned a weight that is not a finite value in [0, 1].
    #[error("weight {0} is outside [0, 1]")]
    OutOfRange(f32),

    /// Any other failure reported by the host application.
    #[error("host error: {0}")]
    Host(String),
}

/// The error type for `RigExport` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== Scene Lookup Errors ====================
    /// A named scene, armature or mesh does not exist in the host scene.
    #[error("{kind} not found: '{name}'")]
    SceneObjectNotFound {
        /// What was looked up.
        kind: ObjectKind,
        /// The name that was not found.
        name: String,
    },

    // ==================== Skeleton Errors ====================
    /// Two pose bones share a name.
    #[error("duplicate bone name: '{0}'")]
    DuplicateBone(String),

    /// A bone lists a child that is not part of the armature.
    #[error("bone '{parent}' lists unknown child '{child}'")]
    UnknownChildBone {
        /// The bone listing the child.
        parent: String,
        /// The missing child name.
        child: String,
    },

    /// A weight lookup failed and the export policy is to abort.
    #[error("weight lookup failed for vertex {vertex} in group '{group}': {source}")]
    WeightLookup {
        /// The vertex group name.
        group: String,
        /// The vertex index.
        vertex: u32,
        /// The underlying lookup failure.
        #[source]
        source: WeightLookupError,
    },

    // ==================== Source Errors ====================
    /// Failed to load or interpret a glTF file.
    #[error("invalid glTF: {message}")]
    InvalidGltf {
        /// Description of what is invalid.
        message: String,
    },

    /// The source file type is not recognised.
    #[error("unsupported scene source: {path}")]
    UnsupportedSource {
        /// The offending path.
        path: PathBuf,
    },

    /// A batch job file is invalid.
    #[error("invalid export config: {message}")]
    InvalidConfig {
        /// The validation error message.
        message: String,
    },

    // ==================== Parsing Errors ====================
    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// TOML parsing error.
    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl From<gltf::Error> for Error {
    fn from(err: gltf::Error) -> Self {
        Error::InvalidGltf {
            message: err.to_string(),
        }
    }
}

/// A specialized Result type for `RigExport` operations.
pub type Result<T> = std::result::Result<T, Error>;
