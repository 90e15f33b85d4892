//! # RigExport
//!
//! Exports a character rig's skeleton and skinning weights to JSON.
//!
//! For every pose bone of an armature the exporter records its tail position
//! (converted with the fixed `(x, y, z) -> (x, z, -y)` axis swap) and its
//! children. Every vertex group of the skinned mesh whose name matches a bone
//! contributes that bone's per-vertex weights.
//!
//! ## Quick Start
//!
//! ```no_run
//! use rigexport::prelude::*;
//!
//! let host = load_gltf("character.glb".as_ref())?;
//! let report = export_rig(&host, &ExportOptions::new("Body"))?;
//! println!("Wrote {} bones to {}", report.bone_count, report.output.display());
//! # Ok::<(), rigexport::Error>(())
//! ```
//!
//! ### Custom Hosts
//!
//! Anything implementing [`host::SceneHost`] can be exported. The bundled
//! [`host::InMemoryHost`] is built from glTF files, JSON scene dumps, or code:
//!
//! ```
//! use rigexport::prelude::*;
//!
//! let host = InMemoryHost::new().with_scene(
//!     "Scene",
//!     MemoryScene::new()
//!         .with_armature(
//!             MemoryArmature::new("Armature")
//!                 .with_bone(PoseBone::new("Root", [0.0, 1.0, 0.0])),
//!         )
//!         .with_mesh(
//!             MemoryMesh::new("Body", 2)
//!                 .with_group(MemoryVertexGroup::new("Root", [(0, 1.0)])),
//!         ),
//! );
//! let build = build_skeleton(&host, &ExportOptions::new("Body"))?;
//! assert_eq!(build.skeleton.get("Root").unwrap().weights.len(), 1);
//! # Ok::<(), rigexport::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `rigexport` command-line binary

pub mod config;
pub mod error;
pub mod host;
pub mod rig;
pub mod source;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::config::{ExportConfig, ExportJob};
    pub use crate::error::{Error, ObjectKind, Result, WeightLookupError};
    pub use crate::host::{
        ArmatureHandle, InMemoryHost, MemoryArmature, MemoryMesh, MemoryScene,
        MemoryVertexGroup, MeshHandle, PoseBone, SceneHost, VertexGroup, load_gltf,
        load_gltf_slice,
    };
    pub use crate::rig::{
        Bone, ExportOptions, ExportReport, LookupErrorPolicy, RigIssue, Skeleton, build_skeleton,
        export_rig, export_rig_with_progress,
    };
    pub use crate::source::load_scene;
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
