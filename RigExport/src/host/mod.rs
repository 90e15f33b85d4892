//! Scene host adapter interface
//!
//! The exporter never talks to a modeling application directly. Anything that
//! can answer these queries (a live host binding, a glTF file, a JSON scene
//! dump, a test fixture) can be exported:
//! - [`SceneHost`]: name lookup of scenes, armatures and meshes
//! - [`ArmatureHandle`]: pose bones with tail points and child names
//! - [`MeshHandle`]: vertex count and named vertex groups
//! - [`VertexGroup`]: per-vertex weight queries

pub mod gltf_scene;
pub mod memory;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::WeightLookupError;

pub use gltf_scene::{load_gltf, load_gltf_slice};
pub use memory::{InMemoryHost, MemoryArmature, MemoryMesh, MemoryScene, MemoryVertexGroup};

/// A bone in its posed state, as reported by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseBone {
    pub name: String,
    /// Tail point in host coordinate space.
    pub tail: Vec3,
    /// Direct children, in host order.
    #[serde(default)]
    pub children: Vec<String>,
}

impl PoseBone {
    pub fn new(name: impl Into<String>, tail: impl Into<Vec3>) -> Self {
        Self {
            name: name.into(),
            tail: tail.into(),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_children<I, S>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.children = children.into_iter().map(Into::into).collect();
        self
    }
}

/// Name lookup into the host's scene graph.
pub trait SceneHost {
    /// Whether a scene with this name exists.
    fn has_scene(&self, scene: &str) -> bool;

    /// Look up an armature object in a scene.
    fn armature(&self, scene: &str, name: &str) -> Option<&dyn ArmatureHandle>;

    /// Look up a mesh object in a scene.
    fn mesh(&self, scene: &str, name: &str) -> Option<&dyn MeshHandle>;
}

/// An armature object exposing its pose bones.
pub trait ArmatureHandle {
    fn name(&self) -> &str;

    /// Pose bones in the host's native order.
    fn pose_bones(&self) -> Vec<PoseBone>;
}

/// A mesh object exposing its vertex groups.
pub trait MeshHandle {
    fn name(&self) -> &str;

    fn vertex_count(&self) -> u32;

    fn vertex_groups(&self) -> Vec<&dyn VertexGroup>;
}

/// A named, sparse vertex index to weight mapping.
pub trait VertexGroup {
    fn name(&self) -> &str;

    /// Weight of `vertex` in this group.
    ///
    /// `Ok(None)` means the vertex is not a member of the group. `Err` is
    /// reserved for genuine lookup failures.
    fn try_weight(&self, vertex: u32) -> Result<Option<f32>, WeightLookupError>;
}
