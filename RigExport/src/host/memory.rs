//! Plain-data scene host
//!
//! Holds scenes, armatures and meshes in memory. Used as the target of the
//! glTF loader, as the reader for JSON scene dumps, and as a fixture in tests.
//!
//! JSON scene dump layout:
//!
//! ```json
//! { "scenes": { "Scene": {
//!     "armatures": [ { "name": "Armature",
//!       "bones": [ { "name": "Root", "tail": [0, 1, 0], "children": [] } ] } ],
//!     "meshes": [ { "name": "Body", "vertex_count": 3,
//!       "vertex_groups": [ { "name": "Root", "weights": { "0": 0.5 } } ] } ]
//! } } }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{ArmatureHandle, MeshHandle, PoseBone, SceneHost, VertexGroup};
use crate::error::{Result, WeightLookupError};

// ============================================================================
// Data Structures
// ============================================================================

/// A collection of named scenes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InMemoryHost {
    #[serde(default)]
    pub scenes: IndexMap<String, MemoryScene>,
}

/// The objects of one scene, by kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryScene {
    #[serde(default)]
    pub armatures: Vec<MemoryArmature>,
    #[serde(default)]
    pub meshes: Vec<MemoryMesh>,
}

/// An armature with its pose bones in host order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryArmature {
    pub name: String,
    #[serde(default)]
    pub bones: Vec<PoseBone>,
}

/// A mesh with a vertex count and vertex groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryMesh {
    pub name: String,
    pub vertex_count: u32,
    #[serde(default)]
    pub vertex_groups: Vec<MemoryVertexGroup>,
}

/// A vertex group stored as a sparse map. Vertices not in the map are not members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryVertexGroup {
    pub name: String,
    #[serde(default)]
    pub weights: BTreeMap<u32, f32>,
}

// ============================================================================
// Construction
// ============================================================================

impl InMemoryHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a scene.
    #[must_use]
    pub fn with_scene(mut self, name: impl Into<String>, scene: MemoryScene) -> Self {
        self.scenes.insert(name.into(), scene);
        self
    }

    /// Parse a JSON scene dump.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a JSON scene dump from disk.
    pub fn load_json(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Serialize to the JSON scene dump layout.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl MemoryScene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_armature(mut self, armature: MemoryArmature) -> Self {
        self.armatures.push(armature);
        self
    }

    #[must_use]
    pub fn with_mesh(mut self, mesh: MemoryMesh) -> Self {
        self.meshes.push(mesh);
        self
    }
}

impl MemoryArmature {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bones: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_bone(mut self, bone: PoseBone) -> Self {
        self.bones.push(bone);
        self
    }
}

impl MemoryMesh {
    pub fn new(name: impl Into<String>, vertex_count: u32) -> Self {
        Self {
            name: name.into(),
            vertex_count,
            vertex_groups: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_group(mut self, group: MemoryVertexGroup) -> Self {
        self.vertex_groups.push(group);
        self
    }
}

impl MemoryVertexGroup {
    pub fn new<I>(name: impl Into<String>, weights: I) -> Self
    where
        I: IntoIterator<Item = (u32, f32)>,
    {
        Self {
            name: name.into(),
            weights: weights.into_iter().collect(),
        }
    }
}

// ============================================================================
// Host Adapter Implementation
// ============================================================================

impl SceneHost for InMemoryHost {
    fn has_scene(&self, scene: &str) -> bool {
        self.scenes.contains_key(scene)
    }

    fn armature(&self, scene: &str, name: &str) -> Option<&dyn ArmatureHandle> {
        let scene = self.scenes.get(scene)?;
        scene
            .armatures
            .iter()
            .find(|a| a.name == name)
            .map(|a| a as &dyn ArmatureHandle)
    }

    fn mesh(&self, scene: &str, name: &str) -> Option<&dyn MeshHandle> {
        let scene = self.scenes.get(scene)?;
        scene
            .meshes
            .iter()
            .find(|m| m.name == name)
            .map(|m| m as &dyn MeshHandle)
    }
}

impl ArmatureHandle for MemoryArmature {
    fn name(&self) -> &str {
        &self.name
    }

    fn pose_bones(&self) -> Vec<PoseBone> {
        self.bones.clone()
    }
}

impl MeshHandle for MemoryMesh {
    fn name(&self) -> &str {
        &self.name
    }

    fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    fn vertex_groups(&self) -> Vec<&dyn VertexGroup> {
        self.vertex_groups
            .iter()
            .map(|g| g as &dyn VertexGroup)
            .collect()
    }
}

impl VertexGroup for MemoryVertexGroup {
    fn name(&self) -> &str {
        &self.name
    }

    fn try_weight(&self, vertex: u32) -> std::result::Result<Option<f32>, WeightLookupError> {
        Ok(self.weights.get(&vertex).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn sample() -> InMemoryHost {
        InMemoryHost::new().with_scene(
            "Scene",
            MemoryScene::new()
                .with_armature(
                    MemoryArmature::new("Armature")
                        .with_bone(PoseBone::new("Root", Vec3::Y).with_children(["Spine"]))
                        .with_bone(PoseBone::new("Spine", [0.0, 2.0, 0.0])),
                )
                .with_mesh(
                    MemoryMesh::new("Body", 3)
                        .with_group(MemoryVertexGroup::new("Root", [(0, 0.5), (1, 1.0)])),
                ),
        )
    }

    #[test]
    fn test_lookup_respects_object_kind() {
        let host = sample();
        assert!(host.has_scene("Scene"));
        assert!(!host.has_scene("Other"));
        assert!(host.armature("Scene", "Armature").is_some());
        assert!(host.mesh("Scene", "Armature").is_none());
        assert!(host.armature("Scene", "Body").is_none());
        let body = host.mesh("Scene", "Body").unwrap();
        assert_eq!(body.vertex_count(), 3);
        assert!(host.mesh("Other", "Body").is_none());
    }

    #[test]
    fn test_missing_vertex_is_not_a_member() {
        let group = MemoryVertexGroup::new("Root", [(0, 0.5)]);
        assert_eq!(group.try_weight(0), Ok(Some(0.5)));
        assert_eq!(group.try_weight(2), Ok(None));
    }

    #[test]
    fn test_json_scene_dump() {
        let json = r#"{
            "scenes": { "Scene": {
                "armatures": [ { "name": "Armature",
                  "bones": [ { "name": "Root", "tail": [0, 1, 0], "children": ["Spine"] },
                             { "name": "Spine", "tail": [0, 2, 0] } ] } ],
                "meshes": [ { "name": "Body", "vertex_count": 3,
                  "vertex_groups": [ { "name": "Root", "weights": { "0": 0.5, "1": 1.0 } } ] } ]
            } }
        }"#;
        let host = InMemoryHost::from_json(json).unwrap();
        assert_eq!(host, sample());

        let reparsed = InMemoryHost::from_json(&host.to_json().unwrap()).unwrap();
        assert_eq!(reparsed, host);
    }
}
