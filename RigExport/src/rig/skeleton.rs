//! Exported skeleton document
//!
//! The on-disk layout is a single JSON object keyed by bone name:
//!
//! ```json
//! { "Root": { "pos": [0, 0, -1], "children": ["Spine"], "weights": { "0": 0.5 } } }
//! ```

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use glam::Vec3;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::Result;

/// Convert a host-space point to the target runtime's axes: `(x, y, z) -> (x, z, -y)`.
#[inline]
pub fn to_target_axes(p: Vec3) -> Vec3 {
    Vec3::new(p.x, p.z, -p.y)
}

/// A single exported bone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bone {
    /// Tail position in target axes.
    #[serde(rename = "pos")]
    pub position: Vec3,
    /// Direct children, in host order.
    #[serde(default)]
    pub children: Vec<String>,
    /// Vertex index to influence weight. Non-member vertices are absent.
    #[serde(default)]
    pub weights: BTreeMap<u32, f32>,
}

/// Bones keyed by name, in host order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Skeleton {
    pub bones: IndexMap<String, Bone>,
}

/// A structural problem found in a skeleton document.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RigIssue {
    #[error("bone '{parent}' lists unknown child '{child}'")]
    UnknownChild { parent: String, child: String },

    #[error("bone '{child}' has more than one parent: {parents:?}")]
    MultipleParents { child: String, parents: Vec<String> },

    #[error("bone '{bone}' is not reachable from any root (cycle)")]
    Unreachable { bone: String },

    #[error("bone '{bone}' vertex {vertex} has weight {weight} outside [0, 1]")]
    WeightOutOfRange { bone: String, vertex: u32, weight: f32 },
}

/// Aggregate statistics for display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RigSummary {
    pub bone_count: usize,
    pub roots: Vec<String>,
    /// Bones with at least one weighted vertex.
    pub weighted_bones: usize,
    /// Total (bone, vertex) weight entries.
    pub weight_count: usize,
    /// Highest referenced vertex index + 1.
    pub vertex_span: u32,
    /// Longest root-to-leaf chain, counted in bones.
    pub max_depth: usize,
}

impl Skeleton {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Bone> {
        self.bones.get(name)
    }

    /// Bones that are nobody's child, in document order.
    pub fn roots(&self) -> Vec<&str> {
        let children: HashSet<&str> = self
            .bones
            .values()
            .flat_map(|b| b.children.iter().map(String::as_str))
            .collect();
        self.bones
            .keys()
            .map(String::as_str)
            .filter(|name| !children.contains(name))
            .collect()
    }

    /// Check the hierarchy and weights. Returns every issue found.
    pub fn validate(&self) -> Vec<RigIssue> {
        let mut issues = Vec::new();
        let mut parents: HashMap<&str, Vec<&str>> = HashMap::new();

        for (name, bone) in &self.bones {
            for child in &bone.children {
                if self.bones.contains_key(child) {
                    parents
                        .entry(child.as_str())
                        .or_default()
                        .push(name.as_str());
                } else {
                    issues.push(RigIssue::UnknownChild {
                        parent: name.clone(),
                        child: child.clone(),
                    });
                }
            }
            for (&vertex, &weight) in &bone.weights {
                if !(0.0..=1.0).contains(&weight) {
                    issues.push(RigIssue::WeightOutOfRange {
                        bone: name.clone(),
                        vertex,
                        weight,
                    });
                }
            }
        }

        for name in self.bones.keys() {
            if let Some(p) = parents.get(name.as_str()).filter(|p| p.len() > 1) {
                issues.push(RigIssue::MultipleParents {
                    child: name.clone(),
                    parents: p.iter().map(|s| (*s).to_string()).collect(),
                });
            }
        }

        let depths = self.depths();
        for name in self.bones.keys() {
            if !depths.contains_key(name.as_str()) {
                issues.push(RigIssue::Unreachable { bone: name.clone() });
            }
        }

        issues
    }

    /// Summary statistics for display.
    pub fn summary(&self) -> RigSummary {
        let depths = self.depths();
        RigSummary {
            bone_count: self.bones.len(),
            roots: self.roots().into_iter().map(str::to_string).collect(),
            weighted_bones: self
                .bones
                .values()
                .filter(|b| !b.weights.is_empty())
                .count(),
            weight_count: self.bones.values().map(|b| b.weights.len()).sum(),
            vertex_span: self
                .bones
                .values()
                .filter_map(|b| b.weights.keys().next_back())
                .max()
                .map_or(0, |v| v + 1),
            max_depth: depths.values().copied().max().unwrap_or(0),
        }
    }

    /// Depth of every bone reachable from a root (roots have depth 1).
    fn depths(&self) -> HashMap<&str, usize> {
        let mut depths = HashMap::new();
        let mut stack: Vec<(&str, usize)> = self.roots().into_iter().map(|r| (r, 1)).collect();
        while let Some((name, depth)) = stack.pop() {
            if depths.contains_key(name) {
                continue;
            }
            depths.insert(name, depth);
            if let Some(bone) = self.bones.get(name) {
                for child in &bone.children {
                    if let Some((key, _)) = self.bones.get_key_value(child.as_str()) {
                        stack.push((key.as_str(), depth + 1));
                    }
                }
            }
        }
        depths
    }

    // ========================================================================
    // Serialization
    // ========================================================================

    /// Serialize to JSON, compact or pretty-printed.
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    /// Parse a skeleton document.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a skeleton document from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Write the document, replacing any existing file.
    pub fn write(&self, path: &Path, pretty: bool) -> Result<()> {
        let json = self.to_json(pretty)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)?;
        Ok(())
    }
}
