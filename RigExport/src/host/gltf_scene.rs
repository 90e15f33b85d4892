//! glTF/GLB scene loader.
//!
//! Builds an [`InMemoryHost`] from a glTF document so that a rig can be
//! exported without a running modeling application:
//! - every skin becomes an armature whose pose bones are the skin's joints
//! - every node with a mesh becomes a mesh object
//! - vertex groups are derived from `JOINTS_0`/`WEIGHTS_0`
//!
//! glTF is Y-up while modeling hosts report Z-up points, so joint positions are
//! converted on load and the exporter's fixed axis swap recovers the glTF
//! coordinates.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use glam::{Mat4, Vec3};

use super::PoseBone;
use super::memory::{InMemoryHost, MemoryArmature, MemoryMesh, MemoryScene, MemoryVertexGroup};
use crate::error::{Error, Result};

const DEFAULT_SCENE_NAME: &str = "Scene";
const DEFAULT_ARMATURE_NAME: &str = "Armature";
const DEFAULT_MESH_NAME: &str = "Mesh";

// ============================================================================
// Loading
// ============================================================================

/// Load a glTF or GLB file as a scene host.
///
/// # Errors
/// Returns an error if the file cannot be read, or a mesh references a joint
/// its skin does not have.
pub fn load_gltf(path: &Path) -> Result<InMemoryHost> {
    let (document, buffers, _images) = gltf::import(path)?;
    build_host(&document, &buffers)
}

/// Load a scene host from glTF/GLB bytes.
///
/// # Errors
/// Returns an error if the data cannot be parsed, or a mesh references a joint
/// its skin does not have.
pub fn load_gltf_slice(data: &[u8]) -> Result<InMemoryHost> {
    let (document, buffers, _images) = gltf::import_slice(data)?;
    build_host(&document, &buffers)
}

fn build_host(document: &gltf::Document, buffers: &[gltf::buffer::Data]) -> Result<InMemoryHost> {
    let world = world_matrices(document);

    let mut armature_names = NameAllocator::default();
    let armatures: Vec<(HashSet<usize>, MemoryArmature)> = document
        .skins()
        .map(|skin| {
            let name = armature_names.allocate(skin.name().unwrap_or(DEFAULT_ARMATURE_NAME));
            let joints: HashSet<usize> = skin.joints().map(|j| j.index()).collect();
            let armature = load_armature(&skin, name, &world);
            (joints, armature)
        })
        .collect();

    let mut mesh_names = NameAllocator::default();
    let mut meshes: Vec<(usize, MemoryMesh)> = Vec::new();
    for node in document.nodes() {
        let Some(mesh) = node.mesh() else {
            continue;
        };
        let base = node.name().or(mesh.name()).unwrap_or(DEFAULT_MESH_NAME);
        let name = mesh_names.allocate(base);
        let loaded = load_mesh(&mesh, node.skin().as_ref(), name, buffers)?;
        meshes.push((node.index(), loaded));
    }

    let mut host = InMemoryHost::new();
    for (name, members) in scene_members(document) {
        let mut scene = MemoryScene::new();
        for (joints, armature) in &armatures {
            if joints.iter().any(|j| members.contains(j)) {
                scene = scene.with_armature(armature.clone());
            }
        }
        for (node_idx, mesh) in &meshes {
            if members.contains(node_idx) {
                scene = scene.with_mesh(mesh.clone());
            }
        }
        tracing::debug!(
            "glTF scene '{}': {} armatures, {} meshes",
            name,
            scene.armatures.len(),
            scene.meshes.len()
        );
        host = host.with_scene(name, scene);
    }

    Ok(host)
}

/// Convert a Y-up glTF point to the Z-up convention modeling hosts report.
fn gltf_to_host(p: Vec3) -> Vec3 {
    Vec3::new(p.x, -p.z, p.y)
}

/// A `WEIGHTS_0` slot only adds its joint to a vertex group when positive.
fn has_influence(weight: f32) -> bool {
    weight > 0.0
}

fn joint_name(node: &gltf::Node) -> String {
    node.name()
        .map_or_else(|| format!("Bone_{}", node.index()), str::to_string)
}

fn load_armature(skin: &gltf::Skin, name: String, world: &[Mat4]) -> MemoryArmature {
    let joints: Vec<gltf::Node> = skin.joints().collect();
    let names: HashMap<usize, String> =
        joints.iter().map(|j| (j.index(), joint_name(j))).collect();

    let mut armature = MemoryArmature::new(name);
    for joint in &joints {
        let tail = gltf_to_host(world[joint.index()].w_axis.truncate());
        let children: Vec<String> = joint
            .children()
            .filter_map(|c| names.get(&c.index()).cloned())
            .collect();
        let bone = PoseBone::new(joint_name(joint), tail).with_children(children);
        armature = armature.with_bone(bone);
    }
    armature
}

fn load_mesh(
    mesh: &gltf::Mesh,
    skin: Option<&gltf::Skin>,
    name: String,
    buffers: &[gltf::buffer::Data],
) -> Result<MemoryMesh> {
    let joint_names: Vec<String> = skin
        .map(|s| s.joints().map(|j| joint_name(&j)).collect())
        .unwrap_or_default();
    let mut group_weights: Vec<BTreeMap<u32, f32>> = vec![BTreeMap::new(); joint_names.len()];

    let mut vertex_count: u32 = 0;
    for primitive in mesh.primitives() {
        let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|d| &d.0[..]));
        let count = reader
            .read_positions()
            .ok_or_else(|| Error::InvalidGltf {
                message: format!("mesh '{name}' has a primitive without positions"),
            })?
            .count() as u32;

        if let (Some(_), Some(joints), Some(weights)) =
            (skin, reader.read_joints(0), reader.read_weights(0))
        {
            let joints: Vec<[u16; 4]> = joints.into_u16().collect();
            let weights: Vec<[f32; 4]> = weights.into_f32().collect();
            for (v, (slots, values)) in joints.iter().zip(&weights).enumerate() {
                let vertex = vertex_count + v as u32;
                for (&joint, &weight) in slots.iter().zip(values) {
                    if !has_influence(weight) {
                        continue;
                    }
                    let group = group_weights
                        .get_mut(usize::from(joint))
                        .ok_or_else(|| Error::InvalidGltf {
                            message: format!(
                                "mesh '{name}' vertex {vertex} references joint {joint}, \
                                 skin has {} joints",
                                joint_names.len()
                            ),
                        })?;
                    *group.entry(vertex).or_insert(0.0) += weight;
                }
            }
        }

        vertex_count += count;
    }

    let mut result = MemoryMesh::new(name, vertex_count);
    for (joint, weights) in joint_names.into_iter().zip(group_weights) {
        result = result.with_group(MemoryVertexGroup { name: joint, weights });
    }
    Ok(result)
}

// ============================================================================
// Scene Graph Helpers
// ============================================================================

/// World transform of every node, indexed by node index.
fn world_matrices(document: &gltf::Document) -> Vec<Mat4> {
    let count = document.nodes().len();
    let mut has_parent = vec![false; count];
    for node in document.nodes() {
        for child in node.children() {
            has_parent[child.index()] = true;
        }
    }

    let mut world = vec![Mat4::IDENTITY; count];
    let mut visited = vec![false; count];
    let mut stack: Vec<(gltf::Node, Mat4)> = document
        .nodes()
        .filter(|n| !has_parent[n.index()])
        .map(|n| (n, Mat4::IDENTITY))
        .collect();

    while let Some((node, parent)) = stack.pop() {
        if visited[node.index()] {
            continue;
        }
        visited[node.index()] = true;
        let matrix = parent * Mat4::from_cols_array_2d(&node.transform().matrix());
        world[node.index()] = matrix;
        for child in node.children() {
            stack.push((child, matrix));
        }
    }

    world
}

/// Scene names paired with the node indices reachable from each scene.
fn scene_members(document: &gltf::Document) -> Vec<(String, HashSet<usize>)> {
    if document.scenes().len() == 0 {
        let all = document.nodes().map(|n| n.index()).collect();
        return vec![(DEFAULT_SCENE_NAME.to_string(), all)];
    }

    let mut names = NameAllocator::default();
    document
        .scenes()
        .map(|scene| {
            let name = names.allocate(scene.name().unwrap_or(DEFAULT_SCENE_NAME));
            let mut members = HashSet::new();
            let mut stack: Vec<gltf::Node> = scene.nodes().collect();
            while let Some(node) = stack.pop() {
                if members.insert(node.index()) {
                    stack.extend(node.children());
                }
            }
            (name, members)
        })
        .collect()
}

/// Hands out unique object names, suffixing repeats the way modeling hosts do
/// (`Armature`, `Armature.001`, ...).
#[derive(Default)]
struct NameAllocator {
    used: HashSet<String>,
}

impl NameAllocator {
    fn allocate(&mut self, base: &str) -> String {
        let mut name = base.to_string();
        let mut n = 0;
        while self.used.contains(&name) {
            n += 1;
            name = format!("{base}.{n:03}");
        }
        self.used.insert(name.clone());
        name
    }
}
