//! Skeleton and skin weight export.
//!
//! Reads an armature and a mesh through the [`SceneHost`] adapter, builds a
//! [`Skeleton`] and writes it as JSON. The file is only written once the whole
//! traversal has succeeded.

use std::collections::BTreeMap;

use crate::error::{Error, ObjectKind, Result, WeightLookupError};
use crate::host::{ArmatureHandle, MeshHandle, SceneHost, VertexGroup};

use super::skeleton::{Bone, Skeleton, to_target_axes};
use super::types::{
    ExportOptions, ExportPhase, ExportProgress, ExportProgressCallback, ExportReport,
    LookupErrorPolicy, SkippedLookup,
};

/// Skeleton built from the host, plus what happened to each vertex group.
#[derive(Debug, Clone, Default)]
pub struct SkeletonBuild {
    pub skeleton: Skeleton,
    pub matched_groups: Vec<String>,
    pub ignored_groups: Vec<String>,
    pub skipped_lookups: Vec<SkippedLookup>,
}

fn no_progress(_: &ExportProgress) {}

/// Build the skeleton for `options` without writing anything.
///
/// # Errors
/// Returns an error if the scene, armature or mesh is missing, the armature
/// hierarchy is inconsistent, or a weight lookup fails under
/// [`LookupErrorPolicy::Abort`].
pub fn build_skeleton(host: &dyn SceneHost, options: &ExportOptions) -> Result<SkeletonBuild> {
    build_skeleton_with_progress(host, options, &no_progress)
}

/// Build the skeleton with progress callback.
///
/// # Errors
/// See [`build_skeleton`].
pub fn build_skeleton_with_progress(
    host: &dyn SceneHost,
    options: &ExportOptions,
    progress: ExportProgressCallback,
) -> Result<SkeletonBuild> {
    progress(&ExportProgress::new(ExportPhase::ResolvingObjects, 1, 1));
    let (armature, mesh) = resolve_objects(host, options)?;

    progress(&ExportProgress::with_item(
        ExportPhase::ReadingBones,
        1,
        1,
        armature.name(),
    ));
    let mut skeleton = read_bones(armature)?;

    let mut build = SkeletonBuild::default();
    let groups = mesh.vertex_groups();
    let (matched, ignored): (Vec<&dyn VertexGroup>, Vec<&dyn VertexGroup>) = groups
        .into_iter()
        .partition(|g| skeleton.bones.contains_key(g.name()));

    for group in &ignored {
        tracing::debug!(
            "Ignoring vertex group '{}': no bone with that name",
            group.name()
        );
        build.ignored_groups.push(group.name().to_string());
    }

    let vertex_count = mesh.vertex_count();
    let total = matched.len();
    for (idx, group) in matched.iter().enumerate() {
        progress(&ExportProgress::with_item(
            ExportPhase::ReadingWeights,
            idx + 1,
            total,
            group.name(),
        ));

        let Some(bone) = skeleton.bones.get_mut(group.name()) else {
            continue;
        };
        let skipped = read_weights(*group, vertex_count, bone, options.on_lookup_error)?;
        if !skipped.is_empty() {
            tracing::warn!(
                "Skipped {} failed weight lookups in vertex group '{}'",
                skipped.len(),
                group.name()
            );
        }
        tracing::debug!(
            "Vertex group '{}': {} weights",
            group.name(),
            bone.weights.len()
        );
        build.skipped_lookups.extend(skipped);
        build.matched_groups.push(group.name().to_string());
    }

    build.skeleton = skeleton;
    Ok(build)
}

/// Export the rig described by `options` to its output path.
///
/// # Errors
/// See [`build_skeleton`]; also fails if the file cannot be written.
pub fn export_rig(host: &dyn SceneHost, options: &ExportOptions) -> Result<ExportReport> {
    export_rig_with_progress(host, options, &no_progress)
}

/// Export the rig with progress callback.
///
/// # Errors
/// See [`export_rig`].
pub fn export_rig_with_progress(
    host: &dyn SceneHost,
    options: &ExportOptions,
    progress: ExportProgressCallback,
) -> Result<ExportReport> {
    let output = options.output_path();
    tracing::info!(
        "Exporting rig: scene '{}', armature '{}', mesh '{}' -> {}",
        options.scene,
        options.armature,
        options.mesh,
        output.display()
    );

    let build = build_skeleton_with_progress(host, options, progress)?;

    progress(&ExportProgress::with_item(
        ExportPhase::WritingOutput,
        1,
        1,
        output.display().to_string(),
    ));
    build.skeleton.write(&output, options.pretty)?;

    let report = ExportReport {
        bone_count: build.skeleton.len(),
        weight_count: build
            .skeleton
            .bones
            .values()
            .map(|b| b.weights.len())
            .sum(),
        output,
        matched_groups: build.matched_groups,
        ignored_groups: build.ignored_groups,
        skipped_lookups: build.skipped_lookups,
    };

    progress(&ExportProgress::new(ExportPhase::Complete, 1, 1));
    tracing::info!(
        "Export complete: {} bones, {} weights",
        report.bone_count,
        report.weight_count
    );

    Ok(report)
}

fn resolve_objects<'h>(
    host: &'h dyn SceneHost,
    options: &ExportOptions,
) -> Result<(&'h dyn ArmatureHandle, &'h dyn MeshHandle)> {
    if !host.has_scene(&options.scene) {
        return Err(Error::SceneObjectNotFound {
            kind: ObjectKind::Scene,
            name: options.scene.clone(),
        });
    }
    let armature = host
        .armature(&options.scene, &options.armature)
        .ok_or_else(|| Error::SceneObjectNotFound {
            kind: ObjectKind::Armature,
            name: options.armature.clone(),
        })?;
    let mesh = host
        .mesh(&options.scene, &options.mesh)
        .ok_or_else(|| Error::SceneObjectNotFound {
            kind: ObjectKind::Mesh,
            name: options.mesh.clone(),
        })?;
    Ok((armature, mesh))
}

/// One bone per pose bone, with empty weights.
fn read_bones(armature: &dyn ArmatureHandle) -> Result<Skeleton> {
    let mut skeleton = Skeleton::new();
    for pose_bone in armature.pose_bones() {
        if skeleton.bones.contains_key(&pose_bone.name) {
            return Err(Error::DuplicateBone(pose_bone.name));
        }
        let bone = Bone {
            position: to_target_axes(pose_bone.tail),
            children: pose_bone.children,
            weights: BTreeMap::new(),
        };
        skeleton.bones.insert(pose_bone.name, bone);
    }

    for (name, bone) in &skeleton.bones {
        if let Some(child) = bone
            .children
            .iter()
            .find(|c| !skeleton.bones.contains_key(*c))
        {
            return Err(Error::UnknownChildBone {
                parent: name.clone(),
                child: child.clone(),
            });
        }
    }

    Ok(skeleton)
}

/// Fill `bone.weights` from `group`. Returns the lookups skipped under
/// [`LookupErrorPolicy::Skip`].
fn read_weights(
    group: &dyn VertexGroup,
    vertex_count: u32,
    bone: &mut Bone,
    policy: LookupErrorPolicy,
) -> Result<Vec<SkippedLookup>> {
    let mut skipped = Vec::new();
    for vertex in 0..vertex_count {
        let outcome = group.try_weight(vertex).and_then(|w| match w {
            Some(w) if !(0.0..=1.0).contains(&w) => Err(WeightLookupError::OutOfRange(w)),
            other => Ok(other),
        });
        match outcome {
            Ok(Some(weight)) => {
                bone.weights.insert(vertex, weight);
            }
            Ok(None) => {}
            Err(error) => match policy {
                LookupErrorPolicy::Skip => {
                    tracing::debug!(
                        "Skipping vertex {} in group '{}': {}",
                        vertex,
                        group.name(),
                        error
                    );
                    skipped.push(SkippedLookup {
                        group: group.name().to_string(),
                        vertex,
                        error,
                    });
                }
                LookupErrorPolicy::Abort => {
                    return Err(Error::WeightLookup {
                        group: group.name().to_string(),
                        vertex,
                        source: error,
                    });
                }
            },
        }
    }
    Ok(skipped)
}
