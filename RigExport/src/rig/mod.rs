//! Rig export
//!
//! Turns an armature and a skinned mesh into a JSON skeleton document:
//! - [`skeleton`]: the exported document, its validation and summary
//! - [`exporter`]: traversal of the host scene and the export entry points
//! - [`types`]: options, progress and report types

pub mod exporter;
pub mod skeleton;
pub mod types;

pub use exporter::{
    SkeletonBuild, build_skeleton, build_skeleton_with_progress, export_rig,
    export_rig_with_progress,
};
pub use skeleton::{Bone, RigIssue, RigSummary, Skeleton, to_target_axes};
pub use types::{
    DEFAULT_ARMATURE, DEFAULT_SCENE, ExportOptions, ExportPhase, ExportProgress,
    ExportProgressCallback, ExportReport, LookupErrorPolicy, SkippedLookup,
};
