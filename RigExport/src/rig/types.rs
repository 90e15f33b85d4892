//! Types for rig export options, progress tracking and reporting

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::WeightLookupError;

/// Scene name used when none is given.
pub const DEFAULT_SCENE: &str = "Scene";
/// Armature name used when none is given.
pub const DEFAULT_ARMATURE: &str = "Armature";

// ============================================================================
// Options
// ============================================================================

/// What to do when a vertex group fails a weight query for a reason other
/// than "vertex is not a member".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupErrorPolicy {
    /// Omit the vertex, log it and list it in the report.
    #[default]
    Skip,
    /// Fail the export. No file is written.
    Abort,
}

/// Names and output settings for one export run.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    pub scene: String,
    pub armature: String,
    pub mesh: String,
    /// Output file. Defaults to `<mesh>.json` in the working directory.
    pub output: Option<PathBuf>,
    pub on_lookup_error: LookupErrorPolicy,
    pub pretty: bool,
}

impl ExportOptions {
    /// Options for exporting `mesh` from the default scene and armature.
    pub fn new(mesh: impl Into<String>) -> Self {
        Self {
            scene: DEFAULT_SCENE.to_string(),
            armature: DEFAULT_ARMATURE.to_string(),
            mesh: mesh.into(),
            output: None,
            on_lookup_error: LookupErrorPolicy::Skip,
            pretty: false,
        }
    }

    #[must_use]
    pub fn with_scene(mut self, scene: impl Into<String>) -> Self {
        self.scene = scene.into();
        self
    }

    #[must_use]
    pub fn with_armature(mut self, armature: impl Into<String>) -> Self {
        self.armature = armature.into();
        self
    }

    #[must_use]
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    #[must_use]
    pub fn with_lookup_policy(mut self, policy: LookupErrorPolicy) -> Self {
        self.on_lookup_error = policy;
        self
    }

    #[must_use]
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Resolved output path.
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("{}.json", self.mesh)))
    }
}

// ============================================================================
// Progress Types
// ============================================================================

/// Progress callback type for rig export operations
pub type ExportProgressCallback<'a> = &'a (dyn Fn(&ExportProgress) + Sync + Send);

/// Progress information during a rig export
#[derive(Debug, Clone)]
pub struct ExportProgress {
    /// Current operation phase
    pub phase: ExportPhase,
    /// Current item number (1-indexed)
    pub current: usize,
    /// Total number of items
    pub total: usize,
    /// Current bone or vertex group being processed (if applicable)
    pub current_item: Option<String>,
}

impl ExportProgress {
    /// Create a new progress update
    #[must_use]
    pub fn new(phase: ExportPhase, current: usize, total: usize) -> Self {
        Self {
            phase,
            current,
            total,
            current_item: None,
        }
    }

    /// Create a progress update with an item name
    #[must_use]
    pub fn with_item(
        phase: ExportPhase,
        current: usize,
        total: usize,
        item: impl Into<String>,
    ) -> Self {
        Self {
            phase,
            current,
            total,
            current_item: Some(item.into()),
        }
    }
}

/// Phase of a rig export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportPhase {
    /// Looking up scene, armature and mesh
    ResolvingObjects,
    /// Reading pose bones
    ReadingBones,
    /// Reading vertex group weights
    ReadingWeights,
    /// Writing the JSON document
    WritingOutput,
    /// Operation complete
    Complete,
}

impl ExportPhase {
    /// Get a human-readable description of this phase
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ResolvingObjects => "Resolving objects",
            Self::ReadingBones => "Reading bones",
            Self::ReadingWeights => "Reading weights",
            Self::WritingOutput => "Writing output",
            Self::Complete => "Complete",
        }
    }
}

// ============================================================================
// Report
// ============================================================================

/// A weight query that failed and was skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedLookup {
    pub group: String,
    pub vertex: u32,
    pub error: WeightLookupError,
}

/// Outcome of a successful export.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportReport {
    pub output: PathBuf,
    pub bone_count: usize,
    /// Vertex groups that matched a bone, in host order.
    pub matched_groups: Vec<String>,
    /// Vertex groups with no matching bone.
    pub ignored_groups: Vec<String>,
    /// Total recorded (bone, vertex) weights.
    pub weight_count: usize,
    pub skipped_lookups: Vec<SkippedLookup>,
}
