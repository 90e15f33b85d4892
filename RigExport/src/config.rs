//! Batch export job files
//!
//! A TOML file listing several export runs against one scene source:
//!
//! ```toml
//! [defaults]
//! scene = "Scene"
//! armature = "Armature"
//! output_dir = "out"
//! on_lookup_error = "skip"
//!
//! [[export]]
//! mesh = "tr_reg_090"
//!
//! [[export]]
//! mesh = "homer"
//! armature = "HomerRig"
//! output = "homer.json"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::rig::{ExportOptions, LookupErrorPolicy};

/// Settings shared by every job unless the job overrides them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobDefaults {
    pub scene: Option<String>,
    pub armature: Option<String>,
    /// Directory for outputs that don't name an explicit path.
    pub output_dir: Option<PathBuf>,
    pub on_lookup_error: Option<LookupErrorPolicy>,
    #[serde(default)]
    pub pretty: bool,
}

/// One `[[export]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportJob {
    pub mesh: String,
    pub scene: Option<String>,
    pub armature: Option<String>,
    pub output: Option<PathBuf>,
    pub on_lookup_error: Option<LookupErrorPolicy>,
}

/// A parsed job file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportConfig {
    #[serde(default)]
    pub defaults: JobDefaults,
    #[serde(default, rename = "export")]
    pub exports: Vec<ExportJob>,
}

impl ExportConfig {
    /// Parse a job file from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.check()?;
        Ok(config)
    }

    /// Read a job file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    fn check(&self) -> Result<()> {
        if self.exports.is_empty() {
            return Err(Error::InvalidConfig {
                message: "no [[export]] entries".to_string(),
            });
        }
        if let Some(job) = self.exports.iter().find(|j| j.mesh.trim().is_empty()) {
            return Err(Error::InvalidConfig {
                message: format!(
                    "export entry with empty mesh name (output: {:?})",
                    job.output
                ),
            });
        }
        Ok(())
    }

    /// Resolve every job against the defaults.
    pub fn jobs(&self) -> Vec<ExportOptions> {
        self.exports.iter().map(|job| self.resolve(job)).collect()
    }

    fn resolve(&self, job: &ExportJob) -> ExportOptions {
        let d = &self.defaults;
        let mut options = ExportOptions::new(job.mesh.clone()).with_pretty(d.pretty);
        if let Some(scene) = job.scene.as_ref().or(d.scene.as_ref()) {
            options = options.with_scene(scene.clone());
        }
        if let Some(armature) = job.armature.as_ref().or(d.armature.as_ref()) {
            options = options.with_armature(armature.clone());
        }
        if let Some(policy) = job.on_lookup_error.or(d.on_lookup_error) {
            options = options.with_lookup_policy(policy);
        }
        let output = job.output.clone().or_else(|| {
            d.output_dir
                .as_ref()
                .map(|dir| dir.join(format!("{}.json", job.mesh)))
        });
        if let Some(output) = output {
            options = options.with_output(output);
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_jobs() {
        let config = ExportConfig::from_toml(
            r#"
            [defaults]
            output_dir = "out"
            on_lookup_error = "abort"

            [[export]]
            mesh = "tr_reg_090"

            [[export]]
            mesh = "homer"
            armature = "HomerRig"
            output = "homer.json"
            on_lookup_error = "skip"
            "#,
        )
        .unwrap();

        let jobs = config.jobs();
        assert_eq!(jobs.len(), 2);

        assert_eq!(jobs[0].scene, "Scene");
        assert_eq!(jobs[0].armature, "Armature");
        let expected = Path::new("out").join("tr_reg_090.json");
        assert_eq!(jobs[0].output_path(), expected);
        assert_eq!(jobs[0].on_lookup_error, LookupErrorPolicy::Abort);

        assert_eq!(jobs[1].armature, "HomerRig");
        assert_eq!(jobs[1].output_path(), PathBuf::from("homer.json"));
        assert_eq!(jobs[1].on_lookup_error, LookupErrorPolicy::Skip);
    }

    #[test]
    fn test_rejects_empty_and_unknown() {
        assert!(matches!(
            ExportConfig::from_toml("[defaults]\nscene = \"Scene\"\n"),
            Err(Error::InvalidConfig { .. })
        ));
        assert!(matches!(
            ExportConfig::from_toml("[[export]]\nmesh = \"  \"\n"),
            Err(Error::InvalidConfig { .. })
        ));
        assert!(matches!(
            ExportConfig::from_toml("[[export]]\nmesh = \"a\"\ncolour = 1\n"),
            Err(Error::TomlError(_))
        ));
    }
}
