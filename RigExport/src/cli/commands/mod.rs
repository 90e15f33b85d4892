use clap::Subcommand;
use std::path::{Path, PathBuf};

use crate::rig::{ExportOptions, LookupErrorPolicy};

pub mod export;
pub mod inspect;

#[derive(Subcommand)]
pub enum Commands {
    /// Export a rig's skeleton and skin weights to JSON
    Export {
        /// Scene source: .gltf/.glb file or JSON scene dump
        source: PathBuf,

        /// Skinned mesh object name
        #[arg(short, long)]
        mesh: String,

        /// Scene name
        #[arg(long, default_value = crate::rig::DEFAULT_SCENE)]
        scene: String,

        /// Armature object name
        #[arg(short, long, default_value = crate::rig::DEFAULT_ARMATURE)]
        armature: String,

        /// Output file (default: <mesh>.json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Fail instead of skipping vertices whose weight lookup errors
        #[arg(long)]
        abort_on_lookup_error: bool,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,

        /// Suppress progress output
        #[arg(short, long)]
        quiet: bool,
    },

    /// Run every export listed in a TOML job file
    Batch {
        /// Scene source: .gltf/.glb file or JSON scene dump
        source: PathBuf,

        /// TOML job file
        #[arg(short, long)]
        jobs: PathBuf,

        /// Suppress progress output
        #[arg(short, long)]
        quiet: bool,
    },

    /// Summarize an exported rig JSON file
    Inspect {
        /// Exported rig JSON
        path: PathBuf,
    },

    /// Check an exported rig JSON file for structural problems
    Validate {
        /// Exported rig JSON
        path: PathBuf,
    },
}

impl Commands {
    /// Execute the selected command.
    ///
    /// # Errors
    /// Returns an error if the underlying command fails.
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::Export {
                source,
                mesh,
                scene,
                armature,
                output,
                abort_on_lookup_error,
                pretty,
                quiet,
            } => {
                let options = export_options(
                    mesh,
                    scene,
                    armature,
                    output.as_deref(),
                    *abort_on_lookup_error,
                    *pretty,
                );
                export::execute(source, &options, *quiet)
            }
            Commands::Batch {
                source,
                jobs,
                quiet,
            } => export::batch(source, jobs, *quiet),
            Commands::Inspect { path } => inspect::inspect(path),
            Commands::Validate { path } => inspect::validate(path),
        }
    }
}

fn export_options(
    mesh: &str,
    scene: &str,
    armature: &str,
    output: Option<&Path>,
    abort_on_lookup_error: bool,
    pretty: bool,
) -> ExportOptions {
    let policy = if abort_on_lookup_error {
        LookupErrorPolicy::Abort
    } else {
        LookupErrorPolicy::Skip
    };
    let options = ExportOptions::new(mesh)
        .with_scene(scene)
        .with_armature(armature)
        .with_lookup_policy(policy)
        .with_pretty(pretty);
    match output {
        Some(output) => options.with_output(output),
        None => options,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    fn parse_export(args: &[&str]) -> ExportOptions {
        let cli = Cli::try_parse_from(args).unwrap();
        let Commands::Export {
            mesh,
            scene,
            armature,
            output,
            abort_on_lookup_error,
            pretty,
            ..
        } = cli.command
        else {
            panic!("expected the export command");
        };
        export_options(
            &mesh,
            &scene,
            &armature,
            output.as_deref(),
            abort_on_lookup_error,
            pretty,
        )
    }

    #[test]
    fn test_export_defaults() {
        let options = parse_export(&["rigexport", "export", "scene.glb", "-m", "Body"]);
        assert_eq!(options.mesh, "Body");
        assert_eq!(options.scene, "Scene");
        assert_eq!(options.armature, "Armature");
        assert_eq!(options.on_lookup_error, LookupErrorPolicy::Skip);
        assert_eq!(options.output_path(), PathBuf::from("Body.json"));
        assert!(!options.pretty);
    }

    #[test]
    fn test_export_flags() {
        let options = parse_export(&[
            "rigexport",
            "export",
            "scene.glb",
            "--mesh",
            "homer",
            "--scene",
            "Level",
            "-a",
            "HomerRig",
            "-o",
            "out/homer.json",
            "--abort-on-lookup-error",
            "--pretty",
        ]);
        assert_eq!(options.scene, "Level");
        assert_eq!(options.armature, "HomerRig");
        assert_eq!(options.on_lookup_error, LookupErrorPolicy::Abort);
        assert_eq!(options.output_path(), PathBuf::from("out/homer.json"));
        assert!(options.pretty);
    }

    #[test]
    fn test_export_requires_mesh() {
        let parsed = Cli::try_parse_from(["rigexport", "export", "scene.glb"]);
        assert!(parsed.is_err());
    }
}
