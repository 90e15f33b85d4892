//! CLI commands for rig export

use std::path::Path;
use std::time::Instant;

use crate::cli::progress::{print_done, render_export_progress, simple_bar};
use crate::config::ExportConfig;
use crate::rig::{
    ExportOptions, ExportProgress, ExportReport, export_rig, export_rig_with_progress,
};
use crate::source::load_scene;

/// Export a single rig.
pub fn execute(source: &Path, options: &ExportOptions, quiet: bool) -> anyhow::Result<()> {
    let start = Instant::now();
    let host = load_scene(source)?;

    if quiet {
        export_rig(&host, options)?;
        return Ok(());
    }

    println!("Exporting rig from {}", source.display());
    let pb = simple_bar(0, "Reading weights");
    let progress = |update: &ExportProgress| render_export_progress(&pb, update);
    let result = export_rig_with_progress(&host, options, &progress);
    pb.finish_and_clear();
    let report = result?;

    print_report(&report);
    print_done(start.elapsed());
    Ok(())
}

/// Run every job in a TOML job file against one scene source.
pub fn batch(source: &Path, jobs: &Path, quiet: bool) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = ExportConfig::load(jobs)?;
    let host = load_scene(source)?;
    let jobs = config.jobs();

    let pb = if quiet {
        indicatif::ProgressBar::hidden()
    } else {
        simple_bar(jobs.len() as u64, "Exporting")
    };

    let result: crate::Result<Vec<ExportReport>> = jobs
        .iter()
        .map(|options| {
            pb.set_message(format!("Exporting {}", options.mesh));
            let report = export_rig(&host, options);
            pb.inc(1);
            report
        })
        .collect();
    pb.finish_and_clear();
    let reports = result?;

    if !quiet {
        for report in &reports {
            print_report(report);
        }
        println!("Exported {} rigs", reports.len());
        print_done(start.elapsed());
    }
    Ok(())
}

fn print_report(report: &ExportReport) {
    println!("  Output:   {}", report.output.display());
    println!("  Bones:    {}", report.bone_count);
    println!("  Weights:  {}", report.weight_count);
    println!(
        "  Groups:   {} matched, {} ignored",
        report.matched_groups.len(),
        report.ignored_groups.len()
    );
    if !report.ignored_groups.is_empty() {
        println!("  Ignored:  {}", report.ignored_groups.join(", "));
    }
    if !report.skipped_lookups.is_empty() {
        println!();
        println!("Skipped weight lookups ({}):", report.skipped_lookups.len());
        for skipped in report.skipped_lookups.iter().take(10) {
            println!(
                "  - {} vertex {}: {}",
                skipped.group, skipped.vertex, skipped.error
            );
        }
        if report.skipped_lookups.len() > 10 {
            println!("  ... and {} more", report.skipped_lookups.len() - 10);
        }
    }
}
