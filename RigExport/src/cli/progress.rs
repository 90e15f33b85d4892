//! CLI progress display utilities

use std::time::Duration;

use console::{Emoji, style};
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};

use crate::rig::{ExportPhase, ExportProgress};

/// Magnifying glass - for lookup/scanning operations
pub static LOOKING_GLASS: Emoji<'_, '_> = Emoji("🔍 ", "");
/// Bone - for skeleton operations
pub static BONE: Emoji<'_, '_> = Emoji("🦴 ", "");
/// Floppy disk - for writing/saving operations
pub static DISK: Emoji<'_, '_> = Emoji("💾 ", "");
/// Sparkles - for completion
pub static SPARKLE: Emoji<'_, '_> = Emoji("✨ ", "");

/// Print a step indicator: `[1/3] 🔍 Message...`
pub fn print_step(current: usize, total: usize, emoji: &Emoji, msg: &str) {
    println!(
        "{} {}{}",
        style(format!("[{current}/{total}]")).bold().dim(),
        emoji,
        msg
    );
}

/// Print completion message: `✨ Done in 2s`
pub fn print_done(elapsed: Duration) {
    println!("{} Done in {}", SPARKLE, HumanDuration(elapsed));
}

/// Progress bar style for determinate progress
///
/// Format: `Reading weights [████████░░░░░░░░] 5/10`
///
/// # Panics
/// Panics if the template string is invalid (this is a compile-time constant).
#[must_use]
pub fn bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{msg} [{bar:40.cyan/blue}] {pos}/{len}")
        .expect("valid template")
}

/// Create a simple progress bar
#[must_use]
pub fn simple_bar(total: u64, msg: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(bar_style());
    pb.set_message(msg.to_string());
    pb
}

/// Step text for an export progress update: `Reading bones (Armature)...`
fn step_message(update: &ExportProgress) -> String {
    match &update.current_item {
        Some(item) => format!("{} ({item})...", update.phase.as_str()),
        None => format!("{}...", update.phase.as_str()),
    }
}

/// Drive step lines and a vertex group bar from export progress updates.
pub fn render_export_progress(pb: &ProgressBar, update: &ExportProgress) {
    let msg = step_message(update);
    match update.phase {
        ExportPhase::ResolvingObjects => {
            pb.suspend(|| print_step(1, 3, &LOOKING_GLASS, &msg));
        }
        ExportPhase::ReadingBones => {
            pb.suspend(|| print_step(2, 3, &BONE, &msg));
        }
        ExportPhase::ReadingWeights => {
            pb.set_length(update.total as u64);
            pb.set_position(update.current as u64);
            pb.set_message(msg);
        }
        ExportPhase::WritingOutput => {
            pb.finish_and_clear();
            print_step(3, 3, &DISK, &msg);
        }
        ExportPhase::Complete => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_message() {
        let update = ExportProgress::with_item(ExportPhase::ReadingBones, 1, 1, "Armature");
        assert_eq!(step_message(&update), "Reading bones (Armature)...");

        let update = ExportProgress::new(ExportPhase::ResolvingObjects, 1, 1);
        assert_eq!(step_message(&update), "Resolving objects...");
    }

    #[test]
    fn test_weights_phase_drives_bar() {
        let pb = ProgressBar::hidden();
        let update = ExportProgress::with_item(ExportPhase::ReadingWeights, 2, 5, "Spine");
        render_export_progress(&pb, &update);
        assert_eq!(pb.length(), Some(5));
        assert_eq!(pb.position(), 2);
        assert_eq!(pb.message(), "Reading weights (Spine)...");
    }
}
