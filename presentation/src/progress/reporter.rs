//! Progress reporting for council reviews

use colored::Colorize;
use council_application::ProgressSink;
use council_domain::{Stage, StageProgress};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Mutex;

/// Reports progress during a review with one progress bar per stage
pub struct ProgressReporter {
    multi: MultiProgress,
    stage_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            stage_bar: Mutex::new(None),
        }
    }

    fn stage_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.stage_bar.lock()
            && let Some(pb) = guard.as_ref()
        {
            f(pb);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for ProgressReporter {
    fn on_stage_start(&self, stage: Stage, total_calls: usize) {
        let pb = self.multi.add(ProgressBar::new(total_calls as u64));
        pb.set_style(Self::stage_style());
        pb.set_prefix(stage.to_string());
        pb.set_message("Starting...");

        if let Ok(mut guard) = self.stage_bar.lock() {
            *guard = Some(pb);
        }
    }

    fn on_call_start(&self, progress: &StageProgress) {
        self.with_bar(|pb| pb.set_message(format!("asking {}", progress.step)));
    }

    fn on_call_complete(&self, _stage: Stage, step: &str, success: bool) {
        self.with_bar(|pb| {
            let status = if success {
                format!("{} {}", "v".green(), step)
            } else {
                format!("{} {}", "x".red(), step)
            };
            pb.set_message(status);
            pb.inc(1);
        });
    }

    fn on_stage_complete(&self, stage: Stage) {
        let Ok(mut guard) = self.stage_bar.lock() else {
            return;
        };
        if let Some(pb) = guard.take() {
            let message = if pb.length() == Some(0) {
                "skipped (no directed questions)".dimmed().to_string()
            } else {
                format!("Stage {} complete!", stage.number()).green().to_string()
            };
            pb.finish_with_message(message);
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl ProgressSink for SimpleProgress {
    fn on_stage_start(&self, stage: Stage, total_calls: usize) {
        println!(
            "{} {} ({} calls)",
            "->".cyan(),
            stage.to_string().bold(),
            total_calls
        );
    }

    fn on_call_start(&self, _progress: &StageProgress) {}

    fn on_call_complete(&self, _stage: Stage, step: &str, success: bool) {
        if success {
            println!("  {} {}", "v".green(), step);
        } else {
            println!("  {} {} (failed)", "x".red(), step);
        }
    }

    fn on_stage_complete(&self, _stage: Stage) {
        println!();
    }
}
