//! Progress reporting for deliberations

use colored::Colorize;
use deliberation_application::{PhaseUpdate, ProgressNotifier};
use deliberation_domain::Phase;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::Mutex;

/// Numbered phase label shown in front of each bar
fn phase_label(phase: &Phase) -> String {
    let number = match phase {
        Phase::Collection => 1,
        Phase::Analysis => 2,
        Phase::Debate => 3,
        Phase::Consensus => 4,
    };
    format!("Phase {}: {}", number, phase.display_name())
}

/// One-line summary of a finished phase
fn describe_update(update: &PhaseUpdate) -> String {
    match update {
        PhaseUpdate::Collected { succeeded, failed } => {
            format!("{} responses, {} failed", succeeded, failed)
        }
        PhaseUpdate::Analyzed {
            themes,
            differences,
            timed_out,
        } => {
            if *timed_out {
                "timed out, continuing without analysis".to_string()
            } else {
                format!("{} themes, {} differences", themes, differences)
            }
        }
        PhaseUpdate::Debated {
            rounds,
            disagreement,
        } => format!("{} rounds, disagreement {:.2}", rounds, disagreement),
        PhaseUpdate::Agreed {
            agreement_level,
            method,
        } => format!("{} consensus, agreement {:.0}%", method, agreement_level * 100.0),
    }
}

/// Reports progress during a deliberation with progress bars on stderr
pub struct ProgressReporter {
    multi: MultiProgress,
    phase_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::with_draw_target(ProgressDrawTarget::stderr()),
            phase_bar: Mutex::new(None),
        }
    }

    fn phase_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.phase_bar.lock()
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

impl ProgressNotifier for ProgressReporter {
    fn on_phase_start(&self, phase: &Phase, _session_id: &str, total_tasks: usize) {
        let pb = self.multi.add(ProgressBar::new(total_tasks as u64));
        pb.set_style(Self::phase_style());
        pb.set_prefix(phase_label(phase));
        pb.set_message("Starting...");

        if let Ok(mut slot) = self.phase_bar.lock() {
            *slot = Some(pb);
        }
    }

    fn on_task_complete(&self, _phase: &Phase, responder_id: &str, success: bool) {
        self.with_bar(|pb| {
            let status = if success {
                format!("{} {}", "v".green(), responder_id)
            } else {
                format!("{} {}", "x".red(), responder_id)
            };
            pb.set_message(status);
            pb.inc(1);
        });
    }

    fn on_phase_complete(&self, _phase: &Phase, _session_id: &str, update: &PhaseUpdate) {
        let taken = self.phase_bar.lock().ok().and_then(|mut slot| slot.take());
        if let Some(pb) = taken {
            pb.finish_with_message(describe_update(update).green().to_string());
        }
    }

    fn on_debate_round(&self, round: usize, disagreement: f64) {
        self.with_bar(|pb| {
            pb.set_message(format!("round {} disagreement {:.2}", round, disagreement));
        });
    }
}

/// Simple text-based progress (no fancy UI), written to stderr
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_phase_start(&self, phase: &Phase, _session_id: &str, total_tasks: usize) {
        eprintln!(
            "{} {} ({} tasks)",
            "->".cyan(),
            phase_label(phase).bold(),
            total_tasks
        );
    }

    fn on_task_complete(&self, _phase: &Phase, responder_id: &str, success: bool) {
        if success {
            eprintln!("  {} {}", "v".green(), responder_id);
        } else {
            eprintln!("  {} {} (failed)", "x".red(), responder_id);
        }
    }

    fn on_phase_complete(&self, _phase: &Phase, _session_id: &str, update: &PhaseUpdate) {
        eprintln!("  {}\n", describe_update(update).dimmed());
    }

    fn on_debate_round(&self, round: usize, disagreement: f64) {
        eprintln!("  round {}: disagreement {:.2}", round, disagreement);
    }
}
