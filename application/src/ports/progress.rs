//! Progress notification port
//!
//! Defines the interface for reporting progress during a deliberation.

use deliberation_domain::{ConsensusMethod, Phase};

/// Minimal phase-specific payload reported when a phase finishes
#[derive(Debug, Clone, PartialEq)]
pub enum PhaseUpdate {
    Collected { succeeded: usize, failed: usize },
    Analyzed { themes: usize, differences: usize, timed_out: bool },
    Debated { rounds: usize, disagreement: f64 },
    Agreed { agreement_level: f64, method: ConsensusMethod },
}

/// Callback for progress updates during a deliberation
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console, web UI, etc.)
pub trait ProgressNotifier: Send + Sync {
    /// Called when a phase starts
    fn on_phase_start(&self, phase: &Phase, session_id: &str, total_tasks: usize);

    /// Called when one responder's call within a phase settles
    fn on_task_complete(&self, phase: &Phase, responder_id: &str, success: bool);

    /// Called when a phase completes
    fn on_phase_complete(&self, phase: &Phase, session_id: &str, update: &PhaseUpdate);

    /// Called after each debate round
    fn on_debate_round(&self, _round: usize, _disagreement: f64) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_phase_start(&self, _phase: &Phase, _session_id: &str, _total_tasks: usize) {}
    fn on_task_complete(&self, _phase: &Phase, _responder_id: &str, _success: bool) {}
    fn on_phase_complete(&self, _phase: &Phase, _session_id: &str, _update: &PhaseUpdate) {}
}
