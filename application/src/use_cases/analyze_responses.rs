//! Analyze responses use case
//!
//! Runs the pure Analysis Engine off the async runtime under a time
//! bound. Exceeding the bound degrades to an empty report.

use deliberation_domain::{AnalysisEngine, AnalysisReport, ResponderOutput};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{info, warn};

pub struct AnalyzeResponsesUseCase {
    engine: Arc<AnalysisEngine>,
    timeout: Duration,
}

impl AnalyzeResponsesUseCase {
    pub fn new(engine: AnalysisEngine, timeout: Duration) -> Self {
        Self {
            engine: Arc::new(engine),
            timeout,
        }
    }

    /// Never fails: a timeout yields [`AnalysisReport::timed_out`].
    pub async fn execute(&self, responses: Vec<ResponderOutput>) -> AnalysisReport {
        let engine = Arc::clone(&self.engine);
        let task = tokio::task::spawn_blocking(move || engine.analyze(&responses));

        match timeout(self.timeout, task).await {
            Ok(Ok(report)) => {
                info!(
                    "Analysis found {} themes and {} differences",
                    report.common_themes.len(),
                    report.differences.len()
                );
                report
            }
            Ok(Err(e)) => {
                warn!("Analysis task failed: {}", e);
                AnalysisReport::new(
                    Vec::new(),
                    Vec::new(),
                    Vec::new(),
                    format!("Analysis failed: {}", e),
                )
            }
            Err(_) => {
                warn!("Analysis timed out after {:?}", self.timeout);
                AnalysisReport::timed_out(self.timeout)
            }
        }
    }
}
