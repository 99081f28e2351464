//! Concurrent fan-out shared by the phases.

use crate::ports::progress::ProgressNotifier;
use crate::ports::responder::{Responder, ResponderError};
use crate::resilience::ResilientCaller;
use deliberation_domain::{Generation, GenerationContext, Phase};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{info, warn};

/// One prepared remote call
pub(crate) struct PreparedCall {
    pub responder: Arc<dyn Responder>,
    pub prompt: String,
    pub context: Option<GenerationContext>,
}

/// Settled result of one [`PreparedCall`], attributed to its responder
pub(crate) struct Settled {
    pub responder_id: String,
    pub result: Result<Generation, ResponderError>,
}

/// Issue every call concurrently and wait until all have settled.
///
/// Results come back in input order no matter the completion order. A
/// task that dies without reporting is recorded as a failure for its
/// responder.
pub(crate) async fn fan_out(
    caller: &ResilientCaller,
    calls: Vec<PreparedCall>,
    attempt_timeout: Duration,
    phase: &Phase,
    progress: &dyn ProgressNotifier,
) -> Vec<Settled> {
    let ids: Vec<String> = calls.iter().map(|c| c.responder.id().to_string()).collect();
    let mut join_set = JoinSet::new();

    for (index, call) in calls.into_iter().enumerate() {
        let caller = caller.clone();
        join_set.spawn(async move {
            let result = caller
                .call(
                    call.responder.as_ref(),
                    &call.prompt,
                    call.context.as_ref(),
                    attempt_timeout,
                )
                .await;
            (index, result)
        });
    }

    let mut slots: Vec<Option<Result<Generation, ResponderError>>> =
        ids.iter().map(|_| None).collect();

    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok((index, result)) => {
                let id = &ids[index];
                match &result {
                    Ok(_) => info!("{} phase: {} responded", phase, id),
                    Err(e) => warn!("{} phase: {} failed: {}", phase, id, e),
                }
                progress.on_task_complete(phase, id, result.is_ok());
                slots[index] = Some(result);
            }
            Err(e) => {
                warn!("Task join error: {}", e);
            }
        }
    }

    ids.into_iter()
        .zip(slots)
        .map(|(responder_id, slot)| {
            let result = slot.unwrap_or_else(|| {
                progress.on_task_complete(phase, &responder_id, false);
                Err(ResponderError::Provider("call task aborted".to_string()))
            });
            Settled {
                responder_id,
                result,
            }
        })
        .collect()
}
