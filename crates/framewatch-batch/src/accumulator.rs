//! The batch accumulator

use std::sync::Arc;

use framewatch_core::{PipelineError, QueueEvent, StorageEvent, TriggerPayload};
use tracing::{error, info, warn};

use crate::store::BatchStore;
use crate::trigger::InferenceTrigger;

/// Outcome of one accumulator invocation.
#[derive(Debug, Default)]
pub struct IngestSummary {
    /// Keys appended to the pending batch
    pub appended: usize,
    /// Batches handed to the inference trigger
    pub dispatched: usize,
    /// Per-record failures, isolated from the rest of the invocation
    pub failures: Vec<String>,
}

/// Accumulates object keys from upload notifications and hands full batches
/// to the inference trigger.
pub struct BatchAccumulator {
    store: Arc<dyn BatchStore>,
    trigger: Arc<dyn InferenceTrigger>,
    batch_size: usize,
}

impl BatchAccumulator {
    pub fn new(
        store: Arc<dyn BatchStore>,
        trigger: Arc<dyn InferenceTrigger>,
        batch_size: usize,
    ) -> Self {
        Self {
            store,
            trigger,
            batch_size,
        }
    }

    /// Process one queue envelope.
    ///
    /// Records are handled independently: a malformed body or failed append
    /// is recorded in the summary and the remaining records still run. A key
    /// that landed in the batch counts as appended even when the dispatch it
    /// triggered fails; the dispatch failure is reported on its own.
    pub async fn ingest(&self, event: &QueueEvent) -> IngestSummary {
        let mut summary = IngestSummary::default();

        for record in &event.records {
            match self.handle_record(&record.body).await {
                Ok(handoff) => {
                    summary.appended += 1;
                    match handoff {
                        Handoff::Pending => {}
                        Handoff::Dispatched => summary.dispatched += 1,
                        Handoff::Failed(e) => {
                            warn!(error = %e, "batch hand-off failed");
                            summary.failures.push(e.to_string());
                        }
                    }
                }
                Err(e) => {
                    warn!(error = %e, "notification record failed");
                    summary.failures.push(e.to_string());
                }
            }
        }

        summary
    }

    /// Errors only when the key never reached the batch; once the append
    /// lands the outcome is reported through `Handoff`.
    async fn handle_record(&self, body: &str) -> Result<Handoff, PipelineError> {
        let storage_event = StorageEvent::from_body(body)?;
        let key = storage_event.object_key()?;

        let images = self.store.append(key).await?;
        info!(key = %key, batch_len = images.len(), "appended key to pending batch");

        if images.len() < self.batch_size {
            return Ok(Handoff::Pending);
        }

        // Fire-and-forget hand-off: the batch is reset whether or not the
        // dispatch lands (at-most-once). The check/dispatch/reset window is
        // not atomic with the append above.
        let dispatch_result = self
            .trigger
            .dispatch(&TriggerPayload { batch: images })
            .await;

        self.store.reset().await?;

        match dispatch_result {
            Ok(()) => Ok(Handoff::Dispatched),
            Err(e) => {
                error!(error = %e, "inference trigger dispatch failed; batch already reset");
                Ok(Handoff::Failed(e))
            }
        }
    }
}

/// What became of a record after its key was appended.
enum Handoff {
    /// Batch still below the threshold
    Pending,
    /// Batch filled and the manifest was dispatched
    Dispatched,
    /// Batch filled but the dispatch failed; the batch was still reset
    Failed(PipelineError),
}
