//! Inference trigger dispatch

use async_trait::async_trait;
use aws_sdk_lambda::primitives::Blob;
use aws_sdk_lambda::types::InvocationType;
use framewatch_core::{PipelineError, Result, TriggerPayload};
use parking_lot::Mutex;

/// Downstream batch-inference invocation seam.
///
/// Dispatch is fire-and-forget: callers log and record a failure but do not
/// retry, relying on the surrounding infrastructure's redelivery semantics.
#[async_trait]
pub trait InferenceTrigger: Send + Sync {
    async fn dispatch(&self, payload: &TriggerPayload) -> Result<()>;
}

/// Invokes the configured function asynchronously (Event invocation type).
#[derive(Debug, Clone)]
pub struct LambdaTrigger {
    client: aws_sdk_lambda::Client,
    function_name: String,
}

impl LambdaTrigger {
    pub fn new(client: aws_sdk_lambda::Client, function_name: impl Into<String>) -> Self {
        Self {
            client,
            function_name: function_name.into(),
        }
    }
}

#[async_trait]
impl InferenceTrigger for LambdaTrigger {
    async fn dispatch(&self, payload: &TriggerPayload) -> Result<()> {
        let body = serde_json::to_vec(payload)
            .map_err(|e| PipelineError::parse("trigger payload", e))?;

        self.client
            .invoke()
            .function_name(&self.function_name)
            .invocation_type(InvocationType::Event)
            .payload(Blob::new(body))
            .send()
            .await
            .map_err(|e| {
                PipelineError::dependency(format!("invoke '{}': {}", self.function_name, e))
            })?;

        tracing::info!(
            function = %self.function_name,
            batch_len = payload.batch.len(),
            "dispatched batch to inference trigger"
        );
        Ok(())
    }
}

/// Records dispatched payloads instead of invoking anything.
#[derive(Debug, Default)]
pub struct RecordingTrigger {
    dispatched: Mutex<Vec<TriggerPayload>>,
}

impl RecordingTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatched(&self) -> Vec<TriggerPayload> {
        self.dispatched.lock().clone()
    }
}

#[async_trait]
impl InferenceTrigger for RecordingTrigger {
    async fn dispatch(&self, payload: &TriggerPayload) -> Result<()> {
        self.dispatched.lock().push(payload.clone());
        Ok(())
    }
}
