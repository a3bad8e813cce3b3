// AWS Lambda runtime adapter
//
// Two functions share this crate: the ingestion function consumes the queue
// of upload notifications and feeds the batch accumulator; the summary
// function runs the move -> reconcile -> move pass after an inference job
// completes. lambda_runtime provides the tokio runtime for both.

use std::sync::Arc;

use aws_config::BehaviorVersion;
use aws_lambda_events::event::sqs::SqsEvent;
use framewatch_batch::{BatchAccumulator, DynamoBatchStore, LambdaTrigger};
use framewatch_config::{RuntimeConfig, StatsBackend};
use framewatch_core::{QueueEvent, QueueRecord};
use framewatch_stats::{DynamoStatSink, ObjectStatSink, Reconciler, StatSink};
use framewatch_storage::{build_operator, bulk_move, ObjectStore};
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::{json, Value};
use tracing::info;

fn load_config() -> Result<RuntimeConfig, Error> {
    RuntimeConfig::load().map_err(|e| Error::from(format!("failed to load config: {}", e)))
}

/// Ingestion function: queue envelope -> batch accumulator.
pub async fn run_ingest() -> Result<(), Error> {
    let config = load_config()?;
    let aws = aws_config::load_defaults(BehaviorVersion::latest()).await;

    let store = Arc::new(DynamoBatchStore::new(
        aws_sdk_dynamodb::Client::new(&aws),
        config.batch.table.clone(),
    ));
    let trigger = Arc::new(LambdaTrigger::new(
        aws_sdk_lambda::Client::new(&aws),
        config.batch.trigger_function.clone(),
    ));
    let accumulator = Arc::new(BatchAccumulator::new(store, trigger, config.batch.size));

    lambda_runtime::run(service_fn(move |event: LambdaEvent<SqsEvent>| {
        let accumulator = accumulator.clone();
        async move { handle_ingest(event, accumulator).await }
    }))
    .await
}

async fn handle_ingest(
    event: LambdaEvent<SqsEvent>,
    accumulator: Arc<BatchAccumulator>,
) -> Result<Value, Error> {
    let (sqs_event, _context) = event.into_parts();
    let queue_event = to_queue_event(sqs_event);

    let summary = accumulator.ingest(&queue_event).await;
    info!(
        appended = summary.appended,
        dispatched = summary.dispatched,
        failed = summary.failures.len(),
        "ingest invocation finished"
    );

    Ok(json!({
        "statusCode": 200,
        "appended": summary.appended,
        "dispatched": summary.dispatched,
        "failures": summary.failures,
    }))
}

fn to_queue_event(event: SqsEvent) -> QueueEvent {
    QueueEvent {
        records: event
            .records
            .into_iter()
            .filter_map(|message| message.body)
            .map(|body| QueueRecord { body })
            .collect(),
    }
}

/// Summary function: sweep, reconcile, sweep.
///
/// The trigger payload (the batch manifest) is accepted but not consumed;
/// the pass derives everything from the storage prefix contents, which keeps
/// it re-runnable regardless of which invocation delivered a given frame.
pub async fn run_summary() -> Result<(), Error> {
    let config = load_config()?;
    let operator =
        build_operator(&config.storage).map_err(|e| Error::from(format!("storage init: {}", e)))?;
    let store = ObjectStore::new(operator.clone());

    let aws = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let sink: Arc<dyn StatSink> = match config.stats.backend {
        StatsBackend::Dynamodb => Arc::new(DynamoStatSink::new(
            aws_sdk_dynamodb::Client::new(&aws),
            config.stats.table.clone(),
        )),
        StatsBackend::Object => Arc::new(ObjectStatSink::new(
            operator,
            config.stats.prefix.clone(),
        )),
    };

    let reconciler = Arc::new(Reconciler::new(store.clone(), sink));
    let store = Arc::new(store);
    let pipeline = Arc::new(config.pipeline.clone());

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let reconciler = reconciler.clone();
        let store = store.clone();
        let pipeline = pipeline.clone();
        async move { handle_summary(event, store, reconciler, pipeline).await }
    }))
    .await
}

async fn handle_summary(
    event: LambdaEvent<Value>,
    store: Arc<ObjectStore>,
    reconciler: Arc<Reconciler>,
    pipeline: Arc<framewatch_config::PipelineConfig>,
) -> Result<Value, Error> {
    let (_payload, _context) = event.into_parts();

    // Stage inference outputs for reconciliation
    let staged = bulk_move(&store, &pipeline.source_prefix, &pipeline.unprocessed_prefix)
        .await
        .map_err(Error::from)?;

    let report = reconciler
        .run(&pipeline.unprocessed_prefix)
        .await
        .map_err(Error::from)?;

    // Archive everything the pass consumed
    let archived = bulk_move(
        &store,
        &pipeline.unprocessed_prefix,
        &pipeline.processed_prefix,
    )
    .await
    .map_err(Error::from)?;

    Ok(json!({
        "statusCode": 200,
        "staged": staged.moved.len(),
        "images_processed": report.images_processed,
        "rows_written": report.rows_written,
        "item_failures": report.failures.len(),
        "archived": archived.moved.len(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_lambda_events::event::sqs::SqsMessage;

    #[test]
    fn sqs_event_maps_to_queue_event() {
        let event = SqsEvent {
            records: vec![
                SqsMessage {
                    body: Some(r#"{"Records":[]}"#.to_string()),
                    ..Default::default()
                },
                SqsMessage {
                    body: None,
                    ..Default::default()
                },
            ],
        };

        let queue_event = to_queue_event(event);
        assert_eq!(queue_event.records.len(), 1);
        assert_eq!(queue_event.records[0].body, r#"{"Records":[]}"#);
    }
}
