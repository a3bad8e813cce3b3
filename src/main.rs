// Local runner entry point
//
// Runs one full summary pass against the configured storage backend: sweep
// the drop prefix into unprocessed/, reconcile it, then archive into
// processed/. The same pass runs deployed behind the summary Lambda; this
// binary exists for development and for backfills against fs storage.

use anyhow::Result;
use framewatch_config::RuntimeConfig;
use framewatch_stats::Reconciler;
use framewatch_storage::bulk_move;
use tracing::info;

mod init;

#[tokio::main]
async fn main() -> Result<()> {
    let config = RuntimeConfig::load()?;
    init::init_tracing(&config);

    let store = init::init_store(&config)?;
    let sink = init::init_sink(&config, &store).await?;
    let reconciler = Reconciler::new(store.clone(), sink);
    let pipeline = &config.pipeline;

    let staged = bulk_move(&store, &pipeline.source_prefix, &pipeline.unprocessed_prefix).await?;
    info!(staged = staged.moved.len(), "staged inference outputs");

    let report = reconciler.run(&pipeline.unprocessed_prefix).await?;
    info!(
        images = report.images_processed,
        rows = report.rows_written,
        failed = report.failures.len(),
        "reconciliation finished"
    );
    for failure in &report.failures {
        tracing::warn!(unique_id = %failure.unique_id, error = %failure.error, "item skipped");
    }

    let archived = bulk_move(
        &store,
        &pipeline.unprocessed_prefix,
        &pipeline.processed_prefix,
    )
    .await?;
    info!(archived = archived.moved.len(), "archived processed objects");

    Ok(())
}
