// Initialization utilities for the local runner
//
// Tracing setup and component wiring from RuntimeConfig

use std::sync::Arc;

use anyhow::Result;
use framewatch_config::{LogFormat, RuntimeConfig, StatsBackend};
use framewatch_stats::{DynamoStatSink, ObjectStatSink, StatSink};
use framewatch_storage::{build_operator, ObjectStore};
use tracing::info;

/// Initialize tracing/logging from RuntimeConfig
pub fn init_tracing(config: &RuntimeConfig) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let env_filter =
        EnvFilter::try_new(&config.log.level).unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    // Try to set the global subscriber; ignore error if already set (idempotent)
    let _ = match config.log.format {
        LogFormat::Json => {
            tracing::subscriber::set_global_default(registry.with(fmt::layer().json()))
        }
        LogFormat::Text => tracing::subscriber::set_global_default(registry.with(fmt::layer())),
    };
}

/// Build the object store from RuntimeConfig
pub fn init_store(config: &RuntimeConfig) -> Result<ObjectStore> {
    info!(
        "Initializing object store with backend: {}",
        config.storage.backend
    );
    Ok(ObjectStore::new(build_operator(&config.storage)?))
}

/// Build the statistics sink from RuntimeConfig
pub async fn init_sink(config: &RuntimeConfig, store: &ObjectStore) -> Result<Arc<dyn StatSink>> {
    info!(
        "Initializing statistics sink with backend: {}",
        config.stats.backend
    );

    let sink: Arc<dyn StatSink> = match config.stats.backend {
        StatsBackend::Object => Arc::new(ObjectStatSink::new(
            store.operator().clone(),
            config.stats.prefix.clone(),
        )),
        StatsBackend::Dynamodb => {
            let aws = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
            Arc::new(DynamoStatSink::new(
                aws_sdk_dynamodb::Client::new(&aws),
                config.stats.table.clone(),
            ))
        }
    };

    Ok(sink)
}
