// Configuration validation
//
// Validates that required fields are present and values are sensible

use crate::*;
use anyhow::{bail, Result};
use tracing::warn;

pub fn validate_config(config: &RuntimeConfig) -> Result<()> {
    validate_batch_config(&config.batch)?;
    validate_storage_config(&config.storage)?;
    validate_stats_config(&config.stats)?;
    validate_pipeline_config(&config.pipeline)?;

    Ok(())
}

fn validate_batch_config(config: &BatchConfig) -> Result<()> {
    if config.size == 0 {
        bail!("batch.size must be greater than 0");
    }

    if config.trigger_function.is_empty() {
        bail!("batch.trigger_function must not be empty");
    }

    if config.table.is_empty() {
        bail!("batch.table must not be empty");
    }

    // A batch manifest is held in a single record; very large batches make
    // the record unwieldy
    if config.size > 100 {
        warn!(size = config.size, "batch.size is very large");
    }

    Ok(())
}

fn validate_storage_config(config: &StorageConfig) -> Result<()> {
    match config.backend {
        StorageBackend::Fs => {
            let Some(fs) = config.fs.as_ref() else {
                bail!("storage.fs section required for the fs backend");
            };
            if fs.path.is_empty() {
                bail!("storage.fs.path must not be empty");
            }
        }
        StorageBackend::S3 => {
            let Some(s3) = config.s3.as_ref() else {
                bail!("storage.s3 section required for the s3 backend");
            };
            if s3.bucket.is_empty() {
                bail!("storage.s3.bucket must not be empty");
            }
            if s3.region.is_empty() {
                bail!("storage.s3.region must not be empty");
            }
        }
    }

    Ok(())
}

fn validate_stats_config(config: &StatsConfig) -> Result<()> {
    match config.backend {
        StatsBackend::Dynamodb => {
            if config.table.is_empty() {
                bail!("stats.table must not be empty for the dynamodb backend");
            }
        }
        StatsBackend::Object => {
            if config.prefix.is_empty() {
                bail!("stats.prefix must not be empty for the object backend");
            }
        }
    }

    Ok(())
}

fn validate_pipeline_config(config: &PipelineConfig) -> Result<()> {
    if config.unprocessed_prefix.is_empty() {
        bail!("pipeline.unprocessed_prefix must not be empty");
    }
    if config.processed_prefix.is_empty() {
        bail!("pipeline.processed_prefix must not be empty");
    }
    if config.unprocessed_prefix == config.processed_prefix {
        bail!("pipeline.unprocessed_prefix and pipeline.processed_prefix must differ");
    }

    Ok(())
}
