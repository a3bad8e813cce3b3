use super::{LogFormat, RuntimeConfig, S3Config, StatsBackend, StorageBackend};
use anyhow::{Context, Result};

pub const ENV_PREFIX: &str = "FRAMEWATCH_";

/// Abstraction over environment-variable lookups so tests can supply their
/// own source of overrides.
pub trait EnvSource {
    fn get(&self, key: &str) -> Option<String>;

    /// Get an environment variable WITHOUT the FRAMEWATCH_ prefix.
    /// Used for AWS standard variables (AWS_REGION, etc.)
    fn get_raw(&self, key: &str) -> Option<String>;
}

/// Apply environment-variable overrides (highest priority) to the runtime config.
pub fn apply_env_overrides<E: EnvSource>(config: &mut RuntimeConfig, env: &E) -> Result<()> {
    // Batch configuration
    if let Some(val) = get_env_usize(env, "BATCH_SIZE")? {
        config.batch.size = val;
    }
    if let Some(table) = env.get("BATCH_TABLE") {
        config.batch.table = table;
    }
    if let Some(function) = env.get("TRIGGER_FUNCTION") {
        config.batch.trigger_function = function;
    }

    // Storage backend
    if let Some(backend) = env.get("STORAGE_BACKEND") {
        config.storage.backend = backend
            .parse::<StorageBackend>()
            .context("Invalid FRAMEWATCH_STORAGE_BACKEND value")?;
    }
    if let Some(path) = env.get("STORAGE_PATH") {
        config.storage.fs.get_or_insert_with(Default::default).path = path;
    }
    if let Some(bucket) = env.get("S3_BUCKET") {
        ensure_s3(config).bucket = bucket;
    }
    if let Some(region) = env.get("S3_REGION") {
        ensure_s3(config).region = region;
    } else if let Some(region) = env.get_raw("AWS_REGION") {
        if config.storage.s3.is_some() {
            ensure_s3(config).region = region;
        }
    }
    if let Some(endpoint) = env.get("S3_ENDPOINT") {
        ensure_s3(config).endpoint = Some(endpoint);
    }

    // Statistics store
    if let Some(backend) = env.get("STATS_BACKEND") {
        config.stats.backend = backend
            .parse::<StatsBackend>()
            .context("Invalid FRAMEWATCH_STATS_BACKEND value")?;
    }
    if let Some(table) = env.get("STATS_TABLE") {
        config.stats.table = table;
    }
    if let Some(prefix) = env.get("STATS_PREFIX") {
        config.stats.prefix = prefix;
    }

    // Pipeline prefixes
    if let Some(prefix) = env.get("SOURCE_PREFIX") {
        config.pipeline.source_prefix = prefix;
    }
    if let Some(prefix) = env.get("UNPROCESSED_PREFIX") {
        config.pipeline.unprocessed_prefix = prefix;
    }
    if let Some(prefix) = env.get("PROCESSED_PREFIX") {
        config.pipeline.processed_prefix = prefix;
    }

    // Logging
    if let Some(level) = env.get("LOG_LEVEL") {
        config.log.level = level;
    }
    if let Some(format) = env.get("LOG_FORMAT") {
        config.log.format = match format.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Text,
        };
    }

    Ok(())
}

fn ensure_s3(config: &mut RuntimeConfig) -> &mut S3Config {
    config.storage.s3.get_or_insert_with(S3Config::default)
}

fn get_env_usize<E: EnvSource>(env: &E, key: &str) -> Result<Option<usize>> {
    match env.get(key) {
        Some(val) => {
            let parsed = val
                .parse::<usize>()
                .with_context(|| format!("Invalid {}{} value: {}", ENV_PREFIX, key, val))?;
            Ok(Some(parsed))
        }
        None => Ok(None),
    }
}
