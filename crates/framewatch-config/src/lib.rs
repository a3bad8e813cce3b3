// framewatch-config - Unified configuration for all runtimes
//
// Supports configuration from multiple sources:
// 1. Environment variables (highest priority)
// 2. Config file path from FRAMEWATCH_CONFIG env var
// 3. Config file contents from FRAMEWATCH_CONFIG_CONTENT env var
// 4. Default config file locations (./framewatch.toml, ./.framewatch.toml)
// 5. Built-in defaults (lowest priority)

use anyhow::Result;
use serde::{Deserialize, Serialize};

mod env_overrides;
mod sources;
mod validation;

pub use env_overrides::{apply_env_overrides, EnvSource, ENV_PREFIX};

/// Main runtime configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub batch: BatchConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub stats: StatsConfig,

    #[serde(default)]
    pub pipeline: PipelineConfig,

    #[serde(default)]
    pub log: LogConfig,
}

/// Batch accumulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Number of accumulated object keys that triggers an inference run
    pub size: usize,
    /// Table holding the single pending-batch record
    pub table: String,
    /// Function invoked with the batch manifest when the batch is full
    pub trigger_function: String,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            size: 4,
            table: "framewatch_image_metadata".to_string(),
            trigger_function: "framewatch_summary".to_string(),
        }
    }
}

/// Object storage backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fs: Option<FsConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3: Option<S3Config>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Fs,
            fs: Some(FsConfig::default()),
            s3: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Fs,
    S3,
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackend::Fs => write!(f, "fs"),
            StorageBackend::S3 => write!(f, "s3"),
        }
    }
}

impl std::str::FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "fs" | "filesystem" => Ok(StorageBackend::Fs),
            "s3" | "aws" => Ok(StorageBackend::S3),
            _ => anyhow::bail!("Unsupported storage backend: {}. Supported: fs, s3", s),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FsConfig {
    pub path: String,
}

impl Default for FsConfig {
    fn default() -> Self {
        Self {
            path: "./data".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct S3Config {
    pub bucket: String,
    pub region: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

/// Statistics store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsConfig {
    pub backend: StatsBackend,
    /// Table name for the dynamodb backend
    pub table: String,
    /// Key prefix for the object backend
    pub prefix: String,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            backend: StatsBackend::Object,
            table: "framewatch_image_stats".to_string(),
            prefix: "stats".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatsBackend {
    /// Rows as JSON objects in the object store
    Object,
    /// Rows in a DynamoDB table
    Dynamodb,
}

impl std::fmt::Display for StatsBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsBackend::Object => write!(f, "object"),
            StatsBackend::Dynamodb => write!(f, "dynamodb"),
        }
    }
}

impl std::str::FromStr for StatsBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "object" | "json" => Ok(StatsBackend::Object),
            "dynamodb" | "ddb" => Ok(StatsBackend::Dynamodb),
            _ => anyhow::bail!(
                "Unsupported stats backend: {}. Supported: object, dynamodb",
                s
            ),
        }
    }
}

/// Prefix layout of a reconciliation pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Prefix the inference job drops its outputs under; "" means the
    /// bucket root
    pub source_prefix: String,
    pub unprocessed_prefix: String,
    pub processed_prefix: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source_prefix: String::new(),
            unprocessed_prefix: "unprocessed".to_string(),
            processed_prefix: "processed".to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

impl RuntimeConfig {
    /// Load configuration from all sources with priority
    pub fn load() -> Result<Self> {
        sources::load_config()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_backend_from_str() {
        assert_eq!("fs".parse::<StorageBackend>().unwrap(), StorageBackend::Fs);
        assert_eq!("s3".parse::<StorageBackend>().unwrap(), StorageBackend::S3);
        assert_eq!(
            "filesystem".parse::<StorageBackend>().unwrap(),
            StorageBackend::Fs
        );
        assert_eq!("aws".parse::<StorageBackend>().unwrap(), StorageBackend::S3);
        assert!("r2".parse::<StorageBackend>().is_err());
    }

    #[test]
    fn test_stats_backend_from_str() {
        assert_eq!("object".parse::<StatsBackend>().unwrap(), StatsBackend::Object);
        assert_eq!(
            "dynamodb".parse::<StatsBackend>().unwrap(),
            StatsBackend::Dynamodb
        );
    }

    #[test]
    fn test_default_configs() {
        let config = RuntimeConfig::default();
        assert_eq!(config.batch.size, 4);
        assert_eq!(config.storage.backend, StorageBackend::Fs);
        assert_eq!(config.pipeline.unprocessed_prefix, "unprocessed");
        assert_eq!(config.pipeline.processed_prefix, "processed");
        assert_eq!(config.log.format, LogFormat::Text);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: RuntimeConfig = toml::from_str(
            r#"
            [batch]
            size = 2
            table = "metadata"
            trigger_function = "summary"

            [storage]
            backend = "s3"

            [storage.s3]
            bucket = "frames"
            region = "eu-north-1"
            "#,
        )
        .unwrap();

        assert_eq!(config.batch.size, 2);
        assert_eq!(config.storage.backend, StorageBackend::S3);
        assert_eq!(config.storage.s3.as_ref().unwrap().bucket, "frames");
        // Untouched sections keep defaults
        assert_eq!(config.stats.backend, StatsBackend::Object);
        assert_eq!(config.pipeline.processed_prefix, "processed");
    }
}
