//! Object store wrapper with the pipeline's error mapping

use framewatch_core::{PipelineError, Result};
use opendal::{EntryMode, Operator};

/// Bucket-scoped object store handle.
///
/// Thin wrapper over an OpenDAL operator that maps every failure to
/// `PipelineError::Storage` so callers can apply the isolate-vs-abort policy
/// without caring which backend misbehaved.
#[derive(Debug, Clone)]
pub struct ObjectStore {
    op: Operator,
}

impl ObjectStore {
    pub fn new(op: Operator) -> Self {
        Self { op }
    }

    pub fn operator(&self) -> &Operator {
        &self.op
    }

    /// List all object keys under a prefix, recursively.
    ///
    /// The prefix is normalized the way the source convention expects:
    /// surrounding slashes trimmed, one trailing slash re-appended when the
    /// prefix is non-empty, empty meaning the whole bucket.
    pub async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let prefix = normalize_prefix(prefix);
        let path = if prefix.is_empty() { "/" } else { prefix.as_str() };
        let entries = self
            .op
            .list_with(path)
            .recursive(true)
            .await
            .map_err(|e| PipelineError::storage(format!("list '{}': {}", prefix, e)))?;

        Ok(entries
            .into_iter()
            .filter(|entry| entry.metadata().mode() == EntryMode::FILE)
            .map(|entry| entry.path().to_string())
            .collect())
    }

    pub async fn read(&self, key: &str) -> Result<Vec<u8>> {
        let buffer = self
            .op
            .read(key)
            .await
            .map_err(|e| PipelineError::storage(format!("read '{}': {}", key, e)))?;
        Ok(buffer.to_vec())
    }

    pub async fn write(&self, key: &str, bytes: Vec<u8>) -> Result<()> {
        self.op
            .write(key, bytes)
            .await
            .map_err(|e| PipelineError::storage(format!("write '{}': {}", key, e)))?;
        Ok(())
    }

    pub async fn copy(&self, from: &str, to: &str) -> Result<()> {
        self.op
            .copy(from, to)
            .await
            .map_err(|e| PipelineError::storage(format!("copy '{}' -> '{}': {}", from, to, e)))
    }

    pub async fn delete(&self, key: &str) -> Result<()> {
        self.op
            .delete(key)
            .await
            .map_err(|e| PipelineError::storage(format!("delete '{}': {}", key, e)))
    }

    pub async fn exists(&self, key: &str) -> Result<bool> {
        self.op
            .exists(key)
            .await
            .map_err(|e| PipelineError::storage(format!("stat '{}': {}", key, e)))
    }
}

pub(crate) fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{}/", trimmed)
    }
}
