//! Bulk prefix-to-prefix moves
//!
//! Plain copy-then-delete housekeeping: frames are swept from the drop
//! prefix into `unprocessed/` before a reconciliation pass and into
//! `processed/` afterwards.

use async_trait::async_trait;
use framewatch_core::Result;
use tracing::{info, warn};

use crate::store::{normalize_prefix, ObjectStore};

/// Outcome of one bulk-move sweep.
#[derive(Debug, Default)]
pub struct MoveReport {
    pub moved: Vec<String>,
    /// (key, error) pairs for objects left in place
    pub failures: Vec<(String, String)>,
}

impl MoveReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Store operations one sweep uses.
#[async_trait]
trait MoveStore: Sync {
    async fn list(&self, prefix: &str) -> Result<Vec<String>>;
    async fn copy(&self, from: &str, to: &str) -> Result<()>;
    async fn delete(&self, key: &str) -> Result<()>;
}

#[async_trait]
impl MoveStore for ObjectStore {
    async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        ObjectStore::list(self, prefix).await
    }

    async fn copy(&self, from: &str, to: &str) -> Result<()> {
        ObjectStore::copy(self, from, to).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        ObjectStore::delete(self, key).await
    }
}

/// Move every object under `source_prefix` to `dest_prefix`.
///
/// Each object is copied before its source is deleted, so a copy failure
/// never loses data: the source object stays put and the failure is recorded
/// per object while the sweep continues. A delete failure after a successful
/// copy leaves a duplicate behind, which a later sweep re-moves harmlessly.
pub async fn bulk_move(
    store: &ObjectStore,
    source_prefix: &str,
    dest_prefix: &str,
) -> Result<MoveReport> {
    sweep(store, source_prefix, dest_prefix).await
}

async fn sweep(
    store: &dyn MoveStore,
    source_prefix: &str,
    dest_prefix: &str,
) -> Result<MoveReport> {
    let source_prefix = normalize_prefix(source_prefix);
    let dest_prefix = normalize_prefix(dest_prefix);
    let keys = store.list(&source_prefix).await?;

    let mut report = MoveReport::default();

    for key in keys {
        let relative = key.strip_prefix(&source_prefix).unwrap_or(&key);
        let dest = format!("{}{}", dest_prefix, relative);

        if let Err(e) = store.copy(&key, &dest).await {
            warn!(key = %key, error = %e, "copy failed, source retained");
            report.failures.push((key, e.to_string()));
            continue;
        }

        if let Err(e) = store.delete(&key).await {
            // The copy landed; the stale source will be retried by the next
            // sweep
            warn!(key = %key, error = %e, "delete after copy failed");
            report.failures.push((key, e.to_string()));
            continue;
        }

        report.moved.push(dest);
    }

    info!(
        moved = report.moved.len(),
        failed = report.failures.len(),
        from = %source_prefix,
        to = %dest_prefix,
        "bulk move finished"
    );

    Ok(report)
}
