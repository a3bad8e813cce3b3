//! The result reconciler

use std::sync::Arc;

use framewatch_core::{
    aggregate_by_category, keys, mean_brightness, parse_detections, Result, StatRow,
};
use framewatch_storage::{group_by_stem, ImageRecord, ObjectStore};
use tracing::{info, warn};

use crate::sink::StatSink;

/// One per-item failure of a reconciliation pass.
#[derive(Debug)]
pub struct ItemFailure {
    pub unique_id: String,
    pub error: String,
}

/// Outcome of one reconciliation pass.
#[derive(Debug, Default)]
pub struct PassReport {
    pub images_processed: usize,
    pub rows_written: usize,
    pub failures: Vec<ItemFailure>,
}

impl PassReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Correlates detection sidecars with source frames under a prefix and
/// writes aggregated statistics rows.
///
/// Assumes exclusive access to the prefix for the duration of a pass; all
/// writes are overwrites, so re-running a pass over an unchanged prefix
/// produces identical rows.
pub struct Reconciler {
    store: ObjectStore,
    sink: Arc<dyn StatSink>,
}

impl Reconciler {
    pub fn new(store: ObjectStore, sink: Arc<dyn StatSink>) -> Self {
        Self { store, sink }
    }

    /// Run one pass over `prefix`.
    ///
    /// Items are isolated: a malformed filename, unreadable object or bad
    /// sidecar fails that unique_id only and the pass continues.
    pub async fn run(&self, prefix: &str) -> Result<PassReport> {
        let listing = self.store.list(prefix).await?;
        let records = group_by_stem(&listing);
        info!(prefix = %prefix, images = records.len(), "starting reconciliation pass");

        let mut report = PassReport::default();

        for record in records {
            match self.process_record(&record).await {
                Ok(rows) => {
                    report.images_processed += 1;
                    report.rows_written += rows;
                }
                Err(e) => {
                    warn!(unique_id = %record.unique_id, error = %e, "image record failed");
                    report.failures.push(ItemFailure {
                        unique_id: record.unique_id,
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            images = report.images_processed,
            rows = report.rows_written,
            failed = report.failures.len(),
            "reconciliation pass finished"
        );
        Ok(report)
    }

    /// Returns the number of rows written for this record.
    async fn process_record(&self, record: &ImageRecord) -> Result<usize> {
        let timestamp = keys::timestamp_key(&record.unique_id)?;
        let mut rows = 0;

        if let Some(json_key) = &record.json_key {
            let body = self.store.read(json_key).await?;
            let detections = parse_detections(&body)?;

            for stats in aggregate_by_category(&detections) {
                self.sink.put(&StatRow::detection(&timestamp, &stats)).await?;
                rows += 1;
            }
        }

        if let Some(jpeg_key) = &record.jpeg_key {
            let bytes = self.store.read(jpeg_key).await?;
            let brightness = mean_brightness(&bytes)?;
            self.sink
                .put(&StatRow::whole_image(&timestamp, brightness))
                .await?;
            rows += 1;
        }

        Ok(rows)
    }
}
