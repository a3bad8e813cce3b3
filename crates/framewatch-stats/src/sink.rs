//! Statistics store adapters
//!
//! Every write is an independent overwrite keyed by (timestamp, category),
//! which is what makes reconciliation passes idempotent. Numeric aggregates
//! arrive as `Decimal` strings; sending that string verbatim is part of the
//! adapter contract, because the DynamoDB number type is itself a decimal
//! string and must not pass through a binary float on the way in.

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use framewatch_core::{PipelineError, Result, StatRow};
use parking_lot::Mutex;
use std::collections::BTreeMap;

/// Statistics store seam.
#[async_trait]
pub trait StatSink: Send + Sync {
    async fn put(&self, row: &StatRow) -> Result<()>;
}

/// In-memory sink, keyed like the real table.
#[derive(Debug, Default)]
pub struct MemoryStatSink {
    rows: Mutex<BTreeMap<(String, String), StatRow>>,
}

impl MemoryStatSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all rows, the read path the dashboard consumer exercises
    /// in tests.
    pub fn rows(&self) -> Vec<StatRow> {
        self.rows.lock().values().cloned().collect()
    }

    pub fn get(&self, timestamp: &str, category: &str) -> Option<StatRow> {
        self.rows
            .lock()
            .get(&(timestamp.to_string(), category.to_string()))
            .cloned()
    }
}

#[async_trait]
impl StatSink for MemoryStatSink {
    async fn put(&self, row: &StatRow) -> Result<()> {
        self.rows
            .lock()
            .insert((row.id.clone(), row.category_name.clone()), row.clone());
        Ok(())
    }
}

/// Sink writing one JSON object per row into the object store.
///
/// Lets the whole pipeline run against fs storage without any table service;
/// rows land at `<prefix>/<timestamp>/<category>.json`.
#[derive(Debug, Clone)]
pub struct ObjectStatSink {
    op: opendal::Operator,
    prefix: String,
}

impl ObjectStatSink {
    pub fn new(op: opendal::Operator, prefix: impl Into<String>) -> Self {
        Self {
            op,
            prefix: prefix.into(),
        }
    }

    fn row_key(&self, row: &StatRow) -> String {
        format!(
            "{}/{}/{}.json",
            self.prefix.trim_matches('/'),
            row.id,
            row.category_name
        )
    }
}

#[async_trait]
impl StatSink for ObjectStatSink {
    async fn put(&self, row: &StatRow) -> Result<()> {
        let key = self.row_key(row);
        let body = serde_json::to_vec(row).map_err(|e| PipelineError::parse("stat row", e))?;
        self.op
            .write(&key, body)
            .await
            .map_err(|e| PipelineError::storage(format!("write '{}': {}", key, e)))?;
        Ok(())
    }
}

/// DynamoDB-backed sink.
#[derive(Debug, Clone)]
pub struct DynamoStatSink {
    client: aws_sdk_dynamodb::Client,
    table: String,
}

impl DynamoStatSink {
    pub fn new(client: aws_sdk_dynamodb::Client, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }
}

#[async_trait]
impl StatSink for DynamoStatSink {
    async fn put(&self, row: &StatRow) -> Result<()> {
        let mut request = self
            .client
            .put_item()
            .table_name(&self.table)
            .item("id", AttributeValue::S(row.id.clone()))
            .item(
                "category_name",
                AttributeValue::S(row.category_name.clone()),
            );

        if let Some(count) = row.count {
            request = request.item("count", AttributeValue::N(count.to_string()));
        }
        if let Some(area) = &row.mean_area {
            request = request.item("mean_area", AttributeValue::N(area.as_str().to_string()));
        }
        if let Some(score) = &row.mean_score {
            request = request.item("mean_score", AttributeValue::N(score.as_str().to_string()));
        }
        if let Some(brightness) = &row.mean_brightness {
            request = request.item(
                "mean_brightness",
                AttributeValue::N(brightness.as_str().to_string()),
            );
        }

        request
            .send()
            .await
            .map_err(|e| PipelineError::dependency(format!("stats put_item: {}", e)))?;

        tracing::info!(
            table = %self.table,
            id = %row.id,
            category = %row.category_name,
            "wrote statistics row"
        );
        Ok(())
    }
}
