//! Wire payload schemas
//!
//! The ingestion side receives a queue-of-storage-events envelope: each queue
//! record's `body` is itself a JSON storage event whose first record names
//! the created object. The inference trigger receives a flat batch manifest.

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// Queue envelope delivered to the ingestion function.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueEvent {
    #[serde(rename = "Records", default)]
    pub records: Vec<QueueRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueRecord {
    pub body: String,
}

/// Storage object-created event carried inside a queue record body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageEvent {
    #[serde(rename = "Records", default)]
    pub records: Vec<StorageEventRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageEventRecord {
    pub s3: S3Entity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Entity {
    pub object: ObjectEntity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectEntity {
    pub key: String,
}

impl StorageEvent {
    /// Parse a queue record body into a storage event.
    pub fn from_body(body: &str) -> Result<Self> {
        serde_json::from_str(body).map_err(|e| PipelineError::parse("storage event", e))
    }

    /// Object key of the first (and, per delivery contract, only) record.
    pub fn object_key(&self) -> Result<&str> {
        self.records
            .first()
            .map(|record| record.s3.object.key.as_str())
            .ok_or_else(|| PipelineError::parse("storage event", "no records in event"))
    }
}

/// Manifest handed to the inference trigger when a batch is full.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerPayload {
    pub batch: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_storage_event_body() {
        let body = r#"{"Records":[{"s3":{"object":{"key":"image_2024-01-02_03:04:05.jpg"}}}]}"#;
        let event = StorageEvent::from_body(body).unwrap();
        assert_eq!(
            event.object_key().unwrap(),
            "image_2024-01-02_03:04:05.jpg"
        );
    }

    #[test]
    fn empty_storage_event_is_a_parse_error() {
        let event = StorageEvent::from_body(r#"{"Records":[]}"#).unwrap();
        assert!(matches!(
            event.object_key().unwrap_err(),
            PipelineError::Parse { .. }
        ));
    }

    #[test]
    fn malformed_body_is_a_parse_error() {
        let err = StorageEvent::from_body("not json").unwrap_err();
        assert!(matches!(err, PipelineError::Parse { .. }));
    }

    #[test]
    fn queue_envelope_round_trips() {
        let raw = r#"{"Records":[{"body":"{}"},{"body":"{}"}]}"#;
        let event: QueueEvent = serde_json::from_str(raw).unwrap();
        assert_eq!(event.records.len(), 2);
    }

    #[test]
    fn trigger_payload_serializes_batch_field() {
        let payload = TriggerPayload {
            batch: vec!["a.jpg".to_string(), "b.jpg".to_string()],
        };
        let json = serde_json::to_string(&payload).unwrap();
        assert_eq!(json, r#"{"batch":["a.jpg","b.jpg"]}"#);
    }
}
