// framewatch-core - domain types and pure logic
//
// Everything here is backend-agnostic: key conventions, detection
// aggregation, brightness math, payload schemas and the shared error
// taxonomy. Storage and service adapters live in the sibling crates.

pub mod brightness;
pub mod detection;
pub mod error;
pub mod keys;
pub mod payload;
pub mod stats;

pub use brightness::mean_brightness;
pub use detection::{
    aggregate_by_category, is_allowed_category, parse_detections, CategoryStats, Detection,
    ALLOWED_CATEGORIES,
};
pub use error::{PipelineError, Result};
pub use keys::{frame_key, stem, timestamp_key};
pub use payload::{QueueEvent, QueueRecord, StorageEvent, TriggerPayload};
pub use stats::{Decimal, StatRow, WHOLE_IMAGE_CATEGORY};
