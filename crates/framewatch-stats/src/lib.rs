// framewatch-stats - statistics store adapters and the result reconciler
//
// A reconciliation pass pairs detection sidecars with their source frames,
// aggregates per-category statistics plus whole-image brightness, and puts
// one row per (timestamp, category) to the configured sink.

mod reconcile;
mod sink;

pub use reconcile::{ItemFailure, PassReport, Reconciler};
pub use sink::{DynamoStatSink, MemoryStatSink, ObjectStatSink, StatSink};
