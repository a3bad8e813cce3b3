// framewatch-batch - batch accumulation and inference hand-off
//
// One notification per uploaded frame; keys accumulate in a single pending
// batch record until the configured size is reached, at which point the
// batch manifest is dispatched to the inference trigger and the record is
// reset.

mod accumulator;
mod store;
mod trigger;

pub use accumulator::{BatchAccumulator, IngestSummary};
pub use store::{BatchStore, DynamoBatchStore, MemoryBatchStore, PENDING_BATCH_ID};
pub use trigger::{InferenceTrigger, LambdaTrigger, RecordingTrigger};
