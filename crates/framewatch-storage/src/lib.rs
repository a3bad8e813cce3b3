// framewatch-storage - object store access
//
// Wraps an OpenDAL operator with the pipeline's access patterns: prefix
// listing, per-image grouping, reads/writes and the copy-then-delete
// housekeeping sweep.

mod migrate;
mod operator;
mod scan;
mod store;

pub use migrate::{bulk_move, MoveReport};
pub use operator::build_operator;
pub use scan::{group_by_stem, ImageRecord};
pub use store::ObjectStore;
