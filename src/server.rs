mod snapshot;
mod source;

pub use snapshot::{NextLayer, ServerSnapshot, SnapshotFile};
pub use source::{FileSnapshotSource, SharedSnapshot, SnapshotSource};
