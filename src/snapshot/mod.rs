pub mod storage;

pub use storage::{get_snapshot_path, FileSnapshotStore, MemorySnapshotStore, SnapshotStore};
