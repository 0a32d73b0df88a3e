#![forbid(unsafe_code)]

pub mod pool;
pub mod repository;
pub mod sqlite;

pub use pool::{
    ArtifactRecord, JsonFilePoolLoader, PoolLoadError, PoolLoader, StaticPoolLoader, parse_pool,
};
pub use repository::{
    InMemoryRepository, SessionSummaryRepository, SessionSummaryRow, SnapshotRecord,
    SnapshotRepository, Storage, StorageError,
};
