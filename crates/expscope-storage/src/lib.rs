pub mod backend;
pub mod config;
pub mod error;
pub mod sqlite;
pub mod storage;

// Re-exports
pub use backend::{connect_backend, ResultsBackend};
pub use config::{BackendKind, StorageConfig};
pub use error::{Error, Result};
pub use sqlite::SqliteBackend;
pub use storage::{ExperimentHandle, Storage};
