use std::sync::Arc;

use async_trait::async_trait;
use expscope_core::ResultsTable;

use crate::config::{BackendKind, StorageConfig};
use crate::sqlite::SqliteBackend;
use crate::Result;

/// A results backend supplies, per experiment id, a tabular result
/// set with stable column names across rows. The explorer never
/// writes through this trait.
#[async_trait]
pub trait ResultsBackend: Send + Sync {
    /// Ids of every experiment the backend knows about.
    async fn experiment_ids(&self) -> Result<Vec<String>>;

    /// Whether an experiment id exists.
    async fn experiment_exists(&self, experiment_id: &str) -> Result<bool>;

    /// Full results table for one experiment, one row per trial.
    async fn load_results(&self, experiment_id: &str) -> Result<ResultsTable>;
}

/// Resolve a configuration descriptor to a concrete backend.
pub async fn connect_backend(config: &StorageConfig) -> Result<Arc<dyn ResultsBackend>> {
    match config.backend {
        BackendKind::Sqlite => {
            let backend = SqliteBackend::connect(&config.connection).await?;
            Ok(Arc::new(backend))
        }
    }
}
