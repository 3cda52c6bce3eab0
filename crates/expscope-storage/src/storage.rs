use std::sync::Arc;

use expscope_core::ResultsTable;

use crate::backend::{connect_backend, ResultsBackend};
use crate::config::StorageConfig;
use crate::{Error, Result};

/// Registry of experiments behind one configured backend. Built once
/// at startup and passed to consumers; read-only thereafter.
#[derive(Clone)]
pub struct Storage {
    backend: Arc<dyn ResultsBackend>,
}

impl Storage {
    /// Resolve a configuration descriptor to a live backend. Any
    /// failure here is a startup error for the binaries.
    pub async fn connect(config: &StorageConfig) -> Result<Self> {
        let backend = connect_backend(config).await?;
        tracing::info!("Connected to {:?} results backend", config.backend);
        Ok(Self { backend })
    }

    /// Build a registry over an already-constructed backend.
    pub fn with_backend(backend: Arc<dyn ResultsBackend>) -> Self {
        Self { backend }
    }

    pub async fn experiment_ids(&self) -> Result<Vec<String>> {
        self.backend.experiment_ids().await
    }

    /// Handle for one experiment, or `ExperimentNotFound`.
    pub async fn experiment(&self, experiment_id: &str) -> Result<ExperimentHandle> {
        if !self.backend.experiment_exists(experiment_id).await? {
            return Err(Error::ExperimentNotFound(experiment_id.to_string()));
        }
        Ok(ExperimentHandle {
            experiment_id: experiment_id.to_string(),
            backend: Arc::clone(&self.backend),
        })
    }
}

/// Handle on one experiment's results.
#[derive(Clone)]
pub struct ExperimentHandle {
    experiment_id: String,
    backend: Arc<dyn ResultsBackend>,
}

// `dyn ResultsBackend` carries no `Debug` bound, so the backend is
// elided from the output.
impl std::fmt::Debug for ExperimentHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExperimentHandle")
            .field("experiment_id", &self.experiment_id)
            .finish_non_exhaustive()
    }
}

impl ExperimentHandle {
    pub fn experiment_id(&self) -> &str {
        &self.experiment_id
    }

    /// Materialize the results table. Each call runs a fresh backend
    /// query; trials recorded since the previous call are included.
    pub async fn results(&self) -> Result<ResultsTable> {
        self.backend.load_results(&self.experiment_id).await
    }
}
