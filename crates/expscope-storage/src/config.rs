use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Supported storage backend kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Sqlite,
}

/// Descriptor selecting a results backend and its connection target.
///
/// Loaded from a JSON file such as:
/// ```json
/// { "backend": "sqlite", "connection": "data/experiments.db" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub backend: BackendKind,
    pub connection: String,
}

impl StorageConfig {
    /// Load the descriptor from a file, with `EXPSCOPE_*` environment
    /// variables overriding individual fields.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(config::Environment::with_prefix("EXPSCOPE"))
            .build()
            .map_err(|e| Error::Config(e.to_string()))?;

        settings
            .try_deserialize()
            .map_err(|e| Error::Config(e.to_string()))
    }

    pub fn sqlite(connection: impl Into<String>) -> Self {
        Self {
            backend: BackendKind::Sqlite,
            connection: connection.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_sqlite_descriptor_from_file() {
        let path = std::env::temp_dir().join("expscope-storage-config-test.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"{{ "backend": "sqlite", "connection": "data/experiments.db" }}"#
        )
        .unwrap();

        let cfg = StorageConfig::from_file(&path).unwrap();
        assert_eq!(cfg.backend, BackendKind::Sqlite);
        assert_eq!(cfg.connection, "data/experiments.db");

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = StorageConfig::from_file("/nonexistent/expscope.json").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn unknown_backend_kind_is_rejected() {
        let path = std::env::temp_dir().join("expscope-storage-config-bad.json");
        std::fs::write(
            &path,
            r#"{ "backend": "mongodb", "connection": "mongodb://x" }"#,
        )
        .unwrap();

        assert!(matches!(
            StorageConfig::from_file(&path),
            Err(Error::Config(_))
        ));

        std::fs::remove_file(&path).ok();
    }
}
