use std::collections::{BTreeSet, HashMap};

use serde_json::Value;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Row, Sqlite};

use async_trait::async_trait;
use expscope_core::{ResultsTable, CONFIG_PREFIX, RESULT_PREFIX};

use crate::backend::ResultsBackend;
use crate::{Error, Result};

/// SQLite backend over the benchmarking framework's result schema:
/// `experiments`, `trials`, `config_params` (one row per tunable per
/// configuration) and `trial_results` (one row per metric per trial).
/// `load_results` pivots the long param/metric tables into the wide
/// per-trial view the analysis layer consumes.
#[derive(Debug, Clone)]
pub struct SqliteBackend {
    pool: Pool<Sqlite>,
}

impl SqliteBackend {
    /// Open the database. Accepts a bare file path or a full
    /// `sqlite:` URL. The database must already exist; this service
    /// never creates or migrates the framework's storage.
    pub async fn connect(connection: &str) -> Result<Self> {
        let url = if connection.starts_with("sqlite:") {
            connection.to_string()
        } else {
            format!("sqlite:{}", connection)
        };

        // SQLite in-memory databases are per-connection, so the pool
        // must not fan out.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(&url)
            .await
            .map_err(|e| Error::Connection(format!("{}: {}", url, e)))?;

        Ok(Self { pool })
    }

    /// Underlying pool, for fixtures and integration tests.
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Create the result schema on an empty database. Used by tests
    /// and local tooling; production databases are written by the
    /// benchmarking framework itself.
    pub async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS experiments (
                exp_id TEXT PRIMARY KEY,
                description TEXT NOT NULL DEFAULT ''
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS trials (
                exp_id TEXT NOT NULL,
                trial_id INTEGER NOT NULL,
                config_id INTEGER NOT NULL,
                status TEXT NOT NULL,
                ts_start TEXT,
                ts_end TEXT,
                PRIMARY KEY (exp_id, trial_id),
                FOREIGN KEY (exp_id) REFERENCES experiments(exp_id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS config_params (
                config_id INTEGER NOT NULL,
                param_id TEXT NOT NULL,
                param_value TEXT,
                PRIMARY KEY (config_id, param_id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS trial_results (
                exp_id TEXT NOT NULL,
                trial_id INTEGER NOT NULL,
                metric_id TEXT NOT NULL,
                metric_value TEXT,
                PRIMARY KEY (exp_id, trial_id, metric_id),
                FOREIGN KEY (exp_id, trial_id) REFERENCES trials(exp_id, trial_id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl ResultsBackend for SqliteBackend {
    async fn experiment_ids(&self) -> Result<Vec<String>> {
        let rows = sqlx::query("SELECT exp_id FROM experiments ORDER BY exp_id")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(|r| r.get::<String, _>("exp_id")).collect())
    }

    async fn experiment_exists(&self, experiment_id: &str) -> Result<bool> {
        let row = sqlx::query("SELECT 1 FROM experiments WHERE exp_id = ?")
            .bind(experiment_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.is_some())
    }

    async fn load_results(&self, experiment_id: &str) -> Result<ResultsTable> {
        let trials = sqlx::query(
            r#"
            SELECT trial_id, config_id, status, ts_start, ts_end
            FROM trials
            WHERE exp_id = ?
            ORDER BY trial_id
            "#,
        )
        .bind(experiment_id)
        .fetch_all(&self.pool)
        .await?;

        let params = sqlx::query(
            r#"
            SELECT t.trial_id AS trial_id, p.param_id AS param_id, p.param_value AS param_value
            FROM trials t
            JOIN config_params p ON p.config_id = t.config_id
            WHERE t.exp_id = ?
            "#,
        )
        .bind(experiment_id)
        .fetch_all(&self.pool)
        .await?;

        let metrics = sqlx::query(
            r#"
            SELECT trial_id, metric_id, metric_value
            FROM trial_results
            WHERE exp_id = ?
            "#,
        )
        .bind(experiment_id)
        .fetch_all(&self.pool)
        .await?;

        let mut param_ids: BTreeSet<String> = BTreeSet::new();
        let mut param_values: HashMap<(i64, String), Value> = HashMap::new();
        for row in &params {
            let trial_id: i64 = row.get("trial_id");
            let param_id: String = row.get("param_id");
            let value: Option<String> = row.get("param_value");
            param_ids.insert(param_id.clone());
            param_values.insert((trial_id, param_id), coerce_scalar(value));
        }

        let mut metric_ids: BTreeSet<String> = BTreeSet::new();
        let mut metric_values: HashMap<(i64, String), Value> = HashMap::new();
        for row in &metrics {
            let trial_id: i64 = row.get("trial_id");
            let metric_id: String = row.get("metric_id");
            let value: Option<String> = row.get("metric_value");
            metric_ids.insert(metric_id.clone());
            metric_values.insert((trial_id, metric_id), coerce_scalar(value));
        }

        let mut columns: Vec<String> = vec![
            expscope_core::TRIAL_ID_COL.to_string(),
            expscope_core::CONFIG_ID_COL.to_string(),
            expscope_core::STATUS_COL.to_string(),
            "ts_start".to_string(),
            "ts_end".to_string(),
        ];
        columns.extend(param_ids.iter().map(|p| format!("{}{}", CONFIG_PREFIX, p)));
        columns.extend(metric_ids.iter().map(|m| format!("{}{}", RESULT_PREFIX, m)));

        let mut table = ResultsTable::new(columns);
        for row in &trials {
            let trial_id: i64 = row.get("trial_id");
            let config_id: i64 = row.get("config_id");
            let status: String = row.get("status");
            let ts_start: Option<String> = row.get("ts_start");
            let ts_end: Option<String> = row.get("ts_end");

            let mut cells: Vec<Value> = vec![
                Value::from(trial_id),
                Value::from(config_id),
                Value::from(status),
                ts_start.map(Value::from).unwrap_or(Value::Null),
                ts_end.map(Value::from).unwrap_or(Value::Null),
            ];
            for param_id in &param_ids {
                cells.push(
                    param_values
                        .get(&(trial_id, param_id.clone()))
                        .cloned()
                        .unwrap_or(Value::Null),
                );
            }
            for metric_id in &metric_ids {
                cells.push(
                    metric_values
                        .get(&(trial_id, metric_id.clone()))
                        .cloned()
                        .unwrap_or(Value::Null),
                );
            }
            table.push_row(cells)?;
        }

        Ok(table)
    }
}

/// Backend values are stored as text; surface them as JSON numbers
/// where they parse so the analysis layer sees typed columns.
fn coerce_scalar(raw: Option<String>) -> Value {
    let s = match raw {
        Some(s) => s,
        None => return Value::Null,
    };
    if let Ok(i) = s.trim().parse::<i64>() {
        return Value::from(i);
    }
    if let Ok(f) = s.trim().parse::<f64>() {
        if f.is_finite() {
            if let Some(n) = serde_json::Number::from_f64(f) {
                return Value::Number(n);
            }
        }
    }
    Value::from(s)
}
