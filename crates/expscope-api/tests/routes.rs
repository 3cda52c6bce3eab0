use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::json;

use expscope_api::handlers::experiments::{get_experiment_results, list_experiments};
use expscope_api::ApiState;
use expscope_storage::{SqliteBackend, Storage};

async fn seeded_state() -> ApiState {
    let backend = SqliteBackend::connect("sqlite::memory:").await.unwrap();
    backend.init_schema().await.unwrap();
    let pool = backend.pool();

    for exp_id in ["exp-a", "exp-b"] {
        sqlx::query("INSERT INTO experiments (exp_id, description) VALUES (?, '')")
            .bind(exp_id)
            .execute(pool)
            .await
            .unwrap();
    }
    for (trial_id, status, latency) in [(1i64, "SUCCEEDED", "10.5"), (2, "FAILED", "12.0")] {
        sqlx::query(
            "INSERT INTO trials (exp_id, trial_id, config_id, status) \
             VALUES ('exp-a', ?, 1, ?)",
        )
        .bind(trial_id)
        .bind(status)
        .execute(pool)
        .await
        .unwrap();
        sqlx::query(
            "INSERT INTO trial_results (exp_id, trial_id, metric_id, metric_value) \
             VALUES ('exp-a', ?, 'latency_ms', ?)",
        )
        .bind(trial_id)
        .bind(latency)
        .execute(pool)
        .await
        .unwrap();
    }

    ApiState {
        storage: Arc::new(Storage::with_backend(Arc::new(backend))),
    }
}

#[tokio::test]
async fn list_route_returns_all_ids() {
    let state = seeded_state().await;
    let ids = list_experiments(State(state)).await.unwrap().0;

    let mut ids = ids;
    ids.sort();
    assert_eq!(ids, vec!["exp-a", "exp-b"]);
}

#[tokio::test]
async fn results_route_returns_one_record_per_trial() {
    let state = seeded_state().await;
    let records = get_experiment_results(State(state), Path("exp-a".to_string()))
        .await
        .unwrap()
        .0;

    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["trial_id"], json!(1));
    assert_eq!(records[0]["result.latency_ms"], json!(10.5));
    assert_eq!(records[1]["status"], json!("FAILED"));
}

#[tokio::test]
async fn unknown_experiment_is_404() {
    let state = seeded_state().await;
    let (status, body) = get_experiment_results(State(state.clone()), Path("nope".to_string()))
        .await
        .unwrap_err();

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.0.error.contains("nope"));

    // The registry is untouched by the failed lookup.
    let ids = list_experiments(State(state)).await.unwrap().0;
    assert_eq!(ids.len(), 2);
}
