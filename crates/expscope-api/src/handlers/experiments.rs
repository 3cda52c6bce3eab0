use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::state::ApiState;
use expscope_storage::Error as StorageError;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn internal_error(e: impl std::fmt::Display) -> ApiError {
    tracing::error!("storage error: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
}

/// List all experiment ids known to the configured backend.
pub async fn list_experiments(
    State(state): State<ApiState>,
) -> Result<Json<Vec<String>>, ApiError> {
    match state.storage.experiment_ids().await {
        Ok(ids) => Ok(Json(ids)),
        Err(e) => Err(internal_error(e)),
    }
}

/// Fetch one experiment's results as row-records, one JSON object per
/// trial. Unknown ids map to 404.
pub async fn get_experiment_results(
    State(state): State<ApiState>,
    Path(experiment_id): Path<String>,
) -> Result<Json<Vec<Map<String, Value>>>, ApiError> {
    let handle = match state.storage.experiment(&experiment_id).await {
        Ok(handle) => handle,
        Err(StorageError::ExperimentNotFound(id)) => {
            return Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("Experiment not found: {}", id),
                }),
            ))
        }
        Err(e) => return Err(internal_error(e)),
    };

    match handle.results().await {
        Ok(table) => Ok(Json(table.records())),
        Err(e) => Err(internal_error(e)),
    }
}
