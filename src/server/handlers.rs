use super::{AppState, error::ApiError};
use crate::core::{InferenceEngine, UPLOAD_FIELD_NAME};
use crate::domain::PredictionResult;
use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartRejection},
};
use serde_json::{Value, json};

/// `POST /predict`: classifies the file uploaded under the `file` field.
pub async fn predict<E: InferenceEngine + 'static>(
    State(state): State<AppState<E>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<PredictionResult>, ApiError> {
    let mut multipart = multipart?;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD_NAME) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        if file_name.is_empty() {
            return Err(ApiError::EmptyFilename);
        }

        let data = field.bytes().await?;
        tracing::debug!(file_name = %file_name, bytes = data.len(), "received upload");

        let result = state.pipeline.predict(&file_name, data).await?;
        return Ok(Json(result));
    }

    Err(ApiError::MissingFile)
}

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
