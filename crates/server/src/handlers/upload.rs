//! Source ingestion endpoint.

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::Json;
use axum::body::Bytes;
use axum::extract::{Query, State};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    /// Destination path on source storage.
    pub path: String,
}

/// POST /upload - ingest an original image into source storage.
///
/// Mounted only when `options.enable_upload` is set. This is the alternate
/// entry to the source-ingestion boundary; the transform pipeline itself
/// never writes to source storage.
pub async fn upload(
    State(state): State<AppState>,
    Query(query): Query<UploadQuery>,
    body: Bytes,
) -> ApiResult<Json<Value>> {
    if query.path.is_empty() {
        return Err(ApiError::BadRequest(
            "you must specify the 'path' to upload to".to_string(),
        ));
    }
    if body.is_empty() {
        return Err(ApiError::BadRequest("empty upload body".to_string()));
    }

    state.source_storage.put(&query.path, body).await?;
    info!(path = %query.path, "original ingested");

    Ok(Json(json!({ "path": query.path })))
}
