//! Transform endpoints (read path).
//!
//! `/show`, `/get` and `/redirect` run the same validation and resolution
//! pipeline and differ only in how the resolved record is projected into a
//! response. Failures project identically in every variant.

use crate::error::ApiError;
use crate::pipeline;
use crate::state::AppState;
use axum::Json;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header::LOCATION};
use axum::response::{IntoResponse, Response};
use darkroom_core::params::RawParams;
use darkroom_core::transform_key;
use serde_json::json;
use tracing::warn;

/// How a resolved record is shaped into a response.
#[derive(Clone, Copy, Debug)]
enum Projection {
    /// Only the object URL, for direct use in `<img>` tags.
    UrlOnly,
    /// Filename, object path and URL.
    Metadata,
    /// `302 Found` to the object URL, no body.
    Redirect,
}

/// GET /show - resolve the transform and return the object URL.
pub async fn show(State(state): State<AppState>, Query(raw): Query<RawParams>) -> Response {
    handle(state, raw, Projection::UrlOnly).await
}

/// GET /get - resolve the transform and return full object metadata.
pub async fn get_metadata(State(state): State<AppState>, Query(raw): Query<RawParams>) -> Response {
    handle(state, raw, Projection::Metadata).await
}

/// GET /redirect - resolve the transform and redirect to the object URL.
pub async fn redirect(State(state): State<AppState>, Query(raw): Query<RawParams>) -> Response {
    handle(state, raw, Projection::Redirect).await
}

async fn handle(state: AppState, raw: RawParams, projection: Projection) -> Response {
    // Validation failures are expected, user-facing conditions: the full
    // accumulated list goes in-band, not into a status code.
    let params = match raw.validate() {
        Ok(params) => params,
        Err(errors) => return Json(json!({ "errors": errors })).into_response(),
    };

    let key = transform_key(&params);

    match pipeline::resolve(&state, &key, &params).await {
        Ok(record) => match projection {
            Projection::UrlOnly => Json(json!({ "url": record.url })).into_response(),
            Projection::Metadata => Json(json!({
                "filename": record.filename,
                "path": record.path,
                "url": record.url,
            }))
            .into_response(),
            // Plain 302; axum's typed redirect helpers emit 303/307/308.
            Projection::Redirect => {
                (StatusCode::FOUND, [(LOCATION, record.url)]).into_response()
            }
        },
        Err(err @ ApiError::SourceNotFound(_)) => {
            Json(json!({ "errors": [err.to_string()] })).into_response()
        }
        Err(err) => {
            warn!(error = %err, key = %key, "transform request failed");
            err.into_response()
        }
    }
}
