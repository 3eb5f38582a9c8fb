//! `GET /` handler.
//!
//! Success is the bare attribute set as a JSON object. Any refresh failure is
//! a 502 with a stable error code; the server itself keeps running.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use azvm_core::error::ServiceError;

use crate::app_state::AppState;

#[tracing::instrument(name = "metadata.get", skip_all)]
pub async fn get_metadata(State(state): State<AppState>) -> Response {
    match state.metadata().attributes().await {
        Ok(attrs) => Json(attrs.as_ref()).into_response(),
        Err(err) => ApiError(err).into_response(),
    }
}

/// Failure response wrapper.
pub struct ApiError(pub ServiceError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::warn!(error = %self.0, "metadata request failed");
        let body = json!({
            "error": {
                "code": self.0.client_code().as_str(),
                "message": self.0.to_string(),
            }
        });
        (StatusCode::BAD_GATEWAY, Json(body)).into_response()
    }
}
