//! Operational HTTP endpoints.

use axum::{http::StatusCode, response::IntoResponse};

/// Liveness only; does not touch the metadata provider.
pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
