//! Axum router wiring.
//!
//! - `/`        : VM attribute set (JSON)
//! - `/healthz` : liveness

use axum::{routing::get, Router};

use crate::{api, app_state::AppState, ops};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(api::get_metadata))
        .route("/healthz", get(ops::healthz))
        .with_state(state)
}
