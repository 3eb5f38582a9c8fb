//! azvm server
//!
//! - `GET /` : cached Azure VM attributes (region, size, OS, priority)
//! - Startup: fetch attributes once, tag the OTLP resource with them, then
//!   bind the listener

use std::process::ExitCode;

use tokio::net::TcpListener;
use tracing::{instrument::WithSubscriber, Dispatch};

use azvm_core::error::{AzvmError, Result};
use azvm_server::{app_state::AppState, config, router, telemetry};

#[tokio::main]
async fn main() -> ExitCode {
    let bootstrap = telemetry::bootstrap_dispatch();

    match run(bootstrap.clone()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::dispatcher::with_default(&bootstrap, || {
                tracing::error!(error = %e, code = e.client_code().as_str(), "azvm-server failed");
            });
            ExitCode::FAILURE
        }
    }
}

async fn run(bootstrap: Dispatch) -> Result<()> {
    let (state, vm) = async {
        let path = std::env::var(config::CONFIG_PATH_ENV)
            .unwrap_or_else(|_| config::DEFAULT_CONFIG_PATH.to_string());
        let cfg = config::load_from_file(&path)?;

        let state = AppState::new(cfg)?;
        let vm = telemetry::startup_attributes(&state.metadata()).await;
        Ok::<_, AzvmError>((state, vm))
    }
    .with_subscriber(bootstrap)
    .await?;

    let guard = telemetry::init(&state.cfg().telemetry, vm.as_deref())?;

    let listen = state.cfg().server.listen_addr()?;
    let app = router::build_router(state);

    tracing::info!(%listen, "azvm-server starting");
    let listener = TcpListener::bind(listen)
        .await
        .map_err(|e| AzvmError::Internal(format!("bind {listen} failed: {e}")))?;

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AzvmError::Internal(format!("server failed: {e}")));
    tracing::info!("azvm-server stopped");

    tokio::task::spawn_blocking(move || drop(guard))
        .await
        .map_err(|e| AzvmError::Internal(format!("telemetry shutdown: {e}")))?;

    served
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "ctrl-c handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
