//! Logging and trace export.
//!
//! Start-up runs under a scoped fmt subscriber (`bootstrap_dispatch`) because
//! the global subscriber can only be installed once, and the OTLP resource
//! needs the VM attributes that start-up fetches. `init` then installs the
//! global subscriber: env filter, fmt output, and an OpenTelemetry layer
//! exporting spans over OTLP/HTTP.

pub mod resource;

use std::collections::HashMap;

use opentelemetry::{global, trace::TracerProvider as _};
use opentelemetry_otlp::{Protocol, SpanExporter, WithExportConfig, WithHttpConfig};
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing::Dispatch;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use azvm_core::error::{AzvmError, Result};
use azvm_core::metadata::AttributeSet;

use crate::config::TelemetrySection;

pub use resource::{resource, startup_attributes};

/// Header carrying the collector API key.
pub const API_KEY_HEADER: &str = "x-bkpt-key";

/// Plain fmt subscriber for the start-up phase.
pub fn bootstrap_dispatch() -> Dispatch {
    Dispatch::new(fmt().with_env_filter(EnvFilter::from_default_env()).finish())
}

/// Flushes and shuts the tracer provider down when dropped.
///
/// Drop it off the async runtime (`spawn_blocking`): shutdown waits on the
/// batch exporter thread.
pub struct TelemetryGuard {
    provider: SdkTracerProvider,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Err(e) = self.provider.shutdown() {
            tracing::warn!(error = %e, "tracer provider shutdown failed");
        }
    }
}

/// Install the global subscriber. `vm` becomes resource attributes on every
/// exported span.
pub fn init(cfg: &TelemetrySection, vm: Option<&AttributeSet>) -> Result<TelemetryGuard> {
    let endpoint = cfg
        .endpoint
        .clone()
        .ok_or_else(|| AzvmError::BadConfig("telemetry.endpoint is required".into()))?;

    let mut headers = HashMap::new();
    if let Some(key) = &cfg.api_key {
        headers.insert(API_KEY_HEADER.to_string(), key.clone());
    }

    let exporter = SpanExporter::builder()
        .with_http()
        .with_protocol(Protocol::HttpBinary)
        .with_endpoint(endpoint)
        .with_headers(headers)
        .build()
        .map_err(|e| AzvmError::Telemetry(format!("otlp exporter: {e}")))?;

    let provider = SdkTracerProvider::builder()
        .with_resource(resource(&cfg.service_name, vm))
        .with_batch_exporter(exporter)
        .build();

    let tracer = provider.tracer(cfg.service_name.clone());
    global::set_tracer_provider(provider.clone());

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .with(tracing_opentelemetry::layer().with_tracer(tracer))
        .try_init()
        .map_err(|e| AzvmError::Telemetry(format!("subscriber init: {e}")))?;

    Ok(TelemetryGuard { provider })
}
