use std::net::SocketAddr;
use std::time::Duration;

use serde::Deserialize;
use url::Url;
use azvm_core::error::{AzvmError, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub metadata: MetadataSection,

    #[serde(default)]
    pub telemetry: TelemetrySection,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            version: 1,
            server: ServerSection::default(),
            metadata: MetadataSection::default(),
            telemetry: TelemetrySection::default(),
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(AzvmError::UnsupportedVersion);
        }

        self.server.validate()?;
        self.metadata.validate()?;
        self.telemetry.validate()?;

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self { listen: default_listen() }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            AzvmError::BadConfig(format!("server.listen must be a valid SocketAddr: {e}"))
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetadataSection {
    #[serde(default = "default_metadata_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_api_version")]
    pub api_version: String,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    /// Serve the last good set when a refresh fails.
    #[serde(default)]
    pub stale_on_error: bool,
}

impl Default for MetadataSection {
    fn default() -> Self {
        Self {
            endpoint: default_metadata_endpoint(),
            api_version: default_api_version(),
            timeout_ms: default_timeout_ms(),
            ttl_secs: default_ttl_secs(),
            stale_on_error: false,
        }
    }
}

impl MetadataSection {
    pub fn validate(&self) -> Result<()> {
        parse_http_url("metadata.endpoint", &self.endpoint)?;
        if self.api_version.trim().is_empty() {
            return Err(AzvmError::BadConfig("metadata.api_version must not be empty".into()));
        }
        if !(100..=30000).contains(&self.timeout_ms) {
            return Err(AzvmError::BadConfig(
                "metadata.timeout_ms must be between 100 and 30000".into(),
            ));
        }
        if !(1..=86400).contains(&self.ttl_secs) {
            return Err(AzvmError::BadConfig(
                "metadata.ttl_secs must be between 1 and 86400".into(),
            ));
        }
        Ok(())
    }

    /// Provider URL with `api-version` appended to any existing query.
    pub fn request_url(&self) -> Result<Url> {
        let mut url = parse_http_url("metadata.endpoint", &self.endpoint)?;
        url.query_pairs_mut().append_pair("api-version", &self.api_version);
        Ok(url)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TelemetrySection {
    /// OTLP/HTTP traces endpoint. Required, from file or environment.
    #[serde(default)]
    pub endpoint: Option<String>,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_service_name")]
    pub service_name: String,
}

impl Default for TelemetrySection {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            service_name: default_service_name(),
        }
    }
}

impl TelemetrySection {
    pub fn validate(&self) -> Result<()> {
        let endpoint = self.endpoint.as_deref().unwrap_or_default();
        if endpoint.trim().is_empty() {
            return Err(AzvmError::BadConfig("telemetry.endpoint is required".into()));
        }
        parse_http_url("telemetry.endpoint", endpoint)?;
        if self.service_name.trim().is_empty() {
            return Err(AzvmError::BadConfig("telemetry.service_name must not be empty".into()));
        }
        Ok(())
    }
}

/// Absolute http(s) URL with a non-empty host.
fn parse_http_url(field: &str, s: &str) -> Result<Url> {
    let url = Url::parse(s)
        .map_err(|e| AzvmError::BadConfig(format!("{field} is not a valid URL: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(AzvmError::BadConfig(format!("{field} must be an http(s) URL")));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(AzvmError::BadConfig(format!("{field} must include a host")));
    }
    Ok(url)
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_metadata_endpoint() -> String {
    "http://169.254.169.254/metadata/instance".into()
}
fn default_api_version() -> String {
    "2020-09-01".into()
}
fn default_timeout_ms() -> u64 {
    2000
}
fn default_ttl_secs() -> u64 {
    300
}
fn default_service_name() -> String {
    "azvm".into()
}
