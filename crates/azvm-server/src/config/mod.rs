//! Server config loader (strict parsing + environment overlay).
//!
//! Order: YAML file (or built-in defaults when the file does not exist),
//! then `AZVM_*` environment variables, then `validate()`. The telemetry
//! endpoint is required but may come from either source.

pub mod schema;

use std::{fs, io};

use azvm_core::error::{AzvmError, Result};

pub use schema::{MetadataSection, ServerConfig, ServerSection, TelemetrySection};

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "AZVM_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "azvm.yaml";

const ENV_LISTEN: &str = "AZVM_LISTEN";
const ENV_METADATA_ENDPOINT: &str = "AZVM_METADATA_ENDPOINT";
const ENV_TELEMETRY_ENDPOINT: &str = "AZVM_TELEMETRY_ENDPOINT";
const ENV_TELEMETRY_API_KEY: &str = "AZVM_TELEMETRY_API_KEY";

/// Load using the process environment.
pub fn load_from_file(path: &str) -> Result<ServerConfig> {
    let yaml = match fs::read_to_string(path) {
        Ok(s) => Some(s),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::info!(%path, "config file not found, using defaults");
            None
        }
        Err(e) => return Err(AzvmError::BadConfig(format!("read config failed: {e}"))),
    };
    load_with_env(yaml.as_deref(), |k| std::env::var(k).ok())
}

/// Parse and validate YAML alone, without environment overlay.
pub fn load_from_str(s: &str) -> Result<ServerConfig> {
    load_with_env(Some(s), |_| None)
}

/// Parse `yaml` (defaults when `None`), overlay `env`, validate.
pub fn load_with_env<F>(yaml: Option<&str>, env: F) -> Result<ServerConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut cfg: ServerConfig = match yaml {
        Some(s) => serde_yaml::from_str(s)
            .map_err(|e| AzvmError::BadConfig(format!("invalid yaml: {e}")))?,
        None => ServerConfig::default(),
    };
    apply_env(&mut cfg, env);
    cfg.validate()?;
    Ok(cfg)
}

fn apply_env<F>(cfg: &mut ServerConfig, env: F)
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |k: &str| env(k).filter(|v| !v.trim().is_empty());

    if let Some(v) = non_empty(ENV_LISTEN) {
        cfg.server.listen = v;
    }
    if let Some(v) = non_empty(ENV_METADATA_ENDPOINT) {
        cfg.metadata.endpoint = v;
    }
    if let Some(v) = non_empty(ENV_TELEMETRY_ENDPOINT) {
        cfg.telemetry.endpoint = Some(v);
    }
    if let Some(v) = non_empty(ENV_TELEMETRY_API_KEY) {
        cfg.telemetry.api_key = Some(v);
    }
}
