#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::collections::HashMap;

use azvm_server::config;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |k: &str| map.get(k).cloned()
}

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
telemetry:
  endpoint: "https://otlp.example.com/v1/traces"
metadata:
  ttl_sec: 60 # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
}

#[test]
fn ok_minimal_config() {
    let ok = r#"
version: 1
telemetry:
  endpoint: "https://otlp.example.com/v1/traces"
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.server.listen, "0.0.0.0:8080");
    assert_eq!(cfg.metadata.endpoint, "http://169.254.169.254/metadata/instance");
    assert_eq!(cfg.metadata.api_version, "2020-09-01");
    assert_eq!(cfg.metadata.ttl_secs, 300);
    assert!(!cfg.metadata.stale_on_error);
    assert_eq!(cfg.telemetry.api_key, None);
}

#[test]
fn missing_telemetry_endpoint_is_fatal() {
    let err = config::load_from_str("version: 1\n").expect_err("must fail");
    assert!(err.to_string().contains("telemetry.endpoint is required"), "{err}");
}

#[test]
fn env_supplies_telemetry_endpoint_and_key() {
    let cfg = config::load_with_env(
        Some("version: 1\n"),
        env(&[
            ("AZVM_TELEMETRY_ENDPOINT", "https://otlp.example.com/v1/traces"),
            ("AZVM_TELEMETRY_API_KEY", "secret"),
        ]),
    )
    .expect("env must satisfy required endpoint");

    assert_eq!(cfg.telemetry.endpoint.as_deref(), Some("https://otlp.example.com/v1/traces"));
    assert_eq!(cfg.telemetry.api_key.as_deref(), Some("secret"));
}

#[test]
fn env_overrides_file_values() {
    let yaml = r#"
version: 1
server:
  listen: "127.0.0.1:9000"
telemetry:
  endpoint: "http://collector:4318/v1/traces"
"#;
    let cfg = config::load_with_env(
        Some(yaml),
        env(&[
            ("AZVM_LISTEN", "127.0.0.1:9100"),
            ("AZVM_METADATA_ENDPOINT", "http://127.0.0.1:7000/metadata/instance"),
            ("AZVM_TELEMETRY_ENDPOINT", ""),
        ]),
    )
    .unwrap();

    assert_eq!(cfg.server.listen, "127.0.0.1:9100");
    assert_eq!(cfg.metadata.endpoint, "http://127.0.0.1:7000/metadata/instance");
    // empty env values are ignored
    assert_eq!(cfg.telemetry.endpoint.as_deref(), Some("http://collector:4318/v1/traces"));
}

#[test]
fn no_file_uses_defaults() {
    let cfg = config::load_with_env(
        None,
        env(&[("AZVM_TELEMETRY_ENDPOINT", "http://localhost:4318/v1/traces")]),
    )
    .unwrap();
    assert_eq!(cfg.metadata.timeout_ms, 2000);
    assert_eq!(cfg.telemetry.service_name, "azvm");
}

#[test]
fn rejects_out_of_range_values() {
    let cases = [
        "metadata:\n  timeout_ms: 50\n",
        "metadata:\n  ttl_secs: 0\n",
        "metadata:\n  endpoint: \"169.254.169.254/metadata/instance\"\n",
        "metadata:\n  endpoint: \"http://\"\n",
        "metadata:\n  endpoint: \"ftp://169.254.169.254/metadata/instance\"\n",
        "server:\n  listen: \"not-an-addr\"\n",
    ];
    for case in cases {
        let yaml = format!(
            "version: 1\ntelemetry:\n  endpoint: \"http://localhost:4318/v1/traces\"\n{case}"
        );
        let err = config::load_from_str(&yaml).expect_err(case);
        assert_eq!(err.client_code().as_str(), "BAD_REQUEST", "case={case}");
    }
}

#[test]
fn rejects_telemetry_endpoint_without_host() {
    for endpoint in ["http://", "https://:4318/v1/traces", "otlp.example.com/v1/traces"] {
        let yaml = format!("version: 1\ntelemetry:\n  endpoint: \"{endpoint}\"\n");
        let err = config::load_from_str(&yaml).expect_err(endpoint);
        assert_eq!(err.client_code().as_str(), "BAD_REQUEST", "endpoint={endpoint}");
        assert!(err.to_string().contains("telemetry.endpoint"), "{err}");
    }
}

#[test]
fn request_url_appends_api_version() {
    let cfg = config::load_from_str(
        "version: 1\ntelemetry:\n  endpoint: \"http://localhost:4318/v1/traces\"\n",
    )
    .unwrap();
    let url = cfg.metadata.request_url().unwrap();
    assert_eq!(
        url.as_str(),
        "http://169.254.169.254/metadata/instance?api-version=2020-09-01"
    );
}

#[test]
fn request_url_keeps_existing_query() {
    let yaml = r#"
version: 1
metadata:
  endpoint: "http://169.254.169.254/metadata/instance?format=json"
telemetry:
  endpoint: "http://localhost:4318/v1/traces"
"#;
    let cfg = config::load_from_str(yaml).unwrap();
    let url = cfg.metadata.request_url().unwrap();

    assert_eq!(url.as_str().matches('?').count(), 1, "{url}");
    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    assert_eq!(
        pairs,
        vec![
            ("format".to_string(), "json".to_string()),
            ("api-version".to_string(), "2020-09-01".to_string()),
        ]
    );
}

#[test]
fn rejects_unknown_version() {
    let yaml = "version: 2\ntelemetry:\n  endpoint: \"http://localhost:4318/v1/traces\"\n";
    let err = config::load_from_str(yaml).expect_err("must fail");
    assert!(matches!(err, azvm_core::AzvmError::UnsupportedVersion));
}
