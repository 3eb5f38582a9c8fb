//! Shared error types across azvm crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid configuration or input.
    BadRequest,
    /// The metadata provider could not be reached.
    UpstreamUnavailable,
    /// The metadata provider answered with an unusable document.
    BadMetadata,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::UpstreamUnavailable => "UPSTREAM_UNAVAILABLE",
            ClientCode::BadMetadata => "BAD_METADATA",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Failure of a single outbound call to the metadata provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Transport failure, timeout, non-success status, or non-JSON body.
    #[error("metadata provider unreachable: {0}")]
    Unreachable(String),
}

/// Failure to derive an attribute set from a fetched document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("malformed metadata payload: {0}")]
    MalformedPayload(&'static str),
}

/// Error surfaced by the metadata service to its callers.
///
/// Clone so a single failed refresh can be handed to every caller that was
/// waiting on it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("upstream: {0}")]
    Upstream(#[from] FetchError),
    #[error("bad data: {0}")]
    BadData(#[from] ExtractError),
}

impl ServiceError {
    /// Map to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            ServiceError::Upstream(_) => ClientCode::UpstreamUnavailable,
            ServiceError::BadData(_) => ClientCode::BadMetadata,
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, AzvmError>;

/// Process-level error used by configuration, telemetry, and start-up.
#[derive(Debug, Error)]
pub enum AzvmError {
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("telemetry: {0}")]
    Telemetry(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl AzvmError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            AzvmError::BadConfig(_) | AzvmError::UnsupportedVersion => ClientCode::BadRequest,
            AzvmError::Telemetry(_) | AzvmError::Internal(_) => ClientCode::Internal,
        }
    }
}
