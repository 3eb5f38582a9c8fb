use async_trait::async_trait;
use url::Url;

use azvm_core::error::{AzvmError, FetchError, Result};
use azvm_core::metadata::RawMetadata;

use crate::config::MetadataSection;

/// Anything that can produce one raw metadata document per call.
///
/// No retries and no caching: both belong to `MetadataService`.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    async fn fetch(&self) -> std::result::Result<RawMetadata, FetchError>;
}

/// Azure Instance Metadata Service client.
#[derive(Debug, Clone)]
pub struct ImdsClient {
    client: reqwest::Client,
    url: Url,
}

impl ImdsClient {
    pub fn new(cfg: &MetadataSection) -> Result<Self> {
        // IMDS is link-local; a system proxy would never reach it.
        let client = reqwest::Client::builder()
            .timeout(cfg.timeout())
            .no_proxy()
            .build()
            .map_err(|e| AzvmError::Internal(format!("metadata http client: {e}")))?;

        Ok(Self {
            client,
            url: cfg.request_url()?,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl MetadataSource for ImdsClient {
    async fn fetch(&self) -> std::result::Result<RawMetadata, FetchError> {
        let res = self
            .client
            .get(self.url.clone())
            .header("Metadata", "true")
            .send()
            .await
            .map_err(unreachable)?;

        let status = res.status();
        if !status.is_success() {
            return Err(FetchError::Unreachable(format!("unexpected status {status}")));
        }

        let body = res.bytes().await.map_err(unreachable)?;
        RawMetadata::from_slice(&body)
            .map_err(|e| FetchError::Unreachable(format!("response is not json: {e}")))
    }
}

fn unreachable(err: reqwest::Error) -> FetchError {
    let what = if err.is_timeout() {
        "timed out"
    } else if err.is_connect() {
        "connect failed"
    } else {
        "request failed"
    };
    FetchError::Unreachable(format!("{what}: {err}"))
}
