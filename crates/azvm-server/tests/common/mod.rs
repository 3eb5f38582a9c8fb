//! Shared test doubles.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::time::Duration;

use azvm_core::error::FetchError;
use azvm_core::metadata::RawMetadata;
use azvm_server::metadata::{MetadataService, MetadataSource};

pub const TTL: Duration = Duration::from_secs(300);

/// Metadata source with a swappable reply and a call counter.
pub struct FakeSource {
    calls: AtomicUsize,
    reply: Mutex<Result<Value, FetchError>>,
    delay: Option<Duration>,
}

impl FakeSource {
    pub fn new(reply: Result<Value, FetchError>) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            reply: Mutex::new(reply),
            delay: None,
        })
    }

    pub fn slow(reply: Result<Value, FetchError>, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            reply: Mutex::new(reply),
            delay: Some(delay),
        })
    }

    pub fn set_reply(&self, reply: Result<Value, FetchError>) {
        *self.reply.lock().unwrap() = reply;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetadataSource for FakeSource {
    async fn fetch(&self) -> Result<RawMetadata, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(d) = self.delay {
            tokio::time::sleep(d).await;
        }
        let reply = self.reply.lock().unwrap().clone();
        reply.map(RawMetadata::new)
    }
}

pub fn service(source: Arc<FakeSource>) -> MetadataService {
    MetadataService::new(source, TTL, false)
}

pub fn eastus_payload() -> Value {
    json!({
        "compute": {
            "location": "eastus",
            "vmSize": "Standard_D2s_v3",
            "osType": "Linux",
            "priority": "Regular"
        }
    })
}

pub fn eastus_attributes() -> Value {
    json!({
        "azure.vm.service_name": "Virtual Machines",
        "azure.vm.location": "eastus",
        "azure.vm.size": "Standard_D2s_v3",
        "azure.vm.os": "Linux",
        "azure.vm.priority": "Regular"
    })
}

pub fn unreachable() -> FetchError {
    FetchError::Unreachable("connect failed: connection refused".into())
}
