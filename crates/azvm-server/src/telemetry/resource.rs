use std::sync::Arc;

use opentelemetry::KeyValue;
use opentelemetry_sdk::Resource;

use azvm_core::metadata::AttributeSet;

use crate::metadata::MetadataService;

/// One-shot startup enrichment.
///
/// Goes through the shared service so the first request inside the TTL
/// window is served from the entry this call stored. A failure is not fatal:
/// off-Azure hosts have no provider, and telemetry still works without the
/// VM tags.
pub async fn startup_attributes(metadata: &MetadataService) -> Option<Arc<AttributeSet>> {
    match metadata.attributes().await {
        Ok(attrs) => {
            tracing::info!(attrs = attrs.len(), "resource enriched with vm metadata");
            Some(attrs)
        }
        Err(err) => {
            tracing::warn!(error = %err, "vm metadata unavailable at startup, resource not enriched");
            None
        }
    }
}

/// `service.name` plus every VM attribute, verbatim.
pub fn resource(service_name: &str, vm: Option<&AttributeSet>) -> Resource {
    let vm_attrs = vm
        .into_iter()
        .flat_map(|set| set.iter())
        .map(|(k, v)| KeyValue::new(k, v.to_owned()));

    Resource::builder()
        .with_service_name(service_name.to_owned())
        .with_attributes(vm_attrs)
        .build()
}
