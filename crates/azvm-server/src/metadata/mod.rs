//! Instance metadata access: provider client, TTL cache, and the service
//! that fronts both.

pub mod cache;
pub mod service;
pub mod source;

pub use cache::MetadataCache;
pub use service::MetadataService;
pub use source::{ImdsClient, MetadataSource};
