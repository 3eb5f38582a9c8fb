//! Instance metadata model.
//!
//! - `payload`: the raw document returned by the provider.
//! - `attributes`: the flat, fixed-key attribute set derived from it.
//! - `extract`: the navigation from one to the other.
//!
//! Nothing here performs I/O; the provider call and the cache live in the
//! server crate.

pub mod attributes;
pub mod extract;
pub mod payload;

pub use attributes::AttributeSet;
pub use extract::extract;
pub use payload::RawMetadata;
