//! azvm core: metadata payload model, attribute extraction, and error types.
//!
//! This crate defines the data shapes shared by the server, the startup
//! enrichment path, and tests. It carries no transport or runtime
//! dependencies: fetching and caching live in `azvm-server`.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! A hostile or truncated metadata document surfaces as `ExtractError`,
//! never as a crash.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod metadata;

/// Shared result type.
pub use error::{AzvmError, Result};
pub use metadata::{extract, AttributeSet, RawMetadata};
