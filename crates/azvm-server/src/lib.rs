//! azvm server library entry.
//!
//! Wires the metadata provider client, TTL cache, HTTP surface, and telemetry
//! start-up into one service. Consumed by the binary (`main.rs`) and by
//! integration tests.

pub mod api;
pub mod app_state;
pub mod config;
pub mod metadata;
pub mod ops;
pub mod router;
pub mod telemetry;
