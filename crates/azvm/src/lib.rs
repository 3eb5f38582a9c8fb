//! Top-level facade crate for azvm.
//!
//! Re-exports the core model and the server library so users can depend on a single crate.

pub mod core {
    pub use azvm_core::*;
}

pub mod server {
    pub use azvm_server::*;
}
