//! onep-core: Shared infrastructure for the OneP client crates.
pub mod config;
pub mod error;
pub mod observability;
pub mod transport;
