//! Shared utilities for valuation-rs
//!
//! Tracing subscriber setup used by the binaries in this workspace.

pub mod logging;

pub use logging::{init_tracing, init_tracing_json};
