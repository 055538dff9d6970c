//! Valuation pipeline
//!
//! Wires the snapshot assembler, ratio series builder, aggregator and
//! classifier into a single run over one security.

pub mod report;
pub mod valuation_engine;

pub use report::{ValuationAnalysis, ValuationReport};
pub use valuation_engine::ValuationEngine;
