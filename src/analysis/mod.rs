//! Aggregation and query helpers.
//!
//! Pure functions over the loaded tables; no I/O happens here.

pub mod aggregator;

pub use aggregator::*;
