//! Pack benchmarking suite
//!
//! Benchmarks for version and manifest parsing and for dependency
//! resolution over generated pack graphs.

pub mod common;

pub use common::*;
