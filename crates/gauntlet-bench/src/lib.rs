#![deny(clippy::all)]
#![warn(clippy::pedantic)]

//! Criterion benchmarks for the gauntlet workload kernels.
//!
//! Run benchmarks with: `cargo bench -p gauntlet-bench`
//!
//! The CLI measures each workload once per invocation. These benches sample
//! the same kernels at small sizes to catch regressions in the kernels
//! themselves.
