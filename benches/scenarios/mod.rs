//! Benchmarks for end-to-end scenarios.

mod mix;
mod resolve;

pub use mix::bench_mix;
pub use resolve::bench_resolve;
