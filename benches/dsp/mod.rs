//! Benchmarks for low-level DSP and the drum voices built on it.

mod filter;
mod voices;

pub use filter::bench_filter;
pub use voices::bench_voices;
