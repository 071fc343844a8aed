//! Low-level DSP primitives used by the drum voices.
//!
//! These components are allocation-free and realtime-safe, making them safe to
//! embed directly inside voice structs. They stay focused on the
//! signal-processing math; the voices decide how to combine them.

/// Exponential decays and the fixed-length hit counter.
pub mod envelope;
/// One-pole low/high-pass split.
pub mod filter;
/// Seedable white noise.
pub mod noise;
/// Sine with a linear frequency sweep.
pub mod oscillator;

pub use envelope::{exp_decay, OneShot};
pub use filter::OnePole;
pub use noise::Noise;
pub use oscillator::Sweep;
