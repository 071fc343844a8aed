//! Tom drum voice.
//!
//! A pitched drum similar to kick but at a higher frequency range.
//! Great for fills, tribal patterns, and melodic percussion.
//!
//! # How It Works
//!
//! 1. Sine sweep from 180Hz down to 110Hz gives the "boing"
//! 2. Body decays with `exp(-5t)` over half a beat
//! 3. A noisy attack decaying with `exp(-30t)` marks the stick hit
//!
//! # Variations
//!
//! - Higher sweep (250Hz+) = high tom
//! - Lower sweep (under 100Hz) = floor tom
//! - Slower decay = more resonant, tribal feel

use crate::dsp::{exp_decay, Noise, OneShot, Sweep};
use crate::synth::voice::Voice;

const LENGTH_BEATS: f64 = 0.5;

pub struct TomVoice {
    shot: OneShot,
    body: Sweep,
    noise: Noise,
}

/// Create a tom hit lasting half a beat at `bpm`.
pub fn tom(bpm: u32, sample_rate: u32) -> TomVoice {
    TomVoice::with_noise(bpm, sample_rate, Noise::new())
}

impl TomVoice {
    pub fn with_noise(bpm: u32, sample_rate: u32, noise: Noise) -> Self {
        Self {
            shot: OneShot::for_beats(LENGTH_BEATS, bpm, sample_rate),
            body: Sweep::new(180.0, 110.0, sample_rate as f32),
            noise,
        }
    }
}

impl Voice for TomVoice {
    fn next_sample(&mut self) -> Option<f32> {
        let (_, t) = self.shot.advance()?;
        let tone = self.body.next_sample(t) * exp_decay(5.0, t);
        let attack = self.noise.next_sample() * 0.5 * exp_decay(30.0, t);
        Some(tone + attack)
    }
}
