//! Snare drum voice.
//!
//! A synthesized snare combining noise for the "snare" rattle with a short
//! falling tone for the drum head.
//!
//! # How It Works
//!
//! 1. White noise is split by a one-pole filter into a dull low band and a
//!    bright high band, mixed back 50/50 and decayed with `exp(-6t)`
//! 2. A sine sweeping 200Hz → 140Hz with `exp(-4t)` is the tonal body
//! 3. Rattle and body are mixed 70/30
//!
//! # Variations
//!
//! - More noise = trashy, lo-fi snare
//! - More body = closer to a tom
//! - Faster noise decay = tighter, snappier

use crate::dsp::{exp_decay, Noise, OnePole, OneShot, Sweep};
use crate::synth::voice::Voice;

const LENGTH_BEATS: f64 = 0.5;

pub struct SnareVoice {
    shot: OneShot,
    noise: Noise,
    split: OnePole,
    body: Sweep,
}

/// Create a snare hit lasting half a beat at `bpm`.
pub fn snare(bpm: u32, sample_rate: u32) -> SnareVoice {
    SnareVoice::with_noise(bpm, sample_rate, Noise::new())
}

impl SnareVoice {
    pub fn with_noise(bpm: u32, sample_rate: u32, noise: Noise) -> Self {
        Self {
            shot: OneShot::for_beats(LENGTH_BEATS, bpm, sample_rate),
            noise,
            split: OnePole::from_coefficient(0.3),
            body: Sweep::new(200.0, 140.0, sample_rate as f32),
        }
    }
}

impl Voice for SnareVoice {
    fn next_sample(&mut self) -> Option<f32> {
        let (_, t) = self.shot.advance()?;

        let n = self.noise.next_sample();
        let low = self.split.lowpass(n);
        let high = n - low;
        let rattle = (high * 0.5 + low * 0.5) * exp_decay(6.0, t);

        let tone = self.body.next_sample(t) * exp_decay(4.0, t);

        Some(rattle * 0.7 + tone * 0.3)
    }
}
