//! Kick drum voice.
//!
//! A classic synthesized kick: a sine wave whose pitch starts high and
//! quickly drops, plus a tiny noise click on the attack.
//!
//! # How It Works
//!
//! 1. Sine sweep from 150Hz down to 50Hz over the hit provides the body
//! 2. Body decays with `exp(-5t)`
//! 3. A burst of noise decaying with `exp(-40t)` adds the beater click
//!
//! # Variations
//!
//! - Slower body decay = boomy 808-style kick
//! - Higher start pitch = more "punch"
//! - Drop the click = softer, rounder kick

use crate::dsp::{exp_decay, Noise, OneShot, Sweep};
use crate::synth::voice::Voice;

/// Hit length in beats
const LENGTH_BEATS: f64 = 0.5;

pub struct KickVoice {
    shot: OneShot,
    body: Sweep,
    noise: Noise,
}

/// Create a kick hit lasting half a beat at `bpm`.
pub fn kick(bpm: u32, sample_rate: u32) -> KickVoice {
    KickVoice::with_noise(bpm, sample_rate, Noise::new())
}

impl KickVoice {
    pub fn with_noise(bpm: u32, sample_rate: u32, noise: Noise) -> Self {
        Self {
            shot: OneShot::for_beats(LENGTH_BEATS, bpm, sample_rate),
            body: Sweep::new(150.0, 50.0, sample_rate as f32),
            noise,
        }
    }
}

impl Voice for KickVoice {
    fn next_sample(&mut self) -> Option<f32> {
        let (_, t) = self.shot.advance()?;
        let tone = self.body.next_sample(t) * exp_decay(5.0, t);
        let click = self.noise.next_sample() * exp_decay(40.0, t);
        Some(tone + click)
    }
}
