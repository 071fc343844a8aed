//! Hi-hat voice (closed).
//!
//! A tight, short burst of filtered noise. Closed hi-hats are the backbone
//! of most drum patterns, providing rhythmic drive.
//!
//! # How It Works
//!
//! 1. White noise provides the "metallic" character
//! 2. High-pass around 7kHz removes the body (hi-hats are bright)
//! 3. Eighth-of-a-beat length with `exp(-8t)` for that tight "tss" sound

use crate::dsp::{exp_decay, Noise, OnePole, OneShot};
use crate::synth::voice::Voice;

const LENGTH_BEATS: f64 = 0.125;

pub struct HiHatVoice {
    shot: OneShot,
    noise: Noise,
    highpass: OnePole,
}

/// Create a closed hi-hat hit lasting an eighth of a beat at `bpm`.
pub fn hihat(bpm: u32, sample_rate: u32) -> HiHatVoice {
    HiHatVoice::with_noise(bpm, sample_rate, Noise::new())
}

impl HiHatVoice {
    pub fn with_noise(bpm: u32, sample_rate: u32, noise: Noise) -> Self {
        Self {
            shot: OneShot::for_beats(LENGTH_BEATS, bpm, sample_rate),
            noise,
            highpass: OnePole::from_cutoff(7_000.0, sample_rate as f32),
        }
    }
}

impl Voice for HiHatVoice {
    fn next_sample(&mut self) -> Option<f32> {
        let (_, t) = self.shot.advance()?;
        let n = self.highpass.highpass(self.noise.next_sample());
        Some(n * exp_decay(8.0, t))
    }
}
