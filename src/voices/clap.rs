//! Clap voice - punchy, bright hand clap.
//!
//! A real clap is several hands hitting a few milliseconds apart, so the
//! sound is a quick flurry of noise bursts followed by a short room tail.
//!
//! # How It Works
//!
//! 1. White noise source
//! 2. Band-limited by a one-pole high-pass (~800Hz) into a one-pole
//!    low-pass (~3kHz), leaving the "crack" frequencies
//! 3. Three bursts 10ms apart, each dying within a few milliseconds
//! 4. A tail starting at the last burst decays with `exp(-5t)` over the
//!    quarter-beat hit
//! 5. Boosted gain to cut through the mix
//!
//! # Variations
//!
//! - More bursts or wider spacing = bigger group clap
//! - Longer tail = more reverberant room feel

use crate::dsp::{exp_decay, Noise, OnePole, OneShot};
use crate::synth::voice::Voice;

const LENGTH_BEATS: f64 = 0.25;
const BURSTS: usize = 3;
const BURST_SPACING_SECS: f32 = 0.010;
/// Per-second decay rate of a single burst
const BURST_DECAY: f32 = 300.0;
const GAIN: f32 = 1.5;

pub struct ClapVoice {
    shot: OneShot,
    noise: Noise,
    highpass: OnePole,
    lowpass: OnePole,
    sample_rate: f32,
}

/// Create a clap hit lasting a quarter beat at `bpm`.
pub fn clap(bpm: u32, sample_rate: u32) -> ClapVoice {
    ClapVoice::with_noise(bpm, sample_rate, Noise::new())
}

impl ClapVoice {
    pub fn with_noise(bpm: u32, sample_rate: u32, noise: Noise) -> Self {
        let sr = sample_rate as f32;
        Self {
            shot: OneShot::for_beats(LENGTH_BEATS, bpm, sample_rate),
            noise,
            highpass: OnePole::from_cutoff(800.0, sr),
            lowpass: OnePole::from_cutoff(3_000.0, sr),
            sample_rate: sr.max(1.0),
        }
    }

    fn amplitude(&self, index: usize, t: f32) -> f32 {
        let secs = index as f32 / self.sample_rate;

        let bursts = (0..BURSTS)
            .map(|k| k as f32 * BURST_SPACING_SECS)
            .filter(|&onset| secs >= onset)
            .map(|onset| (-(secs - onset) * BURST_DECAY).exp())
            .fold(0.0f32, f32::max);

        let tail_onset = (BURSTS - 1) as f32 * BURST_SPACING_SECS;
        let tail = if secs >= tail_onset {
            0.6 * exp_decay(5.0, t)
        } else {
            0.0
        };

        bursts.max(tail)
    }
}

impl Voice for ClapVoice {
    fn next_sample(&mut self) -> Option<f32> {
        let (index, t) = self.shot.advance()?;
        let n = self.noise.next_sample();
        let band = self.lowpass.lowpass(self.highpass.highpass(n));
        Some(band * self.amplitude(index, t) * GAIN)
    }
}
