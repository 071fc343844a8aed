//! Audio facade - "play this instrument now, or at time t".
//!
//! Ties the registry (what a hit sounds like), the mixer (where it plays)
//! and a clock (when) together behind a handle that can be shared across
//! threads. Until an output sink attaches, the facade is silent: play calls
//! are accepted and dropped so the rest of the engine runs unchanged without
//! a sound card.

use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::Mixer;
use crate::sequencing::clock::{Clock, SystemClock};
use crate::synth::{registry::InstrumentRegistry, voice::Gain};

/// Tempo used for voice lengths when the transport tempo is not positive
const FALLBACK_BPM: u32 = 120;

pub struct Audio {
    mixer: Mixer,
    registry: Arc<InstrumentRegistry>,
    clock: Arc<dyn Clock>,
    sample_rate: u32,
    bpm: AtomicI32,
    live: AtomicBool,
}

impl Audio {
    /// Built-in drum kit on the system clock
    pub fn new(sample_rate: u32) -> Self {
        Self::with_parts(
            Arc::new(InstrumentRegistry::with_builtin_drums()),
            Arc::new(SystemClock::new()),
            sample_rate,
        )
    }

    pub fn with_parts(
        registry: Arc<InstrumentRegistry>,
        clock: Arc<dyn Clock>,
        sample_rate: u32,
    ) -> Self {
        Self {
            mixer: Mixer::new(),
            registry,
            clock,
            sample_rate,
            bpm: AtomicI32::new(FALLBACK_BPM as i32),
            live: AtomicBool::new(false),
        }
    }

    /// Trigger `id` immediately. Returns whether a voice was scheduled.
    pub fn play(&self, id: &str) -> bool {
        self.play_with_volume(id, 1.0, None)
    }

    /// Trigger `id` at `when` seconds on the audio clock.
    ///
    /// Times already in the past play immediately.
    pub fn play_at(&self, id: &str, when: f64) -> bool {
        self.play_with_volume(id, 1.0, Some(when))
    }

    pub fn play_with_volume(&self, id: &str, volume: f32, when: Option<f64>) -> bool {
        if !self.is_live() {
            return false;
        }

        // Registry lock is released inside new_voice, before the mixer lock
        let Some(voice) = self
            .registry
            .new_voice(id, self.voice_bpm(), self.sample_rate)
        else {
            warn!(%id, "unknown instrument");
            return false;
        };

        let delay = when.map_or(0, |t| self.delay_samples(t));
        if volume == 1.0 {
            self.mixer.schedule(voice, delay);
        } else {
            self.mixer.schedule(Box::new(Gain::new(voice, volume)), delay);
        }
        true
    }

    /// Seconds elapsed on the audio clock
    pub fn now(&self) -> f64 {
        self.clock.now().as_secs_f64()
    }

    pub fn set_bpm(&self, bpm: i32) {
        self.bpm.store(bpm, Ordering::Relaxed);
        debug!(bpm, "audio tempo");
    }

    pub fn bpm(&self) -> i32 {
        self.bpm.load(Ordering::Relaxed)
    }

    /// Silence everything that is playing or pending
    pub fn reset(&self) {
        self.mixer.reset();
    }

    /// Mark whether an output sink is pulling from the mixer.
    pub fn set_live(&self, live: bool) {
        let was = self.live.swap(live, Ordering::SeqCst);
        if was != live {
            info!(live, "audio output");
        }
    }

    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }

    pub fn mixer(&self) -> &Mixer {
        &self.mixer
    }

    pub fn registry(&self) -> &Arc<InstrumentRegistry> {
        &self.registry
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Registered instrument ids in registration order
    pub fn instruments(&self) -> Vec<String> {
        self.registry.instruments()
    }

    /// Register decoded mono samples as an instrument
    pub fn register_wav(&self, id: impl Into<String>, samples: Vec<f32>) {
        self.registry.register_wav(id, samples);
    }

    fn voice_bpm(&self) -> u32 {
        match self.bpm() {
            bpm if bpm > 0 => bpm as u32,
            _ => FALLBACK_BPM,
        }
    }

    fn delay_samples(&self, when: f64) -> u64 {
        let ahead = when - self.now();
        if ahead <= 0.0 {
            return 0;
        }
        (ahead * self.sample_rate as f64) as u64
    }
}
