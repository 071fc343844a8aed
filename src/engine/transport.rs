//! Transport - connects beat events to sound.
//!
//! The engine decides *when* a step fires; the transport decides *what*
//! plays. Call [`Transport::pump`] regularly from the control loop: it drains
//! the engine's beat events and triggers every audible row on each step.

use std::sync::Arc;

use tracing::debug;

use super::{BeatEvent, Engine};
use crate::mixer::Audio;

pub struct Transport {
    engine: Engine,
    audio: Arc<Audio>,
}

impl Transport {
    pub fn new(engine: Engine, audio: Arc<Audio>) -> Self {
        audio.set_bpm(engine.bpm());
        Self { engine, audio }
    }

    pub fn play(&self) {
        self.engine.start();
    }

    /// Stop, silence anything still ringing and forget pending beats
    pub fn stop(&mut self) {
        self.engine.stop();
        self.audio.reset();
        let discarded = self.engine.drain_events().count();
        if discarded > 0 {
            debug!(discarded, "pending beats discarded");
        }
    }

    pub fn is_playing(&self) -> bool {
        self.engine.is_playing()
    }

    /// Change tempo for both step timing and voice lengths
    pub fn set_bpm(&self, bpm: i32) {
        self.engine.set_bpm(bpm);
        self.audio.set_bpm(bpm);
    }

    pub fn bpm(&self) -> i32 {
        self.engine.bpm()
    }

    /// Play the hits for every pending beat. Returns how many voices started.
    pub fn pump(&mut self) -> usize {
        let events: Vec<BeatEvent> = self.engine.drain_events().collect();
        // Beats that raced a stop are dropped
        if !self.engine.is_playing() {
            return 0;
        }

        let mut started = 0;
        for event in events {
            let triggers = self.engine.with_session(|s| s.triggers_at(event.step));
            for trigger in triggers {
                if self
                    .audio
                    .play_with_volume(&trigger.instrument, trigger.volume, None)
                {
                    started += 1;
                }
            }
        }
        started
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }

    pub fn audio(&self) -> &Arc<Audio> {
        &self.audio
    }
}
