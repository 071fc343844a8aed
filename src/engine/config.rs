use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::graph::DEFAULT_BEAT_LENGTH;
use crate::DEFAULT_SAMPLE_RATE;

/// Engine settings. Every field has a sensible default.
///
/// ```ignore
/// let config = EngineConfig::default().with_bpm(96).with_beat_length(16);
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub sample_rate: u32,
    /// Initial tempo; zero or negative starts paused
    pub bpm: i32,
    pub beat_length: usize,
    /// Longest beat row the editor allows
    pub max_beat_length: usize,
    /// How often the ticker thread polls the scheduler
    pub tick_interval_ms: u64,
    /// Beat events buffered before new ones are dropped
    pub event_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            bpm: 120,
            beat_length: DEFAULT_BEAT_LENGTH,
            max_beat_length: 64,
            tick_interval_ms: 16,
            event_capacity: 16,
        }
    }
}

impl EngineConfig {
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_bpm(mut self, bpm: i32) -> Self {
        self.bpm = bpm;
        self
    }

    pub fn with_beat_length(mut self, beat_length: usize) -> Self {
        self.beat_length = beat_length;
        self
    }

    pub fn with_tick_interval_ms(mut self, ms: u64) -> Self {
        self.tick_interval_ms = ms;
        self
    }

    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    /// Clamp a requested beat length into `1..=max_beat_length`
    pub fn clamp_beat_length(&self, requested: usize) -> usize {
        requested.clamp(1, self.max_beat_length.max(1))
    }
}
