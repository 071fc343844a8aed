use std::sync::Arc;

use crate::synth::voice::{SampleVoice, Voice};

/// Builds a fresh voice each time an instrument is triggered
///
/// This is the "instrument design" layer: the sound is described once, and
/// every hit gets its own voice with private synthesis state. Tempo is passed
/// in because drum lengths scale with it.
pub trait Instrument: Send + Sync {
    fn new_voice(&self, bpm: u32, sample_rate: u32) -> Box<dyn Voice>;
}

impl<F> Instrument for F
where
    F: Fn(u32, u32) -> Box<dyn Voice> + Send + Sync,
{
    fn new_voice(&self, bpm: u32, sample_rate: u32) -> Box<dyn Voice> {
        self(bpm, sample_rate)
    }
}

/// Replays a decoded buffer once per trigger, ignoring tempo
#[derive(Debug, Clone)]
pub struct SampleInstrument {
    buffer: Arc<[f32]>,
}

impl SampleInstrument {
    pub fn new(samples: impl Into<Arc<[f32]>>) -> Self {
        Self {
            buffer: samples.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl Instrument for SampleInstrument {
    fn new_voice(&self, _bpm: u32, _sample_rate: u32) -> Box<dyn Voice> {
        Box::new(SampleVoice::new(self.buffer.clone()))
    }
}
