use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, warn};

use crate::io::wav::{decode_wav, WavError};
use crate::synth::{
    factory::{Instrument, SampleInstrument},
    voice::Voice,
};
use crate::voices::Drum;

/// Instruments by id, in registration order.
///
/// Guarded by its own lock. Lookups clone the instrument handle and release
/// the lock before any synthesis happens, so building a voice never holds
/// the registry.
#[derive(Default)]
pub struct InstrumentRegistry {
    entries: RwLock<Vec<(String, Arc<dyn Instrument>)>>,
}

impl InstrumentRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry preloaded with the synthesized drum kit
    pub fn with_builtin_drums() -> Self {
        let registry = Self::new();
        for drum in Drum::ALL {
            registry.register(drum.id(), drum);
        }
        registry
    }

    /// Make an instrument available under `id`.
    ///
    /// Re-registering an id replaces its instrument but keeps its place in
    /// [`instruments`](Self::instruments).
    pub fn register(&self, id: impl Into<String>, instrument: impl Instrument + 'static) {
        self.register_shared(id, Arc::new(instrument));
    }

    pub fn register_shared(&self, id: impl Into<String>, instrument: Arc<dyn Instrument>) {
        let id = id.into();
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        match entries.iter_mut().find(|(existing, _)| *existing == id) {
            Some(entry) => {
                entry.1 = instrument;
                debug!(%id, "replaced instrument");
            }
            None => {
                debug!(%id, "registered instrument");
                entries.push((id, instrument));
            }
        }
    }

    /// Register already-decoded mono samples as a one-shot instrument
    pub fn register_wav(&self, id: impl Into<String>, samples: Vec<f32>) {
        let id = id.into();
        let instrument = SampleInstrument::new(samples);
        if instrument.is_empty() {
            warn!(%id, "sample has no frames, it will play silence");
        }
        debug!(%id, frames = instrument.len(), "sample loaded");
        self.register(id, instrument);
    }

    /// Decode a WAV file and register it, requiring `expected_rate`
    pub fn register_wav_file(
        &self,
        id: impl Into<String>,
        path: impl AsRef<Path>,
        expected_rate: u32,
    ) -> Result<(), WavError> {
        let decoded = decode_wav(path)?;
        if decoded.sample_rate != expected_rate {
            return Err(WavError::SampleRateMismatch {
                expected: expected_rate,
                actual: decoded.sample_rate,
            });
        }
        self.register_wav(id, decoded.samples);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn Instrument>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .iter()
            .find(|(existing, _)| existing == id)
            .map(|(_, inst)| inst.clone())
    }

    /// Build a fresh voice for `id`, or None if no such instrument exists
    pub fn new_voice(&self, id: &str, bpm: u32, sample_rate: u32) -> Option<Box<dyn Voice>> {
        let instrument = self.get(id)?;
        Some(instrument.new_voice(bpm, sample_rate))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Registered ids in registration order
    pub fn instruments(&self) -> Vec<String> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.iter().map(|(id, _)| id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
