use std::sync::Arc;

/// One sounding hit: a stateful generator of successive samples.
///
/// A voice is created fresh for every trigger and dropped as soon as it
/// reports completion. Voices are never reused.
pub trait Voice: Send {
    /// Produce the next sample, or None once the voice has finished.
    fn next_sample(&mut self) -> Option<f32>;
}

/// Allow boxed voices to be used as voices (for dynamic dispatch)
impl Voice for Box<dyn Voice> {
    fn next_sample(&mut self) -> Option<f32> {
        (**self).next_sample()
    }
}

/// Scales every sample of an inner voice by a fixed gain.
///
/// Gives per-trigger volume without touching instrument synthesis.
pub struct Gain<V> {
    inner: V,
    gain: f32,
}

impl<V: Voice> Gain<V> {
    pub fn new(inner: V, gain: f32) -> Self {
        Self { inner, gain }
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }
}

impl<V: Voice> Voice for Gain<V> {
    fn next_sample(&mut self) -> Option<f32> {
        self.inner.next_sample().map(|s| s * self.gain)
    }
}

/// Plays a pre-decoded buffer once from the start.
///
/// The buffer is shared, so triggering a sample never copies it.
pub struct SampleVoice {
    buffer: Arc<[f32]>,
    position: usize,
}

impl SampleVoice {
    pub fn new(buffer: Arc<[f32]>) -> Self {
        Self {
            buffer,
            position: 0,
        }
    }
}

impl Voice for SampleVoice {
    fn next_sample(&mut self) -> Option<f32> {
        let sample = self.buffer.get(self.position).copied()?;
        self.position += 1;
        Some(sample)
    }
}
