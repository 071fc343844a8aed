/*
Voice Mixer
===========

The mixer owns every sounding hit and sums them into one PCM stream. The
audio device pulls blocks from it; any thread may push new hits into it.

Vocabulary
----------

  position    The mixer's sample clock: how many frames have been rendered
              since creation (or the last reset). Only rendering moves it.

  entry       A voice plus the position it starts at. Scheduling a hit
              "N samples from now" stores `position + N`.

  frame       One output instant. Mono is mixed once per frame and copied
              to every channel.


Rendering One Frame
-------------------

    for each entry:
        start > position  → skip, voice untouched (it hasn't started yet)
        otherwise         → pull one sample, add to sum
                            voice finished → drop the entry
    clamp sum to [-1, 1], convert to the device's sample type
    position += 1

All started voices advance exactly one sample per frame, so hits scheduled
at different delays keep their relative timing to the sample.


Locking
-------

Entries and position live behind a single mutex. `schedule` holds it only to
push one entry. Rendering takes it once per chunk of `MIX_CHUNK_FRAMES`
frames, so a scheduler racing the audio thread waits at most one chunk and
its hit lands on the next frame not yet rendered, never inside audio that
already went out.
*/

pub mod audio;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use cpal::{FromSample, Sample};

use crate::synth::voice::Voice;
use crate::MIX_CHUNK_FRAMES;

pub use audio::Audio;

struct ScheduledVoice {
    start: u64,
    voice: Box<dyn Voice>,
}

struct MixerState {
    entries: Vec<ScheduledVoice>,
    position: u64,
}

impl MixerState {
    fn next_frame(&mut self) -> f32 {
        let position = self.position;
        let mut sum = 0.0f32;

        // Compacts finished voices out in the same pass
        self.entries.retain_mut(|entry| {
            if position < entry.start {
                return true;
            }
            match entry.voice.next_sample() {
                Some(sample) => {
                    sum += sample;
                    true
                }
                None => false,
            }
        });

        self.position += 1;
        sum.clamp(-1.0, 1.0)
    }
}

/// Sums scheduled voices into a PCM stream.
///
/// Cloning gives another handle to the same mixer, so the audio callback and
/// the control thread can each hold one.
#[derive(Clone)]
pub struct Mixer {
    state: Arc<Mutex<MixerState>>,
}

impl Mixer {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MixerState {
                entries: Vec::new(),
                position: 0,
            })),
        }
    }

    /// Start `voice` `delay_samples` frames after the next unrendered frame.
    pub fn schedule(&self, voice: Box<dyn Voice>, delay_samples: u64) {
        let mut state = self.lock();
        let start = state.position + delay_samples;
        state.entries.push(ScheduledVoice { start, voice });
    }

    /// Fill `out` with interleaved frames of `channels` channels.
    ///
    /// The same mono mix is written to every channel of a frame.
    pub fn render_block<T>(&self, out: &mut [T], channels: usize)
    where
        T: Sample + FromSample<f32>,
    {
        let channels = channels.max(1);
        for chunk in out.chunks_mut(MIX_CHUNK_FRAMES * channels) {
            let mut state = self.lock();
            for frame in chunk.chunks_mut(channels) {
                let value = T::from_sample(state.next_frame());
                frame.fill(value);
            }
        }
    }

    /// Mono convenience for [`render_block`](Self::render_block).
    pub fn render_mono(&self, out: &mut [f32]) {
        self.render_block(out, 1);
    }

    /// Drop every pending and sounding voice and rewind the sample clock.
    pub fn reset(&self) {
        let mut state = self.lock();
        state.entries.clear();
        state.position = 0;
    }

    /// Voices scheduled or sounding
    pub fn active_voices(&self) -> usize {
        self.lock().entries.len()
    }

    /// Frames rendered since creation or the last reset
    pub fn position(&self) -> u64 {
        self.lock().position
    }

    // The audio thread must keep running even if a control thread panicked
    // while holding the lock; the state is valid between frames regardless.
    fn lock(&self) -> MutexGuard<'_, MixerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Mixer {
    fn default() -> Self {
        Self::new()
    }
}
