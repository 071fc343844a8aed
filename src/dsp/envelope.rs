/*
One-Shot Envelopes
==================

Percussion has no sustain: a hit starts loud and dies away. Every drum voice
here is a fixed number of samples long and shapes its parts with
exponential decays evaluated on the normalized position t in [0, 1):

    exp(-k t)

    1.0 ┐╲
        │ ╲
        │  ╲__           k = 5: body of a kick, ends near 0.7%
        │     ╲___
    0.0 └─────────────→ t
        0           1

Larger k dies faster: k = 40 is a click, k = 4 rings to the end of the hit.

Vocabulary
----------

  total       Length of the hit in samples, fixed when the voice is created.

  index       How many samples have been produced so far.

  t           index / total. Drives every envelope and frequency sweep.
*/

/// `exp(-rate * t)`
#[inline]
pub fn exp_decay(rate: f32, t: f32) -> f32 {
    (-rate * t).exp()
}

/// Sample counter for a fixed-length hit.
#[derive(Debug, Clone, Copy)]
pub struct OneShot {
    index: usize,
    total: usize,
}

impl OneShot {
    pub fn new(total: usize) -> Self {
        Self { index: 0, total }
    }

    /// Length of a hit lasting `beats` beats at `bpm`.
    ///
    /// Non-positive tempos fall back to 120 BPM.
    pub fn for_beats(beats: f64, bpm: u32, sample_rate: u32) -> Self {
        let bpm = if bpm == 0 { 120 } else { bpm };
        let seconds_per_beat = 60.0 / bpm as f64;
        let total = (seconds_per_beat * beats * sample_rate as f64) as usize;
        Self::new(total)
    }

    /// Advance one sample, returning `(index, t)` for it, or None when the
    /// hit is over.
    #[inline]
    pub fn advance(&mut self) -> Option<(usize, f32)> {
        if self.index >= self.total {
            return None;
        }
        let i = self.index;
        self.index += 1;
        Some((i, i as f32 / self.total as f32))
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn remaining(&self) -> usize {
        self.total - self.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decay_starts_at_one_and_falls() {
        assert_eq!(exp_decay(5.0, 0.0), 1.0);
        assert!(exp_decay(5.0, 0.5) > exp_decay(5.0, 0.9));
        assert!(exp_decay(40.0, 0.5) < exp_decay(5.0, 0.5));
    }

    #[test]
    fn one_shot_runs_exactly_total_samples() {
        let mut shot = OneShot::new(4);
        let ts: Vec<f32> = std::iter::from_fn(|| shot.advance().map(|(_, t)| t)).collect();
        assert_eq!(ts, vec![0.0, 0.25, 0.5, 0.75]);
        assert!(shot.advance().is_none());
        assert_eq!(shot.remaining(), 0);
    }

    #[test]
    fn length_scales_inversely_with_tempo() {
        let slow = OneShot::for_beats(0.5, 60, 44_100);
        let fast = OneShot::for_beats(0.5, 120, 44_100);
        assert_eq!(slow.total(), 22_050);
        assert_eq!(fast.total(), 11_025);
        assert_eq!(OneShot::for_beats(0.5, 0, 44_100).total(), 11_025);
    }
}
