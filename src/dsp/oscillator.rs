use std::f32::consts::TAU;

/// Sine oscillator whose frequency glides linearly from `start_hz` to
/// `end_hz` over the life of a hit.
///
/// Phase is accumulated rather than computed from time, so changing the
/// frequency mid-sweep never produces a discontinuity.
#[derive(Debug, Clone, Copy)]
pub struct Sweep {
    start_hz: f32,
    end_hz: f32,
    sample_rate: f32,
    phase: f32,
}

impl Sweep {
    pub fn new(start_hz: f32, end_hz: f32, sample_rate: f32) -> Self {
        Self {
            start_hz,
            end_hz,
            sample_rate: sample_rate.max(1.0),
            phase: 0.0,
        }
    }

    /// Next sample at normalized position `t` (0 = start of hit, 1 = end).
    #[inline]
    pub fn next_sample(&mut self, t: f32) -> f32 {
        let freq = self.start_hz + (self.end_hz - self.start_hz) * t;
        self.phase = (self.phase + TAU * freq / self.sample_rate) % TAU;
        self.phase.sin()
    }
}
