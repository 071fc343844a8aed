use std::f32::consts::TAU;

/*
One-Pole Filter
===============

    y[n] = y[n-1] + a * (x[n] - y[n-1])

`a` near 1 lets almost everything through, `a` near 0 smooths heavily.
The high-pass output is simply what the low-pass took away: x - y.

| output    | constructed by   | passes       |
| --------- | ---------------- | ------------ |
| low-pass  | y                | below cutoff |
| high-pass | x - y            | above cutoff |

Cheap and stable for any `a` in (0, 1], which is all the drum voices need
to split noise into a dull "body" band and a bright "sizzle" band.
*/

#[derive(Debug, Clone, Copy)]
pub struct OnePole {
    coefficient: f32,
    state: f32,
}

impl OnePole {
    /// Use a raw smoothing coefficient, clamped to (0, 1].
    pub fn from_coefficient(coefficient: f32) -> Self {
        Self {
            coefficient: coefficient.clamp(f32::EPSILON, 1.0),
            state: 0.0,
        }
    }

    /// Derive the coefficient from a -3dB cutoff.
    pub fn from_cutoff(cutoff_hz: f32, sample_rate: f32) -> Self {
        let coefficient = 1.0 - (-TAU * cutoff_hz / sample_rate.max(1.0)).exp();
        Self::from_coefficient(coefficient)
    }

    /// Feed one sample, get the low-passed value back.
    #[inline]
    pub fn lowpass(&mut self, input: f32) -> f32 {
        self.state += self.coefficient * (input - self.state);
        self.state
    }

    /// Feed one sample, get the high-passed value back.
    #[inline]
    pub fn highpass(&mut self, input: f32) -> f32 {
        input - self.lowpass(input)
    }
}
