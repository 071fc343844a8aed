//! Benchmarks for rendering complete drum hits.
//!
//! Each iteration builds a fresh voice and drains it, which is what one
//! trigger costs the audio thread over the lifetime of the hit.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use tunkul::synth::{Instrument, Voice};
use tunkul::voices::Drum;

use crate::SAMPLE_RATE;

fn drain(mut voice: Box<dyn Voice>) -> f32 {
    let mut acc = 0.0f32;
    while let Some(s) = voice.next_sample() {
        acc += s;
    }
    acc
}

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/voices");

    for drum in Drum::ALL {
        group.bench_with_input(BenchmarkId::new(drum.id(), 120), &drum, |b, drum| {
            b.iter(|| black_box(drain(drum.new_voice(120, SAMPLE_RATE))))
        });
    }

    group.finish();
}
