//! Benchmarks for the one-pole filter and the noise source.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use tunkul::dsp::{Noise, OnePole};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &size in BLOCK_SIZES {
        let mut noise = Noise::with_seed(7);
        let input: Vec<f32> = (0..size).map(|_| noise.next_sample()).collect();
        let mut buffer = vec![0.0f32; size];

        let mut filter = OnePole::from_cutoff(3_000.0, SAMPLE_RATE as f32);
        group.bench_with_input(BenchmarkId::new("lowpass", size), &size, |b, _| {
            b.iter(|| {
                for (out, &x) in buffer.iter_mut().zip(&input) {
                    *out = filter.lowpass(black_box(x));
                }
            })
        });

        let mut filter = OnePole::from_cutoff(7_000.0, SAMPLE_RATE as f32);
        group.bench_with_input(BenchmarkId::new("highpass", size), &size, |b, _| {
            b.iter(|| {
                for (out, &x) in buffer.iter_mut().zip(&input) {
                    *out = filter.highpass(black_box(x));
                }
            })
        });

        let mut noise = Noise::with_seed(11);
        group.bench_with_input(BenchmarkId::new("noise", size), &size, |b, _| {
            b.iter(|| {
                for out in buffer.iter_mut() {
                    *out = noise.next_sample();
                }
                black_box(&buffer);
            })
        });
    }

    group.finish();
}
