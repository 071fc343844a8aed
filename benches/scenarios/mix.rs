//! Benchmarks for mixing many overlapping hits.
//!
//! Simulates a busy pattern: every instrument triggered repeatedly so dozens
//! of voices overlap inside one block.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use tunkul::mixer::Mixer;
use tunkul::synth::Instrument;
use tunkul::voices::Drum;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

fn fill(mixer: &Mixer, hits: usize) {
    mixer.reset();
    for i in 0..hits {
        let drum = Drum::ALL[i % Drum::ALL.len()];
        mixer.schedule(drum.new_voice(120, SAMPLE_RATE), (i % 4) as u64 * 32);
    }
}

pub fn bench_mix(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/mix");

    for &size in BLOCK_SIZES {
        for hits in [5usize, 40] {
            let mixer = Mixer::new();
            let mut mono = vec![0.0f32; size];
            group.bench_with_input(
                BenchmarkId::new(format!("{hits}_voices_f32"), size),
                &size,
                |b, _| {
                    b.iter_batched(
                        || fill(&mixer, hits),
                        |_| mixer.render_block(black_box(&mut mono), 1),
                        criterion::BatchSize::SmallInput,
                    )
                },
            );

            let mut stereo = vec![0i16; size * 2];
            group.bench_with_input(
                BenchmarkId::new(format!("{hits}_voices_i16_stereo"), size),
                &size,
                |b, _| {
                    b.iter_batched(
                        || fill(&mixer, hits),
                        |_| mixer.render_block(black_box(&mut stereo), 2),
                        criterion::BatchSize::SmallInput,
                    )
                },
            );
        }
    }

    group.finish();
}
