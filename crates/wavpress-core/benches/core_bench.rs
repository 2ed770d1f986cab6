//! Criterion benchmarks for wavpress-core stages
//!
//! Run with: cargo bench -p wavpress-core
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use wavpress_core::{
    CompressionConfig, Compressor, Interpolation, SampleBuffer, compress, render_with,
};

const SAMPLE_RATE: u32 = 48000;
const FRAME_COUNTS: &[usize] = &[4800, 48000, 480000];

fn generate_test_buffer(frames: usize) -> SampleBuffer {
    let samples: Vec<f32> = (0..frames)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.5
        })
        .collect();
    SampleBuffer::new(SAMPLE_RATE, vec![samples.clone(), samples]).unwrap()
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("Render");

    for &frames in FRAME_COUNTS {
        let buffer = generate_test_buffer(frames);

        for (name, kernel) in [("linear", Interpolation::Linear), ("cubic", Interpolation::Cubic)] {
            group.bench_with_input(BenchmarkId::new(name, frames), &frames, |b, _| {
                b.iter(|| black_box(render_with(black_box(&buffer), 44100, kernel).unwrap()));
            });
        }
    }

    group.finish();
}

fn bench_compress(c: &mut Criterion) {
    let mut group = c.benchmark_group("Compress");
    let config = CompressionConfig::upload();

    for &frames in FRAME_COUNTS {
        let buffer = generate_test_buffer(frames);
        group.bench_with_input(BenchmarkId::new("buffer", frames), &frames, |b, _| {
            b.iter(|| black_box(compress(black_box(&buffer), &config).unwrap()));
        });
    }

    group.bench_function("process_sample", |b| {
        let mut comp = Compressor::new(&config, SAMPLE_RATE as f32);
        b.iter(|| black_box(comp.process(black_box(0.7))));
    });

    group.finish();
}

criterion_group!(benches, bench_render, bench_compress);
criterion_main!(benches);
