//! Criterion benchmarks for the ring modulator kernel
//!
//! Run with: cargo bench -p diodering-modules
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use diodering_core::{InputPort, Module, OutputPort};
use diodering_modules::{
    Polarity, RING_OUTPUT_COUNT, RingInputs, RingModulator, RingOutputs, RingParams,
};

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512, 1024];

fn generate_test_signal(size: usize, freq: f32) -> Vec<f32> {
    (0..size)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE;
            (2.0 * std::f32::consts::PI * freq * t).sin() * 5.0
        })
        .collect()
}

fn bench_step(c: &mut Criterion, name: &str, params: RingParams) {
    let mut group = c.benchmark_group(name);

    for &block_size in BLOCK_SIZES {
        let input = generate_test_signal(block_size, 440.0);
        let carrier = generate_test_signal(block_size, 1000.0);

        group.bench_with_input(
            BenchmarkId::from_parameter(block_size),
            &block_size,
            |b, _| {
                let mut ring = RingModulator::new();
                let mut outputs = RingOutputs::all_active();
                b.iter(|| {
                    for (&x, &y) in input.iter().zip(&carrier) {
                        ring.step(black_box(&RingInputs::new(x, y)), &params, &mut outputs);
                    }
                    black_box(outputs.ring.voltage)
                });
            },
        );
    }

    group.finish();
}

fn bench_bipolar(c: &mut Criterion) {
    bench_step(c, "RingModulator/bipolar", RingParams::default());
}

fn bench_rectified(c: &mut Criterion) {
    let params = RingParams {
        input_polarity: Polarity::Positive,
        carrier_polarity: Polarity::Negative,
        ..RingParams::default()
    };
    bench_step(c, "RingModulator/rectified", params);
}

fn bench_host_path(c: &mut Criterion) {
    let input = generate_test_signal(512, 440.0);
    let carrier = generate_test_signal(512, 1000.0);

    c.bench_function("RingModulator/module_process_512", |b| {
        let mut ring = RingModulator::new();
        let mut outputs = [OutputPort::active(); RING_OUTPUT_COUNT];
        b.iter(|| {
            for (&x, &y) in input.iter().zip(&carrier) {
                let inputs = [
                    InputPort::connected(x),
                    InputPort::connected(y),
                    InputPort::disconnected(),
                ];
                ring.process(black_box(&inputs), &mut outputs);
            }
            black_box(outputs[0].voltage)
        });
    });

    // Gated tick: nothing downstream
    c.bench_function("RingModulator/all_inactive_512", |b| {
        let mut ring = RingModulator::new();
        let mut outputs = RingOutputs::default();
        let params = RingParams::default();
        b.iter(|| {
            for (&x, &y) in input.iter().zip(&carrier) {
                ring.step(black_box(&RingInputs::new(x, y)), &params, &mut outputs);
            }
            black_box(outputs.ring.voltage)
        });
    });
}

criterion_group!(benches, bench_bipolar, bench_rectified, bench_host_path);
criterion_main!(benches);
