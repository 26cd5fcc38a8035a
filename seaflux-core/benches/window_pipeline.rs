//! Flux Pipeline Benchmarks
//!
//! Measures the filter bank and the complete per-window chain.
//!
//! Run with: cargo bench -p seaflux-core --bench window_pipeline

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::time::Duration;

use seaflux_core::{
    constants::normal_gravity, FilterBank, FilterConfig, FluxProcessor, MotionInputs,
    ProcessingConfig,
};

fn channels(n: usize) -> Vec<Vec<f64>> {
    let g = normal_gravity(30.0);
    let wave = |k: f64, a: f64, c: f64| -> Vec<f64> {
        (0..n).map(|i| c + a * (i as f64 * k).sin()).collect()
    };
    vec![
        (0..n).map(|i| (i + 1) as f64 / 10.0).collect(),
        wave(0.31, 1.0, 8.0),
        wave(0.17, 0.5, 0.0),
        wave(0.23, 0.3, 0.0),
        wave(0.001, 4.0, 90.0),
        wave(0.1, 0.05, 0.0),
        wave(0.1, 0.05, 0.0),
        vec![0.0; n],
        wave(0.1, 0.4, 0.0),
        wave(0.1, 0.4, 0.0),
        vec![g; n],
        vec![30.0; n],
        wave(0.23, 30.0, 34_500.0),
    ]
}

fn inputs(ch: &[Vec<f64>]) -> MotionInputs<'_> {
    MotionInputs {
        timestamps: &ch[0],
        wind: [&ch[1], &ch[2], &ch[3]],
        heading: &ch[4],
        rate: [&ch[5], &ch[6], &ch[7]],
        accel: [&ch[8], &ch[9], &ch[10]],
        latitude: &ch[11],
    }
}

fn bench_filtfilt(c: &mut Criterion) {
    let bank = FilterBank::design(&FilterConfig::default(), 10.0);
    let signal: Vec<f64> = (0..12_000).map(|i| (i as f64 * 0.05).sin()).collect();

    let mut group = c.benchmark_group("filtfilt");
    group.throughput(Throughput::Elements(signal.len() as u64));
    group.bench_function("primary_highpass", |b| {
        b.iter(|| bank.primary().filtfilt(black_box(&signal)))
    });
    group.bench_function("alternate_lowpass", |b| {
        b.iter(|| bank.alternate().lowpass.filtfilt(black_box(&signal)))
    });
    group.finish();
}

fn bench_windows(c: &mut Criterion) {
    let mut group = c.benchmark_group("flux_and_wind");
    group.measurement_time(Duration::from_secs(10));
    group.sample_size(10);

    let processor = FluxProcessor::new(ProcessingConfig::default()).expect("default config");
    for windows in [1usize, 4] {
        // a gap between windows keeps every segment exactly one window long
        let mut ch = channels(12_000 * windows);
        for (i, t) in ch[0].iter_mut().enumerate() {
            *t += (i / 12_000) as f64 * 3_600.0;
        }
        let sound = ch[12].clone();

        group.throughput(Throughput::Elements(windows as u64));
        group.bench_with_input(BenchmarkId::from_parameter(windows), &ch, |b, ch| {
            b.iter(|| processor.flux_and_wind(black_box(&inputs(ch)), black_box(&sound)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_filtfilt, bench_windows);
criterion_main!(benches);
