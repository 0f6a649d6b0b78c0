//! Criterion benchmarks for directional-movement hot paths.
//!
//! Benchmarks:
//! 1. Full pipeline over bars (differencing, masking, smoothing, composition)
//! 2. Each smoothing mode in isolation
//! 3. The running-sum native backend

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use dirmove_core::data::{generate_synthetic_bars, high_low_series};
use dirmove_core::domain::{Bar, OptSeries};
use dirmove_core::indicators::{directional_diff, mask_and_clamp};
use dirmove_core::{dm, dm_bars, DmParams, MaMode, MovingAverage, NativeDm, WilderSumBackend};

// ── Helpers ──────────────────────────────────────────────────────────

fn make_bars(n: usize) -> Vec<Bar> {
    let start = chrono::NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
    generate_synthetic_bars("BENCH", start, n, 42)
}

fn internal() -> DmParams {
    DmParams {
        use_native: false,
        ..DmParams::default()
    }
}

// ── 1. Pipeline ──────────────────────────────────────────────────────

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("dm_pipeline");

    for &bar_count in &[252, 1260, 2520] {
        let bars = make_bars(bar_count);
        let (high, low) = high_low_series(&bars).unwrap();
        let params = internal();

        group.bench_with_input(BenchmarkId::new("series", bar_count), &bar_count, |b, _| {
            b.iter(|| dm(Some(black_box(&high)), Some(black_box(&low)), &params, None));
        });

        group.bench_with_input(BenchmarkId::new("bars", bar_count), &bar_count, |b, _| {
            b.iter(|| dm_bars(black_box(&bars), &params, None));
        });
    }

    group.finish();
}

// ── 2. Smoothing modes ───────────────────────────────────────────────

fn bench_smoothers(c: &mut Criterion) {
    let mut group = c.benchmark_group("ma_smooth");

    let bars = make_bars(2520);
    let high: Vec<f64> = bars.iter().map(|b| b.high).collect();
    let low: Vec<f64> = bars.iter().map(|b| b.low).collect();
    let (up, down) = directional_diff(&high, &low, 1);
    let candidates: OptSeries = mask_and_clamp(&up, &down).positive;

    for mode in MaMode::ALL {
        group.bench_function(mode.as_str(), |b| {
            b.iter(|| mode.smooth(black_box(&candidates), 14));
        });
    }

    group.finish();
}

// ── 3. Native backend ────────────────────────────────────────────────

fn bench_native(c: &mut Criterion) {
    let mut group = c.benchmark_group("native_backend");

    let bars = make_bars(2520);
    let high: Vec<f64> = bars.iter().map(|b| b.high).collect();
    let low: Vec<f64> = bars.iter().map(|b| b.low).collect();
    let backend = WilderSumBackend;

    group.bench_function("wilder_sum_plus_minus_2520", |b| {
        b.iter(|| {
            let plus = backend.plus_dm(black_box(&high), black_box(&low), 14);
            let minus = backend.minus_dm(black_box(&high), black_box(&low), 14);
            black_box((plus, minus));
        });
    });

    let bars_params = DmParams::default();
    group.bench_function("dm_bars_native_2520", |b| {
        b.iter(|| dm_bars(black_box(&bars), &bars_params, Some(&backend)));
    });

    group.finish();
}

criterion_group!(benches, bench_pipeline, bench_smoothers, bench_native);
criterion_main!(benches);
