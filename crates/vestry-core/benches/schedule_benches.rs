//! Criterion benchmarks for vestry-core schedule arithmetic.
//!
//! Covers: proportional subtraction, stretch, and schedule merge.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use num_bigint::BigUint;

use vestry_core::amount::Amount;
use vestry_core::constants::DAY_SECONDS;
use vestry_core::merge::disjunct_periods;
use vestry_core::period::Period;
use vestry_core::stretch::stretch_periods;
use vestry_core::subtract::subtract_amount;

/// Two years of daily periods, each holding 10^21 aISLM.
fn daily_schedule(days: u64) -> Vec<Period> {
    let per_day = BigUint::from(10u64).pow(21);
    (0..days)
        .map(|_| Period::new(DAY_SECONDS, Amount::coin("aISLM", per_day.clone())))
        .collect()
}

fn bench_subtract(c: &mut Criterion) {
    let periods = daily_schedule(730);
    // A third of the total forces a residue walk.
    let amount = BigUint::from(10u64).pow(21) * 730u64 / 3u64;

    c.bench_function("subtract_amount_730", |b| {
        b.iter(|| subtract_amount(black_box(&periods), "aISLM", black_box(&amount)))
    });
}

fn bench_stretch(c: &mut Criterion) {
    let periods = daily_schedule(730);

    c.bench_function("stretch_730_by_1095", |b| {
        b.iter(|| stretch_periods(black_box(&periods), black_box(1_095), DAY_SECONDS))
    });
}

fn bench_disjunct(c: &mut Criterion) {
    let a = daily_schedule(365);
    let b_periods = daily_schedule(365);

    c.bench_function("disjunct_offset_365", |b| {
        b.iter(|| {
            disjunct_periods(
                black_box(1_700_000_000),
                black_box(1_700_000_000 + DAY_SECONDS / 2),
                &a,
                &b_periods,
            )
        })
    });
}

criterion_group!(benches, bench_subtract, bench_stretch, bench_disjunct);
criterion_main!(benches);
