//! Criterion benchmarks for the yield pipeline.
//!
//! Benchmarks:
//! 1. Yield calculator under both growth strategies
//! 2. Annual aggregation
//! 3. Adapter normalization (NASDAQ join on date)

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use divlab_core::data::nasdaq::{parse_nasdaq, NasdaqPayload};
use divlab_core::{aggregate_annual, GrowthStrategy, PricePoint, YieldCalculator};

// ── Helpers ──────────────────────────────────────────────────────────

fn make_monthly(n: usize) -> Vec<PricePoint> {
    (0..n)
        .map(|i| {
            let date =
                chrono::NaiveDate::from_ymd_opt(1990 + (i / 12) as i32, (i % 12) as u32 + 1, 28)
                    .unwrap();
            let close = 50.0 + (i as f64 * 0.1).sin() * 10.0;
            let dividend = if i % 3 == 2 { 0.25 + i as f64 * 0.001 } else { 0.0 };
            PricePoint::raw(date, close, close + 1.0, close - 1.0, close, close * 0.95, 1_000, dividend)
        })
        .collect()
}

fn make_nasdaq_payload(n: usize) -> NasdaqPayload {
    let base = chrono::NaiveDate::from_ymd_opt(1995, 1, 3).unwrap();
    let mut rows = Vec::with_capacity(n);
    let mut dividends = Vec::new();
    for i in 0..n {
        let date = (base + chrono::Duration::days(i as i64)).format("%m/%d/%Y").to_string();
        rows.push(format!(
            r#"{{"date":"{date}","close":"${:.2}","volume":"1,000,000","open":"N/A","high":"N/A","low":"N/A"}}"#,
            40.0 + (i % 50) as f64 * 0.1
        ));
        if i % 63 == 0 {
            dividends.push(format!(r#"{{"exOrEffDate":"{date}","amount":"$0.31"}}"#));
        }
    }
    let prices = format!(r#"{{"data":{{"tradesTable":{{"rows":[{}]}}}}}}"#, rows.join(","));
    let divs = format!(r#"{{"data":{{"dividends":{{"rows":[{}]}}}}}}"#, dividends.join(","));
    NasdaqPayload {
        prices: serde_json::from_str(&prices).unwrap(),
        dividends: serde_json::from_str(&divs).unwrap(),
        fetched_on: base,
    }
}

// ── 1. Yield Calculator ──────────────────────────────────────────────

fn bench_yield_calculator(c: &mut Criterion) {
    let mut group = c.benchmark_group("yield_calculator");

    for &months in &[120, 360, 600] {
        let points = make_monthly(months);
        for strategy in [GrowthStrategy::FixedOffset, GrowthStrategy::NearestInPriorYear] {
            let calc = YieldCalculator::new(strategy);
            group.bench_with_input(
                BenchmarkId::new(format!("{strategy:?}"), months),
                &months,
                |b, _| b.iter(|| calc.calculate(black_box(&points))),
            );
        }
    }

    group.finish();
}

// ── 2. Annual Aggregation ────────────────────────────────────────────

fn bench_annual(c: &mut Criterion) {
    let mut group = c.benchmark_group("annual_aggregation");

    for &months in &[120, 600] {
        let points = YieldCalculator::default().calculate(&make_monthly(months));
        group.bench_with_input(BenchmarkId::from_parameter(months), &months, |b, _| {
            b.iter(|| aggregate_annual(black_box(&points)))
        });
    }

    group.finish();
}

// ── 3. Normalization ─────────────────────────────────────────────────

fn bench_nasdaq_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("nasdaq_normalize");

    // Roughly 30 years of daily rows
    let days = 7_500;
    group.bench_function(BenchmarkId::from_parameter(days), |b| {
        b.iter_batched(
            || make_nasdaq_payload(days),
            |payload| parse_nasdaq("BENCH", payload),
            criterion::BatchSize::LargeInput,
        )
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_yield_calculator,
    bench_annual,
    bench_nasdaq_normalize,
);
criterion_main!(benches);
