//! Pattern codec benchmarks.
//!
//! Measures encode, lenient decode, strict decode and validation over a
//! few representative inputs, plus one send through the loopback service.
//!
//! Run with: cargo bench --bench codec
//! Results saved to: target/criterion/

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use glyph_matrix::{
    ConnectionManager, Grid, LoopbackService, TOTAL_PIXELS, decode, decode_strict, encode,
    validate,
};
use tokio::runtime::Runtime;

// ============================================================================
// Inputs
// ============================================================================

fn gradient() -> Grid {
    let cells: Vec<u8> = (0..TOTAL_PIXELS).map(|i| (i % 16) as u8 * 17).collect();
    Grid::from_slice(&cells)
}

fn inputs() -> Vec<(&'static str, String)> {
    let grid = gradient();
    vec![
        ("compact", grid.encode(false)),
        ("lined", grid.encode(true)),
        ("noisy", grid.encode(true).replace('\n', " ,\r\n")),
        ("invalid", format!("{}xyz", grid.encode(false))),
    ]
}

// ============================================================================
// Benchmarks
// ============================================================================

fn bench_encode(c: &mut Criterion) {
    let grid = gradient();
    let mut group = c.benchmark_group("encode");

    for breaks in [false, true] {
        group.bench_with_input(BenchmarkId::new("grid", breaks), &breaks, |b, &breaks| {
            b.iter(|| encode(black_box(&grid), breaks));
        });
    }

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    for (name, text) in inputs() {
        group.bench_with_input(BenchmarkId::new("lenient", name), &text, |b, text| {
            b.iter(|| decode(black_box(text)));
        });
        group.bench_with_input(BenchmarkId::new("strict", name), &text, |b, text| {
            b.iter(|| decode_strict(black_box(text)).is_ok());
        });
        group.bench_with_input(BenchmarkId::new("validate", name), &text, |b, text| {
            b.iter(|| validate(black_box(text)));
        });
    }

    group.finish();
}

fn bench_send(c: &mut Criterion) {
    let rt = Runtime::new().expect("tokio runtime");
    let grid = gradient();

    let manager = rt.block_on(async {
        let manager = ConnectionManager::builder()
            .service(LoopbackService::new())
            .build()
            .expect("manager");
        manager.connect().await.expect("connect");
        manager
    });

    c.bench_function("send_connected", |b| {
        b.to_async(&rt).iter(|| async { manager.send(black_box(&grid)).await });
    });
}

criterion_group!(benches, bench_encode, bench_decode, bench_send);
criterion_main!(benches);
