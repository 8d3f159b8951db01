#[macro_use]
extern crate criterion;
extern crate mandelcolor;
extern crate num;

use criterion::{black_box, Criterion};
use mandelcolor::{evaluate, BernsteinPalette, Palette, BLACK};
use num::Complex;

// A point close to the boundary, where the loop actually has to work
// for its answer.
fn escape_benchmark(c: &mut Criterion) {
    c.bench_function("evaluate near the boundary", |b| {
        let point = Complex::new(-0.7453, 0.1127);
        b.iter(|| evaluate(black_box(&point), 1000))
    });
}

fn palette_benchmark(c: &mut Criterion) {
    c.bench_function("smooth-color a row of escapes", |b| {
        b.iter(|| {
            let mut palette = BernsteinPalette::new(500);
            let mut last = BLACK;
            for column in 0..256 {
                let point = Complex::new(-2.0 + (column as f64) * (4.0 / 256.0), 0.5);
                last = palette.color(&evaluate(&point, 500));
            }
            black_box(last)
        })
    });
}

criterion_group!(benches, escape_benchmark, palette_benchmark);
criterion_main!(benches);
