//! Criterion benchmarks for the interval arithmetic kernel.
//!
//! Compares the three backends on the operations the box processor spends
//! the bulk of its time in: arithmetic, `sin`/`cos` (the rotation/projection
//! hulls), and `sqrt` (vector lengths in the hull merge).

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rupert::interval::{ArbInterval, FastInterval, HwInterval, Interval};

fn random_bounds(rng: &mut StdRng) -> (f64, f64) {
    let a = rng.gen_range(-10.0..10.0);
    let b = rng.gen_range(-10.0..10.0);
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

fn bench_arithmetic<I: Interval>(c: &mut Criterion, name: &str) {
    let mut rng = StdRng::seed_from_u64(7);
    let operands: Vec<(I, I)> = (0..256)
        .map(|_| {
            let (a_lo, a_hi) = random_bounds(&mut rng);
            let (b_lo, b_hi) = random_bounds(&mut rng);
            (I::from_bounds(a_lo, a_hi), I::from_bounds(b_lo, b_hi))
        })
        .collect();

    c.bench_function(&format!("{name}/add_mul"), |b| {
        b.iter(|| {
            for &(a, b2) in &operands {
                black_box(a + b2);
                black_box(a * b2);
            }
        })
    });
}

fn bench_trig<I: Interval>(c: &mut Criterion, name: &str) {
    let mut rng = StdRng::seed_from_u64(11);
    let angles: Vec<I> = (0..256)
        .map(|_| {
            let (lo, hi) = random_bounds(&mut rng);
            I::from_bounds(lo, hi)
        })
        .collect();

    c.bench_function(&format!("{name}/sin_cos"), |b| {
        b.iter(|| {
            for &a in &angles {
                black_box(a.sin());
                black_box(a.cos());
            }
        })
    });
}

fn bench_sqrt<I: Interval>(c: &mut Criterion, name: &str) {
    let mut rng = StdRng::seed_from_u64(13);
    let inputs: Vec<I> = (0..256)
        .map(|_| {
            let (lo, hi) = random_bounds(&mut rng);
            I::from_bounds(lo.abs(), hi.abs().max(lo.abs()))
        })
        .collect();

    c.bench_function(&format!("{name}/sqrt"), |b| {
        b.iter(|| {
            for &a in &inputs {
                black_box(a.sqrt());
            }
        })
    });
}

fn bench_backends(c: &mut Criterion) {
    bench_arithmetic::<FastInterval>(c, "fast");
    bench_arithmetic::<HwInterval>(c, "hw");
    bench_arithmetic::<ArbInterval>(c, "arb");

    bench_trig::<FastInterval>(c, "fast");
    bench_trig::<HwInterval>(c, "hw");
    bench_trig::<ArbInterval>(c, "arb");

    bench_sqrt::<FastInterval>(c, "fast");
    bench_sqrt::<HwInterval>(c, "hw");
    bench_sqrt::<ArbInterval>(c, "arb");
}

criterion_group!(benches, bench_backends);
criterion_main!(benches);
