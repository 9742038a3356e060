//! Criterion benchmarks centred on the static fast paths and the promotion
//! boundary.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand_xoshiro::{
    rand_core::{RngCore, SeedableRng},
    Xoshiro128StarStar,
};
use svint::{add, addmul, mul, mul_2exp, Integer1, Integer2};

/// Left-shifting a vector of small signed values, the classic all-static
/// workload for a single-limb capacity.
fn vec_lshift_signed(c: &mut Criterion) {
    let mut rng = Xoshiro128StarStar::seed_from_u64(0);
    let values: Vec<(Integer1, usize)> = (0..1000)
        .map(|_| {
            let v = Integer1::from(rng.next_u32() as i32);
            let s = (rng.next_u32() % 16) as usize;
            (v, s)
        })
        .collect();
    c.bench_function("integer1_vec_lshift_signed", |b| {
        b.iter(|| {
            let mut out = Integer1::new();
            for (v, s) in &values {
                mul_2exp(&mut out, v, *s);
                black_box(&out);
            }
        })
    });
}

/// A long chain of two-limb additions that never leaves static storage.
fn static_add_chain(c: &mut Criterion) {
    let mut rng = Xoshiro128StarStar::seed_from_u64(1);
    let values: Vec<Integer2> = (0..1000)
        .map(|_| Integer2::from(rng.next_u64() as i64))
        .collect();
    c.bench_function("integer2_static_add_chain", |b| {
        b.iter(|| {
            let mut acc = Integer2::new();
            let mut tmp = Integer2::new();
            for v in &values {
                add(&mut tmp, &acc, v);
                core::mem::swap(&mut acc, &mut tmp);
            }
            black_box(acc)
        })
    });
}

/// Squaring across the promotion boundary: every product overflows the
/// static buffer, exercising promotion plus the descriptor pool.
fn promoting_mul(c: &mut Criterion) {
    let mut rng = Xoshiro128StarStar::seed_from_u64(2);
    let values: Vec<Integer2> = (0..200)
        .map(|_| {
            let mut v = Integer2::from(rng.next_u64());
            v <<= 64;
            v
        })
        .collect();
    c.bench_function("integer2_promoting_mul", |b| {
        b.iter(|| {
            for v in &values {
                // a fresh static destination promotes every round; dropping
                // it hands the descriptor back to the pool
                let mut out = Integer2::new();
                mul(&mut out, v, v);
                black_box(&out);
            }
        })
    });
}

/// Dot-product accumulation through the fused kernel.
fn addmul_dot(c: &mut Criterion) {
    let mut rng = Xoshiro128StarStar::seed_from_u64(3);
    let pairs: Vec<(Integer2, Integer2)> = (0..1000)
        .map(|_| {
            (
                Integer2::from(rng.next_u32() as i32),
                Integer2::from(rng.next_u32() as i32),
            )
        })
        .collect();
    c.bench_function("integer2_addmul_dot", |b| {
        b.iter(|| {
            let mut acc = Integer2::new();
            for (x, y) in &pairs {
                addmul(&mut acc, x, y);
            }
            black_box(acc)
        })
    });
}

criterion_group!(
    benches,
    vec_lshift_signed,
    static_add_chain,
    promoting_mul,
    addmul_dot
);
criterion_main!(benches);
