// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use tessera_region::RegionMerger;

#[derive(Clone)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u32(&mut self) -> u32 {
        // Numerical Recipes LCG parameters.
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 32) as u32
    }

    fn gen_range(&mut self, upper_exclusive: i32) -> i32 {
        (self.next_u32() % upper_exclusive as u32) as i32
    }
}

/// Small marks scattered over a 200x60 surface.
fn marks(n: usize, seed: u64) -> Vec<(i32, i32, i32, i32)> {
    let mut rng = Lcg::new(seed);
    (0..n)
        .map(|_| (rng.gen_range(190), rng.gen_range(58), 1 + rng.gen_range(8), 1))
        .collect()
}

fn bench_marking(c: &mut Criterion) {
    let mut group = c.benchmark_group("tessera_region");

    for &n in &[8_usize, 32, 48] {
        let input = marks(n, 0xD1A7_0000_0000_0001);
        group.bench_function(format!("mark_and_merge(n={n})"), |b| {
            b.iter_batched(
                RegionMerger::new,
                |mut merger| {
                    for &(x, y, w, h) in &input {
                        merger.mark_region(x, y, w, h);
                    }
                    black_box(merger.merge_regions(200, 60))
                },
                BatchSize::SmallInput,
            );
        });
    }

    // A typing cursor: every mark extends the previous region.
    group.bench_function("mark_adjacent(n=200)", |b| {
        b.iter_batched(
            RegionMerger::new,
            |mut merger| {
                for x in 0..200 {
                    merger.mark_region(x, 10, 1, 1);
                }
                black_box(merger.len())
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(benches, bench_marking);
criterion_main!(benches);
