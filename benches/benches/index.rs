// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use tessera_index::{QuadTree, Rect};

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

const SCREEN: Rect = Rect::new(0, 0, 200, 60);

/// Random widget-sized boxes that fit the screen.
fn boxes(n: usize, seed: u64) -> Vec<Rect> {
    let mut rng = Lcg::new(seed);
    (0..n)
        .map(|_| {
            let w = 1 + rng.gen_range(12);
            let h = 1 + rng.gen_range(3);
            let x = rng.gen_range(SCREEN.width - w);
            let y = rng.gen_range(SCREEN.height - h);
            Rect::new(x, y, w, h)
        })
        .collect()
}

fn points(n: usize, seed: u64) -> Vec<(i32, i32)> {
    let mut rng = Lcg::new(seed);
    (0..n)
        .map(|_| (rng.gen_range(SCREEN.width), rng.gen_range(SCREEN.height)))
        .collect()
}

fn bench_point_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("tessera_index/point");
    let probes = points(256, 0x7E55_E1A0_0000_0002);

    for &n in &[64_usize, 512, 4_096] {
        let rects = boxes(n, 0x7E55_E1A0_0000_0001);
        let mut tree = QuadTree::new(SCREEN);
        for (i, r) in rects.iter().enumerate() {
            tree.insert(i, *r);
        }

        group.bench_function(format!("quadtree(n={n})"), |b| {
            b.iter(|| {
                let mut hits = 0;
                for &(x, y) in &probes {
                    tree.visit_point(x, y, |_| hits += 1);
                }
                black_box(hits)
            });
        });

        group.bench_function(format!("linear(n={n})"), |b| {
            b.iter(|| {
                let mut hits = 0;
                for &(x, y) in &probes {
                    hits += rects.iter().filter(|r| r.contains_point(x, y)).count();
                }
                black_box(hits)
            });
        });
    }

    group.finish();
}

fn bench_region_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("tessera_index/region");
    let rects = boxes(4_096, 0x7E55_E1A0_0000_0003);
    let mut tree = QuadTree::new(SCREEN);
    for (i, r) in rects.iter().enumerate() {
        tree.insert(i, *r);
    }
    let probe = Rect::new(90, 25, 20, 10);

    group.bench_function("quadtree(n=4096)", |b| {
        b.iter(|| black_box(tree.query_region(black_box(probe))));
    });
    group.bench_function("linear(n=4096)", |b| {
        b.iter(|| {
            black_box(
                rects
                    .iter()
                    .enumerate()
                    .filter(|(_, r)| r.touches(&probe))
                    .map(|(i, _)| i)
                    .collect::<Vec<_>>(),
            )
        });
    });

    group.finish();
}

fn bench_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("tessera_index/churn");
    let rects = boxes(1_024, 0x7E55_E1A0_0000_0004);
    let moved = boxes(1_024, 0x7E55_E1A0_0000_0005);
    let mut tree = QuadTree::new(SCREEN);
    for (i, r) in rects.iter().enumerate() {
        tree.insert(i, *r);
    }

    group.bench_function("update(n=1024)", |b| {
        let mut flip = false;
        b.iter(|| {
            let src = if flip { &rects } else { &moved };
            for (i, r) in src.iter().enumerate() {
                tree.update(i, *r);
            }
            flip = !flip;
        });
    });

    group.finish();
}

criterion_group!(benches, bench_point_queries, bench_region_queries, bench_churn);
criterion_main!(benches);
