// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use tessera_pool::{Recycle, RecyclePool};

#[derive(Default)]
struct Label {
    text: String,
    parent: Option<u32>,
    children: Vec<u32>,
}

impl Recycle for Label {
    fn detach(&mut self) {
        self.parent = None;
        self.children.clear();
    }
}

fn make(text: &&'static str) -> Label {
    Label {
        text: String::from(*text),
        ..Label::default()
    }
}

fn bench_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("tessera_pool");

    group.bench_function("acquire_release(batch=32)", |b| {
        let mut pool: RecyclePool<Label, &'static str> = RecyclePool::new();
        pool.register_factory_with_reset("label", make, |label, text| {
            label.text.clear();
            label.text.push_str(text);
        });
        let mut live = Vec::with_capacity(32);
        b.iter(|| {
            for _ in 0..32 {
                live.extend(pool.acquire("label", &"hello"));
            }
            for label in live.drain(..) {
                let _ = pool.release("label", label);
            }
            black_box(pool.pool_size("label"))
        });
    });

    group.bench_function("allocate_drop(batch=32)", |b| {
        let mut live = Vec::with_capacity(32);
        b.iter(|| {
            for _ in 0..32 {
                live.push(make(&"hello"));
            }
            live.clear();
            black_box(live.len())
        });
    });

    group.finish();
}

criterion_group!(benches, bench_churn);
criterion_main!(benches);
