//! Benchmarks for submission and graph execution overhead

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use parking_lot::Mutex;
use std::sync::Arc;
use taskweave::prelude::*;

fn bench_run_async_roundtrip(c: &mut Criterion) {
    let runner = TaskRunner::with_threads(4).unwrap();

    c.bench_function("run_async_roundtrip", |b| {
        b.iter(|| runner.run_async(|| black_box(21) * 2).wait().unwrap());
    });
}

fn bench_leaf_chain(c: &mut Criterion) {
    let runner = TaskRunner::with_threads(4).unwrap();
    let mut node = leaf(|x: u64| x + 1);
    for _ in 0..15 {
        node = node.then(|x: u64| x + 1).unwrap();
    }
    let out = Arc::new(Mutex::new(0u64));

    c.bench_function("sync_chain_16", |b| {
        b.iter(|| {
            let sink = out.clone();
            sync_execute(&runner, &node, move |x: u64| *sink.lock() = x, (black_box(0u64),))
                .unwrap();
        });
    });
}

fn bench_fan_out(c: &mut Criterion) {
    let runner = TaskRunner::with_threads(4).unwrap();
    let branches: Vec<Node> = (0..8u64).map(|i| leaf(move |x: u64| x * i)).collect();
    let node = when_all(branches).unwrap();

    c.bench_function("async_fan_out_8", |b| {
        b.iter(|| {
            let values = async_execute(&runner, &node, (black_box(3u64),))
                .wait()
                .unwrap();
            black_box(values)
        });
    });
}

criterion_group!(benches, bench_run_async_roundtrip, bench_leaf_chain, bench_fan_out);
criterion_main!(benches);
