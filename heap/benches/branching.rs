use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dheap::DHeap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SIZE: usize = 10_000;

fn priorities() -> Vec<(usize, i64)> {
    let mut rng = StdRng::seed_from_u64(0xd4ea9);
    (0..SIZE).map(|i| (i, rng.gen_range(0..1_000_000))).collect()
}

fn criterion_benchmark(c: &mut Criterion) {
    let entries = priorities();

    let mut group = c.benchmark_group("insert_then_drain");
    for d in 2..=6 {
        group.bench_with_input(BenchmarkId::from_parameter(d), &d, |b, &d| {
            b.iter(|| {
                let mut heap = DHeap::with_capacity(d, SIZE).unwrap();
                for &(element, priority) in &entries {
                    heap.insert(element, priority);
                }
                while let Some(entry) = heap.pop() {
                    black_box(entry);
                }
            })
        });
    }
    group.finish();

    let mut group = c.benchmark_group("heapify");
    for d in 2..=6 {
        group.bench_with_input(BenchmarkId::from_parameter(d), &d, |b, &d| {
            b.iter(|| DHeap::from_entries(black_box(entries.clone()), d).unwrap())
        });
    }
    group.finish();

    let heap = DHeap::from_entries(entries.clone(), 4).unwrap();
    c.bench_function("top_k_100", |b| b.iter(|| heap.top_k(black_box(100))));
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(20);
    targets = criterion_benchmark
}
criterion_main!(benches);
