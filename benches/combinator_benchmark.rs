use criterion::{Criterion, criterion_group, criterion_main};
use lite_cps::{Async, apply, concurrently, race};
use std::hint::black_box;

/// Benchmark: lift + subscribe round trip (one allocation, one call)
/// 基准测试：提升 + 订阅往返（一次分配，一次调用）
fn bench_pure(c: &mut Criterion) {
    c.bench_function("pure_run", |b| {
        b.iter(|| {
            Async::pure(black_box(42u64)).run(|v| {
                black_box(v);
            });
        });
    });
}

/// Benchmark: pointwise map chains of increasing depth
/// 基准测试：逐点 map 链，深度递增
fn bench_map_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("map_chain");

    group.bench_function("depth_1", |b| {
        b.iter(|| {
            Async::pure(black_box(1u64)).map(|x| x + 1).run(|v| {
                black_box(v);
            });
        });
    });

    group.bench_function("depth_4", |b| {
        b.iter(|| {
            Async::pure(black_box(1u64))
                .map(|x| x + 1)
                .map(|x| x * 2)
                .map(|x| x - 3)
                .map(|x| x ^ 5)
                .run(|v| {
                    black_box(v);
                });
        });
    });

    group.finish();
}

/// Benchmark: join of two already-available sides (cell allocate + CAS + apply)
/// 基准测试：两侧均已就绪的汇合（单元分配 + CAS + 应用）
fn bench_join(c: &mut Criterion) {
    let mut group = c.benchmark_group("join");

    group.bench_function("apply_both_ready", |b| {
        b.iter(|| {
            apply(Async::pure(|x: u64| x + 3), Async::pure(black_box(4u64))).run(|v| {
                black_box(v);
            });
        });
    });

    group.bench_function("concurrently_both_ready", |b| {
        b.iter(|| {
            concurrently(
                Async::pure(black_box(3u64)),
                Async::pure(black_box(4u64)),
                |a, b| a + b,
            )
            .run(|v| {
                black_box(v);
            });
        });
    });

    group.finish();
}

/// Benchmark: settle of an immediately-won race (cell allocate + swap)
/// 基准测试：立即获胜的竞争落定（单元分配 + swap）
fn bench_race(c: &mut Criterion) {
    c.bench_function("race_left_ready", |b| {
        b.iter(|| {
            race(Async::pure(black_box(1u64)), Async::<u64>::zero()).run(|v| {
                black_box(v);
            });
        });
    });
}

/// Benchmark: sequential chaining
/// 基准测试：顺序链接
fn bench_bind(c: &mut Criterion) {
    c.bench_function("and_then_ready", |b| {
        b.iter(|| {
            Async::pure(black_box(2u64))
                .and_then(|x| Async::pure(x * 10))
                .run(|v| {
                    black_box(v);
                });
        });
    });
}

criterion_group!(
    benches,
    bench_pure,
    bench_map_chain,
    bench_join,
    bench_race,
    bench_bind
);
criterion_main!(benches);
