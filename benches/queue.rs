use std::{sync::Arc, thread, time::Instant};

use criterion::{black_box, BenchmarkId, Criterion, Throughput};
use hazard_collections::{config::QueueConfig, queue::Queue};

const THREAD_COUNTS: [usize; 3] = [2, 4, 8];
const OPS_PER_THREAD: usize = 1000;

pub fn push_pop(ctx: &mut Criterion) {
    let mut group = ctx.benchmark_group("queue");

    group.throughput(Throughput::Elements(2));

    group.bench_function("push-pop", |b| {
        let queue = Queue::<u64>::new();

        b.iter(|| {
            queue.push(black_box(13));
            assert_eq!(Some(13), queue.pop());
        });
    });
}

pub fn concurrent_push_pop(ctx: &mut Criterion) {
    let mut group = ctx.benchmark_group("queue-concurrent");

    for threads in THREAD_COUNTS.iter().copied() {
        group.throughput(Throughput::Elements((threads * OPS_PER_THREAD * 2) as u64));

        group.bench_with_input(BenchmarkId::from_parameter(threads), &threads, |b, &threads| {
            b.iter_custom(|iters| {
                let queue = Arc::new(Queue::<usize>::new());

                let start = Instant::now();
                for _ in 0..iters {
                    let handles: Vec<_> = (0..threads)
                        .map(|_| {
                            let queue = queue.clone();
                            thread::spawn(move || {
                                for index in 0..OPS_PER_THREAD {
                                    queue.push(index);
                                    black_box(queue.pop());
                                }
                            })
                        })
                        .collect();
                    for handle in handles {
                        handle.join().unwrap();
                    }
                }
                start.elapsed()
            });
        });
    }
}

pub fn garbage_thresholds(ctx: &mut Criterion) {
    let mut group = ctx.benchmark_group("queue-garbage-threshold");

    for threshold in [16usize, 256, 1024].iter().copied() {
        group.bench_with_input(
            BenchmarkId::from_parameter(threshold),
            &threshold,
            |b, &threshold| {
                let config = QueueConfig::new().with_garbage_threshold(threshold);
                let queue = Arc::new(Queue::<usize>::with_config(config).unwrap());

                b.iter(|| {
                    let handles: Vec<_> = (0..4)
                        .map(|_| {
                            let queue = queue.clone();
                            thread::spawn(move || {
                                for index in 0..OPS_PER_THREAD {
                                    queue.push(index);
                                    black_box(queue.pop());
                                }
                            })
                        })
                        .collect();
                    for handle in handles {
                        handle.join().unwrap();
                    }
                });
            },
        );
    }
}
