use criterion::{criterion_group, criterion_main, Criterion};

mod queue;


criterion_group!(
    containers,
    queue::push_pop,
    queue::concurrent_push_pop,
    stack::push_pop,
    stack::concurrent_push_pop,
);

criterion_group! {
    name = reclamation;
    config = Criterion::default().with_profiler(profiler::FlamegraphProfiler::new(100));
    targets = queue::garbage_thresholds, stack::contended_slots,
}

criterion_main!(containers, reclamation);
