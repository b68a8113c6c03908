//! Criterion benchmarks for publisher and consumer hot paths.
//!
//! Publisher costs scale with capacity (a broadcast drains and refills every
//! slot), so those benches sweep the consumer hint. The consumer cycle is
//! capacity-independent and benched at steady state.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use levelcast::BroadcastChannel;

fn bench_broadcast(c: &mut Criterion) {
    let mut group = c.benchmark_group("broadcast");

    for hint in [1_usize, 8, 64, 512] {
        group.bench_with_input(BenchmarkId::new("drain_and_fill", hint), &hint, |b, &hint| {
            let channel = BroadcastChannel::new(hint);
            let mut value = 0_u64;
            b.iter(|| {
                value = value.wrapping_add(1);
                channel.broadcast(black_box(value));
            });
        });
    }

    group.finish();
}

fn bench_set(c: &mut Criterion) {
    let mut group = c.benchmark_group("set");

    group.bench_function("staged_update", |b| {
        let channel = BroadcastChannel::new(8);
        channel.broadcast(0_u64);
        let mut value = 0_u64;
        b.iter(|| {
            value = value.wrapping_add(1);
            channel.set(black_box(value));
        });
    });

    group.finish();
}

fn bench_consumer_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("consumer");

    group.bench_function("recv_then_acknowledge", |b| {
        let channel = BroadcastChannel::new(1);
        let mailbox = channel.mailbox();
        channel.broadcast(7_u64);
        b.iter(|| {
            let value = black_box(mailbox.try_recv());
            mailbox.acknowledge();
            value
        });
    });

    group.bench_function("acknowledge_on_full_slots", |b| {
        let channel = BroadcastChannel::new(1);
        let mailbox = channel.mailbox();
        channel.broadcast(7_u64);
        b.iter(|| mailbox.acknowledge());
    });

    group.finish();
}

fn bench_toggle(c: &mut Criterion) {
    let mut group = c.benchmark_group("toggle");

    group.bench_function("turn_on_turn_off", |b| {
        let channel = BroadcastChannel::new(8);
        channel.set(1_u64);
        b.iter(|| {
            channel.turn_on();
            channel.turn_off();
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_broadcast,
    bench_set,
    bench_consumer_cycle,
    bench_toggle
);
criterion_main!(benches);
