//! Concurrency tests for publisher/consumer interleavings.
//!
//! These tests hammer the channel from multiple threads and check the
//! guarantees that must survive arbitrary interleaving: consumers never
//! observe an outdated value, the slot count never exceeds capacity, and an
//! off channel ends up empty no matter which acknowledgments raced the
//! shutdown.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use levelcast::BroadcastChannel;

#[test]
fn test_every_consumer_observes_a_single_broadcast() {
    const CONSUMERS: usize = 8;

    let channel = Arc::new(BroadcastChannel::new(CONSUMERS));
    channel.broadcast(42_u64);

    // Sized for CONSUMERS, one non-blocking receive each must succeed.
    let handles: Vec<_> = (0..CONSUMERS)
        .map(|_| {
            let mailbox = channel.mailbox();
            thread::spawn(move || {
                let value = mailbox.try_recv();
                assert_eq!(value, Ok(42), "consumer missed the broadcast");
                mailbox.acknowledge();
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().is_ok(), "thread panicked unexpectedly");
    }

    assert!(channel.len() <= channel.capacity());
}

#[test]
fn test_consumers_never_observe_an_older_value() {
    const CONSUMERS: usize = 4;
    const PUBLISHES: u64 = 2_000;

    let channel = Arc::new(BroadcastChannel::new(CONSUMERS));
    let stop = Arc::new(AtomicBool::new(false));

    let consumers: Vec<_> = (0..CONSUMERS)
        .map(|_| {
            let mailbox = channel.mailbox();
            let stop = Arc::clone(&stop);
            thread::spawn(move || {
                let mut last_seen = 0_u64;
                while !stop.load(Ordering::Relaxed) {
                    match mailbox.try_recv() {
                        Ok(value) => {
                            assert!(
                                value >= last_seen,
                                "value went backwards: {value} after {last_seen}"
                            );
                            assert!(value < PUBLISHES, "value was never published");
                            last_seen = value;
                            mailbox.acknowledge();
                        }
                        Err(_) => thread::yield_now(),
                    }
                    assert!(mailbox.len() <= mailbox.capacity());
                }
            })
        })
        .collect();

    for value in 0..PUBLISHES {
        // Alternate staged and published updates to exercise both paths.
        if value % 5 == 0 {
            channel.set(value);
        } else {
            channel.broadcast(value);
        }
    }
    channel.broadcast(PUBLISHES - 1);
    stop.store(true, Ordering::Relaxed);

    for handle in consumers {
        assert!(handle.join().is_ok(), "thread panicked unexpectedly");
    }
}

#[test]
fn test_generations_never_mix_in_the_slots() {
    const CONSUMERS: usize = 4;
    const ROUNDS: u64 = 1_000;
    const FINAL: u64 = u64::MAX;

    let channel = Arc::new(BroadcastChannel::new(CONSUMERS));
    let stop = Arc::new(AtomicBool::new(false));

    let consumers: Vec<_> = (0..CONSUMERS)
        .map(|_| {
            let mailbox = channel.mailbox();
            let stop = Arc::clone(&stop);
            thread::spawn(move || {
                while !stop.load(Ordering::Relaxed) {
                    if mailbox.try_recv().is_ok() {
                        mailbox.acknowledge();
                    }
                }
            })
        })
        .collect();

    for round in 0..ROUNDS {
        channel.broadcast(round);
    }
    channel.broadcast(FINAL);
    stop.store(true, Ordering::Relaxed);

    for handle in consumers {
        assert!(handle.join().is_ok(), "thread panicked unexpectedly");
    }

    // With all consumers stopped, every copy still queued must belong to the
    // final generation.
    let mailbox = channel.mailbox();
    while let Ok(value) = mailbox.try_recv() {
        assert_eq!(value, FINAL, "stale copy survived a broadcast");
    }
}

#[test]
fn test_concurrent_broadcasts_leave_a_uniform_mailbox() {
    const PUBLISHERS: usize = 4;
    const ROUNDS: u64 = 500;
    const STRIDE: u64 = 1_000_000;

    let channel = Arc::new(BroadcastChannel::new(4));

    let publishers: Vec<_> = (0..PUBLISHERS)
        .map(|id| {
            let channel = Arc::clone(&channel);
            thread::spawn(move || {
                let base = id as u64 * STRIDE;
                for seq in 0..ROUNDS {
                    channel.broadcast(base + seq);
                }
            })
        })
        .collect();

    for handle in publishers {
        assert!(handle.join().is_ok(), "thread panicked unexpectedly");
    }

    // Whichever broadcast took the lock last won; all surviving copies agree.
    let mailbox = channel.mailbox();
    let first = mailbox.try_recv();
    assert!(first.is_ok(), "slots should be full after the final broadcast");
    while let Ok(value) = mailbox.try_recv() {
        assert_eq!(first, Ok(value), "mailbox mixed two generations");
    }
}

#[test]
fn test_multi_publisher_stress_observes_only_published_values() {
    const PUBLISHERS: u64 = 3;
    const CONSUMERS: usize = 4;
    const ROUNDS: u64 = 1_000;
    const STRIDE: u64 = 1_000_000;

    let channel = Arc::new(BroadcastChannel::new(CONSUMERS));
    let stop = Arc::new(AtomicBool::new(false));

    let consumers: Vec<_> = (0..CONSUMERS)
        .map(|_| {
            let mailbox = channel.mailbox();
            let stop = Arc::clone(&stop);
            thread::spawn(move || {
                while !stop.load(Ordering::Relaxed) {
                    match mailbox.try_recv() {
                        Ok(value) => {
                            assert!(value / STRIDE < PUBLISHERS, "unknown publisher tag");
                            assert!(value % STRIDE < ROUNDS, "sequence out of range");
                            mailbox.acknowledge();
                        }
                        Err(_) => thread::yield_now(),
                    }
                    assert!(mailbox.len() <= mailbox.capacity());
                }
            })
        })
        .collect();

    let publishers: Vec<_> = (0..PUBLISHERS)
        .map(|id| {
            let channel = Arc::clone(&channel);
            thread::spawn(move || {
                for seq in 0..ROUNDS {
                    if seq % 7 == 0 {
                        channel.set(id * STRIDE + seq);
                    } else {
                        channel.broadcast(id * STRIDE + seq);
                    }
                }
            })
        })
        .collect();

    for handle in publishers {
        assert!(handle.join().is_ok(), "thread panicked unexpectedly");
    }
    stop.store(true, Ordering::Relaxed);
    for handle in consumers {
        assert!(handle.join().is_ok(), "thread panicked unexpectedly");
    }
}

#[test]
fn test_on_off_churn_ends_empty() {
    const CONSUMERS: usize = 4;
    const TOGGLES: u64 = 500;

    let channel = Arc::new(BroadcastChannel::new(CONSUMERS));
    channel.set(7_u64);
    let stop = Arc::new(AtomicBool::new(false));

    let consumers: Vec<_> = (0..CONSUMERS)
        .map(|_| {
            let mailbox = channel.mailbox();
            let stop = Arc::clone(&stop);
            thread::spawn(move || {
                while !stop.load(Ordering::Relaxed) {
                    if mailbox.try_recv().is_ok() {
                        mailbox.acknowledge();
                    } else {
                        thread::yield_now();
                    }
                }
            })
        })
        .collect();

    for _ in 0..TOGGLES {
        channel.turn_on();
        channel.turn_off();
    }
    stop.store(true, Ordering::Relaxed);

    for handle in consumers {
        assert!(handle.join().is_ok(), "thread panicked unexpectedly");
    }

    // The final toggle left the channel off; racing acknowledgments must not
    // have repopulated it.
    assert!(!channel.is_broadcasting());
    assert!(channel.is_empty());
}

#[test]
fn test_acknowledge_storm_respects_capacity() {
    const ACKERS: usize = 8;
    const ACKS_PER_THREAD: usize = 10_000;

    let channel = Arc::new(BroadcastChannel::new(2));
    channel.broadcast(1_u64);

    let handles: Vec<_> = (0..ACKERS)
        .map(|_| {
            let mailbox = channel.mailbox();
            thread::spawn(move || {
                for _ in 0..ACKS_PER_THREAD {
                    mailbox.acknowledge();
                }
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().is_ok(), "thread panicked unexpectedly");
    }

    assert_eq!(channel.len(), channel.capacity());
    assert_eq!(
        channel.stats().acknowledged,
        (ACKERS * ACKS_PER_THREAD) as u64
    );
}

#[test]
fn test_cloned_mailboxes_split_the_copies() {
    const CONSUMERS: usize = 6;

    let channel = Arc::new(BroadcastChannel::new(CONSUMERS));
    channel.broadcast(3_u64);
    let root = channel.mailbox();

    let handles: Vec<_> = (0..CONSUMERS)
        .map(|_| {
            let mailbox = root.clone();
            thread::spawn(move || {
                let mut taken = 0_u64;
                while mailbox.try_recv().is_ok() {
                    taken += 1;
                }
                taken
            })
        })
        .collect();

    let mut total = 0_u64;
    for handle in handles {
        match handle.join() {
            Ok(taken) => total += taken,
            Err(_) => panic!("thread panicked unexpectedly"),
        }
    }

    // Copies are shared, not per-mailbox: exactly capacity copies existed.
    assert_eq!(total, channel.capacity() as u64);
}
