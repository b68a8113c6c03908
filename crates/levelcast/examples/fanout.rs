//! Fan configuration updates out to a pool of worker threads.
//!
//! Each worker keeps applying whatever configuration generation is current,
//! deduplicating repeats. Workers attached late still pick up the latest
//! generation because the channel is level-triggered.
//!
//! Run with: `cargo run --example fanout`

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use levelcast::BroadcastChannel;

const WORKERS: usize = 4;

fn main() {
    tracing_subscriber::fmt::init();

    let channel = Arc::new(BroadcastChannel::new(WORKERS));

    let workers: Vec<_> = (0..WORKERS)
        .map(|id| {
            let mailbox = channel.mailbox();
            thread::spawn(move || {
                let mut applied = None;
                loop {
                    match mailbox.recv_timeout(Duration::from_millis(200)) {
                        Ok(generation) => {
                            if applied != Some(generation) {
                                tracing::info!(worker = id, generation, "applying configuration");
                                applied = Some(generation);
                            }
                            mailbox.acknowledge();
                        }
                        Err(_) => break,
                    }
                }
            })
        })
        .collect();

    for generation in 1..=3_u64 {
        tracing::info!(generation, "publishing configuration");
        channel.broadcast(generation);
        thread::sleep(Duration::from_millis(50));
    }

    // A worker attaching after the last publish still observes it.
    let late = channel.mailbox();
    if let Ok(generation) = late.recv_timeout(Duration::from_millis(200)) {
        tracing::info!(generation, "late worker caught up");
        late.acknowledge();
    }

    channel.turn_off();
    for worker in workers {
        let _ = worker.join();
    }

    let stats = channel.stats();
    tracing::info!(
        published = stats.published,
        received = stats.received,
        acknowledged = stats.acknowledged,
        "shutdown"
    );
}
