//! Single-threaded walk through the staging semantics of `set`.
//!
//! `set` drains stale copies but publishes nothing; the staged value enters
//! circulation through the next `broadcast`, `turn_on` or a consumer
//! acknowledgment.
//!
//! Run with: `cargo run --example staging`

use levelcast::BroadcastChannel;

fn main() {
    tracing_subscriber::fmt::init();

    let channel = BroadcastChannel::new(1);
    let mailbox = channel.mailbox();

    channel.broadcast("v1");
    tracing::info!(got = ?mailbox.try_recv(), "after broadcast of v1");

    channel.set("v2");
    tracing::info!(got = ?mailbox.try_recv(), "during the staging window");

    // The slot returned by this acknowledgment carries v2, not v1.
    mailbox.acknowledge();
    tracing::info!(got = ?mailbox.try_recv(), "after acknowledge");

    channel.turn_off();
    tracing::info!(
        queued = channel.len(),
        broadcasting = channel.is_broadcasting(),
        "after turn_off"
    );
}
