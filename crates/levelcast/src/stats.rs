//! Protocol accounting for broadcast channels.
//!
//! This module provides [`ChannelStats`], a snapshot of the relaxed atomic
//! counters a channel maintains across its lifetime. The counters exist to
//! make the acknowledge protocol observable: a consumer that receives without
//! acknowledging is never detected or reported at receive time (it only
//! degrades concurrency), but the gap shows up as
//! [`ChannelStats::outstanding`].
//!
//! # Hot-path safety
//!
//! All counter increments are single `fetch_add` calls with
//! `Ordering::Relaxed`: no allocation, no blocking, no synchronization with
//! surrounding memory operations. Snapshots are eventually consistent reads.

use core::sync::atomic::{AtomicU64, Ordering};

/// Counter snapshot returned by the `stats()` accessors on both channel
/// handles.
///
/// Values are monotonically non-decreasing over the life of a channel and are
/// read with relaxed ordering, so a snapshot taken while other threads are
/// mid-operation may be slightly stale. Differences between fields are
/// meaningful in steady state, not instantaneously.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChannelStats {
    /// Number of values published via `set` or `broadcast`.
    pub published: u64,
    /// Number of successful receives across all mailbox handles.
    pub received: u64,
    /// Number of `acknowledge` calls across all mailbox handles.
    pub acknowledged: u64,
}

impl ChannelStats {
    /// Receives not yet matched by an acknowledgment.
    ///
    /// In a protocol-compliant program this hovers near zero (bounded by the
    /// number of consumers mid-cycle). A steadily growing value means some
    /// consumer receives without acknowledging.
    #[must_use]
    pub fn outstanding(&self) -> u64 {
        self.received.saturating_sub(self.acknowledged)
    }
}

/// Relaxed atomic counters shared by all handles of one channel.
#[derive(Debug)]
pub(crate) struct Counters {
    published: AtomicU64,
    received: AtomicU64,
    acknowledged: AtomicU64,
}

impl Counters {
    pub(crate) const fn new() -> Self {
        Self {
            published: AtomicU64::new(0),
            received: AtomicU64::new(0),
            acknowledged: AtomicU64::new(0),
        }
    }

    #[inline]
    pub(crate) fn inc_published(&self) {
        self.published.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn inc_received(&self) {
        self.received.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn inc_acknowledged(&self) {
        self.acknowledged.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> ChannelStats {
        ChannelStats {
            published: self.published.load(Ordering::Relaxed),
            received: self.received.load(Ordering::Relaxed),
            acknowledged: self.acknowledged.load(Ordering::Relaxed),
        }
    }
}
