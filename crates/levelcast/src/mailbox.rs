//! Consumer handle: receiving copies and returning slots.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::channel::Core;
use crate::error::{RecvError, RecvTimeoutError, TryRecvError};
use crate::stats::ChannelStats;

/// Consumer handle of a level-triggered broadcast channel.
///
/// A mailbox takes duplicate copies of the channel's current value out of the
/// shared slots and hands the slot back with [`acknowledge`](Self::acknowledge).
/// Every mailbox of a channel shares the same slots: a copy received by one
/// mailbox is gone for the others, which is why the consume/acknowledge cycle
/// matters. Cloning is cheap and the clone is interchangeable with the
/// original.
///
/// # Protocol
///
/// After acting on a received value, call [`acknowledge`](Self::acknowledge)
/// exactly once. Skipping it starves other consumers of one slot until the
/// next publish; acknowledging without a prior receive is tolerated (the
/// replenish attempt finds the slots full and does nothing).
///
/// # Blocking
///
/// Only [`recv`](Self::recv) and [`recv_timeout`](Self::recv_timeout) wait,
/// and only for a copy to appear. [`acknowledge`](Self::acknowledge) takes the
/// channel mutex briefly and never waits for other consumers.
pub struct Mailbox<T> {
    core: Arc<Core<T>>,
}

impl<T> Mailbox<T> {
    pub(crate) fn new(core: Arc<Core<T>>) -> Self {
        Self { core }
    }

    /// Blocks until a copy of the current value can be received.
    ///
    /// While broadcasting is off this waits indefinitely; use
    /// [`recv_timeout`](Self::recv_timeout) or [`try_recv`](Self::try_recv)
    /// when the channel may be off.
    ///
    /// # Errors
    ///
    /// Returns [`RecvError`] only if every handle of the channel has been
    /// dropped, which cannot happen while this mailbox exists.
    pub fn recv(&self) -> Result<T, RecvError> {
        let value = self.core.slots_rx.recv()?;
        self.core.counters.inc_received();
        Ok(value)
    }

    /// Blocks until a copy can be received or `timeout` elapses.
    ///
    /// # Errors
    ///
    /// Returns [`RecvTimeoutError::Timeout`] if no copy arrived in time, a
    /// normal outcome while broadcasting is off or a value is staged.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<T, RecvTimeoutError> {
        let value = self.core.slots_rx.recv_timeout(timeout)?;
        self.core.counters.inc_received();
        Ok(value)
    }

    /// Receives a copy if one is queued, without waiting.
    ///
    /// # Errors
    ///
    /// Returns [`TryRecvError::Empty`] while broadcasting is off, while a
    /// value is staged but unpublished, or when slots are momentarily
    /// exhausted by other consumers. Not a fault; retry after the next
    /// publish or acknowledgment.
    pub fn try_recv(&self) -> Result<T, TryRecvError> {
        let value = self.core.slots_rx.try_recv()?;
        self.core.counters.inc_received();
        Ok(value)
    }

    /// Number of copies currently queued in the shared slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.core.slots_rx.len()
    }

    /// Returns `true` if no copy is currently queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.core.slots_rx.is_empty()
    }

    /// Maximum number of queued copies: the consumer hint plus one.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.core.capacity
    }

    /// Returns `true` while the publisher has broadcasting switched on.
    #[must_use]
    pub fn is_broadcasting(&self) -> bool {
        self.core.state.lock().broadcasting
    }

    /// Snapshot of the channel's lifetime counters.
    #[must_use]
    pub fn stats(&self) -> ChannelStats {
        self.core.counters.snapshot()
    }
}

impl<T: Clone> Mailbox<T> {
    /// Returns this consumer's slot to the channel.
    ///
    /// If broadcasting is on, one slot is replenished with a copy of the
    /// value current *now*, not the value this consumer received: a value
    /// staged via [`set`](crate::BroadcastChannel::set) since the receive is
    /// what goes back into circulation. If broadcasting is off, or the slots
    /// are already full, nothing is replenished. The check and the replenish
    /// run under the channel mutex, so an acknowledgment can never race a
    /// publisher into queueing a stale copy.
    pub fn acknowledge(&self) {
        let state = self.core.state.lock();
        self.core.counters.inc_acknowledged();
        if state.broadcasting {
            self.core.refill_one(&state);
        }
    }
}

impl<T> Clone for Mailbox<T> {
    fn clone(&self) -> Self {
        Self {
            core: Arc::clone(&self.core),
        }
    }
}

impl<T> fmt::Debug for Mailbox<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mailbox")
            .field("capacity", &self.core.capacity)
            .field("queued", &self.core.slots_rx.len())
            .finish()
    }
}
