//! Core channel state and the publisher handle.
//!
//! A [`BroadcastChannel`] fans the latest value out to many consumers through
//! a bounded queue of slots. While broadcasting is on, every slot holds a
//! duplicate copy of the current value; consumers take a copy from a
//! [`Mailbox`] and return the slot with [`Mailbox::acknowledge`], which
//! replenishes it with whatever value is current at that moment. The channel
//! is level-triggered: a consumer that attaches late still observes the
//! latest value, because the value sits in the slots rather than being pushed
//! once as an event.
//!
//! All mutations of channel state happen under one mutex, so a publisher
//! update is a single atomic generation change: drain every stale copy, then
//! install the new value. Consumers never take the mutex to receive, only to
//! acknowledge.

use std::fmt;
use std::sync::Arc;

use crossbeam::channel::{Receiver, Sender, bounded};
use parking_lot::Mutex;

use crate::mailbox::Mailbox;
use crate::stats::{ChannelStats, Counters};

/// Mutable channel state guarded by the channel mutex.
pub(crate) struct State<T> {
    /// Whether slots are currently kept topped up with copies.
    pub(crate) broadcasting: bool,
    /// The value duplicated into slots while broadcasting is on.
    pub(crate) current: T,
}

/// Shared core jointly owned by the publisher handle and every mailbox.
///
/// The slot queue endpoints live here on purpose: as long as any handle is
/// alive both endpoints are alive, so receive-side disconnect errors cannot
/// occur in practice.
pub(crate) struct Core<T> {
    pub(crate) slots_tx: Sender<T>,
    pub(crate) slots_rx: Receiver<T>,
    pub(crate) state: Mutex<State<T>>,
    pub(crate) counters: Counters,
    pub(crate) capacity: usize,
}

impl<T> Core<T> {
    /// Removes every queued copy. Callers hold the state lock, so no new
    /// copies can be enqueued while the loop runs and it terminates as soon
    /// as a dequeue attempt finds the slots empty.
    pub(crate) fn drain(&self) {
        while self.slots_rx.try_recv().is_ok() {}
    }
}

impl<T: Clone> Core<T> {
    /// Tops the slots up with copies of the current value, stopping at the
    /// first full slot. Callers hold the state lock.
    pub(crate) fn fill(&self, state: &State<T>) {
        while self.slots_tx.try_send(state.current.clone()).is_ok() {}
    }

    /// Replenishes a single slot with the current value, if room remains.
    /// Callers hold the state lock.
    pub(crate) fn refill_one(&self, state: &State<T>) {
        let _ = self.slots_tx.try_send(state.current.clone());
    }
}

/// Publisher handle of a level-triggered broadcast channel.
///
/// One publisher updates the current value and switches broadcasting on and
/// off; any number of [`Mailbox`] handles observe it. Create mailboxes with
/// [`mailbox`](Self::mailbox) and clone them freely.
///
/// # Thread Safety
///
/// The handle is `Send` and `Sync` for `T: Send`. The single-publisher rule
/// is a protocol convention, not a type-level restriction: concurrent
/// publishers do not corrupt state (every mutation runs under the channel
/// mutex), consumers simply observe the publishers' updates in whatever order
/// the mutex serializes them.
///
/// # Blocking
///
/// No operation on this handle waits for consumers. Drain and fill loops use
/// non-blocking queue operations, so each call completes in a bounded number
/// of steps regardless of what consumers are doing. The only wait is the
/// channel mutex, which is never held across a blocking call.
///
/// # Example
///
/// ```
/// use levelcast::BroadcastChannel;
///
/// let channel = BroadcastChannel::new(2);
/// let mailbox = channel.mailbox();
///
/// channel.broadcast("ready");
/// assert_eq!(mailbox.try_recv(), Ok("ready"));
/// mailbox.acknowledge();
///
/// channel.turn_off();
/// assert!(channel.is_empty());
/// ```
pub struct BroadcastChannel<T> {
    core: Arc<Core<T>>,
}

impl<T> BroadcastChannel<T> {
    /// Creates a channel sized for `expected_consumers` concurrent consumers.
    ///
    /// The slot queue holds `expected_consumers + 1` copies, so that after
    /// every expected consumer has taken one, one copy remains for a
    /// late-attaching observer. The hint affects only concurrency: with more
    /// consumers than expected, the extras briefly find the slots empty until
    /// acknowledgments replenish them.
    ///
    /// Broadcasting starts off and the current value starts at
    /// `T::default()`; the default is what [`turn_on`](Self::turn_on) fills
    /// slots with if no value has been set yet.
    ///
    /// # Panics
    ///
    /// Panics if the slot queue for `expected_consumers + 1` copies cannot be
    /// allocated. Pass the expected consumer count, not a worst-case bound.
    #[must_use]
    pub fn new(expected_consumers: usize) -> Self
    where
        T: Default,
    {
        let capacity = expected_consumers.saturating_add(1);
        let (slots_tx, slots_rx) = bounded(capacity);
        Self {
            core: Arc::new(Core {
                slots_tx,
                slots_rx,
                state: Mutex::new(State {
                    broadcasting: false,
                    current: T::default(),
                }),
                counters: Counters::new(),
                capacity,
            }),
        }
    }

    /// Returns a consumer handle attached to this channel.
    ///
    /// All mailboxes share the same slots; cloning a mailbox is equivalent to
    /// calling this again.
    #[must_use]
    pub fn mailbox(&self) -> Mailbox<T> {
        Mailbox::new(Arc::clone(&self.core))
    }

    /// Stages `value` as the new current value without publishing copies.
    ///
    /// Every queued copy of the previous value is removed first, so no
    /// consumer can observe the old value once this returns. The slots are
    /// deliberately left empty even while broadcasting is on: receives fail
    /// until the next [`broadcast`](Self::broadcast), [`turn_on`](Self::turn_on)
    /// or a consumer acknowledgment replenishes them. Use
    /// [`broadcast`](Self::broadcast) to stage and publish in one atomic
    /// step.
    pub fn set(&self, value: T) {
        let mut state = self.core.state.lock();
        self.core.drain();
        state.current = value;
        self.core.counters.inc_published();
        tracing::trace!(
            broadcasting = state.broadcasting,
            "value staged, slots drained"
        );
    }

    /// Switches broadcasting off and empties the slots.
    ///
    /// Consumers receive nothing until broadcasting is turned back on; late
    /// acknowledgments are counted but replenish nothing. The current value
    /// is retained, so [`turn_on`](Self::turn_on) re-publishes it. Idempotent.
    pub fn turn_off(&self) {
        let mut state = self.core.state.lock();
        state.broadcasting = false;
        self.core.drain();
        tracing::trace!("broadcast turned off");
    }

    /// Returns `true` while broadcasting is on.
    #[must_use]
    pub fn is_broadcasting(&self) -> bool {
        self.core.state.lock().broadcasting
    }

    /// Number of copies currently queued in the slots.
    ///
    /// A sampled value: concurrent receives and acknowledgments may change it
    /// before the caller acts on it. Never exceeds [`capacity`](Self::capacity).
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

    /// Snapshot of the channel's lifetime counters.
    #[must_use]
    pub fn stats(&self) -> ChannelStats {
        self.core.counters.snapshot()
    }
}

impl<T: Clone> BroadcastChannel<T> {
    /// Switches broadcasting on and fills every free slot with a copy of the
    /// current value.
    ///
    /// Idempotent: turning an already-on channel on tops the slots back up
    /// (replacing copies consumed but not yet acknowledged) without changing
    /// the value. If no value was ever set, consumers observe `T::default()`.
    pub fn turn_on(&self) {
        let mut state = self.core.state.lock();
        state.broadcasting = true;
        self.core.fill(&state);
        tracing::trace!(capacity = self.core.capacity, "broadcast turned on");
    }

    /// Publishes `value` to all consumers in one atomic step.
    ///
    /// Equivalent to [`set`](Self::set) followed by [`turn_on`](Self::turn_on)
    /// under a single lock acquisition: stale copies are drained, the value is
    /// installed, broadcasting is switched on and every slot is filled with a
    /// copy. No consumer can observe a mix of the old and new value, and no
    /// receive can land in the gap between draining and filling.
    pub fn broadcast(&self, value: T) {
        let mut state = self.core.state.lock();
        self.core.drain();
        state.current = value;
        state.broadcasting = true;
        self.core.fill(&state);
        self.core.counters.inc_published();
        tracing::trace!(capacity = self.core.capacity, "value broadcast");
    }
}

impl<T> fmt::Debug for BroadcastChannel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BroadcastChannel")
            .field("capacity", &self.core.capacity)
            .field("queued", &self.core.slots_rx.len())
            .field("broadcasting", &self.core.state.lock().broadcasting)
            .finish()
    }
}
