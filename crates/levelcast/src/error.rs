//! Error types for mailbox receive operations.
//!
//! Publisher-side operations and `acknowledge` are total and return nothing;
//! only the receive surface is fallible. The three error types here mirror
//! the shape of the underlying slot queue errors so that mailbox code reads
//! like ordinary channel code.
//!
//! The `Disconnected` variants are part of the receive contract but are
//! unreachable while any channel handle is alive: the publisher handle and
//! every mailbox jointly own both endpoints of the slot queue, so the queue
//! only disconnects once all handles are dropped, at which point no caller
//! remains to observe it.

use thiserror::Error;

/// Error returned by [`Mailbox::recv`](crate::Mailbox::recv).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("receiving on an empty and disconnected mailbox")]
pub struct RecvError;

/// Error returned by [`Mailbox::try_recv`](crate::Mailbox::try_recv).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TryRecvError {
    /// No copy was queued at the moment of the call.
    ///
    /// Routine while broadcasting is off, while a new value is staged but not
    /// yet broadcast, or when more consumers than expected race for slots.
    #[error("receiving on an empty mailbox")]
    Empty,
    /// All handles of the channel have been dropped.
    #[error("receiving on an empty and disconnected mailbox")]
    Disconnected,
}

impl TryRecvError {
    /// Returns `true` if the mailbox was empty but still connected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns `true` if the channel has shut down.
    #[must_use]
    pub fn is_disconnected(&self) -> bool {
        matches!(self, Self::Disconnected)
    }
}

/// Error returned by [`Mailbox::recv_timeout`](crate::Mailbox::recv_timeout).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RecvTimeoutError {
    /// No copy arrived within the deadline.
    #[error("timed out waiting on mailbox")]
    Timeout,
    /// All handles of the channel have been dropped.
    #[error("receiving on an empty and disconnected mailbox")]
    Disconnected,
}

impl RecvTimeoutError {
    /// Returns `true` if the deadline elapsed with the mailbox still empty.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Returns `true` if the channel has shut down.
    #[must_use]
    pub fn is_disconnected(&self) -> bool {
        matches!(self, Self::Disconnected)
    }
}

impl From<crossbeam::channel::RecvError> for RecvError {
    fn from(_: crossbeam::channel::RecvError) -> Self {
        Self
    }
}

impl From<crossbeam::channel::TryRecvError> for TryRecvError {
    fn from(err: crossbeam::channel::TryRecvError) -> Self {
        match err {
            crossbeam::channel::TryRecvError::Empty => Self::Empty,
            crossbeam::channel::TryRecvError::Disconnected => Self::Disconnected,
        }
    }
}

impl From<crossbeam::channel::RecvTimeoutError> for RecvTimeoutError {
    fn from(err: crossbeam::channel::RecvTimeoutError) -> Self {
        match err {
            crossbeam::channel::RecvTimeoutError::Timeout => Self::Timeout,
            crossbeam::channel::RecvTimeoutError::Disconnected => Self::Disconnected,
        }
    }
}
