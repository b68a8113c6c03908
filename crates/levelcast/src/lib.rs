//! # levelcast
//!
//! Level-triggered broadcast channel: one publisher maintains a current
//! value, many concurrent consumers observe the latest value without the
//! publisher ever waiting for them.
//!
//! Unlike an edge-triggered broadcast (where a message is delivered once and
//! a consumer that misses it misses it forever), this channel keeps a bounded
//! set of slots topped up with duplicate copies of the current value while
//! broadcasting is on. A consumer that attaches late, or was busy during the
//! last update, still receives the latest value. When the value changes,
//! every stale copy is removed before the new value is installed, so no
//! consumer ever observes an outdated one.
//!
//! ## Guarantees
//!
//! - **Latest value only**: queued copies are always copies of the single
//!   current value; old and new generations never coexist in the slots.
//! - **Non-blocking publisher**: `set`, `broadcast`, `turn_on` and `turn_off`
//!   complete in a bounded number of steps regardless of consumer behavior.
//! - **Bounded memory**: at most `expected_consumers + 1` copies exist at
//!   once, independent of publish rate.
//! - **Off means silent**: after `turn_off` returns, no copy is queued and
//!   none appears until broadcasting is turned back on.
//!
//! ## The acknowledge cycle
//!
//! Slots are a shared, finite resource. Each consumer takes a copy with one
//! of the receive methods, acts on it, then calls [`Mailbox::acknowledge`] to
//! hand the slot back. The replenished copy carries the value current at
//! acknowledge time, so a value staged with [`BroadcastChannel::set`] in the
//! meantime is what re-enters circulation. A consumer that never acknowledges
//! costs the others one slot until the next publish; it cannot cost
//! correctness.
//!
//! ## Example
//!
//! ```
//! use levelcast::{BroadcastChannel, TryRecvError};
//!
//! let channel = BroadcastChannel::new(2);
//! let mailbox = channel.mailbox();
//!
//! channel.broadcast("v1");
//! assert_eq!(mailbox.try_recv(), Ok("v1"));
//!
//! // Stage a new value: stale copies are gone, nothing published yet.
//! channel.set("v2");
//! assert_eq!(mailbox.try_recv(), Err(TryRecvError::Empty));
//!
//! // Acknowledging the earlier receive replenishes a copy of "v2".
//! mailbox.acknowledge();
//! assert_eq!(mailbox.try_recv(), Ok("v2"));
//!
//! channel.turn_off();
//! assert!(mailbox.is_empty());
//! ```
//!
//! ## Modules
//!
//! - [`channel`]: the publisher handle and shared channel core
//! - [`mailbox`]: the consumer handle
//! - [`error`]: receive error types
//! - [`stats`]: lifetime counters for observability
//! - [`prelude`]: convenience re-exports

#![deny(
    unsafe_op_in_unsafe_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::panic,
    missing_docs,
    missing_debug_implementations
)]
#![warn(clippy::pedantic)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod channel;
pub mod error;
pub mod mailbox;
pub mod prelude;
pub mod stats;

pub use channel::BroadcastChannel;
pub use error::{RecvError, RecvTimeoutError, TryRecvError};
pub use mailbox::Mailbox;
pub use stats::ChannelStats;
