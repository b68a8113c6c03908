//! Convenience re-exports for common usage.
//!
//! ```
//! use levelcast::prelude::*;
//!
//! let channel = BroadcastChannel::new(1);
//! channel.broadcast(1_u64);
//! ```

pub use crate::channel::BroadcastChannel;
pub use crate::error::{RecvError, RecvTimeoutError, TryRecvError};
pub use crate::mailbox::Mailbox;
pub use crate::stats::ChannelStats;
