//! Low-level synchronization primitives underpinning the execution core:
//! the bounded-queue-count MPMC [`channel::Channel`] and the single-use
//! [`latch::Latch`].
pub mod channel;
pub mod latch;

pub use channel::Channel;
pub use latch::Latch;
