//! `conveyor`: a sender/receiver execution core with a round-robin
//! scheduler, a thread pool, a cancellable future/promise pair, a bounded
//! multi-producer/multi-consumer channel, a countdown latch, and a RAII
//! socket façade built on the same precondition helpers.
//!
//! The pieces compose like this: callers build [`exec::Sender`] chains with
//! [`exec::schedule`] and [`exec::then`], run them with [`exec::start`] or
//! [`exec::wait`], and the actual work is carried out by an
//! [`exec::ThreadPool`] draining an [`exec::RoundRobinScheduler`]. The
//! [`sock`] module is an independent subsystem that shares [`precondition`]
//! and [`error`] with the rest of the crate but otherwise has nothing to do
//! with the execution core.
pub mod error;
pub mod exec;
pub mod future;
pub mod precondition;
pub mod sock;
pub mod sync;

pub use error::{Error, Result};
pub use future::{Future, FutureResult, Promise};
