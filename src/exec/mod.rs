//! The sender/receiver execution core: composable descriptions of work
//! (`Sender`) that only run once connected to a `Receiver` and started.
//!
//! Grounded on `jar::concurrency`'s `schedule`/`then`/`start`/`wait` free
//! functions and the `details::` receiver/adapter types they're built on.
pub mod invocable;
pub mod pool;
pub mod receiver;
pub mod schedule;
pub mod scheduler;
pub mod sender;
pub mod start_wait;
pub mod then;
pub mod try_then;

pub use pool::{SchedulerHandle, ThreadPool};
pub use receiver::{CallbackReceiver, CancellationHandle, Receiver, ValueReceiver};
pub use schedule::schedule;
pub use scheduler::RoundRobinScheduler;
pub use sender::{OperationState, Sender};
pub use start_wait::{start, wait};
pub use then::then;
pub use try_then::try_then;

/// A scheduler that can accept a unit of work and run it, eventually, on
/// some thread.
///
/// Grounding: `is_output_scheduler` in `type_traits.hpp`, expressed here as
/// an explicit trait rather than a structural check. [`crate::exec::scheduler`]
/// and [`crate::exec::pool`] provide the round-robin implementation.
pub trait Scheduler {
    fn schedule(&self, task: Box<dyn FnOnce() + Send>);
}
