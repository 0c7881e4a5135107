//! A fixed-size worker pool draining a [`RoundRobinScheduler`].
//!
//! Grounded on `jar::concurrency::thread_pool<Scheduler>`
//! (`thread_pool.hpp`), specialized to [`RoundRobinScheduler`] — the only
//! scheduler this crate defines — and wrapped in an `Arc` so each worker
//! thread holds a clone of the scheduler handle rather than a pointer back
//! into the pool itself.
use std::thread;

use tracing::{debug, warn};

use crate::error::{Error, Result};

use super::scheduler::RoundRobinScheduler;

/// Spawns `thread_count` workers that each loop `scheduler.scheduled()` and
/// run whatever comes back, stopping once the scheduler is cleared.
pub struct ThreadPool {
    thread_count: usize,
    threads: Vec<thread::JoinHandle<()>>,
    scheduler: std::sync::Arc<RoundRobinScheduler>,
}

impl ThreadPool {
    /// Defaults to the number of available hardware threads, floored at 1.
    pub fn default_thread_count() -> usize {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }

    pub fn new(thread_count: usize) -> Result<Self> {
        let thread_count = thread_count.max(1);
        let scheduler = std::sync::Arc::new(RoundRobinScheduler::new(thread_count)?);
        let mut threads = Vec::with_capacity(thread_count);

        for _ in 0..thread_count {
            let worker_scheduler = scheduler.clone();
            match thread::Builder::new().spawn(move || Self::run(&worker_scheduler)) {
                Ok(handle) => threads.push(handle),
                Err(err) => {
                    // Roll back: stop and join whatever we already spawned
                    // before reporting the failure.
                    warn!(spawned = threads.len(), error = %err, "thread pool construction failed, rolling back");
                    scheduler.clear();
                    for handle in threads {
                        let _ = handle.join();
                    }
                    return Err(Error::System(err));
                }
            }
        }

        debug!(thread_count, "thread pool started");
        Ok(Self {
            thread_count,
            threads,
            scheduler,
        })
    }

    pub fn with_default_thread_count() -> Result<Self> {
        Self::new(Self::default_thread_count())
    }

    fn run(scheduler: &RoundRobinScheduler) {
        let id = thread::current().id();
        debug!(?id, "worker started");
        while let Some(task) = scheduler.scheduled() {
            task();
        }
        debug!(?id, "worker stopped");
    }

    pub fn thread_count(&self) -> usize {
        self.thread_count
    }

    /// A `Clone`, `Send` handle usable anywhere a [`crate::exec::Scheduler`]
    /// is expected — e.g. `exec::schedule(pool.scheduler_handle())`.
    pub fn scheduler_handle(&self) -> SchedulerHandle {
        SchedulerHandle(self.scheduler.clone())
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        self.scheduler.clear();
        for handle in self.threads.drain(..) {
            let _ = handle.join();
        }
    }
}

/// A cheaply-`Clone`able handle onto a pool's scheduler.
///
/// Grounding: the adapter `jar::concurrency::thread_pool::scheduler()`
/// returns, widened here with [`SchedulerHandle::spawn`] so callers don't
/// have to box a closure by hand at every call site.
#[derive(Clone)]
pub struct SchedulerHandle(std::sync::Arc<RoundRobinScheduler>);

impl SchedulerHandle {
    pub fn spawn<F>(&self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.0.schedule(Box::new(task));
    }
}

impl super::Scheduler for SchedulerHandle {
    fn schedule(&self, task: super::scheduler::Task) {
        RoundRobinScheduler::schedule(&self.0, task);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::{schedule, start, then, wait};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn runs_scheduled_work() {
        let pool = ThreadPool::new(2).unwrap();
        let future = wait(then(schedule(pool.scheduler_handle()), |_: ()| 1 + 1));
        assert_eq!(future.get().unwrap().unwrap(), 2);
    }

    #[test]
    fn fans_out_across_workers() {
        // `ThreadPool::drop` cancels still-queued tasks rather than
        // draining them (see `scheduler.clear()`), so this waits on a latch
        // for every task to actually start running before tearing the pool
        // down, instead of racing the drop against the workers.
        use crate::sync::Latch;

        let pool = ThreadPool::new(4).unwrap();
        let count = Arc::new(AtomicUsize::new(0));
        let latch = Arc::new(Latch::new(100));
        for _ in 0..100 {
            let count = count.clone();
            let latch = latch.clone();
            start(then(schedule(pool.scheduler_handle()), move |_: ()| {
                count.fetch_add(1, Ordering::SeqCst);
                latch.count_down(1);
            }));
        }
        latch.wait();
        assert_eq!(count.load(Ordering::SeqCst), 100);
    }

    #[test]
    fn zero_requested_threads_floors_to_one_and_still_runs_tasks() {
        let pool = ThreadPool::new(0).unwrap();
        assert_eq!(pool.thread_count(), 1);

        let future = wait(then(schedule(pool.scheduler_handle()), |_: ()| 1 + 1));
        assert_eq!(future.get().unwrap().unwrap(), 2);
    }

    #[test]
    fn default_thread_count_is_at_least_one() {
        assert!(ThreadPool::default_thread_count() >= 1);
    }
}
