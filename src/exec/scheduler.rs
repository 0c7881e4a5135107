//! A round-robin, work-stealing task scheduler backed by one
//! [`Channel`] per worker.
//!
//! Grounded on `jar::concurrency::rr_scheduler`/`scheduler`
//! (`rr_scheduler.hpp`, `scheduler.hpp`, `scheduler.cpp`). `push`/`pop`
//! indices are independent atomics so producers and consumers don't
//! contend with each other picking a home queue, each wrapped in
//! `crossbeam_utils::CachePadded` to avoid false sharing between them.
//!
//! Each thread's home queue index is cached in a `thread_local`, keyed by
//! scheduler id, so multiple independent schedulers on the same thread each
//! get their own stable home queue instead of clobbering a single shared
//! slot — see `DESIGN.md`.
use std::cell::RefCell;
use std::sync::atomic::{AtomicUsize, Ordering};

use crossbeam_utils::CachePadded;

use crate::error::Result;
use crate::precondition::not_zero;
use crate::sync::Channel;

use super::Scheduler as SchedulerTrait;

pub type Task = Box<dyn FnOnce() + Send>;

static NEXT_SCHEDULER_ID: AtomicUsize = AtomicUsize::new(0);

thread_local! {
    static HOME_INDEX: RefCell<Vec<(usize, usize)>> = const { RefCell::new(Vec::new()) };
}

/// Distributes tasks across `queue_count` internal queues round-robin, and
/// lets workers pull from their own queue first, then steal from others
/// before blocking.
pub struct RoundRobinScheduler {
    id: usize,
    queues: Vec<Channel<Task>>,
    push_index: CachePadded<AtomicUsize>,
    pop_index: CachePadded<AtomicUsize>,
}

impl RoundRobinScheduler {
    pub fn new(queue_count: usize) -> Result<Self> {
        let queue_count = not_zero(queue_count, "queue_count cannot be zero")?;
        Ok(Self {
            id: NEXT_SCHEDULER_ID.fetch_add(1, Ordering::Relaxed),
            queues: (0..queue_count).map(|_| Channel::new()).collect(),
            push_index: CachePadded::new(AtomicUsize::new(0)),
            pop_index: CachePadded::new(AtomicUsize::new(0)),
        })
    }

    fn home_index(&self) -> usize {
        HOME_INDEX.with(|home| {
            let mut home = home.borrow_mut();
            if let Some((_, index)) = home.iter().find(|(id, _)| *id == self.id) {
                return *index;
            }
            let index = self.pop_index.fetch_add(1, Ordering::Relaxed) % self.queues.len();
            home.push((self.id, index));
            index
        })
    }

    /// Blocks until a task is available on this thread's home queue or one
    /// of its neighbors, or every queue has been cleared. Assigns this
    /// calling thread a stable home queue on first use.
    pub fn scheduled(&self) -> Option<Task> {
        let home = self.home_index();
        let n = self.queues.len();
        for offset in 0..n {
            if let Some(task) = self.queues[(home + offset) % n].try_pop() {
                return Some(task);
            }
        }
        self.queues[home].pop()
    }

    /// Hands `task` to one queue, round-robin, falling back to a blocking
    /// push on the target queue after `4 * queue_count` contended attempts.
    pub fn schedule(&self, task: Task) {
        let n = self.queues.len();
        let try_n_times = n * 4;
        let index = self.push_index.fetch_add(1, Ordering::Relaxed);

        let mut task = task;
        for offset in 0..try_n_times {
            match self.queues[(index + offset) % n].try_push(task) {
                Ok(()) => return,
                Err(returned) => task = returned,
            }
        }
        self.queues[index % n].push(task);
    }

    /// Marks every queue cancelled, waking blocked workers with no task.
    pub fn clear(&self) {
        for queue in &self.queues {
            queue.clear();
        }
    }
}

impl SchedulerTrait for RoundRobinScheduler {
    fn schedule(&self, task: Task) {
        RoundRobinScheduler::schedule(self, task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize as AU;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn zero_queue_count_rejected() {
        assert!(RoundRobinScheduler::new(0).is_err());
    }

    #[test]
    fn schedule_then_scheduled_round_trips() {
        let scheduler = RoundRobinScheduler::new(2).unwrap();
        let ran = Arc::new(AU::new(0));
        let ran2 = ran.clone();
        scheduler.schedule(Box::new(move || {
            ran2.fetch_add(1, Ordering::SeqCst);
        }));
        let task = scheduler.scheduled().unwrap();
        task();
        assert_eq!(ran.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn clear_unblocks_scheduled() {
        let scheduler = Arc::new(RoundRobinScheduler::new(1).unwrap());
        let s2 = scheduler.clone();
        let handle = thread::spawn(move || s2.scheduled());
        thread::sleep(std::time::Duration::from_millis(20));
        scheduler.clear();
        assert!(handle.join().unwrap().is_none());
    }

    #[test]
    fn every_task_eventually_runs() {
        let scheduler = Arc::new(RoundRobinScheduler::new(4).unwrap());
        let count = Arc::new(AU::new(0));
        for _ in 0..50 {
            let count = count.clone();
            scheduler.schedule(Box::new(move || {
                count.fetch_add(1, Ordering::SeqCst);
            }));
        }
        for _ in 0..50 {
            scheduler.scheduled().unwrap()();
        }
        assert_eq!(count.load(Ordering::SeqCst), 50);
    }

    #[test]
    fn distinct_schedulers_get_independent_home_queues() {
        // Exercises the id-keyed home-index cache: calling `scheduled()` on
        // two different schedulers from the same thread must not reuse the
        // first scheduler's cached index for the second.
        let a = RoundRobinScheduler::new(1).unwrap();
        let b = RoundRobinScheduler::new(1).unwrap();
        a.schedule(Box::new(|| {}));
        b.schedule(Box::new(|| {}));
        assert!(a.scheduled().is_some());
        assert!(b.scheduled().is_some());
    }
}
