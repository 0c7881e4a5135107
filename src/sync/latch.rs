//! A single-use countdown synchronizer.
//!
//! Grounded on `jar::concurrency::latch` (`lib_shared/inc/jar/concurrency/latch.hpp`
//! + `latch.cpp`).
use std::sync::{Condvar, Mutex};

/// Counts down from `expected` to zero exactly once; waiters block until it
/// does. Not reusable — there is no reset.
pub struct Latch {
    count: Mutex<usize>,
    condition: Condvar,
}

impl Latch {
    /// Creates a latch that reaches zero after `expected` decrements (zero
    /// is legal and starts already satisfied).
    pub fn new(expected: usize) -> Self {
        Self {
            count: Mutex::new(expected),
            condition: Condvar::new(),
        }
    }

    /// Decrements the counter by `n`, waking every waiter if it reaches
    /// zero.
    ///
    /// Decrementing below zero **saturates at zero** (see `DESIGN.md`)
    /// rather than wrapping or aborting.
    pub fn count_down(&self, n: usize) {
        let reached_zero = {
            let mut count = self.count.lock().unwrap();
            *count = count.saturating_sub(n);
            *count == 0
        };
        if reached_zero {
            self.condition.notify_all();
        }
    }

    /// Blocks until the counter reaches zero.
    pub fn wait(&self) {
        let mut count = self.count.lock().unwrap();
        while *count != 0 {
            count = self.condition.wait(count).unwrap();
        }
    }

    /// Non-blocking predicate: true iff the counter is currently zero.
    pub fn try_wait(&self) -> bool {
        *self.count.lock().unwrap() == 0
    }

    /// `count_down(n)` followed by `wait()`.
    pub fn arrive_and_wait(&self, n: usize) {
        self.count_down(n);
        self.wait();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn zero_expected_is_immediately_satisfied() {
        let latch = Latch::new(0);
        assert!(latch.try_wait());
        latch.wait();
    }

    #[test]
    fn count_down_from_other_thread_unblocks_wait() {
        let latch = Arc::new(Latch::new(3));
        let mut handles = Vec::new();
        for _ in 0..3 {
            let latch = latch.clone();
            handles.push(thread::spawn(move || latch.count_down(1)));
        }
        latch.wait();
        for h in handles {
            h.join().unwrap();
        }
        assert!(latch.try_wait());
    }

    #[test]
    fn count_down_by_n_reaches_zero_in_one_shot() {
        let latch = Latch::new(5);
        latch.count_down(5);
        assert!(latch.try_wait());
    }

    #[test]
    fn underflow_saturates_rather_than_panicking() {
        let latch = Latch::new(1);
        latch.count_down(5);
        assert!(latch.try_wait());
    }

    #[test]
    fn arrive_and_wait_combines_both() {
        let latch = Arc::new(Latch::new(1));
        latch.arrive_and_wait(1);
        assert!(latch.try_wait());
    }
}
