//! A bounded-queue-count, unbounded-depth MPMC channel with cancellation.
//!
//! Grounded on `jar::concurrency::queue<T>` (`lib_shared/inc/jar/concurrency/queue.hpp`):
//! one mutex guarding a `VecDeque`, one condition variable for the wait path,
//! and a cancelled flag guarded by the same mutex rather than promoted to a
//! separate atomic, since it's only ever read or written while the lock is
//! already held.
use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};

struct Inner<T> {
    items: VecDeque<T>,
    cancelled: bool,
}

/// An ordered, move-only producer-consumer container.
///
/// `push`/`pop` block; `try_push`/`try_pop` never block and fail only on
/// lock contention (`try_push`) or on an empty, non-cancelled channel
/// (`try_pop`). After [`Channel::clear`], every subsequent `pop` returns
/// `None` promptly — there is no way to "un-cancel" a channel.
pub struct Channel<T> {
    inner: Mutex<Inner<T>>,
    condition: Condvar,
}

impl<T> Default for Channel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Channel<T> {
    /// Creates an empty, non-cancelled channel.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                items: VecDeque::new(),
                cancelled: false,
            }),
            condition: Condvar::new(),
        }
    }

    /// Appends `item` and wakes one waiter.
    pub fn push(&self, item: T) {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.items.push_back(item);
        }
        self.condition.notify_one();
    }

    /// Appends `item` without blocking, handing it back on failure so
    /// callers can retry elsewhere instead of losing it.
    ///
    /// Fails only if the internal mutex cannot be acquired without waiting;
    /// a full-capacity failure does not exist because this channel has no
    /// fixed per-queue capacity (the "bounded" in the component name refers
    /// to the scheduler's fixed queue *count*, see
    /// [`crate::exec::scheduler`]).
    pub fn try_push(&self, item: T) -> Result<(), T> {
        match self.inner.try_lock() {
            Ok(mut inner) => {
                inner.items.push_back(item);
                drop(inner);
                self.condition.notify_one();
                Ok(())
            }
            Err(_) => Err(item),
        }
    }

    /// Blocks until an item is available or the channel is cancelled.
    pub fn pop(&self) -> Option<T> {
        let mut inner = self.inner.lock().unwrap();
        loop {
            if let Some(item) = inner.items.pop_front() {
                return Some(item);
            }
            if inner.cancelled {
                return None;
            }
            inner = self.condition.wait(inner).unwrap();
        }
    }

    /// Returns an item if one is immediately available under a non-blocking
    /// lock attempt; otherwise `None`. Does not distinguish "empty" from
    /// "lock contended" from "cancelled" — callers that need cancellation to
    /// be conclusive should use [`Channel::pop`].
    pub fn try_pop(&self) -> Option<T> {
        let mut inner = self.inner.try_lock().ok()?;
        inner.items.pop_front()
    }

    /// Marks the channel cancelled, drops buffered items, and wakes every
    /// waiter. Idempotent.
    pub fn clear(&self) {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.cancelled = true;
            inner.items.clear();
        }
        self.condition.notify_all();
    }

    /// True once [`Channel::clear`] has been called.
    pub fn is_cancelled(&self) -> bool {
        self.inner.lock().unwrap().cancelled
    }

    /// Current buffered item count (diagnostic only — can change
    /// immediately after this returns under concurrent use).
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn fifo_order() {
        let ch = Channel::new();
        ch.push(1);
        ch.push(2);
        ch.push(3);
        assert_eq!(ch.pop(), Some(1));
        assert_eq!(ch.pop(), Some(2));
        assert_eq!(ch.pop(), Some(3));
    }

    #[test]
    fn try_pop_on_empty_is_none() {
        let ch: Channel<i32> = Channel::new();
        assert_eq!(ch.try_pop(), None);
    }

    #[test]
    fn clear_wakes_blocked_pop() {
        let ch = Arc::new(Channel::<i32>::new());
        let ch2 = ch.clone();
        let handle = thread::spawn(move || ch2.pop());
        thread::sleep(Duration::from_millis(20));
        ch.clear();
        assert_eq!(handle.join().unwrap(), None);
    }

    #[test]
    fn clear_drops_buffered_items() {
        let ch = Channel::new();
        ch.push(1);
        ch.push(2);
        ch.clear();
        assert_eq!(ch.pop(), None);
        assert_eq!(ch.pop(), None);
    }

    #[test]
    fn push_pop_accounting() {
        // push-count == pop-count + items-still-buffered + items-dropped-by-clear
        let ch = Channel::new();
        for i in 0..5 {
            ch.push(i);
        }
        let mut popped = 0;
        assert!(ch.pop().is_some());
        popped += 1;
        assert!(ch.pop().is_some());
        popped += 1;
        let buffered = ch.len();
        ch.clear();
        assert_eq!(popped + buffered, 4);
    }

    #[test]
    fn move_only_items_are_dropped_exactly_once() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        struct DropCounter(Arc<AtomicUsize>);
        impl Drop for DropCounter {
            fn drop(&mut self) {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }

        let count = Arc::new(AtomicUsize::new(0));
        let ch = Channel::new();
        ch.push(DropCounter(count.clone()));
        ch.push(DropCounter(count.clone()));
        drop(ch.pop());
        ch.clear();
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }
}
