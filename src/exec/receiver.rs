//! Receiver types: the three ways an operation's result can be consumed.
//!
//! Grounded on `jar::concurrency::details::value_receiver`
//! (`value_receiver.hpp`) and `callback_receiver` (`callback_receiver.hpp`).
use std::sync::Arc;

use crate::error::Error;
use crate::future::{Future, Promise};

use super::invocable::{IntoCancelHandler, IntoCompleteHandler, IntoErrorHandler};

/// Consumes exactly one of a value, an error, or a cancellation.
///
/// Each terminal method takes `self` by value, so at most one can ever run
/// for a given receiver instance — ownership enforces "exactly once"
/// without needing a runtime state flag.
pub trait Receiver<V> {
    fn complete(self, value: V);
    fn fail(self, error: Error);
    fn cancel(self);

    /// Non-consuming: operation states poll this before deciding whether to
    /// run the underlying work at all.
    fn is_cancelled(&self) -> bool;
}

/// A receiver backed by a [`Promise`], letting the caller observe the
/// outcome through the paired [`Future`].
///
/// Grounding: `jar::concurrency::details::value_receiver<Value>`.
pub struct ValueReceiver<V> {
    promise: Arc<Promise<V>>,
}

impl<V> ValueReceiver<V> {
    pub fn new() -> Self {
        Self {
            promise: Arc::new(Promise::new()),
        }
    }

    pub fn future(&self) -> Future<V> {
        self.promise.future()
    }
}

impl<V> Default for ValueReceiver<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Receiver<V> for ValueReceiver<V> {
    fn complete(self, value: V) {
        self.promise.set_value(value);
    }

    fn fail(self, error: Error) {
        self.promise.set_exception(error);
    }

    fn cancel(self) {
        self.promise.cancel();
    }

    fn is_cancelled(&self) -> bool {
        self.promise.is_cancelled()
    }
}

/// A receiver backed by three user-supplied closures.
///
/// Grounding: `jar::concurrency::details::callback_receiver`. Accepts a
/// completion handler taking either zero or one argument, dispatched via
/// [`CallbackReceiver::new`]'s `IntoCompleteHandler` bound — see
/// [`super::invocable`].
pub struct CallbackReceiver<V> {
    complete: Box<dyn FnOnce(V) + Send>,
    error: Box<dyn FnOnce(Error) + Send>,
    cancel: Box<dyn FnOnce() + Send>,
    cancelled: Arc<std::sync::atomic::AtomicBool>,
}

impl<V> CallbackReceiver<V> {
    pub fn new<C, M, E, Ca>(complete: C, error: E, cancel: Ca) -> Self
    where
        C: IntoCompleteHandler<V, M>,
        E: IntoErrorHandler,
        Ca: IntoCancelHandler,
    {
        Self {
            complete: complete.into_complete_handler(),
            error: error.into_error_handler(),
            cancel: cancel.into_cancel_handler(),
            cancelled: Arc::new(std::sync::atomic::AtomicBool::new(false)),
        }
    }

    /// A handle that can mark this receiver cancelled from another thread
    /// before the operation state runs it.
    pub fn cancellation_handle(&self) -> CancellationHandle {
        CancellationHandle {
            flag: self.cancelled.clone(),
        }
    }
}

impl<V> Receiver<V> for CallbackReceiver<V> {
    fn complete(self, value: V) {
        (self.complete)(value);
    }

    fn fail(self, error: Error) {
        (self.error)(error);
    }

    fn cancel(self) {
        (self.cancel)();
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(std::sync::atomic::Ordering::Acquire)
    }
}

/// An external handle that can cancel a not-yet-started [`CallbackReceiver`].
#[derive(Clone)]
pub struct CancellationHandle {
    flag: Arc<std::sync::atomic::AtomicBool>,
}

impl CancellationHandle {
    pub fn cancel(&self) {
        self.flag.store(true, std::sync::atomic::Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(std::sync::atomic::Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_receiver_completes_future() {
        let receiver = ValueReceiver::new();
        let future = receiver.future();
        receiver.complete(9);
        assert_eq!(future.get().unwrap().unwrap(), 9);
    }

    #[test]
    fn value_receiver_fails_future() {
        let receiver: ValueReceiver<i32> = ValueReceiver::new();
        let future = receiver.future();
        receiver.fail(Error::Domain("broke"));
        assert!(future.get().is_err());
    }

    #[test]
    fn callback_receiver_zero_arg_complete() {
        use std::sync::atomic::{AtomicBool, Ordering};
        let fired = Arc::new(AtomicBool::new(false));
        let fired2 = fired.clone();
        let receiver = CallbackReceiver::<i32>::new(
            move || fired2.store(true, Ordering::SeqCst),
            |_e: Error| {},
            || {},
        );
        receiver.complete(5);
        assert!(fired.load(Ordering::SeqCst));
    }

    #[test]
    fn callback_receiver_one_arg_complete() {
        use std::sync::Mutex;
        let seen = Arc::new(Mutex::new(0));
        let seen2 = seen.clone();
        let receiver = CallbackReceiver::<i32>::new(
            move |v: i32| *seen2.lock().unwrap() = v,
            |_e: Error| {},
            || {},
        );
        receiver.complete(11);
        assert_eq!(*seen.lock().unwrap(), 11);
    }

    #[test]
    fn callback_receiver_cancellation_handle_observes_external_cancel() {
        let receiver = CallbackReceiver::<i32>::new(|_v: i32| {}, |_e: Error| {}, || {});
        let handle = receiver.cancellation_handle();
        assert!(!receiver.is_cancelled());
        handle.cancel();
        assert!(receiver.is_cancelled());
    }
}
