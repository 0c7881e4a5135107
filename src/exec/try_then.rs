//! `try_then(sender, invocable)`: chains a fallible transformation onto a
//! sender's result. Unlike [`super::then::then`], `invocable` returns
//! `Result<Out, Error>`; an `Err` is translated into `receiver.fail` instead
//! of being forwarded as a value.
//!
//! Grounded on `jar::concurrency::then`'s `Result`-returning branch
//! (`then.hpp`). Split out as its own combinator rather than detected by the
//! shape of `then`'s `Out` type: stable Rust has no specialization on
//! `Out == Result<T, Error>` the way the C++ original branches at compile
//! time, so the two cases get two free functions instead.
use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::error::Error;

use super::receiver::Receiver;
use super::sender::{OperationState, Sender};

pub struct TryThenSender<S, F> {
    sender: S,
    invocable: F,
}

pub fn try_then<S, F, Out>(sender: S, invocable: F) -> TryThenSender<S, F>
where
    S: Sender,
    F: FnOnce(S::Output) -> Result<Out, Error> + Send + 'static,
{
    TryThenSender { sender, invocable }
}

/// Wraps a downstream receiver so the upstream sender's completion value is
/// passed through `invocable`, with `Err` diverted to `receiver.fail`.
pub struct TryReceiverAdapter<R, F> {
    receiver: R,
    invocable: F,
}

impl<R, F, In, Out> Receiver<In> for TryReceiverAdapter<R, F>
where
    R: Receiver<Out>,
    F: FnOnce(In) -> Result<Out, Error>,
{
    fn complete(self, value: In) {
        let TryReceiverAdapter { receiver, invocable } = self;
        match catch_unwind(AssertUnwindSafe(|| invocable(value))) {
            Ok(Ok(out)) => receiver.complete(out),
            Ok(Err(error)) => receiver.fail(error),
            Err(_) => receiver.fail(Error::Domain("panic in `try_then` callback")),
        }
    }

    fn fail(self, error: Error) {
        self.receiver.fail(error);
    }

    fn cancel(self) {
        self.receiver.cancel();
    }

    fn is_cancelled(&self) -> bool {
        self.receiver.is_cancelled()
    }
}

impl<S, F, Out> Sender for TryThenSender<S, F>
where
    S: Sender,
    F: FnOnce(S::Output) -> Result<Out, Error> + Send + 'static,
    Out: Send + 'static,
{
    type Output = Out;
    type State<R>
        = S::State<TryReceiverAdapter<R, F>>
    where
        R: Receiver<Out> + Send + 'static;

    fn connect<R>(self, receiver: R) -> Self::State<R>
    where
        R: Receiver<Out> + Send + 'static,
    {
        self.sender.connect(TryReceiverAdapter {
            receiver,
            invocable: self.invocable,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::{schedule, wait};

    #[derive(Clone, Default)]
    struct InlineScheduler;

    impl super::super::Scheduler for InlineScheduler {
        fn schedule(&self, task: Box<dyn FnOnce() + Send>) {
            task();
        }
    }

    #[test]
    fn ok_forwards_the_value() {
        let sender = try_then(schedule(InlineScheduler), |_: ()| Ok::<i32, Error>(7));
        let future = wait(sender);
        assert_eq!(future.get().unwrap().unwrap(), 7);
    }

    #[test]
    fn err_fails_the_receiver() {
        let sender = try_then(schedule(InlineScheduler), |_: ()| {
            Err::<i32, Error>(Error::Domain("nope"))
        });
        let future = wait(sender);
        match future.get() {
            Err(Error::Domain("nope")) => {}
            other => panic!("expected Domain(\"nope\"), got {other:?}"),
        }
    }

    #[test]
    fn panic_becomes_domain_error() {
        let sender = try_then(schedule(InlineScheduler), |_: ()| -> Result<i32, Error> {
            panic!("boom")
        });
        let future = wait(sender);
        match future.get() {
            Err(Error::Domain(_)) => {}
            other => panic!("expected Domain error, got {other:?}"),
        }
    }
}
