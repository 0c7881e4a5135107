//! `then(sender, invocable)`: chains a transformation onto a sender's
//! result.
//!
//! Grounded on `jar::concurrency::then`/`details::sender_adapter`
//! (`then.hpp`, `details/sender_adapter.hpp`). The invocable always produces
//! a value here (`Out`, possibly `()`), so there's a single call path rather
//! than a separate `void` branch. A panicking invocable is caught with
//! `catch_unwind` and turned into [`crate::error::Error::Domain`], since
//! Rust closures have no typed-exception channel to propagate through.
use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::error::Error;

use super::receiver::Receiver;
use super::sender::{OperationState, Sender};

pub struct ThenSender<S, F> {
    sender: S,
    invocable: F,
}

pub fn then<S, F, Out>(sender: S, invocable: F) -> ThenSender<S, F>
where
    S: Sender,
    F: FnOnce(S::Output) -> Out + Send + 'static,
{
    ThenSender { sender, invocable }
}

/// Wraps a downstream receiver so the upstream sender's completion value is
/// first passed through `invocable`.
pub struct ReceiverAdapter<R, F> {
    receiver: R,
    invocable: F,
}

impl<R, F, In, Out> Receiver<In> for ReceiverAdapter<R, F>
where
    R: Receiver<Out>,
    F: FnOnce(In) -> Out,
{
    fn complete(self, value: In) {
        let ReceiverAdapter { receiver, invocable } = self;
        match catch_unwind(AssertUnwindSafe(|| invocable(value))) {
            Ok(out) => receiver.complete(out),
            Err(_) => receiver.fail(Error::Domain("panic in `then` callback")),
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

impl<S, F, Out> Sender for ThenSender<S, F>
where
    S: Sender,
    F: FnOnce(S::Output) -> Out + Send + 'static,
    Out: Send + 'static,
{
    type Output = Out;
    type State<R>
        = S::State<ReceiverAdapter<R, F>>
    where
        R: Receiver<Out> + Send + 'static;

    fn connect<R>(self, receiver: R) -> Self::State<R>
    where
        R: Receiver<Out> + Send + 'static,
    {
        self.sender.connect(ReceiverAdapter {
            receiver,
            invocable: self.invocable,
        })
    }
}
